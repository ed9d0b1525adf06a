// src/definition/dump.rs

//! Canonical source form of a justfile.
//!
//! Parsing the output of `Display for Justfile` yields the same items,
//! so `rundag --dump` can be used to normalise a file.

use std::fmt;

use crate::definition::model::{Justfile, Line, Parameter, ParameterKind, Recipe, Settings};

/// Double-quote `value`, escaping what the parser unescapes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParameterKind::Single => {}
            ParameterKind::Star => f.write_str("*")?,
            ParameterKind::Plus => f.write_str("+")?,
        }
        if self.export {
            f.write_str("$")?;
        }
        f.write_str(&self.name)?;
        if let Some(default) = &self.default {
            write!(f, "={}", quote(default))?;
        }
        Ok(())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ignore_errors {
            f.write_str("-")?;
        }
        if self.quiet {
            f.write_str("@")?;
        }
        write!(f, "{}", self.template)
    }
}

impl Recipe {
    /// Header line as written in the source, e.g. `build target="debug": fmt`.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        if self.quiet {
            out.push('@');
        }
        out.push_str(&self.name);
        for parameter in &self.parameters {
            out.push(' ');
            out.push_str(&parameter.to_string());
        }
        out.push(':');
        for dep in &self.dependencies {
            out.push(' ');
            out.push_str(dep);
        }
        out
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doc) = &self.doc {
            writeln!(f, "# {doc}")?;
        }
        if self.private && !self.name.starts_with('_') {
            writeln!(f, "[private]")?;
        }
        writeln!(f, "{}", self.signature())?;
        for line in &self.lines {
            writeln!(f, "    {line}")?;
        }
        Ok(())
    }
}

fn settings_block(settings: &Settings) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(shell) = &settings.shell {
        let items: Vec<String> = shell.iter().map(|s| quote(s)).collect();
        lines.push(format!("set shell := [{}]", items.join(", ")));
    }
    if settings.export {
        lines.push("set export".to_string());
    }
    if settings.quiet {
        lines.push("set quiet".to_string());
    }
    (!lines.is_empty()).then(|| lines.join("\n") + "\n")
}

impl fmt::Display for Justfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut blocks: Vec<String> = Vec::new();

        if let Some(settings) = settings_block(self.settings()) {
            blocks.push(settings);
        }

        if !self.assignments().is_empty() {
            let mut block = String::new();
            for a in self.assignments() {
                let export = if a.export { "export " } else { "" };
                block.push_str(&format!("{export}{} := {}\n", a.name, quote(&a.value)));
            }
            blocks.push(block);
        }

        if !self.aliases().is_empty() {
            let mut block = String::new();
            for alias in self.aliases() {
                block.push_str(&format!("alias {} := {}\n", alias.name, alias.target));
            }
            blocks.push(block);
        }

        for recipe in self.recipes() {
            blocks.push(recipe.to_string());
        }

        write!(f, "{}", blocks.join("\n"))
    }
}
