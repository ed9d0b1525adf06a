// src/definition/template.rs

//! Typed command-line templates.
//!
//! A template is a list of literal text and `{{name}}` placeholder
//! fragments. Rendering looks each placeholder up by name; there is no
//! expression evaluation. `{{{{` is an escaped literal `{{`.

use std::fmt;

use serde::Serialize;

use crate::definition::parser::is_identifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fragment {
    Text(String),
    Placeholder(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Template {
    fragments: Vec<Fragment>,
}

impl Template {
    /// Parse template source. On failure returns a message suitable for a
    /// parse error.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut template = Template::default();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            template.push_text(&rest[..start]);
            let after_open = &rest[start + 2..];

            if let Some(escaped) = after_open.strip_prefix("{{") {
                template.push_text("{{");
                rest = escaped;
                continue;
            }

            let Some(end) = after_open.find("}}") else {
                return Err("unmatched `{{` in command line".to_string());
            };

            let name = after_open[..end].trim();
            if !is_identifier(name) {
                return Err(format!("invalid placeholder `{{{{{name}}}}}`"));
            }
            template.fragments.push(Fragment::Placeholder(name.to_string()));
            rest = &after_open[end + 2..];
        }

        template.push_text(rest);
        Ok(template)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Fragment::Text(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(Fragment::Text(text.to_string()));
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Names referenced by placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Placeholder(name) => Some(name.as_str()),
            Fragment::Text(_) => None,
        })
    }

    /// Substitute every placeholder via `lookup`.
    ///
    /// Returns the name of the first placeholder `lookup` cannot resolve.
    pub fn render<'a, F>(&self, lookup: F) -> Result<String, String>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Placeholder(name) => match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(name.clone()),
                },
            }
        }
        Ok(out)
    }
}

/// Writes the template back in source form.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => write!(f, "{}", text.replace("{{", "{{{{"))?,
                Fragment::Placeholder(name) => write!(f, "{{{{{name}}}}}")?,
            }
        }
        Ok(())
    }
}
