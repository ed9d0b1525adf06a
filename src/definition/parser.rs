// src/definition/parser.rs

//! Line-oriented justfile parser.
//!
//! Column-0 lines start items (recipe headers, assignments, aliases,
//! settings, attributes, comments). Indented lines belong to the most recent
//! recipe header. The grammar is summarised in [`crate::definition`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::definition::model::{
    Alias, Assignment, Line, Parameter, ParameterKind, RawJustfile, Recipe,
};
use crate::definition::template::Template;
use crate::errors::{Result, RundagError};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("identifier regex is valid")
});

/// Whether `s` is a valid recipe, parameter or variable name.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse justfile source text.
///
/// Performs syntax checks only; use [`crate::definition::load_str`] to also
/// validate names, dependencies and placeholders.
pub fn parse(source: &str) -> Result<RawJustfile> {
    let mut parser = Parser::default();
    for (i, line) in source.lines().enumerate() {
        parser.line(i + 1, line)?;
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    raw: RawJustfile,
    body: Option<Body>,
    doc: Option<String>,
    /// Line number of a pending `[private]` attribute.
    attribute: Option<(usize, String)>,
}

struct Body {
    recipe: Recipe,
    indent: Option<String>,
}

fn parse_error(line: usize, text: &str, message: impl Into<String>) -> RundagError {
    RundagError::Parse {
        line,
        text: text.to_string(),
        message: message.into(),
    }
}

impl Parser {
    fn line(&mut self, number: usize, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            if self.body.is_none() {
                self.doc = None;
            }
            return Ok(());
        }

        if text.starts_with([' ', '\t']) {
            return self.body_line(number, text);
        }

        self.finish_recipe();

        if let Some(comment) = text.strip_prefix('#') {
            let comment = comment.trim();
            self.doc = (!comment.is_empty() && !comment.starts_with('!'))
                .then(|| comment.to_string());
            return Ok(());
        }

        if text.starts_with('[') {
            return self.attribute_line(number, text);
        }

        let doc = self.doc.take();
        let private = self.attribute.take();

        if let Some(item) = self.non_recipe_item(number, text)? {
            if let Some((attr_line, attr_text)) = private {
                return Err(parse_error(
                    attr_line,
                    &attr_text,
                    "attribute is not followed by a recipe",
                ));
            }
            self.push_item(item);
            return Ok(());
        }

        let mut recipe = parse_header(number, text)?;
        recipe.doc = doc;
        recipe.private = private.is_some() || recipe.name.starts_with('_');
        trace!(recipe = %recipe.name, line = number, "parsed recipe header");

        self.body = Some(Body {
            recipe,
            indent: None,
        });
        Ok(())
    }

    fn body_line(&mut self, number: usize, text: &str) -> Result<()> {
        let Some(body) = self.body.as_mut() else {
            return Err(parse_error(
                number,
                text,
                "indented command line is not part of any recipe",
            ));
        };

        let content = match &body.indent {
            None => {
                let trimmed = text.trim_start_matches([' ', '\t']);
                body.indent = Some(text[..text.len() - trimmed.len()].to_string());
                trimmed
            }
            Some(indent) => match text.strip_prefix(indent.as_str()) {
                Some(rest) => rest,
                None => {
                    return Err(parse_error(
                        number,
                        text,
                        format!(
                            "inconsistent indentation in recipe `{}`",
                            body.recipe.name
                        ),
                    ));
                }
            },
        };

        let mut rest = content;
        let mut quiet = false;
        let mut ignore_errors = false;
        loop {
            if !quiet && rest.starts_with('@') {
                quiet = true;
                rest = &rest[1..];
            } else if !ignore_errors && rest.starts_with('-') {
                ignore_errors = true;
                rest = &rest[1..];
            } else {
                break;
            }
        }

        let template = Template::parse(rest).map_err(|msg| parse_error(number, text, msg))?;
        body.recipe.lines.push(Line {
            template,
            quiet,
            ignore_errors,
        });
        Ok(())
    }

    fn attribute_line(&mut self, number: usize, text: &str) -> Result<()> {
        let inner = text
            .trim_end()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| parse_error(number, text, "unterminated attribute"))?;

        for attribute in inner.split(',').map(str::trim) {
            if attribute != "private" {
                return Err(parse_error(
                    number,
                    text,
                    format!("unknown attribute `{attribute}`"),
                ));
            }
        }
        self.attribute = Some((number, text.to_string()));
        Ok(())
    }

    fn non_recipe_item(&self, number: usize, text: &str) -> Result<Option<Item>> {
        let trimmed = text.trim_end();

        // Boolean settings: `set export`, `set quiet`.
        if let Some(name) = trimmed.strip_prefix("set ") {
            let name = name.trim();
            if is_identifier(name) {
                return boolean_setting(number, text, name, true).map(Some);
            }
        }

        let Some((lhs, rhs)) = trimmed.split_once(":=") else {
            return Ok(None);
        };
        let lhs = lhs.trim();
        let rhs = rhs.trim();
        let words: Vec<&str> = lhs.split_whitespace().collect();

        let item = match words.as_slice() {
            [name] if is_identifier(name) => Item::Assignment(Assignment {
                name: name.to_string(),
                value: parse_value(number, text, rhs)?,
                export: false,
            }),
            ["export", name] if is_identifier(name) => Item::Assignment(Assignment {
                name: name.to_string(),
                value: parse_value(number, text, rhs)?,
                export: true,
            }),
            ["alias", name] if is_identifier(name) => {
                if !is_identifier(rhs) {
                    return Err(parse_error(
                        number,
                        text,
                        format!("alias target `{rhs}` is not a recipe name"),
                    ));
                }
                Item::Alias(Alias {
                    name: name.to_string(),
                    target: rhs.to_string(),
                })
            }
            ["set", "shell"] => Item::Shell(parse_string_list(number, text, rhs)?),
            ["set", name] => {
                let value = match rhs {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(parse_error(
                            number,
                            text,
                            format!("setting `{name}` expects `true` or `false`, got `{other}`"),
                        ));
                    }
                };
                boolean_setting(number, text, name, value)?
            }
            _ => return Ok(None),
        };

        Ok(Some(item))
    }

    fn push_item(&mut self, item: Item) {
        match item {
            Item::Assignment(assignment) => self.raw.assignments.push(assignment),
            Item::Alias(alias) => self.raw.aliases.push(alias),
            Item::Shell(shell) => self.raw.settings.shell = Some(shell),
            Item::Export(value) => self.raw.settings.export = value,
            Item::Quiet(value) => self.raw.settings.quiet = value,
        }
    }

    fn finish_recipe(&mut self) {
        if let Some(body) = self.body.take() {
            self.raw.recipes.push(body.recipe);
        }
    }

    fn finish(mut self) -> Result<RawJustfile> {
        self.finish_recipe();
        if let Some((line, text)) = self.attribute {
            return Err(parse_error(line, &text, "attribute is not followed by a recipe"));
        }
        Ok(self.raw)
    }
}

enum Item {
    Assignment(Assignment),
    Alias(Alias),
    Shell(Vec<String>),
    Export(bool),
    Quiet(bool),
}

fn boolean_setting(number: usize, text: &str, name: &str, value: bool) -> Result<Item> {
    match name {
        "export" => Ok(Item::Export(value)),
        "quiet" => Ok(Item::Quiet(value)),
        "shell" => Err(parse_error(number, text, "setting `shell` expects a list of strings")),
        other => Err(parse_error(number, text, format!("unknown setting `{other}`"))),
    }
}

/// Right-hand side of an assignment: a quoted string or a bare word.
fn parse_value(number: usize, text: &str, rhs: &str) -> Result<String> {
    let mut cursor = Cursor::new(rhs);
    let value = match cursor.peek() {
        Some('"') | Some('\'') => cursor
            .quoted()
            .map_err(|msg| parse_error(number, text, msg))?,
        Some(_) => cursor.take_while(|c| !c.is_whitespace()).to_string(),
        None => return Err(parse_error(number, text, "expected a value after `:=`")),
    };
    cursor.skip_whitespace();
    if !cursor.is_done() {
        return Err(parse_error(number, text, "unexpected text after value"));
    }
    Ok(value)
}

/// `["bash", "-cu"]`
fn parse_string_list(number: usize, text: &str, rhs: &str) -> Result<Vec<String>> {
    let err = |msg: &str| parse_error(number, text, msg);
    let mut cursor = Cursor::new(rhs);
    if !cursor.eat('[') {
        return Err(err("expected `[` to start a list of strings"));
    }

    let mut items = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.eat(']') {
            break;
        }
        match cursor.peek() {
            Some('"') | Some('\'') => items.push(cursor.quoted().map_err(|m| err(&m))?),
            _ => return Err(err("expected a quoted string in list")),
        }
        cursor.skip_whitespace();
        if cursor.eat(']') {
            break;
        }
        if !cursor.eat(',') {
            return Err(err("expected `,` or `]` in list"));
        }
    }

    cursor.skip_whitespace();
    if !cursor.is_done() {
        return Err(err("unexpected text after list"));
    }
    if items.is_empty() {
        return Err(err("shell must name at least a program"));
    }
    Ok(items)
}

/// `@?name params...: deps...`
fn parse_header(number: usize, text: &str) -> Result<Recipe> {
    let err = |msg: String| parse_error(number, text, msg);
    let mut cursor = Cursor::new(text.trim_end());

    let quiet = cursor.eat('@');
    let name = cursor.take_while(is_identifier_char);
    if !is_identifier(name) {
        return Err(err("expected a recipe name".to_string()));
    }
    let name = name.to_string();

    let mut parameters: Vec<Parameter> = Vec::new();
    loop {
        let had_space = cursor.skip_whitespace();
        match cursor.peek() {
            Some(':') => {
                cursor.bump();
                break;
            }
            None => {
                return Err(err(format!("expected `:` after header of recipe `{name}`")));
            }
            Some(c) if !had_space => {
                return Err(err(format!("unexpected character `{c}` in recipe header")));
            }
            Some(_) => {
                let parameter = parse_parameter(&mut cursor).map_err(&err)?;
                check_parameter(&name, &parameters, &parameter).map_err(&err)?;
                parameters.push(parameter);
            }
        }
    }

    let rest = cursor.rest();
    if rest.starts_with('=') {
        return Err(err("malformed assignment".to_string()));
    }

    let mut dependencies = Vec::new();
    for dependency in rest.split_whitespace() {
        if !is_identifier(dependency) {
            return Err(err(format!("invalid dependency name `{dependency}`")));
        }
        dependencies.push(dependency.to_string());
    }

    Ok(Recipe {
        name,
        doc: None,
        parameters,
        dependencies,
        lines: Vec::new(),
        quiet,
        private: false,
        line_number: number,
    })
}

fn parse_parameter(cursor: &mut Cursor<'_>) -> std::result::Result<Parameter, String> {
    let kind = if cursor.eat('*') {
        ParameterKind::Star
    } else if cursor.eat('+') {
        ParameterKind::Plus
    } else {
        ParameterKind::Single
    };
    let export = cursor.eat('$');

    let name = cursor.take_while(is_identifier_char);
    if !is_identifier(name) {
        return Err(match cursor.peek() {
            Some(c) if name.is_empty() => format!("unexpected character `{c}` in parameter list"),
            _ => format!("invalid parameter name `{name}`"),
        });
    }
    let name = name.to_string();

    let default = if cursor.eat('=') {
        let value = match cursor.peek() {
            Some('"') | Some('\'') => cursor.quoted()?,
            _ => cursor
                .take_while(|c| !c.is_whitespace() && c != ':')
                .to_string(),
        };
        if value.is_empty() && !cursor.last_was_quoted {
            return Err(format!("parameter `{name}` is missing its default value"));
        }
        Some(value)
    } else {
        None
    };

    match cursor.peek() {
        None | Some(':') => {}
        Some(c) if c.is_whitespace() => {}
        Some(c) => return Err(format!("unexpected character `{c}` after parameter `{name}`")),
    }

    Ok(Parameter {
        name,
        default,
        kind,
        export,
    })
}

fn check_parameter(
    recipe: &str,
    previous: &[Parameter],
    parameter: &Parameter,
) -> std::result::Result<(), String> {
    if previous.iter().any(|p| p.name == parameter.name) {
        return Err(format!(
            "recipe `{recipe}` has duplicate parameter `{}`",
            parameter.name
        ));
    }
    if previous.iter().any(|p| p.kind.is_variadic()) {
        return Err(format!(
            "parameter `{}` follows a variadic parameter",
            parameter.name
        ));
    }
    let required = parameter.default.is_none() && parameter.kind != ParameterKind::Star;
    if required && previous.iter().any(|p| p.default.is_some()) {
        return Err(format!(
            "required parameter `{}` follows a parameter with a default",
            parameter.name
        ));
    }
    Ok(())
}

/// Minimal character cursor for headers and values.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    last_was_quoted: bool,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            last_was_quoted: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn is_done(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        !self.take_while(char::is_whitespace).is_empty()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.last_was_quoted = false;
        &self.src[start..self.pos]
    }

    /// Double-quoted strings support `\"`, `\\`, `\n` and `\t`; single-quoted
    /// strings are raw.
    fn quoted(&mut self) -> std::result::Result<String, String> {
        let Some(quote) = self.bump() else {
            return Err("expected a quoted string".to_string());
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err("unterminated string".to_string()),
                Some(c) if c == quote => break,
                Some('\\') if quote == '"' => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err("unterminated string".to_string()),
                },
                Some(c) => out.push(c),
            }
        }
        self.last_was_quoted = true;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::template::Fragment;

    fn header(src: &str) -> Recipe {
        parse(src).unwrap().recipes.remove(0)
    }

    fn message(err: RundagError) -> (usize, String) {
        match err {
            RundagError::Parse { line, message, .. } => (line, message),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn parses_recipe_with_doc_params_deps_and_lines() {
        let src = "\
# Build the project
build target=\"debug\" $jobs='4': fmt lint
    cargo build --profile {{target}}
    @echo done
";
        let recipe = header(src);
        assert_eq!(recipe.name, "build");
        assert_eq!(recipe.doc.as_deref(), Some("Build the project"));
        assert_eq!(recipe.dependencies, vec!["fmt", "lint"]);
        assert_eq!(recipe.parameters.len(), 2);
        assert_eq!(recipe.parameters[0].default.as_deref(), Some("debug"));
        assert!(recipe.parameters[1].export);
        assert_eq!(recipe.parameters[1].default.as_deref(), Some("4"));
        assert_eq!(recipe.lines.len(), 2);
        assert!(recipe.lines[1].quiet);
        assert_eq!(recipe.line_number, 2);
    }

    #[test]
    fn blank_line_detaches_comment_from_header() {
        let recipe = header("# not docs\n\nbuild:\n    true\n");
        assert_eq!(recipe.doc, None);
    }

    #[test]
    fn blank_lines_inside_body_are_skipped() {
        let recipe = header("test:\n    one\n\n    two\n");
        assert_eq!(recipe.lines.len(), 2);
    }

    #[test]
    fn extra_indentation_is_kept() {
        let recipe = header("test:\n  for x in a b; do \\\n    echo $x; done\n");
        assert_eq!(
            recipe.lines[1].template.fragments(),
            &[Fragment::Text("  echo $x; done".to_string())]
        );
    }

    #[test]
    fn line_prefixes_are_recognised() {
        let recipe = header("test:\n    -@false\n    @-true\n    --flag\n");
        assert!(recipe.lines[0].quiet && recipe.lines[0].ignore_errors);
        assert!(recipe.lines[1].quiet && recipe.lines[1].ignore_errors);
        assert!(recipe.lines[2].ignore_errors && !recipe.lines[2].quiet);
        assert_eq!(recipe.lines[2].template.to_string(), "-flag");
    }

    #[test]
    fn variadic_and_quiet_recipe() {
        let recipe = header("@run +args:\n    echo {{args}}\n");
        assert!(recipe.quiet);
        assert_eq!(recipe.parameters[0].kind, ParameterKind::Plus);
    }

    #[test]
    fn private_via_attribute_or_underscore() {
        let raw = parse("[private]\nhidden:\n\n_helper:\n\nshown:\n").unwrap();
        let private: Vec<bool> = raw.recipes.iter().map(|r| r.private).collect();
        assert_eq!(private, vec![true, true, false]);
    }

    #[test]
    fn parses_assignments_aliases_and_settings() {
        let src = "\
set shell := [\"bash\", \"-euc\"]
set export
set quiet := false
version := \"1.2\"
export RUST_LOG := 'debug'
alias b := build
build:
    echo {{version}}
";
        let raw = parse(src).unwrap();
        assert_eq!(
            raw.settings.shell,
            Some(vec!["bash".to_string(), "-euc".to_string()])
        );
        assert!(raw.settings.export);
        assert!(!raw.settings.quiet);
        assert_eq!(raw.assignments.len(), 2);
        assert!(raw.assignments[1].export);
        assert_eq!(raw.assignments[1].value, "debug");
        assert_eq!(raw.aliases[0].target, "build");
    }

    #[test]
    fn indented_line_without_header_is_an_error() {
        let (line, msg) = message(parse("x := \"1\"\n    echo orphan\n").unwrap_err());
        assert_eq!(line, 2);
        assert!(msg.contains("not part of any recipe"));
    }

    #[test]
    fn unterminated_default_is_an_error() {
        let (line, msg) = message(parse("build target=\"debug:\n").unwrap_err());
        assert_eq!(line, 1);
        assert!(msg.contains("unterminated"));
    }

    #[test]
    fn missing_colon_is_an_error() {
        let (_, msg) = message(parse("build target\n").unwrap_err());
        assert!(msg.contains("expected `:`"));
    }

    #[test]
    fn unmatched_braces_report_line() {
        let (line, msg) = message(parse("build:\n    true\n    echo {{x\n").unwrap_err());
        assert_eq!(line, 3);
        assert!(msg.contains("unmatched"));
    }

    #[test]
    fn required_after_default_is_an_error() {
        let (_, msg) = message(parse("build a=\"1\" b:\n").unwrap_err());
        assert!(msg.contains("follows a parameter with a default"));
    }

    #[test]
    fn parameter_after_variadic_is_an_error() {
        assert!(parse("build *a b=\"1\":\n").is_err());
    }

    #[test]
    fn inconsistent_indentation_is_an_error() {
        let (line, msg) = message(parse("build:\n    one\n  two\n").unwrap_err());
        assert_eq!(line, 3);
        assert!(msg.contains("inconsistent indentation"));
    }

    #[test]
    fn dangling_attribute_is_an_error() {
        assert!(parse("[private]\nx := \"1\"\n").is_err());
        assert!(parse("[private]\n").is_err());
        assert!(parse("[linux]\nbuild:\n").is_err());
    }

    #[test]
    fn unknown_setting_is_an_error() {
        let (_, msg) = message(parse("set dotenv-load\n").unwrap_err());
        assert!(msg.contains("unknown setting"));
    }

    #[test]
    fn empty_quoted_default_is_allowed() {
        let recipe = header("build flags='':\n");
        assert_eq!(recipe.parameters[0].default.as_deref(), Some(""));
    }
}
