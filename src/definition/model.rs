// src/definition/model.rs

use std::collections::HashMap;

use serde::Serialize;

use crate::definition::template::Template;

/// Canonical recipe name type used throughout the crate.
pub type RecipeName = String;

/// Default shell used to run command lines when no `set shell` is present.
pub const DEFAULT_SHELL: [&str; 2] = ["sh", "-cu"];

/// Justfile as produced by the parser, before semantic validation.
///
/// Items keep their source order. Use [`Justfile::try_from`] to validate
/// and index it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJustfile {
    pub settings: Settings,
    pub assignments: Vec<Assignment>,
    pub aliases: Vec<Alias>,
    pub recipes: Vec<Recipe>,
}

/// Validated justfile.
///
/// Guarantees (checked in `definition::validate`):
/// - recipe names, variable names and alias names are unique
/// - every dependency and alias target names a defined recipe
/// - the dependency graph has no cycles
/// - every placeholder names a parameter of its recipe or a variable
#[derive(Debug, Clone, Serialize)]
pub struct Justfile {
    settings: Settings,
    assignments: Vec<Assignment>,
    aliases: Vec<Alias>,
    recipes: Vec<Recipe>,
    #[serde(skip)]
    index: HashMap<RecipeName, usize>,
}

impl Justfile {
    /// Build from parts that have already been validated.
    pub(crate) fn new_unchecked(raw: RawJustfile) -> Self {
        let index = raw
            .recipes
            .iter()
            .enumerate()
            .map(|(i, recipe)| (recipe.name.clone(), i))
            .collect();

        Self {
            settings: raw.settings,
            assignments: raw.assignments,
            aliases: raw.aliases,
            recipes: raw.recipes,
            index,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// All recipes, in source order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look up a recipe by its exact name (aliases are not followed).
    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.index.get(name).map(|&i| &self.recipes[i])
    }

    /// Look up a recipe by name or alias.
    pub fn resolve(&self, name: &str) -> Option<&Recipe> {
        self.recipe(name).or_else(|| {
            self.aliases
                .iter()
                .find(|alias| alias.name == name)
                .and_then(|alias| self.recipe(&alias.target))
        })
    }

    /// Recipe run when no name is given: `default` if defined, else the
    /// first recipe in the file.
    pub fn default_recipe(&self) -> Option<&Recipe> {
        self.recipe("default").or_else(|| self.recipes.first())
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.assignments.iter().any(|a| a.name == name)
    }

    /// Shell argv prefix used for every command line.
    pub fn shell(&self) -> Vec<String> {
        match &self.settings.shell {
            Some(shell) => shell.clone(),
            None => DEFAULT_SHELL.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Settings from `set ...` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// `set shell := ["bash", "-cu"]`; `None` means [`DEFAULT_SHELL`].
    pub shell: Option<Vec<String>>,
    /// `set export`: export every parameter and variable.
    pub export: bool,
    /// `set quiet`: do not echo command lines.
    pub quiet: bool,
}

/// Top-level `name := "value"` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub name: String,
    /// Literal value; never evaluated.
    pub value: String,
    /// `export name := ...`: also exported to every command's environment.
    pub export: bool,
}

/// `alias short := target` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias {
    pub name: String,
    pub target: RecipeName,
}

/// A named, parameterised sequence of command lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub name: RecipeName,
    /// Comment line directly above the header.
    pub doc: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Prerequisites, run (in order) before this recipe.
    pub dependencies: Vec<RecipeName>,
    pub lines: Vec<Line>,
    /// Header prefixed with `@`: no line of this recipe is echoed.
    pub quiet: bool,
    /// Hidden from `--list` (`[private]` or a leading underscore).
    pub private: bool,
    /// 1-based line number of the header.
    #[serde(skip)]
    pub line_number: usize,
}

impl Recipe {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Maximum number of positional arguments, or `None` if variadic.
    pub fn max_arguments(&self) -> Option<usize> {
        if self.parameters.iter().any(|p| p.kind.is_variadic()) {
            None
        } else {
            Some(self.parameters.len())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Exactly one value.
    Single,
    /// `*name`: zero or more values.
    Star,
    /// `+name`: one or more values.
    Plus,
}

impl ParameterKind {
    pub fn is_variadic(self) -> bool {
        !matches!(self, ParameterKind::Single)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub default: Option<String>,
    pub kind: ParameterKind,
    /// `$name`: the bound value is exported to the recipe's environment.
    pub export: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            kind: ParameterKind::Single,
            export: false,
        }
    }
}

/// One command line of a recipe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub template: Template,
    /// `@` prefix: toggles echoing for this line.
    pub quiet: bool,
    /// `-` prefix: a non-zero exit does not abort the recipe.
    pub ignore_errors: bool,
}
