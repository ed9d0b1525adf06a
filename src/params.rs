// src/params.rs

//! Parameter resolution.
//!
//! Binds caller-supplied arguments and declared defaults to recipe
//! parameters, and renders command-line templates from the bindings.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::definition::{Justfile, Line, Recipe};
use crate::errors::{Result, RundagError};

/// Resolved name → value mapping.
pub type Bindings = BTreeMap<String, String>;

static OVERRIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_-]*)=(.*)$").expect("override regex is valid")
});

/// One request to run a recipe, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Recipe (or alias) name; `None` selects the default recipe.
    pub recipe: Option<String>,
    /// Positional arguments for the requested recipe.
    pub positional: Vec<String>,
    /// `name=value` arguments. They bind parameters of any recipe in the
    /// plan and override top-level variables.
    pub overrides: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: Some(recipe.into()),
            ..Self::default()
        }
    }

    /// Split raw CLI arguments.
    ///
    /// `identifier=value` tokens are overrides wherever they appear; the
    /// first other token names the recipe and the rest are positional.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut invocation = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if let Some(caps) = OVERRIDE.captures(arg) {
                invocation
                    .overrides
                    .insert(caps[1].to_string(), caps[2].to_string());
            } else if invocation.recipe.is_none() {
                invocation.recipe = Some(arg.to_string());
            } else {
                invocation.positional.push(arg.to_string());
            }
        }
        invocation
    }

    pub fn with_arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn with_override(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }
}

/// Bind every parameter of `recipe`.
///
/// Per parameter: positional value, else named override, else declared
/// default, else [`RundagError::MissingArgument`]. A variadic parameter
/// takes all remaining positionals joined by a single space.
pub fn resolve_parameters(
    recipe: &Recipe,
    positional: &[String],
    overrides: &BTreeMap<String, String>,
) -> Result<Bindings> {
    if let Some(max) = recipe.max_arguments() {
        if positional.len() > max {
            return Err(RundagError::TooManyArguments {
                recipe: recipe.name.clone(),
                max,
                given: positional.len(),
            });
        }
    }

    let mut remaining = positional.iter();
    let mut bindings = Bindings::new();

    for parameter in &recipe.parameters {
        let supplied = if parameter.kind.is_variadic() {
            let rest: Vec<&str> = remaining.by_ref().map(String::as_str).collect();
            (!rest.is_empty()).then(|| rest.join(" "))
        } else {
            remaining.next().cloned()
        };

        let value = supplied
            .or_else(|| overrides.get(&parameter.name).cloned())
            .or_else(|| parameter.default.clone())
            .or_else(|| {
                (parameter.kind == crate::definition::ParameterKind::Star).then(String::new)
            })
            .ok_or_else(|| RundagError::MissingArgument {
                recipe: recipe.name.clone(),
                parameter: parameter.name.clone(),
            })?;

        bindings.insert(parameter.name.clone(), value);
    }

    Ok(bindings)
}

/// Values of top-level variables, with overrides applied.
pub fn resolve_variables(justfile: &Justfile, overrides: &BTreeMap<String, String>) -> Bindings {
    justfile
        .assignments()
        .iter()
        .map(|a| {
            let value = overrides.get(&a.name).unwrap_or(&a.value);
            (a.name.clone(), value.clone())
        })
        .collect()
}

/// Render one command line. Parameters shadow variables of the same name.
pub fn render_line(
    recipe: &Recipe,
    line: &Line,
    parameters: &Bindings,
    variables: &Bindings,
) -> Result<String> {
    line.template
        .render(|name| {
            parameters
                .get(name)
                .or_else(|| variables.get(name))
                .map(String::as_str)
        })
        .map_err(|name| RundagError::UnknownVariable {
            recipe: recipe.name.clone(),
            name,
        })
}

/// Environment variables a recipe exports on top of the base environment.
///
/// `export` variables, `$` parameters, and with `set export` every variable
/// and parameter.
pub fn recipe_exports(
    justfile: &Justfile,
    recipe: &Recipe,
    parameters: &Bindings,
    variables: &Bindings,
) -> Vec<(String, String)> {
    let export_all = justfile.settings().export;
    let mut exports = Vec::new();

    for assignment in justfile.assignments() {
        if export_all || assignment.export {
            if let Some(value) = variables.get(&assignment.name) {
                exports.push((assignment.name.clone(), value.clone()));
            }
        }
    }
    for parameter in &recipe.parameters {
        if export_all || parameter.export {
            if let Some(value) = parameters.get(&parameter.name) {
                exports.push((parameter.name.clone(), value.clone()));
            }
        }
    }
    exports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::load_str;

    fn recipe(src: &str) -> Recipe {
        load_str(src).unwrap().recipes()[0].clone()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_args_splits_overrides_recipe_and_positionals() {
        let inv = Invocation::from_args(&["mode=fast", "build", "x86", "name=there", "a b"]);
        assert_eq!(inv.recipe.as_deref(), Some("build"));
        assert_eq!(inv.positional, vec!["x86", "a b"]);
        assert_eq!(inv.overrides.get("mode").map(String::as_str), Some("fast"));
        assert_eq!(inv.overrides.get("name").map(String::as_str), Some("there"));
    }

    #[test]
    fn from_args_treats_non_identifier_equals_as_positional() {
        let inv = Invocation::from_args(&["run", "--flag=1"]);
        assert_eq!(inv.positional, vec!["--flag=1"]);
        assert!(inv.overrides.is_empty());
    }

    #[test]
    fn positional_beats_override_beats_default() {
        let r = recipe("greet name=\"world\":\n    echo {{name}}\n");
        let none = BTreeMap::new();
        let over: BTreeMap<_, _> = [("name".to_string(), "there".to_string())].into();

        assert_eq!(resolve_parameters(&r, &[], &none).unwrap()["name"], "world");
        assert_eq!(resolve_parameters(&r, &[], &over).unwrap()["name"], "there");
        assert_eq!(
            resolve_parameters(&r, &args(&["you"]), &over).unwrap()["name"],
            "you"
        );
    }

    #[test]
    fn missing_required_argument() {
        let r = recipe("deploy env:\n    echo {{env}}\n");
        let err = resolve_parameters(&r, &[], &BTreeMap::new()).unwrap_err();
        match err {
            RundagError::MissingArgument { recipe, parameter } => {
                assert_eq!(recipe, "deploy");
                assert_eq!(parameter, "env");
            }
            other => panic!("expected MissingArgument, got {other:?}"),
        }
    }

    #[test]
    fn too_many_arguments() {
        let r = recipe("one a:\n");
        let err = resolve_parameters(&r, &args(&["1", "2"]), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, RundagError::TooManyArguments { max: 1, given: 2, .. }));
    }

    #[test]
    fn variadics_collect_the_rest() {
        let star = recipe("t first *rest:\n");
        let b = resolve_parameters(&star, &args(&["1", "2", "3"]), &BTreeMap::new()).unwrap();
        assert_eq!(b["first"], "1");
        assert_eq!(b["rest"], "2 3");

        let b = resolve_parameters(&star, &args(&["1"]), &BTreeMap::new()).unwrap();
        assert_eq!(b["rest"], "");

        let plus = recipe("t +rest:\n");
        assert!(matches!(
            resolve_parameters(&plus, &[], &BTreeMap::new()).unwrap_err(),
            RundagError::MissingArgument { .. }
        ));
    }

    #[test]
    fn render_prefers_parameters_over_variables() {
        let jf = load_str("name := \"var\"\ngreet name=\"param\":\n    echo {{name}}\n").unwrap();
        let r = &jf.recipes()[0];
        let params = resolve_parameters(r, &[], &BTreeMap::new()).unwrap();
        let vars = resolve_variables(&jf, &BTreeMap::new());
        assert_eq!(render_line(r, &r.lines[0], &params, &vars).unwrap(), "echo param");
    }

    #[test]
    fn exports_follow_flags_and_settings() {
        let jf = load_str(
            "export A := \"1\"\nB := \"2\"\nt $p=\"x\" q=\"y\":\n    true\n",
        )
        .unwrap();
        let r = &jf.recipes()[0];
        let params = resolve_parameters(r, &[], &BTreeMap::new()).unwrap();
        let vars = resolve_variables(&jf, &BTreeMap::new());
        let exports = recipe_exports(&jf, r, &params, &vars);
        assert_eq!(
            exports,
            vec![
                ("A".to_string(), "1".to_string()),
                ("p".to_string(), "x".to_string())
            ]
        );

        let jf = load_str("set export\nB := \"2\"\nt q=\"y\":\n").unwrap();
        let r = &jf.recipes()[0];
        let params = resolve_parameters(r, &[], &BTreeMap::new()).unwrap();
        let vars = resolve_variables(&jf, &BTreeMap::new());
        assert_eq!(recipe_exports(&jf, r, &params, &vars).len(), 2);
    }
}
