#![allow(dead_code)]

use rundag::definition::{
    Alias, Assignment, Justfile, Line, Parameter, ParameterKind, RawJustfile, Recipe, Template,
};

/// Builder for `Justfile` to simplify test setup.
pub struct JustfileBuilder {
    raw: RawJustfile,
}

impl JustfileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawJustfile::default(),
        }
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.raw.recipes.push(recipe);
        self
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.raw.assignments.push(Assignment {
            name: name.to_string(),
            value: value.to_string(),
            export: false,
        });
        self
    }

    pub fn with_exported_variable(mut self, name: &str, value: &str) -> Self {
        self.raw.assignments.push(Assignment {
            name: name.to_string(),
            value: value.to_string(),
            export: true,
        });
        self
    }

    pub fn with_alias(mut self, name: &str, target: &str) -> Self {
        self.raw.aliases.push(Alias {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    pub fn quiet(mut self) -> Self {
        self.raw.settings.quiet = true;
        self
    }

    pub fn export_all(mut self) -> Self {
        self.raw.settings.export = true;
        self
    }

    pub fn build(self) -> Justfile {
        self.try_build()
            .expect("Failed to build valid justfile from builder")
    }

    pub fn try_build(self) -> rundag::errors::Result<Justfile> {
        Justfile::try_from(self.raw)
    }
}

impl Default for JustfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Recipe`.
pub struct RecipeBuilder {
    recipe: Recipe,
}

impl RecipeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            recipe: Recipe {
                name: name.to_string(),
                doc: None,
                parameters: vec![],
                dependencies: vec![],
                lines: vec![],
                quiet: false,
                private: name.starts_with('_'),
                line_number: 0,
            },
        }
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.recipe.doc = Some(doc.to_string());
        self
    }

    pub fn param(mut self, name: &str) -> Self {
        self.recipe.parameters.push(Parameter::new(name));
        self
    }

    pub fn param_default(mut self, name: &str, default: &str) -> Self {
        let mut parameter = Parameter::new(name);
        parameter.default = Some(default.to_string());
        self.recipe.parameters.push(parameter);
        self
    }

    pub fn variadic(mut self, name: &str, kind: ParameterKind) -> Self {
        let mut parameter = Parameter::new(name);
        parameter.kind = kind;
        self.recipe.parameters.push(parameter);
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.recipe.dependencies.push(dep.to_string());
        self
    }

    pub fn line(self, text: &str) -> Self {
        self.push_line(text, false, false)
    }

    pub fn quiet_line(self, text: &str) -> Self {
        self.push_line(text, true, false)
    }

    pub fn ignored_line(self, text: &str) -> Self {
        self.push_line(text, false, true)
    }

    pub fn quiet(mut self) -> Self {
        self.recipe.quiet = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.recipe.private = true;
        self
    }

    pub fn build(self) -> Recipe {
        self.recipe
    }

    fn push_line(mut self, text: &str, quiet: bool, ignore_errors: bool) -> Self {
        let template = Template::parse(text).expect("valid template in builder");
        self.recipe.lines.push(Line {
            template,
            quiet,
            ignore_errors,
        });
        self
    }
}
