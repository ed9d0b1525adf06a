// src/definition/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::definition::model::{Justfile, RawJustfile};
use crate::errors::{Result, RundagError};

impl TryFrom<RawJustfile> for Justfile {
    type Error = RundagError;

    fn try_from(raw: RawJustfile) -> std::result::Result<Self, Self::Error> {
        validate_raw_justfile(&raw)?;
        Ok(Justfile::new_unchecked(raw))
    }
}

fn validate_raw_justfile(raw: &RawJustfile) -> Result<()> {
    validate_unique_names(raw)?;
    validate_aliases(raw)?;
    validate_dependencies(raw)?;
    validate_dag(raw)?;
    validate_placeholders(raw)?;
    Ok(())
}

fn validate_unique_names(raw: &RawJustfile) -> Result<()> {
    let mut recipes = HashSet::new();
    for recipe in &raw.recipes {
        if !recipes.insert(recipe.name.as_str()) {
            return Err(RundagError::DuplicateRecipe {
                name: recipe.name.clone(),
                line: recipe.line_number,
            });
        }
    }

    let mut variables = HashSet::new();
    for assignment in &raw.assignments {
        if !variables.insert(assignment.name.as_str()) {
            return Err(RundagError::DuplicateVariable {
                name: assignment.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_aliases(raw: &RawJustfile) -> Result<()> {
    let mut seen = HashSet::new();
    for alias in &raw.aliases {
        let shadows_recipe = raw.recipes.iter().any(|r| r.name == alias.name);
        if shadows_recipe || !seen.insert(alias.name.as_str()) {
            return Err(RundagError::DuplicateAlias {
                name: alias.name.clone(),
            });
        }
        if !raw.recipes.iter().any(|r| r.name == alias.target) {
            return Err(RundagError::UnknownAliasTarget {
                alias: alias.name.clone(),
                target: alias.target.clone(),
            });
        }
    }
    Ok(())
}

fn validate_dependencies(raw: &RawJustfile) -> Result<()> {
    for recipe in &raw.recipes {
        for dep in &recipe.dependencies {
            if dep == &recipe.name {
                return Err(RundagError::CyclicDependency {
                    recipe: recipe.name.clone(),
                });
            }
            if !raw.recipes.iter().any(|r| &r.name == dep) {
                return Err(RundagError::UnknownDependency {
                    recipe: recipe.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_dag(raw: &RawJustfile) -> Result<()> {
    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for recipe in &raw.recipes {
        graph.add_node(recipe.name.as_str());
    }

    for recipe in &raw.recipes {
        for dep in &recipe.dependencies {
            graph.add_edge(dep.as_str(), recipe.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(RundagError::CyclicDependency {
            recipe: cycle.node_id().to_string(),
        }),
    }
}

fn validate_placeholders(raw: &RawJustfile) -> Result<()> {
    for recipe in &raw.recipes {
        for line in &recipe.lines {
            for name in line.template.placeholders() {
                let known = recipe.parameter(name).is_some()
                    || raw.assignments.iter().any(|a| a.name == name);
                if !known {
                    return Err(RundagError::UnknownVariable {
                        recipe: recipe.name.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
