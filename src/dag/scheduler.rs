// src/dag/scheduler.rs

use std::collections::HashMap;

use tracing::{debug, info};

use crate::dag::graph::DagGraph;
use crate::dag::task_info::{RunState, ScheduledLine, ScheduledRecipe};
use crate::definition::{Justfile, Recipe, RecipeName};
use crate::engine::{RecipeOutcome, RunOptions};
use crate::environment::Environment;
use crate::errors::{Result, RundagError};
use crate::params::{
    recipe_exports, render_line, resolve_parameters, resolve_variables, Invocation,
};

/// Similarity (0..=1) a name needs to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.5;

/// Pick the recipe an invocation targets.
///
/// - a name resolves through recipes, then aliases
/// - no name selects `default`, else the first recipe
/// - `Ok(None)` means the file has no recipes at all; callers list instead
pub fn select_recipe<'a>(
    justfile: &'a Justfile,
    name: Option<&str>,
) -> Result<Option<&'a Recipe>> {
    match name {
        Some(name) => justfile
            .resolve(name)
            .map(Some)
            .ok_or_else(|| RundagError::RecipeNotFound {
                name: name.to_string(),
                suggestion: suggest(justfile, name),
            }),
        None => Ok(justfile.default_recipe()),
    }
}

fn suggest(justfile: &Justfile, name: &str) -> Option<String> {
    let recipes = justfile.recipes().iter().map(|r| r.name.as_str());
    let aliases = justfile.aliases().iter().map(|a| a.name.as_str());

    recipes
        .chain(aliases)
        .map(|candidate| {
            let score = strsim::normalized_damerau_levenshtein(candidate, name);
            (candidate, score)
        })
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

/// Sequential plan for one invocation plus per-recipe run state.
///
/// All parameter resolution and template rendering happens in
/// [`Scheduler::plan`], so argument errors surface before any process is
/// spawned. The scheduler then hands out one recipe at a time and stops
/// handing out work after the first failure.
#[derive(Debug)]
pub struct Scheduler {
    queue: Vec<ScheduledRecipe>,
    states: HashMap<RecipeName, RunState>,
    next: usize,
}

impl Scheduler {
    /// Resolve `invocation` against `justfile` into an ordered plan.
    ///
    /// `target` must be a recipe of `justfile` (see [`select_recipe`]).
    pub fn plan(
        justfile: &Justfile,
        target: &Recipe,
        invocation: &Invocation,
        base_env: &Environment,
        options: &RunOptions,
    ) -> Result<Self> {
        let graph = DagGraph::from_justfile(justfile);
        let order = graph.linearize(&target.name);
        info!(recipe = %target.name, ?order, "planned recipe chain");

        let recipes: Vec<&Recipe> = order
            .iter()
            .filter_map(|name| justfile.recipe(name))
            .collect();
        check_overrides(justfile, &recipes, invocation)?;

        let variables = resolve_variables(justfile, &invocation.overrides);
        let global_quiet = options.quiet || justfile.settings().quiet;

        let mut queue = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let positional: &[String] = if recipe.name == target.name {
                &invocation.positional
            } else {
                &[]
            };
            let parameters = resolve_parameters(recipe, positional, &invocation.overrides)?;
            debug!(recipe = %recipe.name, ?parameters, "resolved parameters");

            let lines = recipe
                .lines
                .iter()
                .map(|line| {
                    Ok(ScheduledLine {
                        command: render_line(recipe, line, &parameters, &variables)?,
                        echo: !global_quiet && recipe.quiet == line.quiet,
                        ignore_errors: line.ignore_errors,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let exports = recipe_exports(justfile, recipe, &parameters, &variables);
            queue.push(ScheduledRecipe {
                name: recipe.name.clone(),
                lines,
                environment: base_env.with_overrides(exports),
            });
        }

        let states = queue
            .iter()
            .map(|r| (r.name.clone(), RunState::Pending))
            .collect();

        Ok(Self {
            queue,
            states,
            next: 0,
        })
    }

    /// Recipe names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.queue.iter().map(|r| r.name.as_str()).collect()
    }

    /// The planned recipes, in execution order.
    pub fn recipes(&self) -> &[ScheduledRecipe] {
        &self.queue
    }

    pub fn run_state_of(&self, recipe: &str) -> Option<RunState> {
        self.states.get(recipe).copied()
    }

    /// `true` once every planned recipe is in a terminal state.
    pub fn is_finished(&self) -> bool {
        self.states.values().all(|s| s.is_terminal())
    }

    /// Next recipe to run, marking it `Running`.
    ///
    /// Returns `None` while a recipe is still running, after a failure, or
    /// when the plan is exhausted.
    pub fn next_ready(&mut self) -> Option<ScheduledRecipe> {
        if self.states.values().any(|s| *s == RunState::Running) {
            return None;
        }
        let recipe = self.queue.get(self.next)?.clone();
        if self.run_state_of(&recipe.name) != Some(RunState::Pending) {
            return None;
        }

        self.next += 1;
        self.states.insert(recipe.name.clone(), RunState::Running);
        debug!(recipe = %recipe.name, "dependencies satisfied; marking Running");
        Some(recipe)
    }

    /// Record how a running recipe ended.
    ///
    /// On failure every recipe still pending is marked `Failed` too; nothing
    /// after a failed recipe is attempted.
    pub fn handle_completion(&mut self, recipe: &str, outcome: RecipeOutcome) {
        match outcome {
            RecipeOutcome::Success => {
                self.states.insert(recipe.to_string(), RunState::Succeeded);
            }
            RecipeOutcome::Failed(code) => {
                self.states.insert(recipe.to_string(), RunState::Failed);
                for state in self.states.values_mut() {
                    if *state == RunState::Pending {
                        *state = RunState::Failed;
                    }
                }
                debug!(recipe, code, "recipe failed; remaining recipes blocked");
            }
        }
    }
}

/// Every override must name a variable or a parameter of a planned recipe.
fn check_overrides(
    justfile: &Justfile,
    recipes: &[&Recipe],
    invocation: &Invocation,
) -> Result<()> {
    for name in invocation.overrides.keys() {
        let known = justfile.is_variable(name)
            || recipes.iter().any(|r| r.parameter(name).is_some());
        if !known {
            return Err(RundagError::UnknownOverride { name: name.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::load_str;

    fn plan(src: &str, invocation: Invocation) -> Result<Scheduler> {
        let jf = load_str(src)?;
        let target = select_recipe(&jf, invocation.recipe.as_deref())?
            .expect("justfile has recipes")
            .clone();
        Scheduler::plan(
            &jf,
            &target,
            &invocation,
            &Environment::default(),
            &RunOptions::default(),
        )
    }

    #[test]
    fn default_recipe_is_named_default_or_first() {
        let jf = load_str("first:\ndefault:\n").unwrap();
        assert_eq!(select_recipe(&jf, None).unwrap().unwrap().name, "default");

        let jf = load_str("first:\nsecond:\n").unwrap();
        assert_eq!(select_recipe(&jf, None).unwrap().unwrap().name, "first");

        let jf = load_str("x := \"1\"\n").unwrap();
        assert!(select_recipe(&jf, None).unwrap().is_none());
    }

    #[test]
    fn unknown_recipe_suggests_close_name() {
        let jf = load_str("build:\ntest:\n").unwrap();
        match select_recipe(&jf, Some("biuld")).unwrap_err() {
            RundagError::RecipeNotFound { name, suggestion } => {
                assert_eq!(name, "biuld");
                assert_eq!(suggestion.as_deref(), Some("build"));
            }
            other => panic!("expected RecipeNotFound, got {other:?}"),
        }
        match select_recipe(&jf, Some("zzzzzzzz")).unwrap_err() {
            RundagError::RecipeNotFound { suggestion, .. } => assert_eq!(suggestion, None),
            other => panic!("expected RecipeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn aliases_select_their_target() {
        let jf = load_str("alias b := build\nbuild:\n").unwrap();
        assert_eq!(select_recipe(&jf, Some("b")).unwrap().unwrap().name, "build");
    }

    #[test]
    fn overrides_reach_prerequisites() {
        let src = "default: greet\ngreet name=\"world\":\n    echo \"hi {{name}}\"\n";
        let s = plan(src, Invocation::default()).unwrap();
        assert_eq!(s.order(), vec!["greet", "default"]);
        assert_eq!(s.recipes()[0].lines[0].command, "echo \"hi world\"");

        let s = plan(src, Invocation::from_args(&["name=there"])).unwrap();
        assert_eq!(s.recipes()[0].lines[0].command, "echo \"hi there\"");
    }

    #[test]
    fn missing_argument_in_prerequisite_fails_planning() {
        let err = plan("a: b\nb x:\n    echo {{x}}\n", Invocation::new("a")).unwrap_err();
        assert!(matches!(err, RundagError::MissingArgument { .. }));
    }

    #[test]
    fn unknown_override_is_rejected() {
        let err = plan("a:\n", Invocation::new("a").with_override("nme", "x")).unwrap_err();
        assert!(matches!(err, RundagError::UnknownOverride { .. }));
    }

    #[test]
    fn echo_respects_quiet_markers() {
        let src = "@a:\n    one\n    @two\nb: a\n    three\n    @four\n";
        let s = plan(src, Invocation::new("b")).unwrap();
        let echo: Vec<bool> = s
            .recipes()
            .iter()
            .flat_map(|r| r.lines.iter().map(|l| l.echo))
            .collect();
        assert_eq!(echo, vec![false, true, true, false]);
    }

    #[test]
    fn exports_land_in_recipe_environment_only() {
        let s = plan("a $who=\"me\":\n    true\nb: a\n    true\n", Invocation::new("b")).unwrap();
        assert_eq!(s.recipes()[0].environment.get("who"), Some("me"));
        assert_eq!(s.recipes()[1].environment.get("who"), None);
    }

    #[test]
    fn failure_blocks_remaining_recipes() {
        let mut s = plan("a:\nb: a\nc: b\n", Invocation::new("c")).unwrap();

        let first = s.next_ready().unwrap();
        assert_eq!(first.name, "a");
        assert!(s.next_ready().is_none(), "strictly one recipe at a time");

        s.handle_completion("a", RecipeOutcome::Success);
        let second = s.next_ready().unwrap();
        assert_eq!(second.name, "b");

        s.handle_completion("b", RecipeOutcome::Failed(2));
        assert!(s.next_ready().is_none());
        assert_eq!(s.run_state_of("a"), Some(RunState::Succeeded));
        assert_eq!(s.run_state_of("b"), Some(RunState::Failed));
        assert_eq!(s.run_state_of("c"), Some(RunState::Failed));
        assert!(s.is_finished());
    }
}
