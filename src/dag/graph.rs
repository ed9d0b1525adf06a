// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use crate::definition::{Justfile, RecipeName};

/// In-memory prerequisite graph keyed by recipe name.
///
/// Acyclicity is already checked in `definition::validate`; this only keeps
/// each recipe's direct prerequisites, in declaration order, for planning.
#[derive(Debug, Clone)]
pub struct DagGraph {
    deps: HashMap<RecipeName, Vec<RecipeName>>,
}

impl DagGraph {
    /// Build the graph from a validated [`Justfile`].
    pub fn from_justfile(justfile: &Justfile) -> Self {
        let deps = justfile
            .recipes()
            .iter()
            .map(|recipe| (recipe.name.clone(), recipe.dependencies.clone()))
            .collect();

        Self { deps }
    }

    pub fn dependencies_of(&self, name: &str) -> &[RecipeName] {
        self.deps.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Execution order for `root`: depth-first post-order over
    /// prerequisites, each recipe once, `root` last.
    pub fn linearize(&self, root: &str) -> Vec<RecipeName> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit(root, &mut visited, &mut order);
        order
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<RecipeName>,
    ) {
        if !visited.insert(name) {
            return;
        }
        for dep in self.dependencies_of(name) {
            self.visit(dep, visited, order);
        }
        order.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::load_str;

    #[test]
    fn linearize_runs_prerequisites_first_once() {
        // d depends on b and c, both depend on a.
        let jf = load_str("a:\nb: a\nc: a\nd: b c\n").unwrap();
        let graph = DagGraph::from_justfile(&jf);
        assert_eq!(graph.linearize("d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn linearize_keeps_declaration_order_of_prerequisites() {
        let jf = load_str("all: lint fmt test\nlint:\nfmt:\ntest: fmt\n").unwrap();
        let graph = DagGraph::from_justfile(&jf);
        assert_eq!(graph.linearize("all"), vec!["lint", "fmt", "test", "all"]);
        assert!(graph.dependencies_of("lint").is_empty());
    }
}
