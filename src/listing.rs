// src/listing.rs

//! Human-readable views of a justfile: `--list` and `--show`.

use crate::dag::select_recipe;
use crate::definition::Justfile;
use crate::errors::Result;

/// Recipe listing, e.g.
///
/// ```text
/// Available recipes:
///     build target="debug" # Compile everything
///     b                    # alias for `build`
///     test
/// ```
///
/// Private recipes, and aliases of private recipes, are left out.
pub fn render_list(justfile: &Justfile) -> String {
    let mut entries: Vec<(String, Option<String>)> = Vec::new();

    for recipe in justfile.recipes().iter().filter(|r| !r.private) {
        let mut signature = recipe.name.clone();
        for parameter in &recipe.parameters {
            signature.push(' ');
            signature.push_str(&parameter.to_string());
        }
        entries.push((signature, recipe.doc.clone()));
    }

    for alias in justfile.aliases() {
        let visible = justfile
            .recipe(&alias.target)
            .is_some_and(|recipe| !recipe.private);
        if visible && !alias.name.starts_with('_') {
            entries.push((
                alias.name.clone(),
                Some(format!("alias for `{}`", alias.target)),
            ));
        }
    }

    let width = entries
        .iter()
        .filter(|(_, comment)| comment.is_some())
        .map(|(signature, _)| signature.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Available recipes:\n");
    for (signature, comment) in entries {
        match comment {
            Some(comment) => out.push_str(&format!("    {signature:<width$} # {comment}\n")),
            None => out.push_str(&format!("    {signature}\n")),
        }
    }
    out
}

/// Source of a single recipe (alias names resolve to their target).
pub fn render_show(justfile: &Justfile, name: &str) -> Result<String> {
    let recipe = select_recipe(justfile, Some(name))?;
    Ok(recipe.map(ToString::to_string).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::load_str;
    use crate::errors::RundagError;

    #[test]
    fn list_aligns_comments_and_hides_private() {
        let jf = load_str(
            "alias b := build\n\
             # Compile everything\n\
             build target=\"debug\":\n    cargo build\n\
             test:\n    cargo test\n\
             _helper:\n    true\n\
             [private]\n\
             secret:\n    true\n",
        )
        .unwrap();

        assert_eq!(
            render_list(&jf),
            "Available recipes:\n\
             \x20   build target=\"debug\" # Compile everything\n\
             \x20   test\n\
             \x20   b                    # alias for `build`\n"
        );
    }

    #[test]
    fn empty_file_lists_header_only() {
        let jf = load_str("").unwrap();
        assert_eq!(render_list(&jf), "Available recipes:\n");
    }

    #[test]
    fn show_prints_recipe_source() {
        let jf = load_str("# Say hi\ngreet name=\"world\":\n    echo \"hi {{name}}\"\n").unwrap();
        assert_eq!(
            render_show(&jf, "greet").unwrap(),
            "# Say hi\ngreet name=\"world\":\n    echo \"hi {{name}}\"\n"
        );
        assert!(matches!(
            render_show(&jf, "gret").unwrap_err(),
            RundagError::RecipeNotFound { .. }
        ));
    }
}
