// tests/load_errors.rs

use rundag::definition::load_str;
use rundag::errors::RundagError;

mod common;
use crate::common::builders::{JustfileBuilder, RecipeBuilder};

#[test]
fn two_recipe_cycle_is_rejected_at_load() {
    let err = load_str("A: B\n    echo a\nB: A\n    echo b\n").unwrap_err();
    assert!(
        matches!(err, RundagError::CyclicDependency { .. }),
        "expected CyclicDependency, got {err:?}"
    );
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn self_dependency_is_a_cycle() {
    let err = JustfileBuilder::new()
        .with_recipe(RecipeBuilder::new("loop").after("loop").build())
        .try_build()
        .unwrap_err();
    assert!(matches!(err, RundagError::CyclicDependency { .. }));
}

#[test]
fn longer_cycle_is_rejected() {
    let err = load_str("a: c\nb: a\nc: b\nok:\n").unwrap_err();
    assert!(matches!(err, RundagError::CyclicDependency { .. }));
}

#[test]
fn parse_errors_carry_line_number_and_text() {
    let src = "build:\n    echo ok\n\ntest x=\"1\" y:\n    echo {{x}}\n";
    match load_str(src).unwrap_err() {
        RundagError::Parse { line, text, .. } => {
            assert_eq!(line, 4);
            assert_eq!(text, "test x=\"1\" y:");
        }
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn orphan_indented_line_is_a_parse_error() {
    let err = load_str("    echo nobody owns me\n").unwrap_err();
    assert!(matches!(err, RundagError::Parse { line: 1, .. }));
}

#[test]
fn unterminated_placeholder_is_a_parse_error() {
    let err = load_str("a:\n    echo {{name\n").unwrap_err();
    assert!(matches!(err, RundagError::Parse { line: 2, .. }));
}

#[test]
fn unknown_dependency_and_alias_target() {
    let err = load_str("a: missing\n").unwrap_err();
    assert!(matches!(err, RundagError::UnknownDependency { .. }));

    let err = load_str("alias x := nothing\na:\n").unwrap_err();
    assert!(matches!(err, RundagError::UnknownAliasTarget { .. }));
}

#[test]
fn placeholders_must_resolve_at_load_time() {
    let err = load_str("a:\n    echo {{who}}\n").unwrap_err();
    match err {
        RundagError::UnknownVariable { recipe, name } => {
            assert_eq!(recipe, "a");
            assert_eq!(name, "who");
        }
        other => panic!("expected UnknownVariable, got {other:?}"),
    }
}

#[test]
fn duplicate_recipe_is_rejected() {
    let err = load_str("a:\n    true\na:\n    false\n").unwrap_err();
    assert!(matches!(err, RundagError::DuplicateRecipe { .. }));
}

#[test]
fn builder_and_parser_agree() {
    let src = concat!(
        "x := \"1\"\n",
        "alias g := greet\n",
        "greet name=\"world\": prep\n",
        "    echo hi {{name}} {{x}}\n",
        "prep:\n",
    );
    let parsed = load_str(src).unwrap();
    let built = JustfileBuilder::new()
        .with_variable("x", "1")
        .with_alias("g", "greet")
        .with_recipe(
            RecipeBuilder::new("greet")
                .param_default("name", "world")
                .after("prep")
                .line("echo hi {{name}} {{x}}")
                .build(),
        )
        .with_recipe(RecipeBuilder::new("prep").build())
        .build();

    assert_eq!(parsed.to_string(), built.to_string());
}
