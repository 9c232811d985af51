//! Tests for the cleanup pass

use critical_css::cleaner::clean;
use critical_css::parser::parse_stylesheet;
use critical_css::serializer::to_css;

#[test]
fn given_no_markers_when_cleaning_with_preserve_then_noop() {
    let mut arena = parse_stylesheet(
        ".a { color: red; }\n@media print { .b { color: blue; } }",
    )
    .unwrap();
    let before = to_css(&arena);

    clean(&mut arena, true);

    assert_eq!(to_css(&arena), before);
}

#[test]
fn given_marker_decl_when_cleaning_with_preserve_then_only_decl_removed() {
    let mut arena =
        parse_stylesheet(".a { critical-selector: this; color: red; }").unwrap();

    clean(&mut arena, true);

    assert_eq!(to_css(&arena), ".a {\n  color: red;\n}\n");
}

#[test]
fn given_critical_block_when_cleaning_with_preserve_then_unwrapped_in_place() {
    let mut arena = parse_stylesheet(
        ".before { color: black; }\n@critical { .x { color: red; } }\n.after { color: blue; }",
    )
    .unwrap();

    clean(&mut arena, true);

    let css = to_css(&arena);
    assert!(!css.contains("@critical"));
    let order: Vec<usize> = [".before", ".x", ".after"]
        .iter()
        .map(|s| css.find(s).unwrap())
        .collect();
    assert!(order[0] < order[1] && order[1] < order[2]);
}

#[test]
fn given_critical_block_when_cleaning_without_preserve_then_block_removed() {
    let mut arena = parse_stylesheet(
        "@critical { .x { color: red; } }\n.y { color: blue; }",
    )
    .unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), ".y {\n  color: blue;\n}\n");
}

#[test]
fn given_empty_critical_block_when_cleaning_without_preserve_then_stylesheet_emptied() {
    let mut arena = parse_stylesheet("@critical {}\n.y { color: blue; }").unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), "");
}

#[test]
fn given_empty_critical_block_when_cleaning_with_preserve_then_only_block_removed() {
    let mut arena = parse_stylesheet("@critical {}\n.y { color: blue; }").unwrap();

    clean(&mut arena, true);

    assert_eq!(to_css(&arena), ".y {\n  color: blue;\n}\n");
}

#[test]
fn given_marker_only_rule_when_cleaning_without_preserve_then_rule_removed() {
    let mut arena = parse_stylesheet(
        ".gone { critical-selector: this; }\n.y { color: blue; }",
    )
    .unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), ".y {\n  color: blue;\n}\n");
}

#[test]
fn given_marked_rule_sole_child_of_at_rule_when_cleaning_without_preserve_then_wrapper_collapsed() {
    let mut arena = parse_stylesheet(
        "@media print { .x { critical-selector: this; color: red; } }\n.y { color: blue; }",
    )
    .unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), ".y {\n  color: blue;\n}\n");
}

#[test]
fn given_marked_rule_with_siblings_in_at_rule_when_cleaning_without_preserve_then_wrapper_kept() {
    let mut arena = parse_stylesheet(
        "@media print { .x { critical-selector: this; } .keep { color: gray; } }",
    )
    .unwrap();

    clean(&mut arena, false);

    let css = to_css(&arena);
    assert!(css.contains("@media print"));
    assert!(css.contains(".keep"));
    assert!(!css.contains(".x"));
}

#[test]
fn given_scope_marker_when_cleaning_without_preserve_then_selector_subtree_removed() {
    let mut arena = parse_stylesheet(
        ".menu { critical-selector: scope; color: red; }\n\
         .menu .item { color: blue; }\n\
         .menu:hover { color: green; }\n\
         .other { color: black; }",
    )
    .unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), ".other {\n  color: black;\n}\n");
}

#[test]
fn given_scope_marker_when_cleaning_without_preserve_then_emptied_wrappers_collapsed() {
    let mut arena = parse_stylesheet(
        ".menu { critical-selector: scope; }\n\
         @media print { .menu .item { color: blue; } }",
    )
    .unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), "");
}

#[test]
fn given_scope_and_filename_on_same_rule_when_cleaning_then_scope_sweep_fires_first() {
    // Both branches could fire; marker declarations are processed in
    // document order, so the scope sweep runs before the rule removal
    // stales the filename declaration.
    let mut arena = parse_stylesheet(
        ".menu { critical-selector: scope; critical-filename: menu.css; color: red; }\n\
         .menu .item { color: blue; }\n\
         .other { color: black; }",
    )
    .unwrap();

    clean(&mut arena, false);

    assert_eq!(to_css(&arena), ".other {\n  color: black;\n}\n");
}
