//! Tests for output emission

use std::fs;

use tempfile::TempDir;

use critical_css::arena::{DetachedNode, NodeKind};
use critical_css::emitter::emit;
use critical_css::errors::CriticalError;
use critical_css::exitcode;

fn sample_group() -> Vec<DetachedNode> {
    vec![DetachedNode::with_children(
        NodeKind::Rule {
            selector: ".a".into(),
        },
        vec![DetachedNode::new(NodeKind::Declaration {
            prop: "color".into(),
            value: "red".into(),
        })],
    )]
}

#[test]
fn given_group_when_emitting_then_minified_file_written() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("critical.css");

    emit(&sample_group(), &dest, true, false).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), ".a{color:red}");
}

#[test]
fn given_unminified_emission_then_pretty_output() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("critical.css");

    emit(&sample_group(), &dest, false, false).unwrap();

    assert_eq!(
        fs::read_to_string(&dest).unwrap(),
        ".a {\n  color: red;\n}\n"
    );
}

#[test]
fn given_nested_destination_when_emitting_then_directories_created() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("assets").join("css").join("critical.css");

    emit(&sample_group(), &dest, true, false).unwrap();

    assert!(dest.exists());
}

#[test]
fn given_dry_run_when_emitting_then_no_file_created() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("critical.css");

    emit(&sample_group(), &dest, true, true).unwrap();

    assert!(!dest.exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn given_empty_group_when_emitting_then_empty_file_written() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("critical.css");

    emit(&[], &dest, true, false).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "");
}

#[test]
fn given_uncreatable_destination_when_emitting_then_write_failed_with_cantcreat() {
    let temp = TempDir::new().unwrap();
    // A plain file where a directory is needed
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a dir").unwrap();
    let dest = blocker.join("critical.css");

    let err = emit(&sample_group(), &dest, true, false).unwrap_err();

    assert!(matches!(err, CriticalError::WriteFailed { .. }));
    assert_eq!(err.exit_code(), exitcode::CANTCREAT);
}
