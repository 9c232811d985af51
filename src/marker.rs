//! Marker classification
//!
//! Markers are a semantic overlay over ordinary nodes, computed at
//! traversal time rather than stored as a distinct node kind: an at-rule
//! named `critical`, or a declaration whose property is `critical-selector`
//! or `critical-filename`.

use crate::arena::NodeKind;

pub const MARKER_AT_RULE: &str = "critical";
pub const SELECTOR_PROP: &str = "critical-selector";
pub const FILENAME_PROP: &str = "critical-filename";

/// `critical-filename: scope` inherits its destination from the nearest
/// enclosing marked selector and widens removal to the selector subtree.
pub const SCOPE_VALUE: &str = "scope";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `@critical { ... }`
    CriticalBlock,
    /// `critical-selector: <value>`
    SelectorDecl { value: String },
    /// `critical-filename: <destination | "scope">`
    FilenameDecl { value: String },
}

impl Marker {
    pub fn is_scope(&self) -> bool {
        match self {
            Marker::CriticalBlock => false,
            Marker::SelectorDecl { value } | Marker::FilenameDecl { value } => {
                value == SCOPE_VALUE
            }
        }
    }
}

/// Classify a node as a marker, if it is one.
pub fn classify(kind: &NodeKind) -> Option<Marker> {
    match kind {
        NodeKind::AtRule { name, .. } if name.eq_ignore_ascii_case(MARKER_AT_RULE) => {
            Some(Marker::CriticalBlock)
        }
        NodeKind::Declaration { prop, value } if prop == SELECTOR_PROP => {
            Some(Marker::SelectorDecl {
                value: value.clone(),
            })
        }
        NodeKind::Declaration { prop, value } if prop == FILENAME_PROP => {
            Some(Marker::FilenameDecl {
                value: value.clone(),
            })
        }
        _ => None,
    }
}

/// True for the two marker declaration properties.
pub fn is_marker_prop(prop: &str) -> bool {
    prop == SELECTOR_PROP || prop == FILENAME_PROP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_critical_at_rule_when_classifying_then_block_marker() {
        let kind = NodeKind::AtRule {
            name: "critical".into(),
            params: String::new(),
        };
        assert_eq!(classify(&kind), Some(Marker::CriticalBlock));
    }

    #[test]
    fn given_media_at_rule_when_classifying_then_not_a_marker() {
        let kind = NodeKind::AtRule {
            name: "media".into(),
            params: "print".into(),
        };
        assert_eq!(classify(&kind), None);
    }

    #[test]
    fn given_filename_decl_when_classifying_then_carries_destination() {
        let kind = NodeKind::Declaration {
            prop: "critical-filename".into(),
            value: "above-fold.css".into(),
        };
        assert_eq!(
            classify(&kind),
            Some(Marker::FilenameDecl {
                value: "above-fold.css".into()
            })
        );
    }

    #[test]
    fn given_scope_value_when_checking_then_scope_mode() {
        let marker = Marker::SelectorDecl {
            value: "scope".into(),
        };
        assert!(marker.is_scope());
    }
}
