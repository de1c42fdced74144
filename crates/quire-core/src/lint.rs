//! Lint diagnostics for layout trees.
//!
//! Reports structural invariant violations without modifying the tree. The
//! editor runs this after committed mutations and logs anything it finds.

use crate::id::NodeId;
use crate::model::LayoutTree;
use crate::tree::SIZE_EPSILON;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The tree is structurally broken.
    Error,
    /// Tolerable drift that the next normalization will fix.
    Warning,
}

/// A single lint diagnostic for a layout node.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "child-count", "size-sum").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over one page and return diagnostics.
#[must_use]
pub fn lint_tree(tree: &LayoutTree) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_child_count(tree, &mut diags);
    lint_sizes(tree, &mut diags);
    lint_orphans(tree, &mut diags);
    lint_index_drift(tree, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Splits need exactly two children in distinct slots; leaves need none.
fn lint_child_count(tree: &LayoutTree, diags: &mut Vec<LintDiagnostic>) {
    for idx in tree.graph.node_indices() {
        let node = tree.node(idx);
        let edges = tree.child_edges(idx).len();
        let ok = if node.is_leaf() {
            edges == 0
        } else {
            tree.children(idx).is_some()
        };
        if !ok {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!(
                    "`{}` is a {} with {edges} child edge(s)",
                    node.id,
                    if node.is_leaf() { "leaf" } else { "split" }
                ),
                severity: LintSeverity::Error,
                rule: "child-count",
            });
        }
    }
}

fn lint_sizes(tree: &LayoutTree, diags: &mut Vec<LintDiagnostic>) {
    for idx in tree.graph.node_indices() {
        let node = tree.node(idx);
        if !node.size.is_finite() || node.size < 0.0 {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("`{}` has size {}", node.id, node.size),
                severity: LintSeverity::Error,
                rule: "negative-size",
            });
        }
        if let Some([a, b]) = tree.children(idx) {
            let sum = tree.node(a).size + tree.node(b).size;
            if (sum - 100.0).abs() > SIZE_EPSILON {
                diags.push(LintDiagnostic {
                    node_id: node.id,
                    message: format!("children of `{}` sum to {sum}", node.id),
                    severity: LintSeverity::Warning,
                    rule: "size-sum",
                });
            }
        }
    }
}

/// Every node in the arena must be reachable from the root.
fn lint_orphans(tree: &LayoutTree, diags: &mut Vec<LintDiagnostic>) {
    let reachable: HashSet<_> = tree.descendants(tree.root).into_iter().collect();
    for idx in tree.graph.node_indices() {
        if !reachable.contains(&idx) {
            let id = tree.node(idx).id;
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("`{id}` is not reachable from the page root"),
                severity: LintSeverity::Error,
                rule: "orphan",
            });
        }
    }
}

/// The id index must map exactly the ids in the arena.
fn lint_index_drift(tree: &LayoutTree, diags: &mut Vec<LintDiagnostic>) {
    for idx in tree.graph.node_indices() {
        let id = tree.node(idx).id;
        if tree.index_of(id) != Some(idx) {
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("id index does not point at `{id}`"),
                severity: LintSeverity::Error,
                rule: "index-drift",
            });
        }
    }
    for (&id, &idx) in &tree.id_index {
        if !tree.graph.contains_node(idx) {
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("id index keeps removed node `{id}`"),
                severity: LintSeverity::Error,
                rule: "index-drift",
            });
        }
    }
}
