pub mod config;
pub mod document;
pub mod hit;
pub mod id;
pub mod layout;
pub mod lint;
pub mod model;
pub mod persist;
pub mod snap;
pub mod tree;

pub use config::{EngineConfig, SnapConfig};
pub use document::{Document, Page};
pub use hit::{HitTarget, hit_test};
pub use id::{IdGenerator, NodeId};
pub use layout::{DividerBounds, ResolvedLayout, Viewport, resolve_layout};
pub use lint::{LintDiagnostic, LintSeverity, lint_tree};
pub use model::*;
pub use persist::{DocumentState, LoadError, NodeRecord, PageRecord};
pub use snap::{SnapCandidate, SnapKind, find_next_snap_point};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
