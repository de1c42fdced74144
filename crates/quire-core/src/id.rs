//! Interned node and page ids, and the per-document id generator.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide interner shared by every document.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned identifier for layout nodes and pages. Copying and comparing is
/// as cheap as for the underlying 4-byte `Spur`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

// ─── Id generator ─────────────────────────────────────────────────────────

const NODE_PREFIX: &str = "n";
const PAGE_PREFIX: &str = "page-";

/// Per-document monotonic id source.
///
/// The counter only ever increases, so an id handed out once is never
/// handed out again. Deletes leave it alone, undo carries the newer value
/// over with [`advance_to`](Self::advance_to), and loading bumps it past
/// every id seen with [`observe`](Self::observe).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a persisted counter value.
    pub fn from_counter(next: u64) -> Self {
        Self { next }
    }

    /// The value the next generated id will use.
    pub fn counter(&self) -> u64 {
        self.next
    }

    /// Mint a fresh node id (`n<k>`).
    pub fn next_id(&mut self) -> NodeId {
        let n = self.bump();
        NodeId::intern(&format!("{NODE_PREFIX}{n}"))
    }

    /// Mint a fresh page id (`page-<k>`).
    pub fn next_page_id(&mut self) -> NodeId {
        let n = self.bump();
        NodeId::intern(&format!("{PAGE_PREFIX}{n}"))
    }

    /// Never go below `next`. Used when an older snapshot replaces the
    /// document.
    pub fn advance_to(&mut self, next: u64) {
        self.next = self.next.max(next);
    }

    /// Make sure a generated id can never collide with `id`.
    pub fn observe(&mut self, id: NodeId) {
        let s = id.as_str();
        let suffix = s
            .strip_prefix(PAGE_PREFIX)
            .or_else(|| s.strip_prefix(NODE_PREFIX));
        if let Some(n) = suffix.and_then(|d| d.parse::<u64>().ok())
            && n >= self.next
        {
            self.next = n.saturating_add(1);
        }
    }

    fn bump(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}
