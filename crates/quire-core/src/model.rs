//! Core layout-tree data model.
//!
//! A page is a recursive binary partition: every node is either a leaf
//! holding content, or a split holding exactly two children along one axis.
//! Nodes live in a `StableDiGraph` arena. Edges go parent → child and carry
//! the child's [`ChildSlot`], so child order is explicit and never depends
//! on arena insertion order. Parents are not stored; they are the single
//! incoming edge of a node.

use crate::id::NodeId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Axes & directions ───────────────────────────────────────────────────

/// Split axis of a node.
///
/// `Vertical` places the children side by side behind a vertical divider,
/// so the main axis is x. `Horizontal` stacks them behind a horizontal
/// divider, so the main axis is y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The split orientation whose divider moves along this direction.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Vertical,
            Self::Up | Self::Down => Orientation::Horizontal,
        }
    }

    /// `Right`/`Down` move toward larger percentages.
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

/// Position of a child under its split parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildSlot {
    First,
    Second,
}

impl ChildSlot {
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// The slot that grows when its divider moves in `direction`.
    pub fn growing_toward(direction: Direction) -> Self {
        if direction.is_forward() {
            Self::First
        } else {
            Self::Second
        }
    }
}

/// One of the four paper edges, used as a handle to grow a new pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl PageEdge {
    /// Orientation of the split synthesized when this edge is dragged.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Vertical,
            Self::Top | Self::Bottom => Orientation::Horizontal,
        }
    }

    /// Slot the new empty leaf takes in the synthesized split.
    pub fn new_leaf_slot(self) -> ChildSlot {
        match self {
            Self::Left | Self::Top => ChildSlot::First,
            Self::Right | Self::Bottom => ChildSlot::Second,
        }
    }
}

// ─── Leaf content ────────────────────────────────────────────────────────

/// How an image fills its leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

impl ImageFit {
    pub fn toggled(self) -> Self {
        match self {
            Self::Cover => Self::Contain,
            Self::Contain => Self::Cover,
        }
    }
}

/// Reference to an externally managed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub asset_id: String,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub flipped: bool,
}

impl ImageRef {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            fit: ImageFit::default(),
            flipped: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// What an unsplit node shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeafContent {
    pub image: Option<ImageRef>,
    pub text: Option<String>,
    pub text_align: TextAlign,
}

impl LeafContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn image(image: ImageRef) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.text.is_none()
    }
}

// ─── Layout nodes ────────────────────────────────────────────────────────

/// Whether a node is a split or a leaf. Content only exists on leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Split { orientation: Orientation },
    Leaf(LeafContent),
}

/// Serialized discriminant of [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitState {
    Split,
    Unsplit,
}

/// A single rectangle of the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    /// Share of the parent's content box along the parent's split axis, in
    /// percent. The two children of a split sum to 100.
    pub size: f32,
    pub kind: NodeKind,
}

impl LayoutNode {
    pub fn leaf(id: NodeId, size: f32, content: LeafContent) -> Self {
        Self {
            id,
            size,
            kind: NodeKind::Leaf(content),
        }
    }

    pub fn split(id: NodeId, size: f32, orientation: Orientation) -> Self {
        Self {
            id,
            size,
            kind: NodeKind::Split { orientation },
        }
    }

    pub fn split_state(&self) -> SplitState {
        match self.kind {
            NodeKind::Split { .. } => SplitState::Split,
            NodeKind::Leaf(_) => SplitState::Unsplit,
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self.kind {
            NodeKind::Split { orientation } => Some(orientation),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn content(&self) -> Option<&LeafContent> {
        match &self.kind {
            NodeKind::Leaf(content) => Some(content),
            NodeKind::Split { .. } => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut LeafContent> {
        match &mut self.kind {
            NodeKind::Leaf(content) => Some(content),
            NodeKind::Split { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

// ─── Layout tree (one page) ──────────────────────────────────────────────

/// Arena of layout nodes for one page.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    /// The underlying arena. Edges go parent → child.
    pub graph: StableDiGraph<LayoutNode, ChildSlot>,

    /// The page root.
    pub root: NodeIndex,

    /// Index from NodeId → NodeIndex for O(1) lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,
}

impl LayoutTree {
    /// A tree holding a single empty leaf.
    #[must_use]
    pub fn new(root_id: NodeId) -> Self {
        Self::with_root(LayoutNode::leaf(root_id, 100.0, LeafContent::default()))
    }

    pub fn with_root(node: LayoutNode) -> Self {
        let mut graph = StableDiGraph::new();
        let id = node.id;
        let root = graph.add_node(node);
        let mut id_index = HashMap::new();
        id_index.insert(id, root);
        Self {
            graph,
            root,
            id_index,
        }
    }

    /// Add a detached node to the arena, keeping the `id_index` in sync.
    pub fn add_node(&mut self, node: LayoutNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    /// Add a node as the `slot` child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, slot: ChildSlot, node: LayoutNode) -> NodeIndex {
        let idx = self.add_node(node);
        self.graph.add_edge(parent, idx, slot);
        idx
    }

    /// Attach an existing (detached) node under `parent`.
    pub fn attach(&mut self, parent: NodeIndex, child: NodeIndex, slot: ChildSlot) {
        self.graph.add_edge(parent, child, slot);
    }

    /// Cut the edge from `child` to its parent, if any.
    pub fn detach(&mut self, child: NodeIndex) {
        let incoming: SmallVec<[_; 1]> = self
            .graph
            .edges_directed(child, petgraph::Direction::Incoming)
            .map(|e| e.id())
            .collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }
    }

    /// Remove a single node, keeping the `id_index` synchronized.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<LayoutNode> {
        let removed = self.graph.remove_node(idx);
        if let Some(node) = &removed {
            self.id_index.remove(&node.id);
        }
        removed
    }

    /// Remove `idx` and everything below it.
    pub fn remove_subtree(&mut self, idx: NodeIndex) {
        for node in self.descendants(idx) {
            self.remove_node(node);
        }
    }

    /// Look up a node by id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&LayoutNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up a node mutably by id.
    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &LayoutNode {
        &self.graph[idx]
    }

    pub fn root_id(&self) -> NodeId {
        self.graph[self.root].id
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Parent index of a node, `None` for the root.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Which slot `idx` occupies under its parent.
    pub fn slot_of(&self, idx: NodeIndex) -> Option<ChildSlot> {
        self.graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .next()
            .map(|e| *e.weight())
    }

    /// The child in `slot`, if present.
    pub fn child(&self, idx: NodeIndex, slot: ChildSlot) -> Option<NodeIndex> {
        self.graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .find(|e| *e.weight() == slot)
            .map(|e| e.target())
    }

    /// Both children in order, or `None` unless exactly the two slots are
    /// filled.
    pub fn children(&self, idx: NodeIndex) -> Option<[NodeIndex; 2]> {
        if self.child_edges(idx).len() != 2 {
            return None;
        }
        let first = self.child(idx, ChildSlot::First)?;
        let second = self.child(idx, ChildSlot::Second)?;
        Some([first, second])
    }

    /// Raw outgoing edges as `(child, slot)` pairs.
    pub fn child_edges(&self, idx: NodeIndex) -> SmallVec<[(NodeIndex, ChildSlot); 2]> {
        self.graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .map(|e| (e.target(), *e.weight()))
            .collect()
    }

    /// `idx` and all of its descendants, parents before children, first
    /// child before second.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(second) = self.child(current, ChildSlot::Second) {
                stack.push(second);
            }
            if let Some(first) = self.child(current, ChildSlot::First) {
                stack.push(first);
            }
        }
        out
    }

    /// All unsplit nodes of the page in reading order.
    pub fn leaves(&self) -> Vec<NodeIndex> {
        self.descendants(self.root)
            .into_iter()
            .filter(|idx| self.graph[*idx].is_leaf())
            .collect()
    }

    /// Whether `idx` is `ancestor` or lies somewhere below it.
    pub fn is_within(&self, idx: NodeIndex, ancestor: NodeIndex) -> bool {
        let mut current = idx;
        loop {
            if current == ancestor {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Distance from the root.
    pub fn depth(&self, idx: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }
}

// ─── Resolved geometry ───────────────────────────────────────────────────

/// Absolute pixel rectangle of a node or divider.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ResolvedBounds {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Start coordinate along the main axis of `orientation`.
    pub fn main_start(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.x,
            Orientation::Horizontal => self.y,
        }
    }

    /// Length along the main axis of `orientation`.
    pub fn main_len(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }

    /// Grow the rectangle by `by` on every side.
    pub fn inflate(&self, by: f32) -> Self {
        Self {
            x: self.x - by,
            y: self.y - by,
            width: self.width + 2.0 * by,
            height: self.height + 2.0 * by,
        }
    }
}
