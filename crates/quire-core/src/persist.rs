//! Serializable document state.
//!
//! The record types mirror the persisted shape: every page is its recursive
//! node structure verbatim, plus the document's id counter and current page
//! index. JSON (`serde_json`) is the interchange format; history snapshots
//! use the same records encoded as MessagePack (`rmp-serde`).
//!
//! Loading validates the whole structure and fails on the first problem.
//! Nothing is repaired.

use crate::document::{Document, Page};
use crate::id::{IdGenerator, NodeId};
use crate::model::*;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use winnow::ascii::{float, space0};
use winnow::combinator::{opt, terminated};
use winnow::prelude::*;

// ─── Records ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub split_state: SplitState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
    /// Percentage, written as `"<n>%"`.
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: NodeId,
    pub root: NodeRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    pub pages: Vec<PageRecord>,
    pub current_page_index: usize,
    pub id_counter: u64,
}

// ─── Errors ──────────────────────────────────────────────────────────────

/// Why persisted state could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] rmp_serde::decode::Error),

    #[error("document has no pages")]
    NoPages,

    #[error("current page index {index} is out of range ({pages} pages)")]
    PageIndexOutOfRange { index: usize, pages: usize },

    #[error("split `{id}` has {count} children, expected 2")]
    ChildCount { id: NodeId, count: usize },

    #[error("split `{id}` has no orientation")]
    MissingOrientation { id: NodeId },

    #[error("split `{id}` carries leaf content")]
    ContentOnSplit { id: NodeId },

    #[error("leaf `{id}` has children")]
    LeafWithChildren { id: NodeId },

    #[error("node `{id}` has invalid size {value:?}")]
    InvalidSize { id: NodeId, value: String },

    #[error("id `{id}` appears more than once")]
    DuplicateId { id: NodeId },
}

// ─── Size strings ────────────────────────────────────────────────────────

/// Format a size the way it is persisted.
pub fn format_size(size: f32) -> String {
    format!("{size}%")
}

/// Parse a persisted size: a non-negative number with an optional `%`.
pub fn parse_size(input: &str) -> Option<f32> {
    let mut rest = input.trim();
    let value = size_value.parse_next(&mut rest).ok()?;
    if !rest.is_empty() || !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}

fn size_value(input: &mut &str) -> ModalResult<f32> {
    terminated(float, (space0, opt('%'))).parse_next(input)
}

// ─── Document ↔ records ──────────────────────────────────────────────────

impl Document {
    /// Capture the full serializable state.
    pub fn to_state(&self) -> DocumentState {
        DocumentState {
            pages: self
                .pages
                .iter()
                .map(|page| PageRecord {
                    id: page.id,
                    root: node_record(&page.tree, page.tree.root),
                })
                .collect(),
            current_page_index: self.current_page,
            id_counter: self.ids.counter(),
        }
    }

    /// Rebuild a document from persisted state.
    ///
    /// # Errors
    /// Returns a [`LoadError`] describing the first structural problem.
    pub fn from_state(state: &DocumentState) -> Result<Self, LoadError> {
        if state.pages.is_empty() {
            return Err(LoadError::NoPages);
        }
        if state.current_page_index >= state.pages.len() {
            return Err(LoadError::PageIndexOutOfRange {
                index: state.current_page_index,
                pages: state.pages.len(),
            });
        }

        let mut ids = IdGenerator::from_counter(state.id_counter);
        let mut seen = HashSet::new();
        let mut pages = Vec::with_capacity(state.pages.len());
        for record in &state.pages {
            claim(&mut seen, &mut ids, record.id)?;
            let root = build_node(&record.root, &mut seen, &mut ids)?;
            let mut tree = LayoutTree::with_root(root);
            let root_idx = tree.root;
            attach_children(&mut tree, root_idx, &record.root, &mut seen, &mut ids)?;
            pages.push(Page {
                id: record.id,
                tree,
            });
        }

        log::debug!(
            "loaded {} page(s), id counter {}",
            pages.len(),
            ids.counter()
        );
        Ok(Self {
            pages,
            current_page: state.current_page_index,
            ids,
        })
    }

    /// # Errors
    /// Fails only if `serde_json` cannot encode the records.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_state())
    }

    /// # Errors
    /// See [`LoadError`].
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let state: DocumentState = serde_json::from_str(json)?;
        Self::from_state(&state)
    }

    /// Compact full-state snapshot for the undo history.
    ///
    /// # Errors
    /// Fails only if MessagePack encoding fails.
    pub fn snapshot(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(&self.to_state())
    }

    /// # Errors
    /// See [`LoadError`].
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, LoadError> {
        let state: DocumentState = rmp_serde::from_slice(bytes)?;
        Self::from_state(&state)
    }

    /// Replace this document with a snapshot. On error `self` is untouched.
    ///
    /// # Errors
    /// See [`LoadError`].
    pub fn restore_snapshot(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        *self = Self::from_snapshot(bytes)?;
        Ok(())
    }
}

fn node_record(tree: &LayoutTree, idx: NodeIndex) -> NodeRecord {
    let node = tree.node(idx);
    let mut record = NodeRecord {
        id: node.id,
        split_state: node.split_state(),
        orientation: node.orientation(),
        children: Vec::new(),
        size: format_size(node.size),
        image: None,
        text: None,
        text_align: None,
    };
    match &node.kind {
        NodeKind::Split { .. } => {
            if let Some(children) = tree.children(idx) {
                record.children = children
                    .into_iter()
                    .map(|child| node_record(tree, child))
                    .collect();
            }
        }
        NodeKind::Leaf(content) => {
            record.image = content.image.clone();
            record.text = content.text.clone();
            if content.text.is_some() || content.text_align != TextAlign::default() {
                record.text_align = Some(content.text_align);
            }
        }
    }
    record
}

fn claim(seen: &mut HashSet<NodeId>, ids: &mut IdGenerator, id: NodeId) -> Result<(), LoadError> {
    if !seen.insert(id) {
        return Err(LoadError::DuplicateId { id });
    }
    ids.observe(id);
    Ok(())
}

/// Validate one record and turn it into a detached node.
fn build_node(
    record: &NodeRecord,
    seen: &mut HashSet<NodeId>,
    ids: &mut IdGenerator,
) -> Result<LayoutNode, LoadError> {
    let id = record.id;
    claim(seen, ids, id)?;
    let size = parse_size(&record.size).ok_or_else(|| LoadError::InvalidSize {
        id,
        value: record.size.clone(),
    })?;

    match record.split_state {
        SplitState::Split => {
            let orientation = record
                .orientation
                .ok_or(LoadError::MissingOrientation { id })?;
            if record.children.len() != 2 {
                return Err(LoadError::ChildCount {
                    id,
                    count: record.children.len(),
                });
            }
            if record.image.is_some() || record.text.is_some() {
                return Err(LoadError::ContentOnSplit { id });
            }
            Ok(LayoutNode::split(id, size, orientation))
        }
        SplitState::Unsplit => {
            if !record.children.is_empty() {
                return Err(LoadError::LeafWithChildren { id });
            }
            let content = LeafContent {
                image: record.image.clone(),
                text: record.text.clone(),
                text_align: record.text_align.unwrap_or_default(),
            };
            Ok(LayoutNode::leaf(id, size, content))
        }
    }
}

fn attach_children(
    tree: &mut LayoutTree,
    parent: NodeIndex,
    record: &NodeRecord,
    seen: &mut HashSet<NodeId>,
    ids: &mut IdGenerator,
) -> Result<(), LoadError> {
    let slots = [ChildSlot::First, ChildSlot::Second];
    for (child, slot) in record.children.iter().zip(slots) {
        let node = build_node(child, seen, ids)?;
        let idx = tree.add_child(parent, slot, node);
        attach_children(tree, idx, child, seen, ids)?;
    }
    Ok(())
}
