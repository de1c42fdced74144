//! Pages and the document that owns them.
//!
//! Each page holds its own [`LayoutTree`], and with it its own id index, so
//! an index can never be consulted for a page other than the one it was
//! built from. Ids are minted from one document-wide [`IdGenerator`].

use crate::id::{IdGenerator, NodeId};
use crate::model::{LayoutNode, LayoutTree};

/// One page: an identified layout tree.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: NodeId,
    pub tree: LayoutTree,
}

impl Page {
    /// A page holding one empty leaf.
    pub fn blank(ids: &mut IdGenerator) -> Self {
        let id = ids.next_page_id();
        let root = ids.next_id();
        Self {
            id,
            tree: LayoutTree::new(root),
        }
    }
}

/// Ordered pages, the active page and the id counter.
#[derive(Debug, Clone)]
pub struct Document {
    pub pages: Vec<Page>,
    pub current_page: usize,
    pub ids: IdGenerator,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with a single blank page.
    #[must_use]
    pub fn new() -> Self {
        let mut ids = IdGenerator::new();
        let page = Page::blank(&mut ids);
        Self {
            pages: vec![page],
            current_page: 0,
            ids,
        }
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn active_page(&self) -> &Page {
        &self.pages[self.current_page]
    }

    pub fn active_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current_page]
    }

    pub fn active_tree(&self) -> &LayoutTree {
        &self.active_page().tree
    }

    pub fn active_tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.active_page_mut().tree
    }

    /// Find a node on the active page.
    pub fn find_node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.active_tree().find_node(id)
    }

    /// Split borrow: the active tree together with the id generator.
    pub fn active_tree_and_ids(&mut self) -> (&mut LayoutTree, &mut IdGenerator) {
        let page = &mut self.pages[self.current_page];
        (&mut page.tree, &mut self.ids)
    }

    // ─── Page management ────────────────────────────────────────────────

    /// Insert a blank page after the current one and activate it.
    pub fn add_page(&mut self) -> usize {
        let page = Page::blank(&mut self.ids);
        let index = self.current_page + 1;
        log::debug!("add page {} at {index}", page.id);
        self.pages.insert(index, page);
        self.current_page = index;
        index
    }

    /// Deep-copy page `index` with fresh ids, insert the copy right after it
    /// and activate it.
    pub fn duplicate_page(&mut self, index: usize) -> Option<usize> {
        let source = self.pages.get(index)?;
        let tree = source.tree.deep_clone_with_fresh_ids(&mut self.ids);
        let id = self.ids.next_page_id();
        log::debug!("duplicate page {} as {id}", self.pages[index].id);
        let at = index + 1;
        self.pages.insert(at, Page { id, tree });
        self.current_page = at;
        Some(at)
    }

    /// Remove page `index`. The last remaining page cannot be removed.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }
        let removed = self.pages.remove(index);
        log::debug!("removed page {}", removed.id);
        if self.current_page > index || self.current_page >= self.pages.len() {
            self.current_page = self.current_page.saturating_sub(1);
        }
        true
    }

    pub fn switch_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() || index == self.current_page {
            return false;
        }
        self.current_page = index;
        true
    }

    /// Move page `from` to position `to`. The active page stays active.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        let len = self.pages.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let active = self.pages[self.current_page].id;
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        if let Some(pos) = self.pages.iter().position(|p| p.id == active) {
            self.current_page = pos;
        }
        true
    }
}
