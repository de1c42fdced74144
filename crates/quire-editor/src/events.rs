//! Outbound notifications and the redraw hook.
//!
//! Events are delivered synchronously, in subscription order, after the
//! mutation that caused them has fully completed. Subscribers never observe
//! a half-applied change.

use quire_core::snap::SnapKind;
use quire_core::{NodeId, Page, ResolvedLayout};

/// Draws a page. The editor calls this after every change that affects what
/// is on screen, passing the leaf that should hold keyboard focus.
pub trait Renderer {
    fn render(&mut self, page: &Page, layout: &ResolvedLayout, focus: Option<NodeId>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    /// The active page's structure, proportions or content changed.
    LayoutChanged,
    /// An undo or redo landed.
    StateRestored,
    /// A snap point engaged during a drag or keyboard snap.
    SnapEngaged { kind: SnapKind, percent: f32 },
    /// Another page became active.
    PageChanged { index: usize },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Fire-and-forget observer list.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent) {
        log::trace!("event {event:?} → {} listener(s)", self.listeners.len());
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
