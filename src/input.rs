//! Input-layer protocol surface.
//!
//! The external input engine owns pointer hit-testing and event delivery; this
//! module models the registry it exposes to the tree. A [`Layer`] is a
//! rectangle-scoped, optionally event-type-filtered, optionally blocking claim
//! on input. The per-frame setup pass re-registers layers from scratch
//! ([`LayerStack::begin_frame`]) so the stack always mirrors the render tree.

use smallvec::SmallVec;

use crate::geometry::Rect;
use crate::tree::{NodeId, Tree};

bitflags::bitflags! {
    /// Event classes a layer can claim.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventTypes: u8 {
        const MOUSE_BUTTON = 1 << 0;
        const WHEEL = 1 << 1;
        const TOUCH = 1 << 2;
    }
}

/// Live hit-test rectangle: queried at dispatch time, never snapshotted, so
/// the region tracks current geometry.
pub type RectFunc = Box<dyn Fn(&Tree) -> Rect>;

pub struct Layer {
    pub debug_label: &'static str,
    pub event_types: EventTypes,
    /// Suppress delivery to layers below at the same location, for the event
    /// types this layer claims.
    pub block_lower: bool,
    pub full_screen: bool,
    pub rect_func: RectFunc,
}

impl Layer {
    /// The current hit-test rectangle.
    pub fn rect(&self, tree: &Tree) -> Rect {
        (self.rect_func)(tree)
    }

    /// Whether this layer receives an event of type `ty` at (x, y).
    pub fn active_for(&self, tree: &Tree, x: i32, y: i32, ty: EventTypes) -> bool {
        self.event_types.contains(ty) && (self.full_screen || self.rect(tree).contains(x, y))
    }
}

/// Ordered layer registry, bottom first; the last-registered (innermost)
/// layer sits on top. Models the external engine's stack at the boundary the
/// tree registers into.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every layer; the setup pass re-registers the current tree.
    pub fn begin_frame(&mut self) {
        self.layers.clear();
    }

    pub fn push(&mut self, layer: Layer) {
        log::trace!("input layer registered: {}", layer.debug_label);
        self.layers.push(layer);
    }

    /// Registered layers, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Topmost layer receiving an event of type `ty` at (x, y). `None` means
    /// the engine's base routing applies; event types no layer claims (wheel
    /// over scroll content) fall all the way through.
    pub fn active_layer(&self, tree: &Tree, x: i32, y: i32, ty: EventTypes) -> Option<&Layer> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.active_for(tree, x, y, ty))
    }

    /// Every layer receiving the event, topmost first. Delivery stops below
    /// the first blocking receiver.
    pub fn deliver_to(&self, tree: &Tree, x: i32, y: i32, ty: EventTypes) -> Vec<&Layer> {
        let mut out = Vec::new();
        for layer in self.layers.iter().rev() {
            if layer.active_for(tree, x, y, ty) {
                out.push(layer);
                if layer.block_lower {
                    break;
                }
            }
        }
        out
    }
}

/// Deferred input-layer setup work: nodes queued during the setup pass and
/// revisited after the main walk, exactly once, within the same frame.
#[derive(Default)]
pub struct SetupQueue {
    queued: SmallVec<[NodeId; 8]>,
}

impl SetupQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer input-layer setup of `id` until after the main walk.
    pub fn defer(&mut self, id: NodeId) {
        self.queued.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        if self.queued.is_empty() {
            None
        } else {
            Some(self.queued.remove(0))
        }
    }
}
