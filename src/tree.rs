//! Arena-backed retained widget tree.
//!
//! Nodes live in a slotmap arena; containers reference children by [`NodeId`]
//! and every widget carries a non-owning parent key back up. Ownership is the
//! child lists: destroying a node tears down its subtree child-list-first and
//! never follows the back-reference.
//!
//! The tree assumes the host loop's single-writer, single-renderer discipline:
//! one logical thread drives input-layer setup, event dispatch, deferred-event
//! flush, and render, once per frame. Structural mutation during an in-flight
//! render of the same subtree is not supported.

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::container::Container;
use crate::geometry::{Rect, Size};
use crate::input::{LayerStack, SetupQueue};
use crate::scroll::ScrollContainer;
use crate::surface::Surface;
use crate::widget::Widget;

new_key_type! {
    /// Handle into the node arena. Stable across insertions and removals.
    pub struct NodeId;
}

/// Preferred size used wherever a node declares none.
pub(crate) const FALLBACK_SIZE: Size = Size {
    width: 50,
    height: 50,
};

/// Behavior variant of a node. Core kinds are closed; external leaf widgets
/// plug in through the [`Leaf`] trait object.
pub enum Control {
    Container(Container),
    Scroll(ScrollContainer),
    Leaf(Box<dyn Leaf>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ControlKind {
    Container,
    Scroll,
    Leaf,
}

/// Capability surface for leaf widgets. Every method is optional: the default
/// paints nothing, declares no size, and ignores notifications, so a leaf
/// that keeps all defaults is a pure layout-hint node.
pub trait Leaf {
    /// Paint this node onto `surface`. Nodes keeping the default are silently
    /// skipped by their parent's paint loop.
    fn render(&mut self, widget: &Widget, surface: &mut dyn Surface, deferred: &mut RenderQueue) {
        let _ = (widget, surface, deferred);
    }

    /// Declared preferred size. `None` means callers fall back to 50×50.
    fn preferred_size(&self) -> Option<Size> {
        None
    }

    /// Invalidation notification. Leaves without layout state ignore it.
    fn relayout(&mut self) {}

    /// Input-layer registration hook. Most leaves register nothing.
    fn setup_input_layer(&mut self, widget: &Widget, layers: &mut LayerStack, deferred: &mut SetupQueue) {
        let _ = (widget, layers, deferred);
    }
}

/// Tree node: the shared positional record plus the behavior variant.
pub struct Node {
    pub widget: Widget,
    pub control: Control,
}

/// Removal capability returned by [`Tree::add_child`]. Redeeming it removes
/// exactly the child it was created for; redeeming twice, or after the child
/// was removed some other way, is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct RemoveChild {
    parent: NodeId,
    child: NodeId,
}

impl RemoveChild {
    pub fn remove(self, tree: &mut Tree) {
        tree.remove_child(self.parent, self.child);
    }
}

/// Deferred render work: nodes queued during the main pass and rendered after
/// the root's subtree has been painted (overlays, tooltips). The queue only
/// registers; [`Tree::render`] drains it within the same frame.
#[derive(Default)]
pub struct RenderQueue {
    queued: SmallVec<[NodeId; 8]>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer rendering of `id` until after the main pass.
    pub fn defer(&mut self, id: NodeId) {
        self.queued.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    fn pop(&mut self) -> Option<NodeId> {
        if self.queued.is_empty() {
            None
        } else {
            Some(self.queued.remove(0))
        }
    }
}

pub struct Tree {
    pub(crate) arena: SlotMap<NodeId, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Insert a detached container node.
    pub fn insert_container(&mut self, container: Container) -> NodeId {
        self.insert_node(Control::Container(container))
    }

    /// Insert a detached leaf node.
    pub fn insert_leaf(&mut self, leaf: impl Leaf + 'static) -> NodeId {
        self.insert_node(Control::Leaf(Box::new(leaf)))
    }

    /// Insert a scroll container. `content` is fixed at construction; there is
    /// no dynamic content swap.
    pub fn insert_scroll(&mut self, scroll: ScrollContainer, content: Option<NodeId>) -> NodeId {
        let content = content.filter(|&c| self.arena.contains_key(c));
        let mut scroll = scroll;
        scroll.content = content;
        let id = self.insert_node(Control::Scroll(scroll));
        if let Some(content) = content
            && let Some(node) = self.arena.get_mut(content)
        {
            node.widget.parent = Some(id);
        }
        id
    }

    fn insert_node(&mut self, control: Control) -> NodeId {
        self.arena.insert(Node {
            widget: Widget::new(),
            control,
        })
    }

    /// Append `child` to `parent`'s ordered list (paint order: first added =
    /// bottom of the z-stack), set the child's parent back-reference, and
    /// request a full relayout. A child already attached elsewhere is moved.
    /// Returns the removal capability for this membership.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> RemoveChild {
        let handle = RemoveChild { parent, child };
        if parent == child || !self.arena.contains_key(child) {
            return handle;
        }
        if let Some(prev) = self.arena.get(child).and_then(|n| n.widget.parent()) {
            log::debug!("add_child: moving child out of previous parent");
            self.remove_child(prev, child);
        }
        {
            let Some(node) = self.arena.get_mut(parent) else {
                return handle;
            };
            let Control::Container(container) = &mut node.control else {
                log::warn!("add_child: parent is not a container, ignoring");
                return handle;
            };
            container.children.push(child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.widget.parent = Some(parent);
        }
        self.request_relayout(parent);
        handle
    }

    /// Remove `child` from `parent`'s list. Scans by identity; silent no-op
    /// when the child is not a member. The detached node stays in the arena,
    /// handed back to the caller's control.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        {
            let Some(node) = self.arena.get_mut(parent) else {
                return;
            };
            let Control::Container(container) = &mut node.control else {
                return;
            };
            let Some(index) = container.children.iter().position(|&c| c == child) else {
                return;
            };
            container.children.remove(index);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.widget.parent = None;
        }
        self.request_relayout(parent);
    }

    /// Destroy `id` and its whole subtree, detaching it from its parent first.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.arena.get(id).and_then(|n| n.widget.parent()) {
            if let Some(node) = self.arena.get_mut(parent) {
                match &mut node.control {
                    Control::Container(c) => c.children.retain(|&c2| c2 != id),
                    Control::Scroll(s) => {
                        if s.content == Some(id) {
                            s.content = None;
                        }
                    }
                    Control::Leaf(_) => {}
                }
            }
            self.request_relayout(parent);
        }

        let mut doomed = Vec::new();
        self.collect_subtree(id, &mut doomed);
        log::debug!("removing subtree of {} node(s)", doomed.len());
        for nid in doomed {
            self.arena.remove(nid);
        }
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        let Some(node) = self.arena.get(id) else {
            return;
        };
        match &node.control {
            Control::Container(c) => {
                for &child in &c.children {
                    self.collect_subtree(child, out);
                }
            }
            Control::Scroll(s) => {
                if let Some(content) = s.content {
                    self.collect_subtree(content, out);
                }
            }
            Control::Leaf(_) => {}
        }
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id)
    }

    pub fn widget(&self, id: NodeId) -> Option<&Widget> {
        self.arena.get(id).map(|n| &n.widget)
    }

    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        self.arena.get_mut(id).map(|n| &mut n.widget)
    }

    pub fn container(&self, id: NodeId) -> Option<&Container> {
        match self.arena.get(id)?.control {
            Control::Container(ref c) => Some(c),
            _ => None,
        }
    }

    pub fn container_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        match self.arena.get_mut(id)?.control {
            Control::Container(ref mut c) => Some(c),
            _ => None,
        }
    }

    pub fn scroll(&self, id: NodeId) -> Option<&ScrollContainer> {
        match self.arena.get(id)?.control {
            Control::Scroll(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn scroll_mut(&mut self, id: NodeId) -> Option<&mut ScrollContainer> {
        match self.arena.get_mut(id)?.control {
            Control::Scroll(ref mut s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self, id: NodeId) -> Option<ControlKind> {
        self.arena.get(id).map(|n| match n.control {
            Control::Container(_) => ControlKind::Container,
            Control::Scroll(_) => ControlKind::Scroll,
            Control::Leaf(_) => ControlKind::Leaf,
        })
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Flood the relayout invalidation through the subtree rooted at `id`:
    /// every container's strategy is marked dirty and every relayout-aware
    /// leaf is notified, exactly once per call. Deliberately over-invalidates;
    /// one structural change dirties the whole visible subtree so the next
    /// layout pass recomputes everything affected.
    pub fn request_relayout(&mut self, id: NodeId) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        match &mut node.control {
            Control::Container(container) => {
                if let Some(layout) = &mut container.layout {
                    layout.mark_dirty();
                }
                let children: Vec<NodeId> = container.children.clone();
                for child in children {
                    self.request_relayout(child);
                }
            }
            Control::Scroll(scroll) => {
                let content = scroll.content;
                if let Some(content) = content {
                    self.request_relayout(content);
                }
            }
            Control::Leaf(leaf) => leaf.relayout(),
        }
    }

    // ------------------------------------------------------------------
    // Sizing and placement
    // ------------------------------------------------------------------

    /// Declared preferred size of `id`. `None` means the node declares none
    /// and the caller applies the 50×50 fallback. Containers and scroll
    /// containers always answer (with their own fallbacks baked in).
    pub fn preferred_size(&mut self, id: NodeId) -> Option<Size> {
        match self.kind(id)? {
            ControlKind::Container => Some(self.container_preferred_size(id)),
            ControlKind::Scroll => Some(self.scroll_preferred_size(id)),
            ControlKind::Leaf => match &self.arena.get(id)?.control {
                Control::Leaf(leaf) => leaf.preferred_size(),
                _ => None,
            },
        }
    }

    /// Commit a node's bounding rectangle. Children are positioned lazily
    /// during the next render.
    pub fn set_location(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.arena.get_mut(id) {
            node.widget.rect = rect;
        }
    }

    // ------------------------------------------------------------------
    // Render
    // ------------------------------------------------------------------

    /// Render the subtree rooted at `root`, then drain deferred render work
    /// (including work deferred while draining) within the same call.
    pub fn render(&mut self, root: NodeId, surface: &mut dyn Surface) {
        let mut deferred = RenderQueue::new();
        self.render_node(root, surface, &mut deferred);
        while let Some(id) = deferred.pop() {
            self.render_node(id, surface, &mut deferred);
        }
    }

    /// Render a single node (and its subtree) without draining the deferred
    /// queue. Drivers rendering several roots share one queue across them.
    pub fn render_node(&mut self, id: NodeId, surface: &mut dyn Surface, deferred: &mut RenderQueue) {
        match self.kind(id) {
            Some(ControlKind::Container) => self.render_container(id, surface, deferred),
            Some(ControlKind::Scroll) => self.render_scroll(id, surface, deferred),
            Some(ControlKind::Leaf) => {
                let Some(node) = self.arena.get_mut(id) else {
                    return;
                };
                let Node { widget, control } = node;
                if let Control::Leaf(leaf) = control {
                    leaf.render(widget, surface, deferred);
                }
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Input layers
    // ------------------------------------------------------------------

    /// Walk the subtree and register input layers with the external engine's
    /// stack, then drain deferred setup work queued along the way. Containers
    /// are transparent; scroll containers elevate their content viewport.
    pub fn setup_input_layers(&mut self, root: NodeId, layers: &mut LayerStack) {
        let mut deferred = SetupQueue::new();
        self.setup_node_layers(root, layers, &mut deferred);
        while let Some(id) = deferred.pop() {
            self.setup_node_layers(id, layers, &mut deferred);
        }
    }

    pub(crate) fn setup_node_layers(
        &mut self,
        id: NodeId,
        layers: &mut LayerStack,
        deferred: &mut SetupQueue,
    ) {
        match self.kind(id) {
            Some(ControlKind::Container) => {
                let children: Vec<NodeId> = match self.container(id) {
                    Some(c) => c.children.clone(),
                    None => return,
                };
                for child in children {
                    self.setup_node_layers(child, layers, deferred);
                }
            }
            Some(ControlKind::Scroll) => self.setup_scroll_layers(id, layers, deferred),
            Some(ControlKind::Leaf) => {
                let Some(node) = self.arena.get_mut(id) else {
                    return;
                };
                let Node { widget, control } = node;
                if let Control::Leaf(leaf) = control {
                    leaf.setup_input_layer(widget, layers, deferred);
                }
            }
            None => {}
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
