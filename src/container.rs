//! Generic child-owning container.
//!
//! A container keeps an ordered child list (paint order: first added = bottom
//! of the z-stack), delegates sizing and placement to a pluggable
//! [`Layouter`], and draws an optional nine-slice background stretched to its
//! committed rectangle. It registers no input layer of its own, so input
//! routing passes straight through to children.

use crate::geometry::Size;
use crate::layout::Layouter;
use crate::surface::{NineSlice, Surface};
use crate::tree::{Control, FALLBACK_SIZE, NodeId, RenderQueue, Tree};

pub struct Container {
    /// Background drawn stretched to the container rectangle, below children.
    pub background: Option<NineSlice>,
    /// Propagate this container's disabled flag to every direct child on each
    /// render.
    pub auto_disable_children: bool,
    pub(crate) layout: Option<Box<dyn Layouter>>,
    pub(crate) children: Vec<NodeId>,
}

impl Container {
    /// An empty container with no layout strategy. Renders its background and
    /// children at whatever rectangles were last committed.
    pub fn new() -> Self {
        Self {
            background: None,
            auto_disable_children: false,
            layout: None,
            children: Vec::new(),
        }
    }

    pub fn with_layout(layout: impl Layouter + 'static) -> Self {
        Self {
            layout: Some(Box::new(layout)),
            ..Self::new()
        }
    }

    /// Child ids in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Aggregate preferred size: delegated to the layout strategy, 50×50 when
    /// none is set. Pure with respect to child geometry.
    pub(crate) fn container_preferred_size(&mut self, id: NodeId) -> Size {
        let (mut layout, children) = {
            let Some(container) = self.container_mut(id) else {
                return FALLBACK_SIZE;
            };
            match container.layout.take() {
                Some(layout) => (layout, container.children.clone()),
                None => return FALLBACK_SIZE,
            }
        };
        let size = layout.preferred_size(self, &children);
        if let Some(container) = self.container_mut(id) {
            container.layout = Some(layout);
        }
        size
    }

    /// Container render. The step order is load-bearing: disable propagation,
    /// then layout, then the widget-level draw path, then background, then
    /// children in list order.
    pub(crate) fn render_container(
        &mut self,
        id: NodeId,
        surface: &mut dyn Surface,
        deferred: &mut RenderQueue,
    ) {
        let (auto_disable, disabled, rect, children) = {
            let Some(node) = self.arena.get(id) else {
                return;
            };
            let Control::Container(container) = &node.control else {
                return;
            };
            (
                container.auto_disable_children,
                node.widget.disabled,
                node.widget.rect,
                container.children.clone(),
            )
        };

        // 1. Disabled state fans out to direct children before anything is
        //    measured or painted.
        if auto_disable {
            for &child in &children {
                if let Some(node) = self.arena.get_mut(child) {
                    node.widget.disabled = disabled;
                }
            }
        }

        // 2. Position children. Skipped entirely without a strategy; the
        //    strategy itself may skip via its dirty cache.
        let layout = self.container_mut(id).and_then(|c| c.layout.take());
        if let Some(mut layout) = layout {
            layout.layout(self, &children, rect);
            if let Some(container) = self.container_mut(id) {
                container.layout = Some(layout);
            }
        }

        // 3. Widget-level draw path: resolve this node's draw options (origin
        //    translation plus the transform hook), read at draw time.
        let (opts, rect, background) = {
            let Some(node) = self.arena.get(id) else {
                return;
            };
            let background = match &node.control {
                Control::Container(c) => c.background,
                _ => None,
            };
            (node.widget.draw_options(), node.widget.rect, background)
        };

        // 4. Background, stretched to the container rectangle.
        if let Some(background) = background {
            surface.draw_nine_slice(&background, rect.width, rect.height, &opts);
        }

        // 5. Children, first added painted first.
        for &child in &children {
            self.render_node(child, surface, deferred);
        }
    }
}
