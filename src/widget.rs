//! The per-node positional/state record.

use std::any::Any;

use crate::geometry::Rect;
use crate::surface::DrawOptions;
use crate::tree::NodeId;

/// Hook adjusting the draw options a node uses for its own drawing, on top of
/// the default origin translation.
pub type RenderTransform = fn(&Widget, &mut DrawOptions);

/// State record embedded in every tree node. Owns no children; the parent
/// back-reference is a plain arena key, never followed for destruction.
pub struct Widget {
    /// Committed bounding rectangle, screen space.
    pub rect: Rect,
    pub disabled: bool,
    /// Opaque per-child payload read by layout strategies.
    pub layout_data: Option<Box<dyn Any>>,
    /// Optional render-transform hook applied by [`Widget::draw_options`].
    pub transform: Option<RenderTransform>,
    pub(crate) parent: Option<NodeId>,
}

impl Widget {
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            disabled: false,
            layout_data: None,
            transform: None,
            parent: None,
        }
    }

    /// The container this widget currently belongs to, if any. Consistent with
    /// exactly one child list at any time.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Draw options for anything this node draws itself: translation to the
    /// widget origin, then the transform hook.
    pub fn draw_options(&self) -> DrawOptions {
        let mut opts = DrawOptions {
            translate: (self.rect.x, self.rect.y),
            ..DrawOptions::default()
        };
        if let Some(transform) = self.transform {
            transform(self, &mut opts);
        }
        opts
    }
}

impl Default for Widget {
    fn default() -> Self {
        Self::new()
    }
}
