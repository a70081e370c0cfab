//! Scrolling/masking container.
//!
//! Holds exactly one content node and a pair of normalized scroll fractions.
//! Every render recomputes the virtual content rectangle from the content's
//! preferred size, offsets it proportionally to the overflow, renders the
//! content into a private full-screen buffer, stencils it through a nine-slice
//! mask, and composites the result into the viewport. The content subtree is
//! elevated into its own blocking input layer for everything except wheel
//! events, which stay with the scroll container itself.

use std::mem;

use crate::geometry::{Edges, Rect, Size};
use crate::input::{EventTypes, Layer, LayerStack, SetupQueue};
use crate::surface::{BufferedSurface, CompositeMode, DrawOptions, NineSlice, Surface};
use crate::tree::{Control, FALLBACK_SIZE, NodeId, RenderQueue, Tree};

/// Alpha applied to the idle image when the container is disabled and no
/// disabled-specific image was supplied.
const DISABLED_ALPHA: f32 = 0.35;

/// Idle/disabled/mask image triple. The mask is required: without a stencil
/// the composite pipeline has nothing to clip against.
#[derive(Debug, Clone, Copy)]
pub struct ScrollImages {
    pub idle: Option<NineSlice>,
    pub disabled: Option<NineSlice>,
    pub mask: NineSlice,
}

pub struct ScrollContainer {
    /// Horizontal scroll fraction: 0 = content start flush with the viewport
    /// start, 1 = content end flush with the viewport end. Clamped to [0, 1]
    /// at the top of every render, before any read.
    pub scroll_left: f32,
    /// Vertical scroll fraction, same convention.
    pub scroll_top: f32,
    /// Widen the content rectangle to the viewport width when the content's
    /// preferred width is narrower.
    pub stretch_content_width: bool,
    pub(crate) images: ScrollImages,
    pub(crate) padding: Edges,
    pub(crate) content: Option<NodeId>,
    pub(crate) render_buf: BufferedSurface,
    pub(crate) masked_buf: BufferedSurface,
}

impl ScrollContainer {
    pub fn new(images: ScrollImages, padding: Edges) -> Self {
        Self {
            scroll_left: 0.0,
            scroll_top: 0.0,
            stretch_content_width: false,
            images,
            padding,
            content: None,
            render_buf: BufferedSurface::new(),
            masked_buf: BufferedSurface::new(),
        }
    }

    /// The content node, fixed at insertion.
    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    pub fn padding(&self) -> Edges {
        self.padding
    }

    pub fn images(&self) -> &ScrollImages {
        &self.images
    }
}

impl Tree {
    /// Viewport rectangle after padding: the scroll offset math and the input
    /// layer's live hit-test region both derive from it. For non-scroll nodes
    /// this is the plain widget rectangle.
    pub fn content_rect(&self, id: NodeId) -> Rect {
        let Some(node) = self.arena.get(id) else {
            return Rect::default();
        };
        match &node.control {
            Control::Scroll(scroll) => scroll.padding.apply(node.widget.rect),
            _ => node.widget.rect,
        }
    }

    /// Content preferred size plus padding; 50×50 when there is no content or
    /// the content declares no size.
    pub(crate) fn scroll_preferred_size(&mut self, id: NodeId) -> Size {
        let (content, padding) = match self.scroll(id) {
            Some(scroll) => (scroll.content, scroll.padding),
            None => return FALLBACK_SIZE,
        };
        let Some(content) = content else {
            return FALLBACK_SIZE;
        };
        match self.preferred_size(content) {
            Some(size) => Size::new(
                size.width + padding.horizontal(),
                size.height + padding.vertical(),
            ),
            None => FALLBACK_SIZE,
        }
    }

    /// Scroll render pipeline. The step order is fixed: clamp, background,
    /// content sizing, offset, placement, offscreen render, mask composite,
    /// final blit.
    pub(crate) fn render_scroll(
        &mut self,
        id: NodeId,
        surface: &mut dyn Surface,
        deferred: &mut RenderQueue,
    ) {
        // 1. Clamp before any read of the fractions.
        let (rect, disabled, mut opts, images, padding, stretch, content, scroll_left, scroll_top) = {
            let Some(node) = self.arena.get_mut(id) else {
                return;
            };
            let Control::Scroll(scroll) = &mut node.control else {
                return;
            };
            scroll.scroll_left = scroll.scroll_left.clamp(0.0, 1.0);
            scroll.scroll_top = scroll.scroll_top.clamp(0.0, 1.0);
            (
                node.widget.rect,
                node.widget.disabled,
                node.widget.draw_options(),
                scroll.images,
                scroll.padding,
                scroll.stretch_content_width,
                scroll.content,
                scroll.scroll_left,
                scroll.scroll_top,
            )
        };

        // 2. Background: the disabled image when supplied, otherwise the idle
        //    image faded to 35% alpha as the disabled signal.
        let image = if disabled && images.disabled.is_some() {
            images.disabled
        } else {
            images.idle
        };
        if disabled && images.disabled.is_none() {
            opts.alpha *= DISABLED_ALPHA;
        }
        if let Some(image) = image {
            surface.draw_nine_slice(&image, rect.width, rect.height, &opts);
        }

        let Some(content) = content else {
            return;
        };
        let viewport = padding.apply(rect);

        // 3. Content sizing, with the universal 50×50 fallback.
        let pref = self.preferred_size(content).unwrap_or(FALLBACK_SIZE);
        let mut content_w = pref.width;
        let content_h = pref.height;
        if stretch && content_w < viewport.width {
            content_w = viewport.width;
        }

        // 4. Pixel offset proportional to the overflow. Content that fits an
        //    axis never moves on that axis, whatever the fraction says.
        let offset_x = ((content_w - viewport.width).max(0) as f32 * scroll_left).round() as i32;
        let offset_y = ((content_h - viewport.height).max(0) as f32 * scroll_top).round() as i32;

        // 5. Commit the content rectangle; nested containers relayout against
        //    the new geometry.
        self.set_location(
            content,
            Rect::new(
                rect.x + padding.left - offset_x,
                rect.y + padding.top - offset_y,
                content_w,
                content_h,
            ),
        );
        self.request_relayout(content);

        // 6. Render the content into a private buffer sized to the whole
        //    output surface. Content rectangles are screen space, so a
        //    full-screen buffer makes them valid without remapping.
        let screen = surface.size();
        let (mut render_buf, mut masked_buf) = {
            let Some(scroll) = self.scroll_mut(id) else {
                return;
            };
            (
                mem::take(&mut scroll.render_buf),
                mem::take(&mut scroll.masked_buf),
            )
        };
        {
            let buf = render_buf.acquire(surface, screen);
            buf.clear();
            self.render_node(content, buf, deferred);
        }

        // 7. Stencil, then composite: the mask replaces destination pixels
        //    (Copy), then the rendered content survives only where the mask is
        //    opaque (SourceIn).
        {
            let buf = masked_buf.acquire(surface, screen);
            buf.clear();
            buf.draw_nine_slice(
                &images.mask,
                viewport.width,
                viewport.height,
                &DrawOptions {
                    translate: (viewport.x, viewport.y),
                    alpha: 1.0,
                    composite: CompositeMode::Copy,
                },
            );
            if let Some(rendered) = render_buf.surface() {
                buf.draw_surface(
                    rendered,
                    &DrawOptions {
                        composite: CompositeMode::SourceIn,
                        ..DrawOptions::default()
                    },
                );
            }
        }

        // 8. Final blit, unmodified.
        if let Some(masked) = masked_buf.surface() {
            surface.draw_surface(masked, &DrawOptions::default());
        }

        if let Some(scroll) = self.scroll_mut(id) {
            scroll.render_buf = render_buf;
            scroll.masked_buf = masked_buf;
        }
    }

    /// Elevate the content subtree into a fresh input layer scoped to the
    /// padded viewport. Wheel events are deliberately left out of the claim so
    /// scroll gestures reach this container instead of the content; the layer
    /// blocks anything underneath the viewport. Recursing into the content
    /// afterwards lets nested scroll regions stack their own layers on top,
    /// innermost winning.
    pub(crate) fn setup_scroll_layers(
        &mut self,
        id: NodeId,
        layers: &mut LayerStack,
        deferred: &mut SetupQueue,
    ) {
        let Some(content) = self.scroll(id).and_then(|s| s.content) else {
            return;
        };
        layers.push(Layer {
            debug_label: "scroll container content",
            event_types: EventTypes::all().difference(EventTypes::WHEEL),
            block_lower: true,
            full_screen: false,
            rect_func: Box::new(move |tree: &Tree| tree.content_rect(id)),
        });
        self.setup_node_layers(content, layers, deferred);
    }
}
