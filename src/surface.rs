//! Drawing collaborator boundary.
//!
//! The tree never touches pixels. It issues nine-slice draws and buffer
//! composites against the [`Surface`] trait; the graphics backend behind it
//! owns rasterization, texture sampling, and blend state. The composite modes
//! assume premultiplied-alpha surfaces with a straight-coverage mask: `Copy`
//! replaces destination pixels including alpha, `SourceIn` keeps source pixels
//! only where the destination is opaque.

use crate::geometry::{Edges, Size};

/// Porter-Duff composite modes the scroll mask pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Ordinary alpha blending.
    #[default]
    SourceOver,
    /// Replace destination pixels, alpha included. Establishes the stencil.
    Copy,
    /// Keep source pixels only where the destination is opaque.
    SourceIn,
}

/// Options applied to a single draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    /// Translation applied to the draw, in screen pixels.
    pub translate: (i32, i32),
    /// Alpha multiplier in [0, 1].
    pub alpha: f32,
    pub composite: CompositeMode,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            translate: (0, 0),
            alpha: 1.0,
            composite: CompositeMode::SourceOver,
        }
    }
}

/// Handle to a texture owned by the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureId(pub u32);

/// Nine-slice image descriptor. The border regions given by `border` draw at
/// fixed size; the center region stretches to fill the target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NineSlice {
    pub texture: TextureId,
    pub border: Edges,
}

impl NineSlice {
    pub fn new(texture: TextureId, border: Edges) -> Self {
        Self { texture, border }
    }
}

/// A draw target. Implemented by the real output surface and by offscreen
/// buffers; [`Surface::new_buffer`] allocates a buffer compatible with the
/// receiver so scroll containers can render content off to the side.
pub trait Surface {
    fn size(&self) -> Size;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Draw `slice` stretched to `width` × `height` at the options' translation.
    fn draw_nine_slice(&mut self, slice: &NineSlice, width: i32, height: i32, opts: &DrawOptions);

    /// Composite another surface onto this one.
    fn draw_surface(&mut self, src: &dyn Surface, opts: &DrawOptions);

    /// Allocate an offscreen buffer compatible with this surface.
    fn new_buffer(&self, size: Size) -> Box<dyn Surface>;
}

/// Lazily allocated offscreen buffer. Holds nothing until first acquired;
/// reallocates whenever the requested size changes.
#[derive(Default)]
pub struct BufferedSurface {
    surface: Option<Box<dyn Surface>>,
}

impl BufferedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer sized to `size`, allocating via `like` when missing or when
    /// the size changed since the last frame. Contents are not cleared here.
    pub fn acquire(&mut self, like: &dyn Surface, size: Size) -> &mut dyn Surface {
        if self.surface.as_ref().is_some_and(|s| s.size() != size) {
            self.surface = None;
        }
        self.surface
            .get_or_insert_with(|| {
                log::debug!("allocating {}x{} offscreen buffer", size.width, size.height);
                like.new_buffer(size)
            })
            .as_mut()
    }

    /// The current buffer, if one has been acquired this session.
    pub fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }
}
