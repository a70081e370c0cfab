//! Shared test doubles: a recording surface that logs every draw operation
//! across the screen and all offscreen buffers in global order, probe leaves
//! that paint identifiable nine-slices, and a counting layout strategy.

#![allow(dead_code)] // Each test binary uses a subset of the doubles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis::{
    CompositeMode, DrawOptions, Edges, Layouter, Leaf, NineSlice, NodeId, Rect, RenderQueue, Size,
    Surface, TextureId, Tree, Widget,
};

/// Initialize test logging once per binary.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One recorded operation, tagged with the surface it targeted.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Allocate {
        surface: String,
        size: Size,
    },
    Clear {
        surface: String,
    },
    NineSlice {
        surface: String,
        texture: u32,
        width: i32,
        height: i32,
        translate: (i32, i32),
        alpha: f32,
        composite: CompositeMode,
    },
    Blit {
        surface: String,
        composite: CompositeMode,
    },
}

pub type OpLog = Rc<RefCell<Vec<Op>>>;

/// Surface double. Buffers allocated through [`Surface::new_buffer`] share the
/// creator's log, so cross-surface ordering is observable in one place.
pub struct RecordingSurface {
    name: String,
    size: Size,
    log: OpLog,
    buffer_counter: Rc<Cell<u32>>,
}

impl RecordingSurface {
    /// The "real" output surface, named `screen`.
    pub fn screen(size: Size) -> (Self, OpLog) {
        let log: OpLog = Rc::new(RefCell::new(Vec::new()));
        let surface = Self {
            name: "screen".to_string(),
            size,
            log: Rc::clone(&log),
            buffer_counter: Rc::new(Cell::new(0)),
        };
        (surface, log)
    }

    /// Simulate a window resize between frames.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.log.borrow_mut().push(Op::Clear {
            surface: self.name.clone(),
        });
    }

    fn draw_nine_slice(&mut self, slice: &NineSlice, width: i32, height: i32, opts: &DrawOptions) {
        self.log.borrow_mut().push(Op::NineSlice {
            surface: self.name.clone(),
            texture: slice.texture.0,
            width,
            height,
            translate: opts.translate,
            alpha: opts.alpha,
            composite: opts.composite,
        });
    }

    fn draw_surface(&mut self, _src: &dyn Surface, opts: &DrawOptions) {
        self.log.borrow_mut().push(Op::Blit {
            surface: self.name.clone(),
            composite: opts.composite,
        });
    }

    fn new_buffer(&self, size: Size) -> Box<dyn Surface> {
        let n = self.buffer_counter.get();
        self.buffer_counter.set(n + 1);
        let name = format!("buffer{n}");
        self.log.borrow_mut().push(Op::Allocate {
            surface: name.clone(),
            size,
        });
        Box::new(RecordingSurface {
            name,
            size,
            log: Rc::clone(&self.log),
            buffer_counter: Rc::clone(&self.buffer_counter),
        })
    }
}

/// Textures of nine-slice draws that hit the named surface, in order.
pub fn nine_slices_on(log: &OpLog, surface: &str) -> Vec<u32> {
    log.borrow()
        .iter()
        .filter_map(|op| match op {
            Op::NineSlice {
                surface: s,
                texture,
                ..
            } if s == surface => Some(*texture),
            _ => None,
        })
        .collect()
}

/// Leaf that paints one identifiable nine-slice at its committed rectangle.
pub struct ProbeLeaf {
    pub texture: u32,
    pub size: Option<Size>,
}

impl Leaf for ProbeLeaf {
    fn render(&mut self, widget: &Widget, surface: &mut dyn Surface, _deferred: &mut RenderQueue) {
        surface.draw_nine_slice(
            &NineSlice::new(TextureId(self.texture), Edges::ZERO),
            widget.rect.width,
            widget.rect.height,
            &widget.draw_options(),
        );
    }

    fn preferred_size(&self) -> Option<Size> {
        self.size
    }
}

/// Layout-hint node keeping every capability default: paints nothing,
/// declares no size.
pub struct Spacer;

impl Leaf for Spacer {}

/// Strategy double counting dirty marks and layout passes.
pub struct CountingLayout {
    pub dirty_marks: Rc<Cell<u32>>,
    pub layout_calls: Rc<Cell<u32>>,
}

impl CountingLayout {
    pub fn new() -> (Self, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let dirty_marks = Rc::new(Cell::new(0));
        let layout_calls = Rc::new(Cell::new(0));
        (
            Self {
                dirty_marks: Rc::clone(&dirty_marks),
                layout_calls: Rc::clone(&layout_calls),
            },
            dirty_marks,
            layout_calls,
        )
    }
}

impl Layouter for CountingLayout {
    fn preferred_size(&mut self, _tree: &mut Tree, _children: &[NodeId]) -> Size {
        Size::new(0, 0)
    }

    fn layout(&mut self, _tree: &mut Tree, _children: &[NodeId], _rect: Rect) {
        self.layout_calls.set(self.layout_calls.get() + 1);
    }

    fn mark_dirty(&mut self) {
        self.dirty_marks.set(self.dirty_marks.get() + 1);
    }
}
