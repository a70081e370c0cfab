//! Pluggable layout strategies.
//!
//! A [`Layouter`] computes an aggregate preferred size for a child list and
//! positions each child inside the container rectangle. Strategies may cache
//! placement behind a dirty flag; the container promises to call
//! [`Layouter::mark_dirty`] on every structural change, nothing more. A
//! strategy that ignores dirty marking is a strategy bug, not a container bug.

use crate::geometry::{Rect, Size};
use crate::tree::{FALLBACK_SIZE, NodeId, Tree};

pub trait Layouter {
    /// Aggregate preferred size of `children` under this strategy. Must be a
    /// pure function of the children's own preferred sizes.
    fn preferred_size(&mut self, tree: &mut Tree, children: &[NodeId]) -> Size;

    /// Position every child inside `rect`. Pure side effect on the children's
    /// rectangles; no return.
    fn layout(&mut self, tree: &mut Tree, children: &[NodeId], rect: Rect);

    /// Invalidate cached placement. Default: stateless strategy, nothing to do.
    fn mark_dirty(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Reference strategy: children stacked along one axis at their preferred
/// sizes with a fixed pixel gap. Placement is cached and recomputed only when
/// marked dirty or when the container rectangle changed since the last pass.
pub struct StackLayout {
    axis: Axis,
    gap: i32,
    dirty: bool,
    last_rect: Option<Rect>,
}

impl StackLayout {
    pub fn new(axis: Axis, gap: i32) -> Self {
        Self {
            axis,
            gap,
            dirty: true,
            last_rect: None,
        }
    }
}

impl Layouter for StackLayout {
    fn preferred_size(&mut self, tree: &mut Tree, children: &[NodeId]) -> Size {
        let mut main = 0;
        let mut cross = 0;
        for &child in children {
            let size = tree.preferred_size(child).unwrap_or(FALLBACK_SIZE);
            match self.axis {
                Axis::Horizontal => {
                    main += size.width;
                    cross = cross.max(size.height);
                }
                Axis::Vertical => {
                    main += size.height;
                    cross = cross.max(size.width);
                }
            }
        }
        if children.len() > 1 {
            main += self.gap * (children.len() as i32 - 1);
        }
        match self.axis {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    fn layout(&mut self, tree: &mut Tree, children: &[NodeId], rect: Rect) {
        if !self.dirty && self.last_rect == Some(rect) {
            return;
        }
        let mut cursor = 0;
        for &child in children {
            let size = tree.preferred_size(child).unwrap_or(FALLBACK_SIZE);
            let child_rect = match self.axis {
                Axis::Horizontal => Rect::new(rect.x + cursor, rect.y, size.width, size.height),
                Axis::Vertical => Rect::new(rect.x, rect.y + cursor, size.width, size.height),
            };
            tree.set_location(child, child_rect);
            cursor += match self.axis {
                Axis::Horizontal => size.width,
                Axis::Vertical => size.height,
            } + self.gap;
        }
        self.dirty = false;
        self.last_rect = Some(rect);
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
