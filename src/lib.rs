//! Retained-mode widget-tree core: containers, pluggable layout, masked
//! scrolling, and input-layer elevation, driven once per frame by a host
//! render loop. Drawing primitives, the input engine, and leaf widgets are
//! external collaborators behind the `surface`, `input`, and `tree::Leaf`
//! boundaries.

pub mod container;
pub mod events;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod scroll;
pub mod surface;
pub mod tree;
pub mod widget;

pub use container::Container;
pub use events::EventQueue;
pub use geometry::{Edges, Rect, Size};
pub use input::{EventTypes, Layer, LayerStack, RectFunc, SetupQueue};
pub use layout::{Axis, Layouter, StackLayout};
pub use scroll::{ScrollContainer, ScrollImages};
pub use surface::{BufferedSurface, CompositeMode, DrawOptions, NineSlice, Surface, TextureId};
pub use tree::{Control, Leaf, Node, NodeId, RemoveChild, RenderQueue, Tree};
pub use widget::{RenderTransform, Widget};
