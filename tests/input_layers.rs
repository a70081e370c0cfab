//! Input-layer elevation: wheel passthrough, blocking, nesting, and live
//! hit-test rectangles.

mod common;

use common::ProbeLeaf;
use trellis::{
    Container, Edges, EventTypes, LayerStack, NineSlice, NodeId, Rect, ScrollContainer,
    ScrollImages, Size, TextureId, Tree,
};

fn images() -> ScrollImages {
    ScrollImages {
        idle: None,
        disabled: None,
        mask: NineSlice::new(TextureId(3), Edges::ZERO),
    }
}

fn scroll_with_probe(tree: &mut Tree, rect: Rect) -> NodeId {
    let content = tree.insert_leaf(ProbeLeaf {
        texture: 7,
        size: Some(Size::new(300, 300)),
    });
    let scroll = tree.insert_scroll(ScrollContainer::new(images(), Edges::ZERO), Some(content));
    tree.set_location(scroll, rect);
    scroll
}

#[test]
fn elevated_layer_never_claims_wheel() {
    let mut tree = Tree::new();
    let scroll = scroll_with_probe(&mut tree, Rect::new(10, 10, 100, 100));

    let mut stack = LayerStack::new();
    tree.setup_input_layers(scroll, &mut stack);

    assert_eq!(stack.layers().len(), 1);
    let layer = &stack.layers()[0];
    assert_eq!(layer.debug_label, "scroll container content");
    assert!(!layer.event_types.contains(EventTypes::WHEEL));
    assert!(layer.event_types.contains(EventTypes::MOUSE_BUTTON));
    assert!(layer.event_types.contains(EventTypes::TOUCH));
    assert!(layer.block_lower);
    assert!(!layer.full_screen);

    // Wheel inside the viewport falls all the way through to base routing,
    // where the scroll container itself handles the gesture.
    assert!(stack.active_layer(&tree, 50, 50, EventTypes::WHEEL).is_none());
    assert!(stack.deliver_to(&tree, 50, 50, EventTypes::WHEEL).is_empty());
    // Pointer input inside the viewport is claimed.
    assert!(stack.active_layer(&tree, 50, 50, EventTypes::MOUSE_BUTTON).is_some());
}

#[test]
fn hit_test_rect_is_queried_live() {
    let mut tree = Tree::new();
    let content = tree.insert_leaf(ProbeLeaf {
        texture: 7,
        size: Some(Size::new(300, 300)),
    });
    let scroll = tree.insert_scroll(ScrollContainer::new(images(), Edges::all(4)), Some(content));
    tree.set_location(scroll, Rect::new(10, 10, 100, 100));

    let mut stack = LayerStack::new();
    tree.setup_input_layers(scroll, &mut stack);

    let layer = &stack.layers()[0];
    assert_eq!(layer.rect(&tree), Rect::new(14, 14, 92, 92));

    // Geometry moves after setup; the registered rectangle tracks it without
    // re-registration.
    tree.set_location(scroll, Rect::new(200, 0, 50, 50));
    assert_eq!(layer.rect(&tree), Rect::new(204, 4, 42, 42));
    assert!(!layer.active_for(&tree, 50, 50, EventTypes::MOUSE_BUTTON));
    assert!(layer.active_for(&tree, 220, 20, EventTypes::MOUSE_BUTTON));
}

#[test]
fn innermost_scroll_region_wins_inside_its_viewport() {
    let mut tree = Tree::new();

    // Outer scroll whose content is a container holding an inner scroll.
    let inner = scroll_with_probe(&mut tree, Rect::new(10, 10, 50, 50));
    let holder = tree.insert_container(Container::new());
    tree.add_child(holder, inner);
    let outer = tree.insert_scroll(ScrollContainer::new(images(), Edges::ZERO), Some(holder));
    tree.set_location(outer, Rect::new(0, 0, 100, 100));

    let mut stack = LayerStack::new();
    tree.setup_input_layers(outer, &mut stack);

    // Outer registers first, inner stacks on top of it.
    assert_eq!(stack.layers().len(), 2);
    assert_eq!(stack.layers()[0].rect(&tree), Rect::new(0, 0, 100, 100));
    assert_eq!(stack.layers()[1].rect(&tree), Rect::new(10, 10, 50, 50));

    // Inside the inner viewport the inner layer wins and blocks the outer.
    let winner = stack
        .active_layer(&tree, 20, 20, EventTypes::MOUSE_BUTTON)
        .expect("layer claims the point");
    assert!(std::ptr::eq(winner, &stack.layers()[1]));
    assert_eq!(stack.deliver_to(&tree, 20, 20, EventTypes::MOUSE_BUTTON).len(), 1);

    // Outside the inner viewport but inside the outer one, the outer wins.
    let winner = stack
        .active_layer(&tree, 80, 80, EventTypes::MOUSE_BUTTON)
        .expect("layer claims the point");
    assert!(std::ptr::eq(winner, &stack.layers()[0]));

    // Wheel is claimed by neither.
    assert!(stack.active_layer(&tree, 20, 20, EventTypes::WHEEL).is_none());
}

#[test]
fn containers_are_transparent_to_input_routing() {
    let mut tree = Tree::new();
    let root = tree.insert_container(Container::new());
    let child = tree.insert_container(Container::new());
    let leaf = tree.insert_leaf(ProbeLeaf {
        texture: 1,
        size: None,
    });
    tree.add_child(root, child);
    tree.add_child(child, leaf);

    let mut stack = LayerStack::new();
    tree.setup_input_layers(root, &mut stack);

    assert!(stack.layers().is_empty());
}

#[test]
fn setup_pass_rebuilds_the_stack_each_frame() {
    let mut tree = Tree::new();
    let scroll = scroll_with_probe(&mut tree, Rect::new(10, 10, 100, 100));

    let mut stack = LayerStack::new();
    tree.setup_input_layers(scroll, &mut stack);
    assert_eq!(stack.layers().len(), 1);

    // Next frame: the driver clears and the setup pass re-registers; no
    // duplicate accumulation.
    stack.begin_frame();
    assert!(stack.layers().is_empty());
    tree.setup_input_layers(scroll, &mut stack);
    assert_eq!(stack.layers().len(), 1);
}

#[test]
fn contentless_scroll_registers_nothing() {
    let mut tree = Tree::new();
    let scroll = tree.insert_scroll(ScrollContainer::new(images(), Edges::ZERO), None);
    tree.set_location(scroll, Rect::new(0, 0, 100, 100));

    let mut stack = LayerStack::new();
    tree.setup_input_layers(scroll, &mut stack);

    assert!(stack.layers().is_empty());
}
