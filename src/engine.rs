//! Flex layout driver.
//!
//! Layout runs in two passes over the element tree. The measure pass flows
//! constraints down and sizes every in-flow element. The place pass walks the
//! tree again, turning relative offsets into absolute boxes. It also applies
//! scrolling, sizes and places absolutely positioned elements, and records
//! the retained per-id state queried between frames.

use std::mem;

use rustc_hash::FxHashMap;

use crate::config::EngineConfig;
use crate::elements::{Container, Element, ElementKind};
use crate::flex::{self, MainAxisCursor};
use crate::id::ElementId;
use crate::layout::{AbsoluteAnchor, AbsolutePlacement, Size};
use crate::math::{BoundingBox, Dimensions, Vector2};
use crate::sizing::{self, BoxConstraint};
use crate::text::TextMeasurer;

// ============================================================================
// Input
// ============================================================================

/// Pointer state collected by the caller for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// `None` when the pointer is outside the window.
    pub pointer: Option<Vector2>,
    pub pointer_down: bool,
    /// Wheel movement since the last frame. Positive values scroll toward the end.
    pub scroll_delta: f32,
}

impl FrameInput {
    pub fn pointer_at(position: impl Into<Vector2>) -> Self {
        Self {
            pointer: Some(position.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn pointer_down(&mut self, down: bool) -> &mut Self {
        self.pointer_down = down;
        self
    }

    #[inline]
    pub fn scroll_delta(&mut self, delta: f32) -> &mut Self {
        self.scroll_delta = delta;
        self
    }

    #[inline]
    pub fn end(&self) -> Self {
        *self
    }
}

// ============================================================================
// Measure pass
// ============================================================================

struct MeasurePass<'m> {
    scale: f32,
    measurer: &'m dyn TextMeasurer,
}

impl MeasurePass<'_> {
    /// Sizes `element` and its in-flow descendants inside `constraint`.
    fn measure(&self, element: &mut Element, constraint: BoxConstraint) -> Dimensions {
        let constraint = sizing::resolve(constraint, element.width, element.height, self.scale);
        let size = match &mut element.kind {
            ElementKind::Container(container) => self.measure_container(container, constraint),
            ElementKind::Text(text) => {
                text.layout = self
                    .measurer
                    .layout_text(&text.content, &text.config, constraint.max_width);
                constraint.constrain(Dimensions::new(text.layout.width, text.layout.height))
            }
            ElementKind::Image(image) => constraint.constrain(Dimensions::new(
                Size::dpi_aware(image.size.width, self.scale),
                Size::dpi_aware(image.size.height, self.scale),
            )),
        };
        element.size = size;
        size
    }

    fn measure_container(&self, container: &mut Container, constraint: BoxConstraint) -> Dimensions {
        let direction = container.direction;
        let padding = container.padding;
        let outer_main = if constraint.is_main_tight(direction) {
            constraint.main_min(direction)
        } else {
            constraint.main_max(direction)
        };
        // scroll content is not limited by the viewport it scrolls in
        let main = if container.scrollable {
            f32::INFINITY
        } else {
            (outer_main - padding.main(direction)).max(0.0)
        };
        let cross = (constraint.cross_max(direction) - padding.cross(direction)).max(0.0);
        let loose = BoxConstraint::from_axes(direction, (0.0, main), (0.0, cross));

        // Shrink children first, percentages only get what is left.
        let mut fixed = 0.0;
        let mut total_percent = 0.0;
        let mut count = 0;
        for child in container.children.iter_mut().filter(|c| c.in_flow()) {
            count += 1;
            match child.main_size(direction) {
                Size::Pixel(value) => fixed += Size::dpi_aware(value, self.scale),
                Size::Percent(percent) if main.is_finite() => total_percent += percent,
                Size::Percent(_) | Size::Shrink { .. } => {
                    fixed += self.measure(child, loose).main(direction);
                }
            }
        }

        let remaining = flex::remaining_space(main, fixed, container.gap, count);
        let unit = flex::percent_unit(remaining, total_percent);

        let mut content_main = flex::total_gap(container.gap, count);
        let mut content_cross: f32 = 0.0;
        for child in container.children.iter_mut().filter(|c| c.in_flow()) {
            let length = match child.main_size(direction) {
                Size::Pixel(value) => Some(Size::dpi_aware(value, self.scale)),
                Size::Percent(percent) if main.is_finite() => Some(percent * unit),
                Size::Percent(_) | Size::Shrink { .. } => None,
            };
            if let Some(length) = length {
                let tight = BoxConstraint::from_axes(direction, (length, length), (0.0, cross));
                self.measure(child, tight);
            }
            content_main += child.size.main(direction);
            content_cross = content_cross.max(child.size.cross(direction));
        }
        container.content_length = content_main;

        constraint.constrain(Dimensions::from_axes(
            direction,
            content_main + padding.main(direction),
            content_cross + padding.cross(direction),
        ))
    }
}

// ============================================================================
// Engine
// ============================================================================

/// State carried through the place pass.
struct PlaceContext<'p, 'm> {
    pass: &'p MeasurePass<'m>,
    input: FrameInput,
    /// Innermost scroll container under the pointer last frame.
    scroll_target: Option<ElementId>,
    previous_offsets: FxHashMap<ElementId, f32>,
    /// Boxes of the ancestors marked as anchors, innermost last.
    anchors: Vec<BoundingBox>,
}

/// Runs layout and keeps the state that survives between frames: scroll
/// offsets, the boxes of the last two frames and hover state.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    config: EngineConfig,
    scroll_offsets: FxHashMap<ElementId, f32>,
    /// Scrollable containers of the last frame in tree order, innermost last.
    scroll_containers: Vec<(ElementId, BoundingBox)>,
    boxes: FxHashMap<ElementId, BoundingBox>,
    previous_boxes: FxHashMap<ElementId, BoundingBox>,
    hovered: Vec<ElementId>,
    previous_hovered: Vec<ElementId>,
    pointer_down: bool,
    pointer_pressed: bool,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Lays out `root` inside `viewport` and updates the retained state.
    pub fn layout(
        &mut self,
        root: &mut Element,
        viewport: Dimensions,
        input: &FrameInput,
        measurer: &dyn TextMeasurer,
    ) {
        let _span = tracing::debug_span!("layout", width = viewport.width, height = viewport.height).entered();

        mem::swap(&mut self.boxes, &mut self.previous_boxes);
        self.boxes.clear();
        mem::swap(&mut self.hovered, &mut self.previous_hovered);
        self.hovered.clear();
        self.pointer_pressed = input.pointer_down && !self.pointer_down;
        self.pointer_down = input.pointer_down;

        let scroll_target = match input.pointer {
            Some(pointer) if input.scroll_delta != 0.0 => self
                .scroll_containers
                .iter()
                .rev()
                .find(|(_, bounds)| bounds.contains_point(pointer))
                .map(|(id, _)| *id),
            _ => None,
        };
        self.scroll_containers.clear();

        if root.hidden {
            return;
        }

        let pass = MeasurePass {
            scale: self.config.display_scale,
            measurer,
        };
        pass.measure(root, BoxConstraint::loose(viewport.width, viewport.height));

        let mut ctx = PlaceContext {
            pass: &pass,
            input: *input,
            scroll_target,
            previous_offsets: mem::take(&mut self.scroll_offsets),
            anchors: Vec::new(),
        };
        let screen = BoundingBox::from_parts(Vector2::ZERO, viewport);
        root.offset = Vector2::ZERO;
        self.place(root, Vector2::ZERO, screen, &mut ctx);
    }

    fn place(&mut self, element: &mut Element, position: Vector2, clip: BoundingBox, ctx: &mut PlaceContext) {
        let bounds = BoundingBox::from_parts(position, element.size);
        element.bounds = bounds;

        if let Some(id) = element.id {
            self.boxes.insert(id, bounds);
            if ctx
                .input
                .pointer
                .is_some_and(|p| bounds.contains_point(p) && clip.contains_point(p))
            {
                self.hovered.push(id);
            }
        }

        if let ElementKind::Container(container) = &mut element.kind {
            self.place_children(element.id, container, bounds, clip, ctx);
        }
    }

    fn place_children(
        &mut self,
        id: Option<ElementId>,
        container: &mut Container,
        bounds: BoundingBox,
        clip: BoundingBox,
        ctx: &mut PlaceContext,
    ) {
        let direction = container.direction;
        let padding = container.padding;
        let origin = bounds.position() + padding.origin();
        let main = bounds.size().main(direction) - padding.main(direction);
        let cross = bounds.size().cross(direction) - padding.cross(direction);
        let child_clip = if container.clips() {
            clip.intersect(&bounds)
        } else {
            clip
        };

        let scroll = if container.scrollable {
            self.update_scroll(id, bounds, container.content_length - main, ctx)
        } else {
            0.0
        };

        if container.anchor {
            ctx.anchors.push(bounds);
        }

        let count = container.children.iter().filter(|c| c.in_flow()).count();
        let mut cursor = MainAxisCursor::new(
            container.main_align,
            main - container.content_length,
            count,
            container.gap,
        );
        for child in container.children.iter_mut().filter(|c| c.in_flow()) {
            let main_offset = cursor.place(child.size.main(direction)) - scroll;
            let cross_offset = flex::cross_offset(container.cross_align, cross, child.size.cross(direction));
            child.offset = Vector2::from_axes(direction, main_offset, cross_offset);
            self.place(child, origin + child.offset, child_clip, ctx);
        }

        // Out-of-flow children are neither scrolled nor clipped by this container.
        for child in container.children.iter_mut().filter(|c| !c.hidden) {
            let Some(position) = child.absolute_placement().copied() else {
                continue;
            };
            let anchor = match position.anchor {
                AbsoluteAnchor::Parent => bounds,
                AbsoluteAnchor::NearestAnchor => ctx.anchors.last().copied().unwrap_or(bounds),
            };
            ctx.pass
                .measure(child, BoxConstraint::loose(anchor.width, anchor.height));
            let target = match position.placement {
                AbsolutePlacement::Manual(target) => target,
                AbsolutePlacement::Offsets {
                    left,
                    right,
                    top,
                    bottom,
                } => Vector2::new(
                    absolute_axis(anchor.x, anchor.width, left, right),
                    absolute_axis(anchor.y, anchor.height, top, bottom),
                ),
            };
            child.offset = target - origin;
            self.place(child, target, clip, ctx);
        }

        if container.anchor {
            ctx.anchors.pop();
        }
    }

    /// Advances and clamps the scroll offset of a container overflowing by `overflow`.
    fn update_scroll(
        &mut self,
        id: Option<ElementId>,
        bounds: BoundingBox,
        overflow: f32,
        ctx: &mut PlaceContext,
    ) -> f32 {
        // without an id there is nowhere to keep the offset
        let Some(id) = id else {
            return 0.0;
        };
        self.scroll_containers.push((id, bounds));

        let mut offset = ctx.previous_offsets.get(&id).copied().unwrap_or(0.0);
        if ctx.scroll_target == Some(id) {
            offset += ctx.input.scroll_delta * self.config.scroll_speed;
        }
        let offset = if overflow > 0.0 {
            offset.clamp(0.0, overflow)
        } else {
            0.0
        };
        self.scroll_offsets.insert(id, offset);
        offset
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Box of `id` from the last layout.
    pub fn bounds(&self, id: ElementId) -> Option<BoundingBox> {
        self.boxes.get(&id).copied()
    }

    /// Box of `id` from the layout before the last one.
    pub fn previous_bounds(&self, id: ElementId) -> Option<BoundingBox> {
        self.previous_boxes.get(&id).copied()
    }

    pub fn scroll_offset(&self, id: ElementId) -> f32 {
        self.scroll_offsets.get(&id).copied().unwrap_or(0.0)
    }

    /// Overrides the scroll offset used by the next layout. It is clamped there.
    pub fn set_scroll_offset(&mut self, id: ElementId, offset: f32) {
        self.scroll_offsets.insert(id, offset);
    }

    pub fn is_hovered(&self, id: ElementId) -> bool {
        self.hovered.contains(&id)
    }

    pub fn is_newly_hovered(&self, id: ElementId) -> bool {
        self.is_hovered(id) && !self.previous_hovered.contains(&id)
    }

    pub fn is_newly_unhovered(&self, id: ElementId) -> bool {
        !self.is_hovered(id) && self.previous_hovered.contains(&id)
    }

    /// Pointer went down this frame while over `id`.
    pub fn is_clicked(&self, id: ElementId) -> bool {
        self.pointer_pressed && self.is_hovered(id)
    }

    /// Hovered elements in tree order, outermost first.
    pub fn hovered_ids(&self) -> &[ElementId] {
        &self.hovered
    }
}

/// Start of an absolutely placed box along one axis.
///
/// The far offset wins and is added to the anchor's far edge, so negative
/// values move the box back inside the anchor.
fn absolute_axis(start: f32, length: f32, near: Option<f32>, far: Option<f32>) -> f32 {
    match (near, far) {
        (_, Some(far)) => start + length + far,
        (Some(near), None) => start + near,
        (None, None) => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{CrossAxisAlignment, MainAxisAlignment};
    use crate::layout::{Direction, Padding};
    use crate::text::{MonospaceMeasurer, TextConfig};
    use crate::{pct, px, shrink};

    const VIEWPORT: Dimensions = Dimensions::new(800.0, 600.0);

    fn fixed(width: f32, height: f32) -> Element {
        Element::container().size(px!(width), px!(height)).end()
    }

    fn run(engine: &mut LayoutEngine, root: &mut Element, input: FrameInput) {
        engine.layout(root, VIEWPORT, &input, &MonospaceMeasurer::new(1.0));
    }

    fn layout(root: &mut Element) -> LayoutEngine {
        let mut engine = LayoutEngine::default();
        run(&mut engine, root, FrameInput::default());
        engine
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
    }

    #[test]
    fn percentages_leave_slack() {
        let mut root = Element::container()
            .size(px!(400.0), px!(100.0))
            .direction(Direction::Horizontal)
            .gap(10.0)
            .children([
                fixed(50.0, 100.0),
                Element::container().width(pct!(25.0)).end(),
                Element::container().width(pct!(35.0)).end(),
            ])
            .end();
        layout(&mut root);

        let children = root.child_elements();
        // 400 - 50 - 2 * 10 = 330 remaining
        assert_close(children[1].bounds.width, 82.5);
        assert_close(children[2].bounds.width, 115.5);
        assert_close(children[1].bounds.width + children[2].bounds.width, 330.0 * 0.6);
        assert_close(children[1].bounds.x, 60.0);
        assert_close(children[2].bounds.x, 152.5);
        assert_close(children[1].bounds.height, 100.0);
    }

    #[test]
    fn percentages_over_hundred_are_normalized() {
        let mut root = Element::container()
            .size(px!(300.0), px!(100.0))
            .direction(Direction::Horizontal)
            .children([
                Element::container().width(pct!(100.0)).end(),
                Element::container().width(pct!(50.0)).end(),
            ])
            .end();
        layout(&mut root);

        let children = root.child_elements();
        assert_close(children[0].bounds.width, 200.0);
        assert_close(children[1].bounds.width, 100.0);
        assert_close(children[1].bounds.right(), 300.0);
    }

    #[test]
    fn space_between_two_children() {
        let mut root = Element::container()
            .size(px!(200.0), px!(50.0))
            .direction(Direction::Horizontal)
            .main_align(MainAxisAlignment::SpaceBetween)
            .children([fixed(30.0, 10.0), fixed(50.0, 10.0)])
            .end();
        layout(&mut root);

        let children = root.child_elements();
        assert_eq!(children[0].bounds.x, 0.0);
        assert_eq!(children[1].bounds.x, 200.0 - 50.0);
    }

    #[test]
    fn space_evenly_three_children() {
        let mut root = Element::container()
            .size(px!(50.0), px!(160.0))
            .main_align(MainAxisAlignment::SpaceEvenly)
            .children([fixed(10.0, 20.0), fixed(10.0, 20.0), fixed(10.0, 20.0)])
            .end();
        layout(&mut root);

        let ys: Vec<f32> = root.child_elements().iter().map(|c| c.bounds.y).collect();
        assert_eq!(ys, vec![25.0, 70.0, 115.0]);
    }

    #[test]
    fn absolute_children_do_not_affect_remaining_space() {
        let mut root = Element::container()
            .size(px!(400.0), px!(300.0))
            .direction(Direction::Horizontal)
            .gap(10.0)
            .children([
                Element::container().id("flow").width(pct!(100.0)).end(),
                Element::container()
                    .id("badge")
                    .size(px!(500.0), px!(40.0))
                    .absolute(|a| {
                        a.right(10.0).bottom(-60.0);
                    })
                    .end(),
            ])
            .end();
        let engine = layout(&mut root);

        let flow = engine.bounds(ElementId::new("flow")).unwrap();
        assert_eq!(flow, BoundingBox::new(0.0, 0.0, 400.0, 300.0));
        let badge = engine.bounds(ElementId::new("badge")).unwrap();
        assert_eq!(badge.width, 500.0);
        assert_eq!(badge.x, 400.0 + 10.0);
        assert_eq!(badge.y, 300.0 - 60.0);
    }

    #[test]
    fn absolute_left_top_and_percent_size() {
        let mut root = Element::container()
            .size(px!(400.0), px!(200.0))
            .padding(Padding::all(30.0))
            .child(
                Element::container()
                    .size(pct!(50.0), pct!(25.0))
                    .absolute(|a| {
                        a.left(5.0).top(6.0);
                    })
                    .end(),
            )
            .end();
        layout(&mut root);

        let overlay = root.child_elements()[0].bounds;
        assert_eq!(overlay, BoundingBox::new(5.0, 6.0, 200.0, 50.0));
    }

    #[test]
    fn absolute_nearest_anchor() {
        let overlay = |nearest: bool| {
            Element::container()
                .id("overlay")
                .size(px!(10.0), px!(10.0))
                .absolute(|a| {
                    a.right(-10.0).bottom(-10.0);
                    if nearest {
                        a.nearest_anchor();
                    }
                })
                .end()
        };
        for (nearest, expected) in [(true, 390.0), (false, 190.0)] {
            let mut root = Element::container()
                .size(px!(400.0), px!(400.0))
                .anchor()
                .child(
                    Element::container()
                        .size(px!(200.0), px!(200.0))
                        .child(overlay(nearest))
                        .end(),
                )
                .end();
            let engine = layout(&mut root);
            let bounds = engine.bounds(ElementId::new("overlay")).unwrap();
            assert_eq!((bounds.x, bounds.y), (expected, expected));
        }
    }

    #[test]
    fn right_offset_starts_at_far_edge() {
        let mut root = Element::container()
            .size(px!(400.0), px!(100.0))
            .padding(Padding::all(8.0))
            .child(
                Element::container()
                    .id("tip")
                    .size(px!(50.0), px!(20.0))
                    .absolute(|a| {
                        a.left(5.0).right(-60.0);
                    })
                    .end(),
            )
            .end();
        let engine = layout(&mut root);
        let tip = engine.bounds(ElementId::new("tip")).unwrap();
        // anchor.x + anchor.width + right, independent of the child's width
        assert_eq!(tip.x, 0.0 + 400.0 - 60.0);
        assert_eq!(tip.y, 0.0);
    }

    #[test]
    fn manual_placement() {
        let mut root = Element::container()
            .child(
                Element::container()
                    .size(px!(10.0), px!(10.0))
                    .absolute(|a| {
                        a.manual(Vector2::new(123.0, 45.0));
                    })
                    .end(),
            )
            .end();
        layout(&mut root);
        assert_eq!(root.child_elements()[0].bounds.position(), Vector2::new(123.0, 45.0));
    }

    #[test]
    fn padding_insets_content() {
        let mut root = Element::container()
            .size(px!(200.0), px!(100.0))
            .padding(Padding::new(10.0, 20.0, 5.0, 15.0))
            .child(Element::container().end())
            .end();
        layout(&mut root);
        assert_eq!(
            root.child_elements()[0].bounds,
            BoundingBox::new(10.0, 5.0, 170.0, 80.0)
        );
    }

    #[test]
    fn shrink_container_fits_content() {
        let mut root = Element::container()
            .size(shrink!(), shrink!())
            .gap(5.0)
            .padding(Padding::all(2.0))
            .children([fixed(30.0, 10.0), fixed(20.0, 10.0)])
            .end();
        layout(&mut root);
        assert_eq!(root.bounds.size(), Dimensions::new(34.0, 29.0));
    }

    #[test]
    fn shrink_minimum_is_respected() {
        let mut root = Element::container()
            .size(shrink!(100.0), shrink!())
            .child(fixed(30.0, 10.0))
            .end();
        layout(&mut root);
        assert_eq!(root.bounds.size(), Dimensions::new(100.0, 10.0));
    }

    #[test]
    fn cross_axis_alignment() {
        let build = |align| {
            Element::container()
                .size(px!(100.0), px!(50.0))
                .cross_align(align)
                .child(fixed(20.0, 10.0))
                .end()
        };
        for (align, x) in [
            (CrossAxisAlignment::FlexStart, 0.0),
            (CrossAxisAlignment::Center, 40.0),
            (CrossAxisAlignment::FlexEnd, 80.0),
        ] {
            let mut root = build(align);
            layout(&mut root);
            assert_eq!(root.child_elements()[0].bounds.x, x);
        }
    }

    #[test]
    fn hidden_children_are_ignored() {
        let mut root = Element::container()
            .size(px!(100.0), px!(100.0))
            .direction(Direction::Horizontal)
            .gap(10.0)
            .children([fixed(500.0, 10.0).hidden(true).end(), Element::container().end()])
            .end();
        layout(&mut root);
        assert_eq!(root.child_elements()[1].bounds.width, 100.0);
        assert_eq!(root.child_elements()[1].bounds.x, 0.0);
    }

    #[test]
    fn text_is_measured() {
        let mut root = Element::container()
            .size(px!(300.0), px!(100.0))
            .cross_align(CrossAxisAlignment::Center)
            .child(Element::text("hello", TextConfig::new().font_size(10.0).end()))
            .end();
        layout(&mut root);
        let text = root.child_elements()[0].bounds;
        assert_eq!(text, BoundingBox::new(125.0, 0.0, 50.0, 10.0));
    }

    #[test]
    fn text_wraps_to_container_width() {
        let config = TextConfig::new().font_size(10.0).multiline(true).end();
        let mut root = Element::container()
            .size(px!(75.0), px!(100.0))
            .child(Element::text("aaa bbb cc", config))
            .end();
        layout(&mut root);
        let text = root.child_elements()[0].bounds;
        assert_eq!(text.size(), Dimensions::new(70.0, 20.0));
    }

    #[test]
    fn display_scale_applies_to_pixel_sizes() {
        let mut engine = LayoutEngine::new(EngineConfig::default().display_scale(2.0).end());
        let mut root = Element::container()
            .size(px!(100.0), px!(50.0))
            .child(Element::image(crate::mesh::TextureId(1), Dimensions::new(8.0, 4.0)))
            .end();
        run(&mut engine, &mut root, FrameInput::default());
        assert_eq!(root.bounds.size(), Dimensions::new(200.0, 100.0));
        assert_eq!(root.child_elements()[0].bounds.size(), Dimensions::new(16.0, 8.0));
    }

    #[test]
    fn percent_in_scroll_content_is_sized_by_content() {
        let mut root = Element::container()
            .size(px!(100.0), px!(100.0))
            .scrollable()
            .child(
                Element::container()
                    .height(pct!(50.0))
                    .child(fixed(10.0, 30.0))
                    .end(),
            )
            .end();
        layout(&mut root);
        assert_eq!(root.child_elements()[0].bounds.height, 30.0);
    }

    fn scroll_list(item_height: f32) -> Element {
        Element::container()
            .id("list")
            .size(px!(100.0), px!(100.0))
            .scrollable()
            .children((0..5).map(|_| fixed(100.0, item_height)))
            .end()
    }

    #[test]
    fn scroll_offset_is_clamped() {
        let mut engine = LayoutEngine::default();
        let mut root = scroll_list(50.0);
        let list = ElementId::new("list");
        let over = FrameInput::pointer_at(Vector2::new(50.0, 50.0));

        run(&mut engine, &mut root, over);
        assert_eq!(engine.scroll_offset(list), 0.0);

        run(&mut engine, &mut root, FrameInput { scroll_delta: 2.0, ..over });
        assert_eq!(engine.scroll_offset(list), 40.0);
        assert_eq!(root.child_elements()[0].bounds.y, -40.0);

        run(&mut engine, &mut root, FrameInput { scroll_delta: 100.0, ..over });
        assert_eq!(engine.scroll_offset(list), 150.0);
        assert_eq!(root.child_elements()[4].bounds.y, 50.0);

        run(&mut engine, &mut root, FrameInput { scroll_delta: -1.0, ..over });
        assert_eq!(engine.scroll_offset(list), 130.0);
    }

    #[test]
    fn scroll_needs_pointer_over_container() {
        let mut engine = LayoutEngine::default();
        let mut root = Element::container().child(scroll_list(50.0)).end();
        let away = FrameInput::pointer_at(Vector2::new(500.0, 500.0)).scroll_delta(3.0).end();
        run(&mut engine, &mut root, away);
        run(&mut engine, &mut root, away);
        assert_eq!(engine.scroll_offset(ElementId::new("list")), 0.0);
    }

    #[test]
    fn scroll_resets_when_content_fits() {
        let mut engine = LayoutEngine::default();
        let list = ElementId::new("list");
        engine.set_scroll_offset(list, 70.0);
        let mut root = scroll_list(10.0);
        run(&mut engine, &mut root, FrameInput::default());
        assert_eq!(engine.scroll_offset(list), 0.0);
        assert_eq!(root.child_elements()[0].bounds.y, 0.0);
    }

    #[test]
    fn set_scroll_offset_is_clamped_on_next_layout() {
        let mut engine = LayoutEngine::default();
        let list = ElementId::new("list");
        engine.set_scroll_offset(list, 1000.0);
        let mut root = scroll_list(50.0);
        run(&mut engine, &mut root, FrameInput::default());
        assert_eq!(engine.scroll_offset(list), 150.0);
    }

    #[test]
    fn hover_and_click() {
        let mut engine = LayoutEngine::default();
        let button = ElementId::new("button");
        let mut root = Element::container()
            .child(fixed(50.0, 50.0).id(button).end())
            .end();
        let over = FrameInput::pointer_at(Vector2::new(10.0, 10.0));

        run(&mut engine, &mut root, over);
        assert!(engine.is_hovered(button));
        assert!(engine.is_newly_hovered(button));
        assert!(!engine.is_clicked(button));

        run(&mut engine, &mut root, FrameInput { pointer_down: true, ..over });
        assert!(engine.is_clicked(button));
        assert!(!engine.is_newly_hovered(button));

        run(&mut engine, &mut root, FrameInput { pointer_down: true, ..over });
        assert!(!engine.is_clicked(button));

        run(&mut engine, &mut root, FrameInput::pointer_at(Vector2::new(100.0, 100.0)));
        assert!(!engine.is_hovered(button));
        assert!(engine.is_newly_unhovered(button));
        assert_eq!(engine.previous_bounds(button), engine.bounds(button));
    }

    #[test]
    fn clipped_parts_are_not_hovered() {
        let mut engine = LayoutEngine::default();
        let tall = ElementId::new("tall");
        let mut root = Element::container()
            .size(px!(100.0), px!(100.0))
            .clip()
            .child(fixed(100.0, 300.0).id(tall).end())
            .end();
        run(&mut engine, &mut root, FrameInput::pointer_at(Vector2::new(50.0, 250.0)));
        assert!(!engine.is_hovered(tall));
        run(&mut engine, &mut root, FrameInput::pointer_at(Vector2::new(50.0, 50.0)));
        assert!(engine.is_hovered(tall));
    }

    #[test]
    fn hovered_ids_are_outermost_first() {
        let outer = ElementId::new("outer");
        let inner = ElementId::new("inner");
        let mut root = Element::container()
            .id(outer)
            .child(fixed(20.0, 20.0).id(inner).end())
            .end();
        let mut engine = LayoutEngine::default();
        run(&mut engine, &mut root, FrameInput::pointer_at(Vector2::new(5.0, 5.0)));
        assert_eq!(engine.hovered_ids(), &[outer, inner]);
    }
}
