use std::mem;

use crate::align::{CrossAxisAlignment, MainAxisAlignment};
use crate::color::Color;
use crate::id::ElementId;
use crate::layout::{AbsoluteAnchor, AbsolutePlacement, AbsolutePosition, Direction, Padding, Size};
use crate::math::{BoundingBox, Dimensions, Vector2};
use crate::mesh::TextureId;
use crate::text::{TextConfig, TextLayout};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CornerRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl CornerRadius {
    pub const fn all(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_left: radius,
            bottom_right: radius,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_left == 0.0
            && self.bottom_right == 0.0
    }

    /// Radii shrunk so that opposite corners never overlap inside `size`.
    pub fn fit(&self, size: Dimensions) -> Self {
        let limit = size.width.min(size.height) / 2.0;
        Self {
            top_left: self.top_left.clamp(0.0, limit),
            top_right: self.top_right.clamp(0.0, limit),
            bottom_left: self.bottom_left.clamp(0.0, limit),
            bottom_right: self.bottom_right.clamp(0.0, limit),
        }
    }
}

impl From<f32> for CornerRadius {
    fn from(radius: f32) -> Self {
        Self::all(radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderWidth {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl BorderWidth {
    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.right == 0.0 && self.top == 0.0 && self.bottom == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderConfig {
    pub color: Color,
    pub width: BorderWidth,
}

/// Builder for configuring border properties using a closure.
pub struct BorderBuilder {
    pub(crate) config: BorderConfig,
}

impl BorderBuilder {
    /// Sets the border color.
    #[inline]
    pub fn color(&mut self, color: impl Into<Color>) -> &mut Self {
        self.config.color = color.into();
        self
    }

    /// Set the same border width for all sides.
    #[inline]
    pub fn all(&mut self, width: f32) -> &mut Self {
        self.config.width = BorderWidth {
            left: width,
            right: width,
            top: width,
            bottom: width,
        };
        self
    }

    #[inline]
    pub fn left(&mut self, width: f32) -> &mut Self {
        self.config.width.left = width;
        self
    }

    #[inline]
    pub fn right(&mut self, width: f32) -> &mut Self {
        self.config.width.right = width;
        self
    }

    #[inline]
    pub fn top(&mut self, width: f32) -> &mut Self {
        self.config.width.top = width;
        self
    }

    #[inline]
    pub fn bottom(&mut self, width: f32) -> &mut Self {
        self.config.width.bottom = width;
        self
    }
}

/// Builder for configuring absolute placement using a closure.
pub struct AbsoluteBuilder {
    pub(crate) position: AbsolutePosition,
}

impl AbsoluteBuilder {
    fn offsets(&mut self) -> (&mut Option<f32>, &mut Option<f32>, &mut Option<f32>, &mut Option<f32>) {
        if let AbsolutePlacement::Manual(_) = self.position.placement {
            self.position.placement = AbsolutePlacement::default();
        }
        match &mut self.position.placement {
            AbsolutePlacement::Offsets {
                left,
                right,
                top,
                bottom,
            } => (left, right, top, bottom),
            AbsolutePlacement::Manual(_) => unreachable!("placement was reset to offsets"),
        }
    }

    /// Distance from the anchor's left edge.
    #[inline]
    pub fn left(&mut self, offset: f32) -> &mut Self {
        *self.offsets().0 = Some(offset);
        self
    }

    /// Offset of the element's left edge from the anchor's right edge.
    /// Negative values move it inside the anchor. Wins over `left`.
    #[inline]
    pub fn right(&mut self, offset: f32) -> &mut Self {
        *self.offsets().1 = Some(offset);
        self
    }

    /// Distance from the anchor's top edge.
    #[inline]
    pub fn top(&mut self, offset: f32) -> &mut Self {
        *self.offsets().2 = Some(offset);
        self
    }

    /// Offset of the element's top edge from the anchor's bottom edge.
    /// Negative values move it inside the anchor. Wins over `top`.
    #[inline]
    pub fn bottom(&mut self, offset: f32) -> &mut Self {
        *self.offsets().3 = Some(offset);
        self
    }

    /// Places the element at `position` without any anchor math.
    #[inline]
    pub fn manual(&mut self, position: impl Into<Vector2>) -> &mut Self {
        self.position.placement = AbsolutePlacement::Manual(position.into());
        self
    }

    /// Positions against the nearest ancestor marked with [`Element::anchor`].
    #[inline]
    pub fn nearest_anchor(&mut self) -> &mut Self {
        self.position.anchor = AbsoluteAnchor::NearestAnchor;
        self
    }
}

/// A box holding other elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub direction: Direction,
    pub gap: f32,
    pub padding: Padding,
    pub main_align: MainAxisAlignment,
    pub cross_align: CrossAxisAlignment,
    /// Taken out of the parent's flow when set.
    pub absolute: Option<AbsolutePosition>,
    /// Absolutely positioned descendants may lay out against this container.
    pub anchor: bool,
    pub scrollable: bool,
    pub clip: bool,
    pub background: Option<Color>,
    pub border: Option<BorderConfig>,
    pub corner_radius: CornerRadius,
    pub children: Vec<Element>,
    /// Main-axis length of the flow children and gaps, written by layout.
    pub content_length: f32,
}

impl Container {
    /// Whether children are cut off at the container's edges.
    #[inline]
    pub fn clips(&self) -> bool {
        self.clip || self.scrollable
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextElement {
    pub content: String,
    pub config: TextConfig,
    /// Lines measured by the last layout.
    pub layout: TextLayout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageElement {
    pub texture: TextureId,
    /// Intrinsic size in logical pixels.
    pub size: Dimensions,
    /// Region of the texture to draw, normalized.
    pub uv: BoundingBox,
    pub tint: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Container(Container),
    Text(TextElement),
    Image(ImageElement),
}

/// A node of the UI tree.
///
/// Built fresh every frame by the caller. Layout writes the computed box into
/// [`Element::bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Option<ElementId>,
    pub width: Size,
    pub height: Size,
    pub hidden: bool,
    /// Non-zero values are drawn after the rest of the tree, in ascending order.
    pub z_index: i16,
    pub kind: ElementKind,
    /// Absolute box, written by layout.
    pub bounds: BoundingBox,
    /// Size from the measure pass.
    pub(crate) size: Dimensions,
    /// Position relative to the parent's content origin, written by layout.
    pub offset: Vector2,
}

impl Default for Element {
    fn default() -> Self {
        Self::container()
    }
}

impl Element {
    fn with_kind(kind: ElementKind, width: Size, height: Size) -> Self {
        Self {
            id: None,
            width,
            height,
            hidden: false,
            z_index: 0,
            kind,
            bounds: BoundingBox::default(),
            size: Dimensions::ZERO,
            offset: Vector2::ZERO,
        }
    }

    /// A container filling its parent on both axes.
    pub fn container() -> Self {
        Self::with_kind(ElementKind::Container(Container::default()), Size::FULL, Size::FULL)
    }

    /// A text leaf sized to its content.
    pub fn text(content: impl Into<String>, config: TextConfig) -> Self {
        Self::with_kind(
            ElementKind::Text(TextElement {
                content: content.into(),
                config,
                layout: TextLayout::default(),
            }),
            Size::SHRINK,
            Size::SHRINK,
        )
    }

    /// An image leaf sized to `size`, drawing the whole texture untinted.
    pub fn image(texture: TextureId, size: impl Into<Dimensions>) -> Self {
        Self::with_kind(
            ElementKind::Image(ImageElement {
                texture,
                size: size.into(),
                uv: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                tint: Color::WHITE,
            }),
            Size::SHRINK,
            Size::SHRINK,
        )
    }

    /// Moves the configured element out, leaving a default container behind.
    #[inline]
    pub fn end(&mut self) -> Self {
        mem::take(self)
    }

    #[inline]
    pub fn id(&mut self, id: impl Into<ElementId>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    #[inline]
    pub fn width(&mut self, width: Size) -> &mut Self {
        self.width = width;
        self
    }

    #[inline]
    pub fn height(&mut self, height: Size) -> &mut Self {
        self.height = height;
        self
    }

    #[inline]
    pub fn size(&mut self, width: Size, height: Size) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    #[inline]
    pub fn z_index(&mut self, z_index: i16) -> &mut Self {
        self.z_index = z_index;
        self
    }

    /// Configuration of a container element.
    ///
    /// Panics for text and image elements: container settings have no meaning there.
    fn container_config(&mut self) -> &mut Container {
        match &mut self.kind {
            ElementKind::Container(container) => container,
            ElementKind::Text(_) | ElementKind::Image(_) => {
                panic!("container setting applied to a leaf element ({:?})", self.id)
            }
        }
    }

    #[inline]
    pub fn direction(&mut self, direction: Direction) -> &mut Self {
        self.container_config().direction = direction;
        self
    }

    #[inline]
    pub fn gap(&mut self, gap: f32) -> &mut Self {
        self.container_config().gap = gap;
        self
    }

    #[inline]
    pub fn padding(&mut self, padding: Padding) -> &mut Self {
        self.container_config().padding = padding;
        self
    }

    #[inline]
    pub fn main_align(&mut self, align: MainAxisAlignment) -> &mut Self {
        self.container_config().main_align = align;
        self
    }

    #[inline]
    pub fn cross_align(&mut self, align: CrossAxisAlignment) -> &mut Self {
        self.container_config().cross_align = align;
        self
    }

    /// Takes the container out of the flow, positioned with a closure.
    /// ```
    /// use flexmesh::elements::Element;
    /// let badge = Element::container()
    ///     .absolute(|a| {
    ///         a.right(-24.0).top(4.0);
    ///     })
    ///     .end();
    /// ```
    #[inline]
    pub fn absolute(&mut self, f: impl FnOnce(&mut AbsoluteBuilder)) -> &mut Self {
        let mut builder = AbsoluteBuilder {
            position: AbsolutePosition::default(),
        };
        f(&mut builder);
        self.container_config().absolute = Some(builder.position);
        self
    }

    #[inline]
    pub fn absolute_position(&mut self, position: AbsolutePosition) -> &mut Self {
        self.container_config().absolute = Some(position);
        self
    }

    /// Marks the container as a target for [`AbsoluteBuilder::nearest_anchor`].
    #[inline]
    pub fn anchor(&mut self) -> &mut Self {
        self.container_config().anchor = true;
        self
    }

    /// Scrolls the children along the main axis. Implies clipping.
    #[inline]
    pub fn scrollable(&mut self) -> &mut Self {
        self.container_config().scrollable = true;
        self
    }

    #[inline]
    pub fn clip(&mut self) -> &mut Self {
        self.container_config().clip = true;
        self
    }

    #[inline]
    pub fn background(&mut self, color: impl Into<Color>) -> &mut Self {
        self.container_config().background = Some(color.into());
        self
    }

    #[inline]
    pub fn border(&mut self, f: impl FnOnce(&mut BorderBuilder)) -> &mut Self {
        let mut builder = BorderBuilder {
            config: BorderConfig::default(),
        };
        f(&mut builder);
        self.container_config().border = Some(builder.config);
        self
    }

    #[inline]
    pub fn corner_radius(&mut self, radius: f32) -> &mut Self {
        self.container_config().corner_radius = CornerRadius::all(radius);
        self
    }

    #[inline]
    pub fn corner_radii(&mut self, radii: CornerRadius) -> &mut Self {
        self.container_config().corner_radius = radii;
        self
    }

    #[inline]
    pub fn child(&mut self, child: Element) -> &mut Self {
        self.container_config().children.push(child);
        self
    }

    #[inline]
    pub fn children(&mut self, children: impl IntoIterator<Item = Element>) -> &mut Self {
        self.container_config().children.extend(children);
        self
    }

    /// Sets the region of the texture an image element draws.
    #[inline]
    pub fn uv(&mut self, uv: BoundingBox) -> &mut Self {
        if let ElementKind::Image(image) = &mut self.kind {
            image.uv = uv;
        }
        self
    }

    #[inline]
    pub fn tint(&mut self, tint: impl Into<Color>) -> &mut Self {
        if let ElementKind::Image(image) = &mut self.kind {
            image.tint = tint.into();
        }
        self
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            ElementKind::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Child elements, empty for leaves.
    pub fn child_elements(&self) -> &[Element] {
        self.as_container().map_or(&[], |c| c.children.as_slice())
    }

    /// The absolute placement of a container taken out of the flow.
    #[inline]
    pub fn absolute_placement(&self) -> Option<&AbsolutePosition> {
        self.as_container().and_then(|c| c.absolute.as_ref())
    }

    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.absolute_placement().is_some()
    }

    /// Laid out by its parent's flex algorithm.
    #[inline]
    pub(crate) fn in_flow(&self) -> bool {
        !self.hidden && !self.is_absolute()
    }

    /// The declared size along the main axis of `direction`.
    #[inline]
    pub(crate) fn main_size(&self, direction: Direction) -> Size {
        match direction {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    /// Finds an element by id, depth first.
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.child_elements().iter().find_map(|child| child.find(id))
    }
}
