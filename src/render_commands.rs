use crate::color::Color;
use crate::elements::{BorderWidth, Container, CornerRadius, Element, ElementKind, ImageElement};
use crate::id::ElementId;
use crate::math::{BoundingBox, Dimensions};
use crate::mesh::TextureId;
use crate::text::{TextConfig, TextLayout};

/// Represents a rectangle with a specified color and corner radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// The fill color of the rectangle.
    pub color: Color,
    /// The corner radii for rounded edges.
    pub corner_radii: CornerRadius,
}

/// Represents a border with a specified color and width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// The border color.
    pub color: Color,
    /// The width of the border on each side.
    pub width: BorderWidth,
}

/// Laid out text, borrowed from the element tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Text<'e> {
    pub content: &'e str,
    pub config: &'e TextConfig,
    pub layout: &'e TextLayout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Image {
    pub texture: TextureId,
    pub uv: BoundingBox,
    pub tint: Color,
}

impl From<&ImageElement> for Image {
    fn from(image: &ImageElement) -> Self {
        Self {
            texture: image.texture,
            uv: image.uv,
            tint: image.tint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommandConfig<'e> {
    Rectangle(Rectangle),
    Border(Border),
    Text(Text<'e>),
    Image(Image),
    /// Clip everything up to the matching [`RenderCommandConfig::ScissorEnd`]
    /// to the command's bounding box.
    ScissorStart,
    ScissorEnd,
}

/// Represents a render command for drawing an element on the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand<'e> {
    /// The bounding box defining the area occupied by the element.
    pub bounding_box: BoundingBox,
    /// The specific configuration for rendering this command.
    pub config: RenderCommandConfig<'e>,
    pub id: Option<ElementId>,
    /// The z-index of the layer the command belongs to.
    pub z_index: i16,
}

struct RenderVisitor<'e> {
    viewport: Dimensions,
    culling: bool,
    commands: Vec<RenderCommand<'e>>,
}

impl<'e> RenderVisitor<'e> {
    fn push(&mut self, element: &Element, z_index: i16, config: RenderCommandConfig<'e>) {
        self.commands.push(RenderCommand {
            bounding_box: element.bounds,
            config,
            id: element.id,
            z_index,
        });
    }

    /// Emits `element` and its descendants, leaving out nested layers.
    fn visit(&mut self, element: &'e Element, z_index: i16) {
        let culled = self.culling && element.bounds.is_outside(self.viewport);
        match &element.kind {
            ElementKind::Container(container) => self.visit_container(element, container, z_index, culled),
            ElementKind::Text(text) if !culled => self.push(
                element,
                z_index,
                RenderCommandConfig::Text(Text {
                    content: &text.content,
                    config: &text.config,
                    layout: &text.layout,
                }),
            ),
            ElementKind::Image(image) if !culled => {
                self.push(element, z_index, RenderCommandConfig::Image(image.into()))
            }
            ElementKind::Text(_) | ElementKind::Image(_) => {}
        }
    }

    fn visit_container(&mut self, element: &'e Element, container: &'e Container, z_index: i16, culled: bool) {
        if !culled {
            if let Some(color) = container.background.filter(|c| !c.is_transparent()) {
                self.push(
                    element,
                    z_index,
                    RenderCommandConfig::Rectangle(Rectangle {
                        color,
                        corner_radii: container.corner_radius,
                    }),
                );
            }
        }

        let clips = container.clips();
        // a clipped container off screen hides its whole flow
        if !(clips && culled) {
            if clips {
                self.push(element, z_index, RenderCommandConfig::ScissorStart);
            }
            for child in container.children.iter().filter(|c| c.in_flow() && c.z_index == 0) {
                self.visit(child, z_index);
            }
            if clips {
                self.push(element, z_index, RenderCommandConfig::ScissorEnd);
            }
        }

        if !culled {
            if let Some(border) = container.border.filter(|b| !b.width.is_zero()) {
                self.push(
                    element,
                    z_index,
                    RenderCommandConfig::Border(Border {
                        color: border.color,
                        width: border.width,
                    }),
                );
            }
        }

        for child in container.children.iter().filter(|c| !c.hidden && c.is_absolute() && c.z_index == 0) {
            self.visit(child, z_index);
        }
    }
}

/// Collects the roots of every layer below `element`, in tree order.
fn collect_layers<'e>(element: &'e Element, layers: &mut Vec<&'e Element>) {
    for child in element.child_elements().iter().filter(|c| !c.hidden) {
        if child.z_index != 0 {
            layers.push(child);
        }
        collect_layers(child, layers);
    }
}

/// Turns a laid-out tree into draw commands, in painting order.
///
/// Elements with a non-zero z-index start a layer: the element and its
/// subtree are drawn after the rest of the tree, layers in ascending z order
/// and in tree order for equal z. With `culling` set, elements entirely outside
/// `viewport` emit nothing.
pub fn generate(root: &Element, viewport: Dimensions, culling: bool) -> Vec<RenderCommand<'_>> {
    let mut visitor = RenderVisitor {
        viewport,
        culling,
        commands: Vec::new(),
    };
    if root.hidden {
        return visitor.commands;
    }

    let mut layers = Vec::new();
    collect_layers(root, &mut layers);
    layers.sort_by_key(|layer| layer.z_index);

    visitor.visit(root, root.z_index);
    for layer in layers {
        visitor.visit(layer, layer.z_index);
    }
    visitor.commands
}
