use crate::arena::Arena;
use crate::color::Color;
use crate::elements::{BorderWidth, CornerRadius};
use crate::errors::Result;
use crate::math::{BoundingBox, Vector2};
use crate::mesh::{Mesh, MeshBuilder, TextureId, TextureType, FILL_CURVE, FILL_SOLID};
use crate::render_commands::{Image, RenderCommand, RenderCommandConfig, Text};
use crate::text::GlyphAtlas;

/// A mesh drawn with one scissor rectangle.
#[derive(Debug, Clone)]
pub struct DrawBatch<'f> {
    pub mesh: Mesh<'f>,
    /// `None` draws unclipped.
    pub clip: Option<BoundingBox>,
}

const CURVE_UV: [Vector2; 3] = [Vector2::new(0.0, 0.0), Vector2::new(0.5, 0.0), Vector2::new(1.0, 1.0)];

struct RenderState<'b, 'a, 'f> {
    builder: &'b mut MeshBuilder<'a>,
    out: &'f Arena,
    batches: Vec<DrawBatch<'f>>,
    clip_stack: Vec<BoundingBox>,
}

impl<'f> RenderState<'_, '_, 'f> {
    fn clip(&self) -> Option<BoundingBox> {
        self.clip_stack.last().copied()
    }

    /// Closes the current batch. Empty batches are dropped.
    fn flush(&mut self) -> Result<()> {
        if self.builder.is_empty() {
            self.builder.reset();
            return Ok(());
        }
        let mesh = self.builder.build_mesh_and_reset_in(self.out)?;
        self.batches.push(DrawBatch { mesh, clip: self.clip() });
        Ok(())
    }

    fn push_scissor(&mut self, bounds: BoundingBox) -> Result<()> {
        self.flush()?;
        let clip = match self.clip() {
            Some(parent) => parent.intersect(&bounds),
            None => bounds,
        };
        self.clip_stack.push(clip);
        Ok(())
    }

    fn pop_scissor(&mut self) -> Result<()> {
        self.flush()?;
        if self.clip_stack.pop().is_none() {
            tracing::warn!("scissor end without a matching start");
        }
        Ok(())
    }

    /// Starts a new batch when `texture` would not fit into the current one.
    fn reserve_texture(&mut self, texture: TextureId) -> Result<()> {
        if !self.builder.texture_slot_available(texture) {
            tracing::debug!(?texture, "texture limit reached, splitting batch");
            self.flush()?;
        }
        Ok(())
    }

    fn quad(&mut self, bounds: BoundingBox, uv: BoundingBox, color: Color, texture_type: TextureType, texture: Option<TextureId>) {
        let corners = [
            (Vector2::new(bounds.x, bounds.y), Vector2::new(uv.x, uv.y)),
            (Vector2::new(bounds.right(), bounds.y), Vector2::new(uv.right(), uv.y)),
            (Vector2::new(bounds.right(), bounds.bottom()), Vector2::new(uv.right(), uv.bottom())),
            (Vector2::new(bounds.x, bounds.bottom()), Vector2::new(uv.x, uv.bottom())),
        ];
        let [a, b, c, d] = corners.map(|(position, uv)| {
            self.builder.add_vertex(position, uv, color, FILL_SOLID, texture_type, texture)
        });
        self.builder.add_triangle(a, b, c);
        self.builder.add_triangle(a, c, d);
    }

    fn solid_quad(&mut self, bounds: BoundingBox, color: Color) {
        if bounds.width > 0.0 && bounds.height > 0.0 {
            self.quad(bounds, BoundingBox::default(), color, TextureType::Color, None);
        }
    }

    fn rectangle(&mut self, bounds: BoundingBox, color: Color, radii: CornerRadius) {
        let radii = radii.fit(bounds.size());
        if radii.is_zero() {
            self.solid_quad(bounds, color);
            return;
        }

        let (left, top, right, bottom) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());
        // (start of arc, corner, end of arc), clockwise from the top left
        let corners = [
            (
                Vector2::new(left, top + radii.top_left),
                Vector2::new(left, top),
                Vector2::new(left + radii.top_left, top),
            ),
            (
                Vector2::new(right - radii.top_right, top),
                Vector2::new(right, top),
                Vector2::new(right, top + radii.top_right),
            ),
            (
                Vector2::new(right, bottom - radii.bottom_right),
                Vector2::new(right, bottom),
                Vector2::new(right - radii.bottom_right, bottom),
            ),
            (
                Vector2::new(left + radii.bottom_left, bottom),
                Vector2::new(left, bottom),
                Vector2::new(left, bottom - radii.bottom_left),
            ),
        ];

        // Edges: the rectangle with its corners cut, fanned from the center
        let mut outline: Vec<Vector2> = Vec::with_capacity(8);
        for (start, _, end) in corners {
            for point in [start, end] {
                if outline.last() != Some(&point) && outline.first() != Some(&point) {
                    outline.push(point);
                }
            }
        }
        let center = self.builder.add_vertex(
            Vector2::new(left + bounds.width / 2.0, top + bounds.height / 2.0),
            Vector2::ZERO,
            color,
            FILL_SOLID,
            TextureType::Color,
            None,
        );
        let ring: Vec<u32> = outline
            .iter()
            .map(|&point| self.builder.add_vertex(point, Vector2::ZERO, color, FILL_SOLID, TextureType::Color, None))
            .collect();
        for (i, &vertex) in ring.iter().enumerate() {
            self.builder.add_triangle(center, vertex, ring[(i + 1) % ring.len()]);
        }

        // Corners
        for (start, corner, end) in corners {
            if start == corner {
                continue;
            }
            let points = [start, corner, end];
            let [a, b, c] = [0, 1, 2].map(|i| {
                self.builder.add_vertex(points[i], CURVE_UV[i], color, FILL_CURVE, TextureType::Color, None)
            });
            self.builder.add_triangle(a, b, c);
        }
    }

    fn border(&mut self, bounds: BoundingBox, color: Color, width: BorderWidth) {
        let inner_height = bounds.height - width.top - width.bottom;
        self.solid_quad(BoundingBox::new(bounds.x, bounds.y, bounds.width, width.top), color);
        self.solid_quad(
            BoundingBox::new(bounds.x, bounds.bottom() - width.bottom, bounds.width, width.bottom),
            color,
        );
        self.solid_quad(BoundingBox::new(bounds.x, bounds.y + width.top, width.left, inner_height), color);
        self.solid_quad(
            BoundingBox::new(bounds.right() - width.right, bounds.y + width.top, width.right, inner_height),
            color,
        );
    }

    fn image(&mut self, bounds: BoundingBox, image: &Image) -> Result<()> {
        self.reserve_texture(image.texture)?;
        self.quad(bounds, image.uv, image.tint, TextureType::Texture, Some(image.texture));
        Ok(())
    }

    fn text(&mut self, bounds: BoundingBox, text: &Text, atlas: &dyn GlyphAtlas) -> Result<()> {
        let config = text.config;
        let texture = atlas.texture(config.font_id);
        self.reserve_texture(texture)?;

        let origin = Vector2::new(
            bounds.x + config.horizontal_align.offset(bounds.width, text.layout.width),
            bounds.y + config.vertical_align.offset(bounds.height, text.layout.height),
        );
        for line in &text.layout.lines {
            let Some(content) = text.content.get(line.range.clone()) else {
                tracing::warn!(range = ?line.range, "text line outside of its content");
                continue;
            };
            for (index, ch) in content.chars().enumerate() {
                let Some(glyph) = atlas.glyph(config.font_id, config.font_size, ch) else {
                    continue;
                };
                let pen_x = origin.x + line.bounds.x + line.char_start(index);
                let pen_y = origin.y + line.bounds.y;
                let quad = BoundingBox::new(
                    pen_x + glyph.bounds.x,
                    pen_y + glyph.bounds.y,
                    glyph.bounds.width,
                    glyph.bounds.height,
                );
                self.quad(quad, glyph.uv, config.color, TextureType::Text, Some(texture));
            }
        }
        Ok(())
    }
}

/// Tessellates `commands` into batches, splitting on scissor changes and on
/// the texture limit of a mesh.
///
/// Vertices are accumulated in `builder`, whose matrix applies to every
/// position. The finished meshes live in `out`. Text is skipped when no
/// `atlas` is given.
pub fn build_batches<'f>(
    commands: &[RenderCommand<'_>],
    builder: &mut MeshBuilder<'_>,
    atlas: Option<&dyn GlyphAtlas>,
    out: &'f Arena,
) -> Result<Vec<DrawBatch<'f>>> {
    let _span = tracing::trace_span!("build_batches", commands = commands.len()).entered();

    builder.reset();
    let mut state = RenderState {
        builder,
        out,
        batches: Vec::new(),
        clip_stack: Vec::new(),
    };

    for command in commands {
        let bounds = command.bounding_box;
        match &command.config {
            RenderCommandConfig::Rectangle(rectangle) => {
                state.rectangle(bounds, rectangle.color, rectangle.corner_radii)
            }
            RenderCommandConfig::Border(border) => state.border(bounds, border.color, border.width),
            RenderCommandConfig::Image(image) => state.image(bounds, image)?,
            RenderCommandConfig::Text(text) => match atlas {
                Some(atlas) => state.text(bounds, text, atlas)?,
                None => tracing::trace!(id = ?command.id, "no glyph atlas, skipping text"),
            },
            RenderCommandConfig::ScissorStart => state.push_scissor(bounds)?,
            RenderCommandConfig::ScissorEnd => state.pop_scissor()?,
        }
    }

    state.flush()?;
    Ok(state.batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MAX_TEXTURES_PER_MESH;
    use crate::mesh::FLOATS_PER_VERTEX;
    use crate::render_commands::{Border, Rectangle};
    use crate::text::{Glyph, MonospaceMeasurer, TextConfig, TextMeasurer};

    fn command(bounds: BoundingBox, config: RenderCommandConfig<'_>) -> RenderCommand<'_> {
        RenderCommand {
            bounding_box: bounds,
            config,
            id: None,
            z_index: 0,
        }
    }

    fn rect(x: f32, radius: f32) -> RenderCommand<'static> {
        command(
            BoundingBox::new(x, 0.0, 100.0, 100.0),
            RenderCommandConfig::Rectangle(Rectangle {
                color: Color::WHITE,
                corner_radii: CornerRadius::all(radius),
            }),
        )
    }

    fn image(texture: u64) -> RenderCommand<'static> {
        command(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            RenderCommandConfig::Image(Image {
                texture: TextureId(texture),
                uv: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                tint: Color::WHITE,
            }),
        )
    }

    /// Square glyphs for everything but spaces.
    struct BlockAtlas;

    impl GlyphAtlas for BlockAtlas {
        fn texture(&self, font_id: u16) -> TextureId {
            TextureId(100 + font_id as u64)
        }

        fn glyph(&self, _font_id: u16, font_size: f32, ch: char) -> Option<Glyph> {
            (ch != ' ').then(|| Glyph {
                bounds: BoundingBox::new(0.0, 0.0, font_size / 2.0, font_size),
                uv: BoundingBox::new(0.0, 0.0, 0.1, 0.1),
            })
        }
    }

    #[test]
    fn plain_rectangle_is_one_quad() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let batches = build_batches(&[rect(0.0, 0.0)], &mut builder, None, &arena).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].mesh.vertex_count(), 4);
        assert_eq!(batches[0].mesh.indices, &[0, 1, 2, 0, 2, 3]);
        assert_eq!(batches[0].clip, None);
    }

    #[test]
    fn rounded_rectangle_uses_curve_corners() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let batches = build_batches(&[rect(0.0, 10.0)], &mut builder, None, &arena).unwrap();
        let mesh = &batches[0].mesh;
        // center, eight outline points, four curve triangles
        assert_eq!(mesh.vertex_count(), 1 + 8 + 12);
        assert_eq!(mesh.indices.len(), (8 + 4) * 3);

        let curve = &mesh.floats[9 * FLOATS_PER_VERTEX..10 * FLOATS_PER_VERTEX];
        assert_eq!(&curve[..6], &[0.0, 10.0, 0.0, 0.0, 0.0, FILL_CURVE]);
        let control = &mesh.floats[10 * FLOATS_PER_VERTEX..11 * FLOATS_PER_VERTEX];
        assert_eq!(&control[..6], &[0.0, 0.0, 0.0, 0.5, 0.0, FILL_CURVE]);
    }

    #[test]
    fn mixed_radii_skip_square_corners() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let radii = CornerRadius {
            top_left: 10.0,
            ..CornerRadius::default()
        };
        let commands = [command(
            BoundingBox::new(0.0, 0.0, 50.0, 50.0),
            RenderCommandConfig::Rectangle(Rectangle {
                color: Color::WHITE,
                corner_radii: radii,
            }),
        )];
        let batches = build_batches(&commands, &mut builder, None, &arena).unwrap();
        // center, five outline points, one curve triangle
        assert_eq!(batches[0].mesh.vertex_count(), 1 + 5 + 3);
        assert_eq!(batches[0].mesh.indices.len(), (5 + 1) * 3);
    }

    #[test]
    fn scissor_splits_batches() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let clip = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let commands = [
            rect(0.0, 0.0),
            command(clip, RenderCommandConfig::ScissorStart),
            rect(10.0, 0.0),
            command(clip, RenderCommandConfig::ScissorEnd),
            rect(20.0, 0.0),
        ];
        let batches = build_batches(&commands, &mut builder, None, &arena).unwrap();
        let clips: Vec<_> = batches.iter().map(|b| b.clip).collect();
        assert_eq!(clips, vec![None, Some(clip), None]);
    }

    #[test]
    fn nested_scissors_intersect_and_skip_empty_batches() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let commands = [
            command(BoundingBox::new(0.0, 0.0, 50.0, 50.0), RenderCommandConfig::ScissorStart),
            command(BoundingBox::new(25.0, 25.0, 50.0, 50.0), RenderCommandConfig::ScissorStart),
            rect(0.0, 0.0),
            command(BoundingBox::default(), RenderCommandConfig::ScissorEnd),
            command(BoundingBox::default(), RenderCommandConfig::ScissorEnd),
        ];
        let batches = build_batches(&commands, &mut builder, None, &arena).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].clip, Some(BoundingBox::new(25.0, 25.0, 25.0, 25.0)));
    }

    #[test]
    fn texture_limit_splits_batches() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let commands: Vec<_> = (0..=MAX_TEXTURES_PER_MESH as u64).map(image).collect();
        let batches = build_batches(&commands, &mut builder, None, &arena).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].mesh.textures.len(), MAX_TEXTURES_PER_MESH);
        assert_eq!(batches[1].mesh.textures.len(), 1);
        assert_eq!(batches[1].mesh.textures[&TextureId(9)], 0);
    }

    #[test]
    fn repeated_texture_shares_batch() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let commands: Vec<_> = (0..20).map(|_| image(7)).collect();
        let batches = build_batches(&commands, &mut builder, None, &arena).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].mesh.vertex_count(), 80);
    }

    #[test]
    fn border_draws_edges() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let commands = [command(
            BoundingBox::new(0.0, 0.0, 20.0, 20.0),
            RenderCommandConfig::Border(Border {
                color: Color::BLACK,
                width: BorderWidth {
                    left: 1.0,
                    right: 1.0,
                    top: 2.0,
                    bottom: 0.0,
                },
            }),
        )];
        let batches = build_batches(&commands, &mut builder, None, &arena).unwrap();
        // zero-width bottom edge is skipped
        let mesh = &batches[0].mesh;
        assert_eq!(mesh.vertex_count(), 12);
        // edges stay inside the box: top starts at its corner, right ends at its edge
        assert_eq!(&mesh.floats[..2], &[0.0, 0.0]);
        let right_edge = &mesh.floats[8 * FLOATS_PER_VERTEX..9 * FLOATS_PER_VERTEX];
        assert_eq!(&right_edge[..2], &[19.0, 2.0]);
    }

    #[test]
    fn text_becomes_glyph_quads() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        let config = TextConfig::new().font_size(10.0).end();
        let layout = MonospaceMeasurer::new(0.5).layout_text("a b", &config, f32::INFINITY);
        let commands = [command(
            BoundingBox::new(100.0, 100.0, 15.0, 30.0),
            RenderCommandConfig::Text(Text {
                content: "a b",
                config: &config,
                layout: &layout,
            }),
        )];

        let skipped = build_batches(&commands, &mut builder, None, &arena).unwrap();
        assert!(skipped.is_empty());

        let batches = build_batches(&commands, &mut builder, Some(&BlockAtlas), &arena).unwrap();
        let mesh = &batches[0].mesh;
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.textures[&TextureId(100)], 0);
        // vertically centered: (30 - 10) / 2
        let first = &mesh.floats[..FLOATS_PER_VERTEX];
        assert_eq!(&first[..2], &[100.0, 110.0]);
        assert_eq!(first[10], TextureType::Text as u8 as f32);
        // the third character starts after two advances of 5
        let second = &mesh.floats[4 * FLOATS_PER_VERTEX..5 * FLOATS_PER_VERTEX];
        assert_eq!(&second[..2], &[110.0, 110.0]);
    }

    #[test]
    fn builder_matrix_applies() {
        let arena = Arena::new();
        let mut builder = MeshBuilder::new(&arena);
        builder.matrix = glam::Mat4::from_translation(glam::Vec3::new(5.0, 7.0, 0.0));
        let batches = build_batches(&[rect(0.0, 0.0)], &mut builder, None, &arena).unwrap();
        assert_eq!(&batches[0].mesh.floats[..2], &[5.0, 7.0]);
    }
}
