//! Vertex/index accumulation and packing into the GPU vertex layout.
//!
//! Every packed vertex is 12 floats:
//!
//! | offset | field |
//! |---|---|
//! | 0..3 | x, y, z (always 0) |
//! | 3..5 | u, v |
//! | 5 | fill type |
//! | 6..10 | r, g, b, a in `0.0..=1.0` |
//! | 10 | texture type |
//! | 11 | texture slot |
//!
//! The shader samples from a fixed array of [`MAX_TEXTURES_PER_MESH`] textures,
//! so a mesh may reference at most that many distinct textures.

use std::mem;

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use crate::arena::Arena;
use crate::color::Color;
use crate::errors::{Error, Result, MAX_TEXTURES_PER_MESH};
use crate::growable_buffer::GrowableBuffer;
use crate::math::Vector2;

pub const FLOATS_PER_VERTEX: usize = 12;

/// Fill type of solid geometry.
pub const FILL_SOLID: f32 = 0.0;
/// Fill type of a quadratic curve triangle: the shader keeps the inside of
/// `u * u - v < 0` using the barycentric uv `(0, 0)`, `(0.5, 0)`, `(1, 1)`.
pub const FILL_CURVE: f32 = 1.0;

/// Opaque handle to a texture owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureId(pub u64);

/// How the fragment shader colors a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextureType {
    /// Vertex color only.
    #[default]
    Color = 0,
    /// Texture sample tinted by the vertex color.
    Texture = 1,
    /// Glyph coverage from a text atlas, colored by the vertex color.
    Text = 2,
}

impl TryFrom<u8> for TextureType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Color),
            1 => Ok(Self::Texture),
            2 => Ok(Self::Text),
            _ => Err(Error::UnknownDiscriminant {
                kind: "TextureType",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
    pub fill_type: f32,
    pub texture_type: u32,
    pub texture_slot: u32,
}

impl Vertex {
    /// The vertex in the interleaved 12-float layout.
    pub fn pack(&self) -> [f32; FLOATS_PER_VERTEX] {
        let [r, g, b, a] = Color::from(self.color).normalized();
        [
            self.position[0],
            self.position[1],
            0.0,
            self.uv[0],
            self.uv[1],
            self.fill_type,
            r,
            g,
            b,
            a,
            self.texture_type as f32,
            self.texture_slot as f32,
        ]
    }
}

/// A finished batch, ready for upload.
#[derive(Debug, Clone)]
pub struct Mesh<'f> {
    pub indices: &'f [u32],
    /// Interleaved vertices, [`FLOATS_PER_VERTEX`] floats each.
    pub floats: &'f [f32],
    /// Which sampler slot each texture must be bound to.
    pub textures: FxHashMap<TextureId, u32>,
}

impl Mesh<'_> {
    pub fn vertex_count(&self) -> usize {
        self.floats.len() / FLOATS_PER_VERTEX
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Debug)]
pub struct MeshBuilder<'a> {
    arena: &'a Arena,
    vertices: GrowableBuffer<'a, Vertex>,
    indices: GrowableBuffer<'a, u32>,
    textures: FxHashMap<TextureId, u32>,
    /// Applied to every position passed to [`MeshBuilder::add_vertex`].
    ///
    /// Positions are transformed as points (w = 1), so translations apply.
    /// Use a matrix without a translation part for a pure linear transform.
    pub matrix: Mat4,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_capacity(arena, 1000, 1000)
    }

    /// Uses chunks of `vertex_chunk` vertices and `index_chunk` indices.
    pub fn with_capacity(arena: &'a Arena, vertex_chunk: usize, index_chunk: usize) -> Self {
        Self {
            arena,
            vertices: GrowableBuffer::new(arena, vertex_chunk),
            indices: GrowableBuffer::new(arena, index_chunk),
            textures: FxHashMap::default(),
            matrix: Mat4::IDENTITY,
        }
    }

    /// Appends a vertex and returns its index in the current batch.
    pub fn add_vertex(
        &mut self,
        position: Vector2,
        uv: Vector2,
        color: Color,
        fill_type: f32,
        texture_type: TextureType,
        texture: Option<TextureId>,
    ) -> u32 {
        let index = self.vertices.len() as u32;
        let texture_slot = texture.map_or(0, |texture| self.texture_slot(texture));
        let transformed = self.matrix.transform_point3(Vec3::new(position.x, position.y, 0.0));

        self.vertices.add(Vertex {
            position: [transformed.x, transformed.y],
            uv: [uv.x, uv.y],
            color: color.to_bytes(),
            fill_type,
            texture_type: texture_type as u32,
            texture_slot,
        });
        index
    }

    pub fn add_triangle(&mut self, i1: u32, i2: u32, i3: u32) {
        self.indices.add(i1);
        self.indices.add(i2);
        self.indices.add(i3);
    }

    /// Slot of `texture`, registering it on first use.
    fn texture_slot(&mut self, texture: TextureId) -> u32 {
        if let Some(&slot) = self.textures.get(&texture) {
            return slot;
        }
        let slot = self.textures.values().max().map_or(0, |max| max + 1);
        self.textures.insert(texture, slot);
        slot
    }

    /// Whether `texture` fits into the current batch without exceeding the
    /// texture limit.
    pub fn texture_slot_available(&self, texture: TextureId) -> bool {
        self.textures.contains_key(&texture) || self.textures.len() < MAX_TEXTURES_PER_MESH
    }

    /// Packs the batch into the builder's own arena. See
    /// [`MeshBuilder::build_mesh_and_reset_in`].
    pub fn build_mesh_and_reset(&mut self) -> Result<Mesh<'a>> {
        let arena = self.arena;
        self.build_mesh_and_reset_in(arena)
    }

    /// Packs the batch into `out` and starts a new one.
    ///
    /// Fails with [`Error::TooManyTextures`] when more than
    /// [`MAX_TEXTURES_PER_MESH`] textures were registered. The batch is left
    /// untouched in that case.
    pub fn build_mesh_and_reset_in<'f>(&mut self, out: &'f Arena) -> Result<Mesh<'f>> {
        let count = self.textures.len();
        if count > MAX_TEXTURES_PER_MESH {
            tracing::warn!(count, max = MAX_TEXTURES_PER_MESH, "mesh references too many textures");
            return Err(Error::TooManyTextures {
                count,
                max: MAX_TEXTURES_PER_MESH,
            });
        }

        let floats = out.alloc_slice::<f32>(self.vertices.len() * FLOATS_PER_VERTEX);
        for (packed, vertex) in floats.chunks_exact_mut(FLOATS_PER_VERTEX).zip(self.vertices.iter()) {
            packed.copy_from_slice(&vertex.pack());
        }
        let indices = self.indices.to_slice_in(out);
        let textures = mem::take(&mut self.textures);

        self.vertices.clear();
        self.indices.clear();

        Ok(Mesh {
            indices,
            floats,
            textures,
        })
    }

    /// Drops the current batch without building it.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.textures.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
