/// Tunables for layout and mesh building.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Multiplier from logical to physical pixels, applied to pixel sizes.
    pub display_scale: f32,
    /// Pixels scrolled per unit of [`FrameInput::scroll_delta`](crate::engine::FrameInput::scroll_delta).
    pub scroll_speed: f32,
    /// Skip render commands for boxes entirely outside the viewport.
    pub culling: bool,
    pub vertex_chunk_capacity: usize,
    pub index_chunk_capacity: usize,
}

impl EngineConfig {
    pub const DEFAULT_SCROLL_SPEED: f32 = 20.0;
    pub const DEFAULT_CHUNK_CAPACITY: usize = 1000;

    #[inline]
    pub fn display_scale(&mut self, scale: f32) -> &mut Self {
        self.display_scale = scale;
        self
    }

    #[inline]
    pub fn scroll_speed(&mut self, speed: f32) -> &mut Self {
        self.scroll_speed = speed;
        self
    }

    #[inline]
    pub fn culling(&mut self, enabled: bool) -> &mut Self {
        self.culling = enabled;
        self
    }

    /// Items per chunk of the mesh builder's vertex and index buffers.
    #[inline]
    pub fn chunk_capacities(&mut self, vertices: usize, indices: usize) -> &mut Self {
        self.vertex_chunk_capacity = vertices;
        self.index_chunk_capacity = indices;
        self
    }

    #[inline]
    pub fn end(&self) -> Self {
        *self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_scale: 1.0,
            scroll_speed: Self::DEFAULT_SCROLL_SPEED,
            culling: true,
            vertex_chunk_capacity: Self::DEFAULT_CHUNK_CAPACITY,
            index_chunk_capacity: Self::DEFAULT_CHUNK_CAPACITY,
        }
    }
}
