//! Per-frame flex layout and GPU mesh packing for immediate-mode UIs.
//!
//! Each frame the caller builds an [`Element`] tree, lays it out with a
//! [`LayoutEngine`], turns the result into [`RenderCommand`]s and tessellates
//! those into [`DrawBatch`]es of packed vertices. [`FramePipeline`] runs all
//! of it in one call.
//!
//! ```
//! use flexmesh::prelude::*;
//!
//! let chunks = Arena::new();
//! let mut frame = Arena::new();
//! let mut pipeline = FramePipeline::new(&chunks, EngineConfig::default());
//!
//! let mut root = Element::container()
//!     .padding(Padding::all(8.0))
//!     .background(Color::rgb(24, 24, 24))
//!     .child(Element::container().id("panel").size(px!(120.0), pct!(50.0)).background(Color::WHITE).end())
//!     .end();
//!
//! let batches = pipeline
//!     .run(&mut root, Dimensions::new(800.0, 600.0), &FrameInput::default(), &MonospaceMeasurer::default(), None, &frame)
//!     .unwrap();
//! assert_eq!(batches.len(), 1);
//! assert_eq!(
//!     pipeline.engine().bounds(ElementId::new("panel")),
//!     Some(BoundingBox::new(8.0, 8.0, 120.0, 292.0))
//! );
//!
//! drop(batches);
//! frame.reset();
//! ```

pub mod align;
pub mod arena;
pub mod color;
pub mod config;
pub mod elements;
pub mod engine;
pub mod errors;
pub mod flex;
pub mod growable_buffer;
pub mod id;
pub mod layout;
pub mod math;
pub mod mesh;
pub mod prelude;
pub mod render_commands;
pub mod renderer;
pub mod sizing;
pub mod text;

pub use arena::Arena;
pub use color::Color;
pub use config::EngineConfig;
pub use elements::Element;
pub use engine::{FrameInput, LayoutEngine};
pub use errors::{Error, Result};
pub use id::ElementId;
pub use math::{BoundingBox, Dimensions, Vector2};
pub use mesh::{Mesh, MeshBuilder, TextureId};
pub use render_commands::RenderCommand;
pub use renderer::DrawBatch;
pub use text::{GlyphAtlas, TextMeasurer};

/// Layout, render commands and meshes for one frame in a single call.
///
/// Holds the retained layout state and a mesh builder whose chunks live in
/// `'c`, so they are reused from frame to frame.
#[derive(Debug)]
pub struct FramePipeline<'c> {
    engine: LayoutEngine,
    builder: MeshBuilder<'c>,
}

impl<'c> FramePipeline<'c> {
    pub fn new(chunk_arena: &'c Arena, config: EngineConfig) -> Self {
        Self {
            builder: MeshBuilder::with_capacity(chunk_arena, config.vertex_chunk_capacity, config.index_chunk_capacity),
            engine: LayoutEngine::new(config),
        }
    }

    #[inline]
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    #[inline]
    pub fn engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.engine
    }

    /// The mesh builder, e.g. to set its transform matrix.
    #[inline]
    pub fn builder_mut(&mut self) -> &mut MeshBuilder<'c> {
        &mut self.builder
    }

    /// Lays out `root` and packs it into batches allocated in `frame_arena`.
    ///
    /// Text is drawn only when an `atlas` is given.
    pub fn run<'f>(
        &mut self,
        root: &mut Element,
        viewport: Dimensions,
        input: &FrameInput,
        measurer: &dyn TextMeasurer,
        atlas: Option<&dyn GlyphAtlas>,
        frame_arena: &'f Arena,
    ) -> Result<Vec<DrawBatch<'f>>> {
        self.engine.layout(root, viewport, input, measurer);
        let commands = render_commands::generate(root, viewport, self.engine.config().culling);
        renderer::build_batches(&commands, &mut self.builder, atlas, frame_arena)
    }
}
