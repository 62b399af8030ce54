//! A single import for building and rendering a frame.
//!
//! ```rust
//! use flexmesh::prelude::*;
//! ```

// Core types
pub use crate::arena::Arena;
pub use crate::config::EngineConfig;
pub use crate::engine::{FrameInput, LayoutEngine};
pub use crate::errors::{Error, Result};
pub use crate::id::ElementId;
pub use crate::mesh::{Mesh, MeshBuilder, TextureId};
pub use crate::renderer::DrawBatch;
pub use crate::FramePipeline;

// Element tree
pub use crate::color::Color;
pub use crate::elements::{CornerRadius, Element};
pub use crate::layout::{AbsolutePosition, Padding, Size};
pub use crate::math::{BoundingBox, Dimensions, Vector2};
pub use crate::text::{TextAlign, TextConfig};

// Text collaborators
pub use crate::text::{Glyph, GlyphAtlas, MonospaceMeasurer, TextMeasurer};

// Macros
pub use crate::{pct, px, shrink};

// Alignment, type only, NOT globbed: both enums share variant names
pub use crate::align::{CrossAxisAlignment, MainAxisAlignment};

// Direction, globbed
pub use crate::layout::Direction::{self, *};
