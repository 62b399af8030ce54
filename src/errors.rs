use thiserror::Error;

/// Maximum number of distinct textures one mesh may reference. Bound by the
/// sampler array size of the shader consuming the packed vertices.
pub const MAX_TEXTURES_PER_MESH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// More textures were registered in one batch than the shader has sampler slots for.
    #[error("maximum amount of textures per mesh is {max}, but {count} were registered")]
    TooManyTextures { count: usize, max: usize },
    /// A raw value did not name any variant of a closed enumeration.
    #[error("unknown {kind} discriminant: {value}")]
    UnknownDiscriminant { kind: &'static str, value: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
