//! Error types for Artillery

use thiserror::Error;

/// The main error type for Artillery operations
#[derive(Debug, Error)]
pub enum ArtilleryError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed mesh: {0}")]
    MalformedMesh(MeshDefect),

    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// What is wrong with a mesh whose outline cannot be traced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshDefect {
    #[error("triangle references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("edge {a}-{b} is shared by more than two triangles")]
    NonManifoldEdge { a: u32, b: u32 },

    #[error("vertex {vertex} has more than one outgoing boundary edge")]
    BranchingVertex { vertex: u32 },

    #[error("boundary walk reached vertex {vertex}, which has no outgoing edge")]
    MissingEdge { vertex: u32 },

    #[error("boundary walk from vertex {start} did not close after {steps} steps")]
    UnclosedLoop { start: u32, steps: usize },
}

/// Result type alias for Artillery operations
pub type Result<T> = std::result::Result<T, ArtilleryError>;

impl From<MeshDefect> for ArtilleryError {
    fn from(defect: MeshDefect) -> Self {
        ArtilleryError::MalformedMesh(defect)
    }
}

impl From<toml::de::Error> for ArtilleryError {
    fn from(err: toml::de::Error) -> Self {
        ArtilleryError::TomlParseError(err.to_string())
    }
}
