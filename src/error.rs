//! Error types for the edges of the pipeline.
//!
//! The generation core (grammar, turtle, tessellators, assembler) cannot fail; it clamps
//! or ignores bad input instead. Errors only arise where data enters the crate from
//! outside: settings files and raw vertex data handed over by a scene loader.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading settings or importing external mesh data.
#[derive(Error, Debug)]
pub enum GroveError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    SettingsIo {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid TOML or does not match the schema.
    #[error("invalid settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Raw vertex data whose float count is not a whole number of vertices.
    #[error("raw vertex data has {floats} floats, expected a multiple of {stride}")]
    MalformedVertexData {
        /// Number of floats received.
        floats: usize,
        /// Floats per vertex.
        stride: usize,
    },

    /// Raw vertex data that does not form whole triangles.
    #[error("raw vertex data has {vertices} vertices, expected a multiple of 3")]
    IncompleteTriangle {
        /// Number of vertices received.
        vertices: usize,
    },
}

/// Shorthand for results carrying a [`GroveError`].
pub type Result<T> = std::result::Result<T, GroveError>;
