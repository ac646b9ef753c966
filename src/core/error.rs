//! Error types shared by the simulation and its data loaders.

use thiserror::Error;

/// Errors raised while loading data files or constructing game objects.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read or written.
    #[error("Failed to access file '{path}': {details}")]
    Io { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    Parse { path: String, details: String },

    /// A line in the control bindings file is not `NAME=<code>`.
    #[error("Invalid key binding on line {line}: '{text}'")]
    InvalidBinding { line: usize, text: String },

    /// A combo node is missing one of its transition targets.
    #[error("Combo node {node} has no target for input {input}")]
    IncompleteComboTable { node: String, input: String },

    /// A combo transition points at a node that was never defined.
    #[error("Combo node {node} references undefined node {target}")]
    UnknownComboNode { node: String, target: String },

    /// Terrain dimensions must be positive.
    #[error("Invalid terrain size {width}x{height}")]
    InvalidTerrainSize { width: i32, height: i32 },

    /// A game object was placed outside the terrain grid.
    #[error("Position ({x}, {y}) is outside the terrain")]
    OutOfBounds { x: i32, y: i32 },
}
