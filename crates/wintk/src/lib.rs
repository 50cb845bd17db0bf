#![forbid(unsafe_code)]

//! wintk public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a small
//! prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use wintk_core::{ColorTiers, GeometryError, Point, Rect, Size, TermCaps};

// --- Codec re-exports ------------------------------------------------------

pub use wintk_sgr::{
    Blink, Color, Emphasis, Intensity, SgrCategory, SgrParseError, SgrStatement, StyleSet,
    Underline, compress, downgrade, downgrade_all, parse, serialize,
};

// --- Grid re-exports -------------------------------------------------------

pub use wintk_grid::{Cell, GridError, TextGrid};

// --- Scene re-exports ------------------------------------------------------

pub use wintk_scene::{
    AttachOptions, CursorMode, Drawable, NodeId, Priority, SceneTree, Screen, SharedDrawable,
    TreeConfig, TreeError, WeakDrawable, share,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for wintk apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while writing to the terminal.
    Io(std::io::Error),
    /// Geometry rejected at construction.
    Geometry(GeometryError),
    /// Tree or compositor failure.
    Tree(TreeError),
    /// Malformed escape sequence.
    Sgr(SgrParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Geometry(err) => write!(f, "{err}"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::Sgr(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Geometry(err) => Some(err),
            Self::Tree(err) => Some(err),
            Self::Sgr(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<SgrParseError> for Error {
    fn from(err: SgrParseError) -> Self {
        Self::Sgr(err)
    }
}

/// Standard result type for wintk APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AttachOptions, Cell, Drawable, Error, Point, Priority, Rect, Result, SceneTree, Screen,
        SharedDrawable, Size, StyleSet, TermCaps, TextGrid, share,
    };

    pub use crate::{core, grid, scene, sgr};
}

pub use wintk_core as core;
pub use wintk_grid as grid;
pub use wintk_scene as scene;
pub use wintk_sgr as sgr;
