#![forbid(unsafe_code)]

//! Core: geometry primitives and terminal capability descriptors.

pub mod caps;
pub mod geometry;
pub mod logging;

pub use caps::{ColorTiers, TermCaps};
pub use geometry::{GeometryError, Point, Rect, Size};
