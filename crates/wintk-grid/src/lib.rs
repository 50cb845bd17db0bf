#![forbid(unsafe_code)]

//! Styled character grids and compositing.
//!
//! A [`TextGrid`] is a dense rectangular buffer of [`Cell`]s. Grids are the
//! unit of exchange between drawables and the compositor: each drawable
//! renders into a grid matching its rectangle, and containers composite
//! child grids into their own, either opaquely ([`TextGrid::paint_hard`]) or
//! respecting per-field transparency ([`TextGrid::paint_transparent`]).

pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::{GridError, TextGrid};
