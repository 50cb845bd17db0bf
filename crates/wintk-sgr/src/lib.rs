#![forbid(unsafe_code)]

//! SGR (Select Graphic Rendition) codec.
//!
//! Escape sequences of the form `ESC [ p1 ; p2 ; ... m` are parsed into
//! structured [`SgrStatement`]s, accumulated into a [`StyleSet`] (at most one
//! active statement per category), compressed into a minimal canonical
//! statement list, and re-serialized. Color statements can be downgraded to
//! what a terminal's declared [`TermCaps`](wintk_core::TermCaps) can render.

pub mod downgrade;
pub mod emit;
pub mod parse;
pub mod state;
pub mod statement;

pub use downgrade::{downgrade, downgrade_all};
pub use emit::serialize;
pub use parse::{SgrParseError, parse};
pub use state::{StyleSet, compress};
pub use statement::{Blink, Color, Emphasis, Intensity, SgrCategory, SgrStatement, Underline};
