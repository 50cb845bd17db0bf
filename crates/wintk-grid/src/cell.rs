#![forbid(unsafe_code)]

//! Cell types and invariants.
//!
//! A [`Cell`] is one terminal character position: an optional glyph and an
//! optional style. Absence is meaningful on both fields independently -- a
//! cell with no glyph is see-through for its character during transparent
//! compositing, and a cell with no style inherits whatever style the
//! destination already has. A cell with both fields absent is fully
//! transparent.

use unicode_width::UnicodeWidthChar;
use wintk_sgr::StyleSet;

/// One character position: optional glyph plus optional style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    /// The glyph, or `None` for "no glyph here".
    pub ch: Option<char>,
    /// The style, or `None` for "inherit the destination's style".
    pub style: Option<StyleSet>,
}

impl Cell {
    /// The fully transparent cell: no glyph, no style.
    pub const EMPTY: Self = Self {
        ch: None,
        style: None,
    };

    /// Create a cell with both fields explicit.
    #[inline]
    pub const fn new(ch: Option<char>, style: Option<StyleSet>) -> Self {
        Self { ch, style }
    }

    /// Create an unstyled cell from a glyph.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch: Some(ch),
            style: None,
        }
    }

    /// Return a copy carrying the given style.
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: StyleSet) -> Self {
        self.style = Some(style);
        self
    }

    /// Whether the cell carries a glyph.
    #[inline]
    pub const fn has_glyph(&self) -> bool {
        self.ch.is_some()
    }

    /// Whether the cell carries a style.
    #[inline]
    pub const fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// Display width of the glyph in terminal columns.
    ///
    /// 0 for no glyph, 1 or 2 for printable characters, -1 for
    /// non-printable (control) code points, which a well-behaved drawable
    /// never emits.
    pub fn width(&self) -> i8 {
        match self.ch {
            None => 0,
            Some(c) => match c.width() {
                Some(w) => w as i8,
                None => -1,
            },
        }
    }
}
