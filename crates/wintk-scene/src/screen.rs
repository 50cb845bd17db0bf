#![forbid(unsafe_code)]

//! Terminal presenter.
//!
//! A [`Screen`] turns composited surfaces into the escape-sequence stream a
//! terminal needs to show them. It remembers the last frame it sent and
//! emits only the cells that changed, coalesced into per-row runs, each run
//! prefixed with one cursor-position sequence. Styles are downgraded to the
//! terminal's declared capabilities and compressed before serialization, so
//! the wire stream never carries attributes the terminal cannot render.
//!
//! The presenter owns no tree state. Callers take a
//! [`SceneTree::snapshot`](crate::tree::SceneTree::snapshot) under the tree
//! lock and serialize it here, outside the lock.

use std::io::{self, Write};

use wintk_core::{Point, TermCaps};
use wintk_grid::{Cell, TextGrid};
use wintk_sgr::{SgrStatement, StyleSet, compress, downgrade_all, serialize};

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const RESET: &str = "\x1b[0m";

/// Writes frame differences to a terminal byte sink.
pub struct Screen<W: Write> {
    sink: W,
    caps: TermCaps,
    last: Option<TextGrid>,
    cursor: Option<Point>,
}

impl<W: Write> Screen<W> {
    /// Create a presenter for a terminal with the given capabilities.
    pub fn new(sink: W, caps: TermCaps) -> Self {
        Self {
            sink,
            caps,
            last: None,
            cursor: None,
        }
    }

    /// The capability descriptor in use.
    #[inline]
    pub fn caps(&self) -> &TermCaps {
        &self.caps
    }

    /// Forget the last frame; the next present redraws everything.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Give back the byte sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Send `frame` to the terminal, drawing only what changed since the
    /// previous frame.
    ///
    /// When `cursor` is set the terminal's native cursor is parked there
    /// and shown; otherwise it stays hidden. Writes nothing at all when the
    /// frame and cursor are unchanged.
    pub fn present(&mut self, frame: &TextGrid, cursor: Option<Point>) -> io::Result<()> {
        let full = match &self.last {
            Some(last) => last.size() != frame.size(),
            None => true,
        };

        let mut out = String::new();
        let mut style: Option<Option<StyleSet>> = None;

        for y in 0..frame.height() {
            let mut x = 0;
            while x < frame.width() {
                if !self.cell_changed(frame, x, y, full) {
                    x += 1;
                    continue;
                }
                let start = x;
                out.push_str(&cup(start, y));
                while x < frame.width() && self.cell_changed(frame, x, y, full) {
                    let cell = frame.get(x, y).copied().unwrap_or(Cell::EMPTY);
                    if style != Some(cell.style) {
                        out.push_str(&self.style_sequence(cell.style.as_ref()));
                        style = Some(cell.style);
                    }
                    out.push(printable(cell));
                    x += 1;
                }
            }
        }

        if out.is_empty() && cursor == self.cursor && !full {
            return Ok(());
        }

        let mut bytes = String::with_capacity(out.len() + 32);
        bytes.push_str(HIDE_CURSOR);
        bytes.push_str(&out);
        bytes.push_str(RESET);
        if let Some(p) = cursor {
            bytes.push_str(&cup(p.x, p.y));
            bytes.push_str(SHOW_CURSOR);
        }
        self.sink.write_all(bytes.as_bytes())?;
        self.sink.flush()?;

        self.last = Some(frame.clone());
        self.cursor = cursor;
        Ok(())
    }

    fn cell_changed(&self, frame: &TextGrid, x: i32, y: i32, full: bool) -> bool {
        if full {
            return true;
        }
        match &self.last {
            Some(last) => last.get(x, y) != frame.get(x, y),
            None => true,
        }
    }

    /// The minimal sequence that puts the terminal in exactly `style`:
    /// reset, then the style's statements downgraded and compressed.
    fn style_sequence(&self, style: Option<&StyleSet>) -> String {
        let mut statements = vec![SgrStatement::Reset];
        if let Some(style) = style {
            statements.extend(downgrade_all(&style.statements(), &self.caps));
        }
        serialize(&compress(&statements))
    }
}

/// Cursor position sequence for a 0-based cell coordinate. The terminal
/// counts from 1.
fn cup(x: i32, y: i32) -> String {
    format!("\x1b[{};{}H", y.max(0) + 1, x.max(0) + 1)
}

/// The character actually sent for a cell. Empty cells paint as spaces and
/// control characters are never forwarded raw.
fn printable(cell: Cell) -> char {
    match cell.ch {
        Some(c) if cell.width() > 0 => c,
        _ => ' ',
    }
}
