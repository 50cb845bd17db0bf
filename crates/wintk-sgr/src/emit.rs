#![forbid(unsafe_code)]

//! SGR sequence serialization.
//!
//! Turns statements back into a single `ESC [ p1 ; p2 ; ... m` sequence.
//! The output always carries exactly one trailing `m` and never a dangling
//! `;` before it. Serialization is total: every representable statement has
//! an encoding.
//!
//! Round-trip note: underline colors have no short standard/bright codes, so
//! `UnderlineColor(Standard(n))` and `UnderlineColor(Bright(n))` are encoded
//! through the palette (`58;5;n` / `58;5;n+8`). Re-parsing yields the
//! palette form, which is the same color.

use core::fmt::Write as _;

use crate::statement::{Blink, Color, Emphasis, Intensity, SgrStatement, Underline};

/// Serialize statements into one SGR escape sequence.
///
/// An empty slice serializes to the reset sequence `ESC [ 0 m`, the only
/// sensible "no statements" wire form.
pub fn serialize(statements: &[SgrStatement]) -> String {
    if statements.is_empty() {
        return "\x1b[0m".to_string();
    }

    let mut params: Vec<u16> = Vec::with_capacity(statements.len() * 2);
    for statement in statements {
        push_params(statement, &mut params);
    }

    let mut out = String::with_capacity(params.len() * 4 + 3);
    out.push('\x1b');
    out.push('[');
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        // Writing a u16 into a String cannot fail.
        let _ = write!(out, "{p}");
    }
    out.push('m');
    out
}

fn push_params(statement: &SgrStatement, params: &mut Vec<u16>) {
    match statement {
        SgrStatement::Reset => params.push(0),
        SgrStatement::Intensity(Intensity::Bold) => params.push(1),
        SgrStatement::Intensity(Intensity::Faint) => params.push(2),
        SgrStatement::Intensity(Intensity::Normal) => params.push(22),
        SgrStatement::Emphasis(Emphasis::Italic) => params.push(3),
        SgrStatement::Emphasis(Emphasis::Fraktur) => params.push(20),
        SgrStatement::Emphasis(Emphasis::Off) => params.push(23),
        SgrStatement::Underline(Underline::Single) => params.push(4),
        SgrStatement::Underline(Underline::Double) => params.push(21),
        SgrStatement::Underline(Underline::Off) => params.push(24),
        SgrStatement::Blink(Blink::Slow) => params.push(5),
        SgrStatement::Blink(Blink::Rapid) => params.push(6),
        SgrStatement::Blink(Blink::Off) => params.push(25),
        SgrStatement::Invert(true) => params.push(7),
        SgrStatement::Invert(false) => params.push(27),
        SgrStatement::Conceal(true) => params.push(8),
        SgrStatement::Conceal(false) => params.push(28),
        SgrStatement::Strike(true) => params.push(9),
        SgrStatement::Strike(false) => params.push(29),
        SgrStatement::Font(n) => {
            debug_assert!(*n <= 9, "font index out of range");
            params.push(10 + u16::from((*n).min(9)));
        }
        SgrStatement::Proportional(true) => params.push(26),
        SgrStatement::Proportional(false) => params.push(50),
        SgrStatement::Foreground(color) => push_color(color, 30, 38, 39, 90, params),
        SgrStatement::Background(color) => push_color(color, 40, 48, 49, 100, params),
        SgrStatement::UnderlineColor(color) => match color {
            Color::Standard(n) => {
                debug_assert!(*n <= 7, "standard color index out of range");
                params.extend([58, 5, u16::from((*n).min(7))]);
            }
            Color::Bright(n) => {
                debug_assert!(*n <= 7, "bright color index out of range");
                params.extend([58, 5, u16::from((*n).min(7)) + 8]);
            }
            Color::Palette(p) => params.extend([58, 5, u16::from(*p)]),
            Color::Rgb(r, g, b) => {
                params.extend([58, 2, u16::from(*r), u16::from(*g), u16::from(*b)]);
            }
            Color::Default => params.push(59),
        },
    }
}

fn push_color(color: &Color, base: u16, ext: u16, default: u16, bright: u16, params: &mut Vec<u16>) {
    match color {
        Color::Standard(n) => {
            debug_assert!(*n <= 7, "standard color index out of range");
            params.push(base + u16::from((*n).min(7)));
        }
        Color::Bright(n) => {
            debug_assert!(*n <= 7, "bright color index out of range");
            params.push(bright + u16::from((*n).min(7)));
        }
        Color::Palette(p) => params.extend([ext, 5, u16::from(*p)]),
        Color::Rgb(r, g, b) => {
            params.extend([ext, 2, u16::from(*r), u16::from(*g), u16::from(*b)]);
        }
        Color::Default => params.push(default),
    }
}
