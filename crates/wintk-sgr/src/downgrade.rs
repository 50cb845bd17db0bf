#![forbid(unsafe_code)]

//! Capability-aware color downgrade.
//!
//! Terminals declare their color tiers in [`TermCaps`]; a statement using a
//! tier the target cannot render is mapped to the nearest color the target
//! can show. "Nearest" minimizes squared Euclidean RGB distance over the 16
//! reference colors (8 standard + 8 bright), ties broken by first match in
//! enumeration order (standard 0-7, then bright 0-7).
//!
//! Bright colors need extra care: without aixterm codes a bright foreground
//! becomes its standard hue plus an explicit bold intensity statement, and
//! without iCE colors a bright background does the same.

use smallvec::{SmallVec, smallvec};
use wintk_core::TermCaps;

use crate::statement::{Color, Intensity, SgrStatement};

/// Reference RGB values for the 8 standard colors (black, red, green,
/// yellow, blue, magenta, cyan, white).
pub const STANDARD_RGB: [(u8, u8, u8); 8] = [
    (0, 0, 0),
    (170, 0, 0),
    (0, 170, 0),
    (170, 85, 0),
    (0, 0, 170),
    (170, 0, 170),
    (0, 170, 170),
    (170, 170, 170),
];

/// Reference RGB values for the 8 bright colors, same hue order.
pub const BRIGHT_RGB: [(u8, u8, u8); 8] = [
    (85, 85, 85),
    (255, 85, 85),
    (85, 255, 85),
    (255, 255, 85),
    (85, 85, 255),
    (255, 85, 255),
    (85, 255, 255),
    (255, 255, 255),
];

/// Downgrade one statement to what `caps` can render.
///
/// Non-color statements pass through unchanged. A single input can expand to
/// two outputs (bright fallback adds an intensity statement), never more.
pub fn downgrade(statement: SgrStatement, caps: &TermCaps) -> SmallVec<[SgrStatement; 2]> {
    match statement {
        SgrStatement::Foreground(color) => {
            match resolve(color, caps) {
                // Bright foregrounds need the aixterm codes; otherwise fall
                // back to the standard hue driven bold.
                Color::Bright(n) if !caps.aixterm() => smallvec![
                    SgrStatement::Intensity(Intensity::Bold),
                    SgrStatement::Foreground(Color::Standard(n)),
                ],
                resolved => smallvec![SgrStatement::Foreground(resolved)],
            }
        }
        SgrStatement::Background(color) => match resolve(color, caps) {
            Color::Bright(n) if !caps.ice_colors() => smallvec![
                SgrStatement::Intensity(Intensity::Bold),
                SgrStatement::Background(Color::Standard(n)),
            ],
            resolved => smallvec![SgrStatement::Background(resolved)],
        },
        SgrStatement::UnderlineColor(color) => {
            // Underline color only exists as an extended (38/48/58-family)
            // sequence; a terminal with neither palette nor true color
            // cannot express it at all, so the statement collapses to the
            // default underline color.
            if !caps.palette() && !caps.true_color() {
                smallvec![SgrStatement::UnderlineColor(Color::Default)]
            } else {
                smallvec![SgrStatement::UnderlineColor(resolve(color, caps))]
            }
        }
        other => smallvec![other],
    }
}

/// Downgrade a statement sequence, preserving order.
pub fn downgrade_all(statements: &[SgrStatement], caps: &TermCaps) -> Vec<SgrStatement> {
    statements
        .iter()
        .flat_map(|s| downgrade(*s, caps))
        .collect()
}

/// Map a color onto the best tier `caps` supports.
///
/// Palette indices 0-15 normalize to their standard/bright equivalents
/// before any tier check, so the bright fallbacks above apply uniformly.
fn resolve(color: Color, caps: &TermCaps) -> Color {
    match normalize(color) {
        Color::Rgb(r, g, b) => {
            if caps.true_color() {
                Color::Rgb(r, g, b)
            } else if caps.palette() {
                normalize(Color::Palette(nearest_palette(r, g, b)))
            } else {
                nearest_16(r, g, b)
            }
        }
        Color::Palette(p) => {
            if caps.palette() {
                Color::Palette(p)
            } else {
                let (r, g, b) = palette_rgb(p);
                nearest_16(r, g, b)
            }
        }
        normalized => normalized,
    }
}

#[inline]
fn normalize(color: Color) -> Color {
    match color {
        Color::Palette(p) if p < 8 => Color::Standard(p),
        Color::Palette(p) if p < 16 => Color::Bright(p - 8),
        other => other,
    }
}

#[inline]
fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> i64 {
    let dr = a.0 as i64 - b.0 as i64;
    let dg = a.1 as i64 - b.1 as i64;
    let db = a.2 as i64 - b.2 as i64;
    dr * dr + dg * dg + db * db
}

/// Nearest of the 16 reference colors. First match wins ties.
pub fn nearest_16(r: u8, g: u8, b: u8) -> Color {
    let target = (r, g, b);
    let mut best = Color::Standard(0);
    let mut best_d = i64::MAX;
    for (i, &rgb) in STANDARD_RGB.iter().enumerate() {
        let d = distance(target, rgb);
        if d < best_d {
            best_d = d;
            best = Color::Standard(i as u8);
        }
    }
    for (i, &rgb) in BRIGHT_RGB.iter().enumerate() {
        let d = distance(target, rgb);
        if d < best_d {
            best_d = d;
            best = Color::Bright(i as u8);
        }
    }
    best
}

/// Nearest entry in the xterm 256-color palette. First match wins ties.
pub fn nearest_palette(r: u8, g: u8, b: u8) -> u8 {
    let target = (r, g, b);
    let mut best = 0u8;
    let mut best_d = i64::MAX;
    for i in 0..=255u8 {
        let d = distance(target, palette_rgb(i));
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// RGB value of an xterm 256-color palette entry.
///
/// 0-15 use the reference tables above, 16-231 the 6x6x6 color cube,
/// 232-255 the 24-step grayscale ramp.
pub fn palette_rgb(index: u8) -> (u8, u8, u8) {
    const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];
    match index {
        0..=7 => STANDARD_RGB[index as usize],
        8..=15 => BRIGHT_RGB[index as usize - 8],
        16..=231 => {
            let i = index as usize - 16;
            (CUBE[i / 36], CUBE[(i / 6) % 6], CUBE[i % 6])
        }
        232..=255 => {
            let level = 8 + 10 * (index - 232);
            (level, level, level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{downgrade, downgrade_all, nearest_16, palette_rgb};
    use crate::statement::{Color, Intensity, SgrStatement, Underline};
    use wintk_core::{Size, TermCaps};

    fn caps(f: fn(Size) -> TermCaps) -> TermCaps {
        f(Size::new(80, 24).unwrap())
    }

    #[test]
    fn true_color_passes_through_on_modern_terminal() {
        let out = downgrade(
            SgrStatement::Foreground(Color::Rgb(170, 0, 0)),
            &caps(TermCaps::modern),
        );
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::Foreground(Color::Rgb(170, 0, 0))]
        );
    }

    #[test]
    fn rgb_maps_to_standard_red_without_any_palette() {
        // The canonical example: RGB(170,0,0) is exactly the standard red
        // reference value.
        let out = downgrade(
            SgrStatement::Foreground(Color::Rgb(170, 0, 0)),
            &caps(TermCaps::basic_16),
        );
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::Foreground(Color::Standard(1))]
        );
    }

    #[test]
    fn rgb_maps_to_palette_on_256_color_terminal() {
        let out = downgrade(
            SgrStatement::Foreground(Color::Rgb(0, 95, 135)),
            &caps(TermCaps::palette_256),
        );
        // Exact cube entry: 16 + 0*36 + 1*6 + 2 = 24.
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::Foreground(Color::Palette(24))]
        );
    }

    #[test]
    fn low_palette_indices_normalize_to_named_colors() {
        let out = downgrade(
            SgrStatement::Foreground(Color::Palette(1)),
            &caps(TermCaps::modern),
        );
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::Foreground(Color::Standard(1))]
        );

        let out = downgrade(
            SgrStatement::Foreground(Color::Palette(9)),
            &caps(TermCaps::modern),
        );
        assert_eq!(out.as_slice(), &[SgrStatement::Foreground(Color::Bright(1))]);
    }

    #[test]
    fn bright_foreground_without_aixterm_gains_bold() {
        let out = downgrade(
            SgrStatement::Foreground(Color::Bright(4)),
            &caps(TermCaps::basic_8),
        );
        assert_eq!(
            out.as_slice(),
            &[
                SgrStatement::Intensity(Intensity::Bold),
                SgrStatement::Foreground(Color::Standard(4)),
            ]
        );
    }

    #[test]
    fn bright_background_without_ice_gains_bold() {
        // basic_16 has aixterm but not iCE: bright fg passes, bright bg
        // falls back.
        let c = caps(TermCaps::basic_16);
        let fg = downgrade(SgrStatement::Foreground(Color::Bright(2)), &c);
        assert_eq!(fg.as_slice(), &[SgrStatement::Foreground(Color::Bright(2))]);

        let bg = downgrade(SgrStatement::Background(Color::Bright(2)), &c);
        assert_eq!(
            bg.as_slice(),
            &[
                SgrStatement::Intensity(Intensity::Bold),
                SgrStatement::Background(Color::Standard(2)),
            ]
        );
    }

    #[test]
    fn bright_background_with_ice_passes_through() {
        let out = downgrade(
            SgrStatement::Background(Color::Bright(5)),
            &caps(TermCaps::modern),
        );
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::Background(Color::Bright(5))]
        );
    }

    #[test]
    fn underline_color_collapses_without_extended_support() {
        let out = downgrade(
            SgrStatement::UnderlineColor(Color::Rgb(10, 20, 30)),
            &caps(TermCaps::basic_16),
        );
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::UnderlineColor(Color::Default)]
        );
    }

    #[test]
    fn underline_color_downgrades_to_palette() {
        let out = downgrade(
            SgrStatement::UnderlineColor(Color::Rgb(255, 255, 255)),
            &caps(TermCaps::palette_256),
        );
        assert_eq!(
            out.as_slice(),
            &[SgrStatement::UnderlineColor(Color::Bright(7))]
        );
    }

    #[test]
    fn non_color_statements_pass_through() {
        let out = downgrade(
            SgrStatement::Underline(Underline::Double),
            &caps(TermCaps::basic_8),
        );
        assert_eq!(out.as_slice(), &[SgrStatement::Underline(Underline::Double)]);
    }

    #[test]
    fn nearest_16_prefers_first_on_tie() {
        // Equidistant from standard black (0,0,0) is impossible to contrive
        // exactly among distinct entries with this metric and table, but the
        // exact reference values must map to themselves.
        assert_eq!(nearest_16(0, 0, 0), Color::Standard(0));
        assert_eq!(nearest_16(255, 255, 255), Color::Bright(7));
        assert_eq!(nearest_16(170, 85, 0), Color::Standard(3));
    }

    #[test]
    fn palette_rgb_cube_and_grayscale() {
        assert_eq!(palette_rgb(16), (0, 0, 0));
        assert_eq!(palette_rgb(231), (255, 255, 255));
        assert_eq!(palette_rgb(232), (8, 8, 8));
        assert_eq!(palette_rgb(255), (238, 238, 238));
        assert_eq!(palette_rgb(1), (170, 0, 0));
    }

    #[test]
    fn downgrade_all_preserves_order() {
        let input = [
            SgrStatement::Reset,
            SgrStatement::Foreground(Color::Bright(1)),
            SgrStatement::Background(Color::Rgb(170, 0, 0)),
        ];
        let out = downgrade_all(&input, &caps(TermCaps::basic_8));
        assert_eq!(
            out,
            vec![
                SgrStatement::Reset,
                SgrStatement::Intensity(Intensity::Bold),
                SgrStatement::Foreground(Color::Standard(1)),
                SgrStatement::Background(Color::Standard(1)),
            ]
        );
    }
}
