#![forbid(unsafe_code)]

//! Terminal capability descriptors.
//!
//! A [`TermCaps`] describes what a connected terminal has declared support
//! for: its cell dimensions, the character encodings it accepts, and which
//! color tiers it can render. The codec uses the color tiers to decide when
//! a color statement must be downgraded before transmission.
//!
//! Capabilities are data, not detection: how a session discovers them
//! (negotiation, environment, probing) is the host's concern.

use crate::geometry::Size;

bitflags::bitflags! {
    /// Independent color-support flags a terminal may declare.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorTiers: u8 {
        /// Bright colors via the aixterm 90-97/100-107 codes.
        const AIXTERM    = 0b0000_0001;
        /// 256-color palette (`38;5;n` / `48;5;n`).
        const PALETTE    = 0b0000_0010;
        /// 24-bit true color (`38;2;r;g;b` / `48;2;r;g;b`).
        const TRUE_COLOR = 0b0000_0100;
        /// Bright backgrounds via the intensity bit (iCE colors).
        const ICE        = 0b0000_1000;
    }
}

/// What a target terminal declares it can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCaps {
    /// Cell dimensions of the terminal. Both >= 1 by construction.
    pub size: Size,
    /// Supported character encodings, most preferred first.
    pub encodings: Vec<String>,
    /// Declared color tiers.
    pub tiers: ColorTiers,
}

impl TermCaps {
    /// Create a descriptor with the given size and tiers and a UTF-8
    /// encoding list.
    pub fn new(size: Size, tiers: ColorTiers) -> Self {
        Self {
            size,
            encodings: vec!["UTF-8".to_string()],
            tiers,
        }
    }

    /// A modern terminal: every tier supported.
    pub fn modern(size: Size) -> Self {
        Self::new(size, ColorTiers::all())
    }

    /// A 256-color terminal without true color (classic xterm-256color).
    pub fn palette_256(size: Size) -> Self {
        Self::new(size, ColorTiers::AIXTERM | ColorTiers::PALETTE)
    }

    /// A 16-color terminal (basic xterm).
    pub fn basic_16(size: Size) -> Self {
        Self::new(size, ColorTiers::AIXTERM)
    }

    /// An 8-color terminal with no bright support at all.
    pub fn basic_8(size: Size) -> Self {
        Self::new(size, ColorTiers::empty())
    }

    /// Replace the encoding list, most preferred first.
    pub fn with_encodings<I, S>(mut self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encodings = encodings.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the terminal renders 24-bit color.
    #[inline]
    pub fn true_color(&self) -> bool {
        self.tiers.contains(ColorTiers::TRUE_COLOR)
    }

    /// Whether the terminal renders the 256-color palette.
    #[inline]
    pub fn palette(&self) -> bool {
        self.tiers.contains(ColorTiers::PALETTE)
    }

    /// Whether bright foregrounds can use the aixterm codes.
    #[inline]
    pub fn aixterm(&self) -> bool {
        self.tiers.contains(ColorTiers::AIXTERM)
    }

    /// Whether bright backgrounds can use the intensity bit.
    #[inline]
    pub fn ice_colors(&self) -> bool {
        self.tiers.contains(ColorTiers::ICE)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorTiers, TermCaps};
    use crate::geometry::Size;

    fn size() -> Size {
        Size::new(80, 24).unwrap()
    }

    #[test]
    fn modern_has_all_tiers() {
        let caps = TermCaps::modern(size());
        assert!(caps.true_color());
        assert!(caps.palette());
        assert!(caps.aixterm());
        assert!(caps.ice_colors());
    }

    #[test]
    fn palette_256_lacks_true_color() {
        let caps = TermCaps::palette_256(size());
        assert!(!caps.true_color());
        assert!(caps.palette());
        assert!(caps.aixterm());
        assert!(!caps.ice_colors());
    }

    #[test]
    fn basic_8_has_no_tiers() {
        let caps = TermCaps::basic_8(size());
        assert_eq!(caps.tiers, ColorTiers::empty());
    }

    #[test]
    fn default_encoding_is_utf8() {
        let caps = TermCaps::modern(size());
        assert_eq!(caps.encodings, vec!["UTF-8".to_string()]);
    }

    #[test]
    fn with_encodings_replaces_list() {
        let caps = TermCaps::basic_16(size()).with_encodings(["CP437", "US-ASCII"]);
        assert_eq!(caps.encodings, vec!["CP437", "US-ASCII"]);
    }

    #[test]
    fn tiers_are_independent() {
        let caps = TermCaps::new(size(), ColorTiers::TRUE_COLOR | ColorTiers::ICE);
        assert!(caps.true_color());
        assert!(!caps.palette());
        assert!(!caps.aixterm());
        assert!(caps.ice_colors());
    }
}
