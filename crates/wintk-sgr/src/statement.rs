#![forbid(unsafe_code)]

//! Structured SGR statements.
//!
//! Each [`SgrStatement`] represents one complete style attribute change.
//! Statements are grouped into [`SgrCategory`]s; an accumulated style holds
//! at most one active statement per category, and applying a statement
//! replaces the previous statement of its category.

/// A color value as SGR can express it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// One of the 8 standard colors (index 0-7: black, red, green, yellow,
    /// blue, magenta, cyan, white).
    Standard(u8),
    /// One of the 8 bright colors (index 0-7, same hue order).
    Bright(u8),
    /// An index into the xterm 256-color palette.
    Palette(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
    /// The terminal's configured default.
    Default,
}

/// Text intensity (SGR 1 / 2 / 22).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intensity {
    /// Bold / increased intensity.
    Bold,
    /// Faint / decreased intensity.
    Faint,
    /// Normal intensity.
    Normal,
}

/// Typeface emphasis (SGR 3 / 20 / 23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// Italic.
    Italic,
    /// Fraktur / blackletter.
    Fraktur,
    /// No emphasis.
    Off,
}

/// Underline style (SGR 4 / 21 / 24).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Underline {
    /// Single underline.
    Single,
    /// Double underline.
    Double,
    /// No underline.
    Off,
}

/// Blink rate (SGR 5 / 6 / 25).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blink {
    /// Slow blink.
    Slow,
    /// Rapid blink.
    Rapid,
    /// No blink.
    Off,
}

/// One structured style attribute change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SgrStatement {
    /// SGR 0: clear every category.
    Reset,
    /// SGR 1/2/22.
    Intensity(Intensity),
    /// SGR 3/20/23.
    Emphasis(Emphasis),
    /// SGR 4/21/24.
    Underline(Underline),
    /// SGR 58/59: underline color.
    UnderlineColor(Color),
    /// SGR 5/6/25.
    Blink(Blink),
    /// SGR 7/27: reverse video.
    Invert(bool),
    /// SGR 8/28: concealed text.
    Conceal(bool),
    /// SGR 9/29: crossed-out text.
    Strike(bool),
    /// SGR 10-19: font selection (0 = primary, 1-9 = alternates).
    Font(u8),
    /// SGR 26/50: proportional spacing.
    Proportional(bool),
    /// SGR 30-39, 90-97, 38: foreground color.
    Foreground(Color),
    /// SGR 40-49, 100-107, 48: background color.
    Background(Color),
}

impl SgrStatement {
    /// The category this statement belongs to, or `None` for [`Reset`]
    /// (which clears every category rather than occupying one).
    ///
    /// [`Reset`]: SgrStatement::Reset
    pub const fn category(&self) -> Option<SgrCategory> {
        match self {
            Self::Reset => None,
            Self::Font(_) => Some(SgrCategory::Font),
            Self::Proportional(_) => Some(SgrCategory::Proportional),
            Self::Emphasis(_) => Some(SgrCategory::Emphasis),
            Self::Blink(_) => Some(SgrCategory::Blink),
            Self::Invert(_) => Some(SgrCategory::Invert),
            Self::Conceal(_) => Some(SgrCategory::Conceal),
            Self::Strike(_) => Some(SgrCategory::Strike),
            Self::Underline(_) => Some(SgrCategory::Underline),
            Self::UnderlineColor(_) => Some(SgrCategory::UnderlineColor),
            Self::Intensity(_) => Some(SgrCategory::Intensity),
            Self::Foreground(_) => Some(SgrCategory::Foreground),
            Self::Background(_) => Some(SgrCategory::Background),
        }
    }
}

/// Style categories, in canonical emission order.
///
/// The discriminant is the position in [`SgrCategory::ORDER`]; compression
/// emits statements in this order so output is deterministic regardless of
/// input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SgrCategory {
    /// Font selection.
    Font = 0,
    /// Proportional spacing.
    Proportional = 1,
    /// Italic/fraktur emphasis.
    Emphasis = 2,
    /// Blink rate.
    Blink = 3,
    /// Reverse video.
    Invert = 4,
    /// Concealed text.
    Conceal = 5,
    /// Crossed-out text.
    Strike = 6,
    /// Underline style.
    Underline = 7,
    /// Underline color.
    UnderlineColor = 8,
    /// Bold/faint intensity.
    Intensity = 9,
    /// Foreground color.
    Foreground = 10,
    /// Background color.
    Background = 11,
}

impl SgrCategory {
    /// Number of categories.
    pub const COUNT: usize = 12;

    /// Canonical emission order.
    pub const ORDER: [SgrCategory; Self::COUNT] = [
        Self::Font,
        Self::Proportional,
        Self::Emphasis,
        Self::Blink,
        Self::Invert,
        Self::Conceal,
        Self::Strike,
        Self::Underline,
        Self::UnderlineColor,
        Self::Intensity,
        Self::Foreground,
        Self::Background,
    ];

    /// Position in the canonical order.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}
