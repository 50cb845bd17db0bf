#![forbid(unsafe_code)]

//! Accumulated style state and statement compression.
//!
//! A [`StyleSet`] holds at most one active statement per category. Applying
//! a statement overwrites the prior statement of its category; applying
//! `Reset` clears every category. The same type serves as the per-cell style
//! in the grid and as the caller-owned accumulator on the emission path --
//! there is no shared singleton.

use crate::statement::{SgrCategory, SgrStatement};

/// A set of active style statements, one slot per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleSet {
    slots: [Option<SgrStatement>; SgrCategory::COUNT],
}

impl StyleSet {
    /// The style with no active statements.
    pub const EMPTY: Self = Self {
        slots: [None; SgrCategory::COUNT],
    };

    /// Create an empty style.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Apply one statement.
    ///
    /// Overwrites the previous statement of the same category. `Reset`
    /// clears all categories.
    pub fn apply(&mut self, statement: SgrStatement) {
        match statement.category() {
            Some(category) => self.slots[category.index()] = Some(statement),
            None => self.clear(),
        }
    }

    /// Builder form of [`apply`](Self::apply).
    #[must_use]
    pub fn with(mut self, statement: SgrStatement) -> Self {
        self.apply(statement);
        self
    }

    /// The active statement for a category, if any.
    #[inline]
    pub fn get(&self, category: SgrCategory) -> Option<SgrStatement> {
        self.slots[category.index()]
    }

    /// Whether no category is active.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Forget every active statement.
    pub fn clear(&mut self) {
        self.slots = [None; SgrCategory::COUNT];
    }

    /// Active statements in canonical category order.
    pub fn statements(&self) -> Vec<SgrStatement> {
        SgrCategory::ORDER
            .iter()
            .filter_map(|c| self.slots[c.index()])
            .collect()
    }
}

impl FromIterator<SgrStatement> for StyleSet {
    fn from_iter<T: IntoIterator<Item = SgrStatement>>(iter: T) -> Self {
        let mut style = Self::new();
        for statement in iter {
            style.apply(statement);
        }
        style
    }
}

/// Compress a statement sequence into its minimal canonical equivalent.
///
/// 1. Everything before the last `Reset` is discarded; the `Reset` itself
///    becomes the leading statement of the output (the new baseline).
/// 2. Of the remaining statements, only the last per category survives.
/// 3. Categories are emitted in [`SgrCategory::ORDER`], so equal inputs in
///    any order produce identical output.
///
/// The function is idempotent: `compress(&compress(s)) == compress(s)`.
pub fn compress(statements: &[SgrStatement]) -> Vec<SgrStatement> {
    let baseline = statements
        .iter()
        .rposition(|s| matches!(s, SgrStatement::Reset));

    let (reset, tail) = match baseline {
        Some(i) => (true, &statements[i + 1..]),
        None => (false, statements),
    };

    let style: StyleSet = tail.iter().copied().collect();

    let mut out = Vec::with_capacity(style.statements().len() + 1);
    if reset {
        out.push(SgrStatement::Reset);
    }
    out.extend(style.statements());
    out
}

#[cfg(test)]
mod tests {
    use super::{StyleSet, compress};
    use crate::statement::{Blink, Color, Emphasis, Intensity, SgrCategory, SgrStatement};

    #[test]
    fn apply_overwrites_same_category() {
        let mut style = StyleSet::new();
        style.apply(SgrStatement::Foreground(Color::Standard(1)));
        style.apply(SgrStatement::Foreground(Color::Rgb(0, 0, 255)));
        assert_eq!(
            style.get(SgrCategory::Foreground),
            Some(SgrStatement::Foreground(Color::Rgb(0, 0, 255)))
        );
        assert_eq!(style.statements().len(), 1);
    }

    #[test]
    fn apply_keeps_other_categories() {
        let style = StyleSet::new()
            .with(SgrStatement::Intensity(Intensity::Bold))
            .with(SgrStatement::Background(Color::Palette(7)));
        assert!(style.get(SgrCategory::Intensity).is_some());
        assert!(style.get(SgrCategory::Background).is_some());
        assert!(style.get(SgrCategory::Foreground).is_none());
    }

    #[test]
    fn reset_clears_all_categories() {
        let mut style = StyleSet::new()
            .with(SgrStatement::Intensity(Intensity::Bold))
            .with(SgrStatement::Foreground(Color::Standard(2)));
        style.apply(SgrStatement::Reset);
        assert!(style.is_empty());
    }

    #[test]
    fn statements_follow_canonical_order() {
        // Applied in scrambled order; emitted in canonical order.
        let style = StyleSet::new()
            .with(SgrStatement::Background(Color::Standard(4)))
            .with(SgrStatement::Font(1))
            .with(SgrStatement::Intensity(Intensity::Bold))
            .with(SgrStatement::Blink(Blink::Slow));
        assert_eq!(
            style.statements(),
            vec![
                SgrStatement::Font(1),
                SgrStatement::Blink(Blink::Slow),
                SgrStatement::Intensity(Intensity::Bold),
                SgrStatement::Background(Color::Standard(4)),
            ]
        );
    }

    #[test]
    fn compress_discards_everything_before_last_reset() {
        let input = [
            SgrStatement::Intensity(Intensity::Bold),
            SgrStatement::Foreground(Color::Standard(1)),
            SgrStatement::Reset,
            SgrStatement::Emphasis(Emphasis::Italic),
        ];
        assert_eq!(
            compress(&input),
            vec![
                SgrStatement::Reset,
                SgrStatement::Emphasis(Emphasis::Italic)
            ]
        );
    }

    #[test]
    fn compress_keeps_last_per_category() {
        let input = [
            SgrStatement::Foreground(Color::Standard(1)),
            SgrStatement::Intensity(Intensity::Bold),
            SgrStatement::Foreground(Color::Standard(2)),
            SgrStatement::Foreground(Color::Bright(3)),
        ];
        assert_eq!(
            compress(&input),
            vec![
                SgrStatement::Intensity(Intensity::Bold),
                SgrStatement::Foreground(Color::Bright(3)),
            ]
        );
    }

    #[test]
    fn compress_without_reset_has_no_leading_reset() {
        let input = [SgrStatement::Strike(true)];
        assert_eq!(compress(&input), vec![SgrStatement::Strike(true)]);
    }

    #[test]
    fn compress_trailing_reset_collapses_to_reset() {
        let input = [
            SgrStatement::Intensity(Intensity::Bold),
            SgrStatement::Reset,
        ];
        assert_eq!(compress(&input), vec![SgrStatement::Reset]);
    }

    #[test]
    fn compress_empty_input() {
        assert!(compress(&[]).is_empty());
    }

    #[test]
    fn compress_is_idempotent_on_example() {
        let input = [
            SgrStatement::Foreground(Color::Rgb(9, 9, 9)),
            SgrStatement::Reset,
            SgrStatement::Background(Color::Palette(3)),
            SgrStatement::Intensity(Intensity::Faint),
            SgrStatement::Background(Color::Default),
        ];
        let once = compress(&input);
        assert_eq!(compress(&once), once);
    }
}
