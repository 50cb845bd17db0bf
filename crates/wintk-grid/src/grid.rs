#![forbid(unsafe_code)]

//! Grid storage and compositing.
//!
//! Cells are stored in row-major order: `index = y * width + x`, with
//! `0 <= x < width` and `0 <= y < height`. The dimensions come from a
//! [`Size`] and are therefore always at least 1x1.
//!
//! Compositing positions both grids by their own origin in a shared
//! coordinate space and copies over the rectangle intersection. Grids that
//! do not overlap at all produce [`GridError::Disjoint`]: a caller asking to
//! composite nothing is almost always holding a stale rectangle.

use wintk_core::{Point, Rect, Size};

use crate::cell::Cell;

/// Error produced by grid operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A cell address outside the grid.
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
    },
    /// A composite whose source and target share no cells.
    Disjoint,
}

impl core::fmt::Display for GridError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds { x, y } => write!(f, "cell ({x}, {y}) is outside the grid"),
            Self::Disjoint => write!(f, "source and target grids do not overlap"),
        }
    }
}

impl std::error::Error for GridError {}

/// A dense rectangular buffer of [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    size: Size,
    cells: Vec<Cell>,
}

impl TextGrid {
    /// Create a grid of fully transparent cells.
    pub fn new(size: Size) -> Self {
        Self::filled(size, Cell::EMPTY)
    }

    /// Create a grid with every cell set to `cell`.
    pub fn filled(size: Size, cell: Cell) -> Self {
        let len = size.area() as usize;
        Self {
            size,
            cells: vec![cell; len],
        }
    }

    /// Grid dimensions.
    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Width in cells.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.size.width()
    }

    /// Height in cells.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.size.height()
    }

    /// The grid's zero-origin bounding rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width() && y >= 0 && y < self.height() {
            Some(y as usize * self.width() as usize + x as usize)
        } else {
            None
        }
    }

    /// The cell at (x, y), or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Replace the cell at (x, y).
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), GridError> {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                Ok(())
            }
            None => Err(GridError::OutOfBounds { x, y }),
        }
    }

    /// Set every cell to `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Set every cell inside `region` (clipped to the grid) to `cell`.
    ///
    /// A region entirely outside the grid clears nothing.
    pub fn fill_region(&mut self, region: &Rect, cell: Cell) {
        let Some(clipped) = self.bounds().intersection(region) else {
            return;
        };
        for y in clipped.min_y()..=clipped.max_y() {
            let row = y as usize * self.width() as usize;
            let lo = row + clipped.min_x() as usize;
            let hi = row + clipped.max_x() as usize;
            self.cells[lo..=hi].fill(cell);
        }
    }

    /// Resize the grid, preserving the top-left-anchored intersection of the
    /// old content and clearing newly exposed cells.
    pub fn resize(&mut self, new_size: Size) {
        if new_size == self.size {
            return;
        }
        let mut cells = vec![Cell::EMPTY; new_size.area() as usize];
        let keep_w = self.width().min(new_size.width()) as usize;
        let keep_h = self.height().min(new_size.height()) as usize;
        for y in 0..keep_h {
            let old_lo = y * self.width() as usize;
            let new_lo = y * new_size.width() as usize;
            cells[new_lo..new_lo + keep_w].copy_from_slice(&self.cells[old_lo..old_lo + keep_w]);
        }
        self.size = new_size;
        self.cells = cells;
    }

    /// Copy `src` cells verbatim over the intersection of the two grids.
    ///
    /// Each grid is positioned by its own origin in a shared coordinate
    /// space; cells outside the intersection are untouched. Returns
    /// [`GridError::Disjoint`] when the grids share no cells.
    pub fn paint_hard(
        &mut self,
        self_at: Point,
        src: &TextGrid,
        src_at: Point,
    ) -> Result<(), GridError> {
        self.paint(self_at, src, src_at, |dst, s| *dst = *s)
    }

    /// As [`paint_hard`](Self::paint_hard), but a source cell's absent glyph
    /// and absent style are see-through per-field: the target keeps its
    /// existing glyph and/or style independently for each absent field.
    pub fn paint_transparent(
        &mut self,
        self_at: Point,
        src: &TextGrid,
        src_at: Point,
    ) -> Result<(), GridError> {
        self.paint(self_at, src, src_at, |dst, s| {
            if s.ch.is_some() {
                dst.ch = s.ch;
            }
            if s.style.is_some() {
                dst.style = s.style;
            }
        })
    }

    fn paint(
        &mut self,
        self_at: Point,
        src: &TextGrid,
        src_at: Point,
        merge: impl Fn(&mut Cell, &Cell),
    ) -> Result<(), GridError> {
        let target_rect = Rect::new(self_at, self.size);
        let src_rect = Rect::new(src_at, src.size);
        let overlap = target_rect
            .intersection(&src_rect)
            .ok_or(GridError::Disjoint)?;

        for y in overlap.min_y()..=overlap.max_y() {
            for x in overlap.min_x()..=overlap.max_x() {
                let src_cell = src
                    .get(x - src_at.x, y - src_at.y)
                    .copied()
                    .unwrap_or(Cell::EMPTY);
                if let Some(dst) = self.get_mut(x - self_at.x, y - self_at.y) {
                    merge(dst, &src_cell);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GridError, TextGrid};
    use crate::cell::Cell;
    use wintk_core::{Point, Rect, Size};
    use wintk_sgr::{Color, SgrStatement, StyleSet};

    fn size(w: i32, h: i32) -> Size {
        Size::new(w, h).unwrap()
    }

    fn style(fg: u8) -> StyleSet {
        StyleSet::new().with(SgrStatement::Foreground(Color::Standard(fg)))
    }

    #[test]
    fn new_grid_is_fully_transparent() {
        let grid = TextGrid::new(size(3, 2));
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(grid.get(x, y), Some(&Cell::EMPTY));
            }
        }
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut grid = TextGrid::new(size(4, 4));
        grid.set(2, 1, Cell::from_char('x')).unwrap();
        assert_eq!(grid.get(2, 1), Some(&Cell::from_char('x')));
    }

    #[test]
    fn set_out_of_bounds_is_an_error() {
        let mut grid = TextGrid::new(size(4, 4));
        assert_eq!(
            grid.set(4, 0, Cell::from_char('x')),
            Err(GridError::OutOfBounds { x: 4, y: 0 })
        );
        assert_eq!(
            grid.set(0, -1, Cell::from_char('x')),
            Err(GridError::OutOfBounds { x: 0, y: -1 })
        );
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let grid = TextGrid::new(size(2, 2));
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn fill_region_clips_to_bounds() {
        let mut grid = TextGrid::new(size(3, 3));
        let region = Rect::new(Point::new(2, 2), size(5, 5));
        grid.fill_region(&region, Cell::from_char('#'));
        assert_eq!(grid.get(2, 2), Some(&Cell::from_char('#')));
        assert_eq!(grid.get(1, 1), Some(&Cell::EMPTY));
    }

    #[test]
    fn fill_region_outside_bounds_is_a_no_op() {
        let mut grid = TextGrid::new(size(3, 3));
        let region = Rect::new(Point::new(10, 10), size(2, 2));
        grid.fill_region(&region, Cell::from_char('#'));
        assert_eq!(grid.get(0, 0), Some(&Cell::EMPTY));
    }

    #[test]
    fn resize_preserves_top_left_content() {
        let mut grid = TextGrid::new(size(3, 3));
        grid.set(0, 0, Cell::from_char('a')).unwrap();
        grid.set(2, 2, Cell::from_char('z')).unwrap();

        grid.resize(size(2, 2));
        assert_eq!(grid.get(0, 0), Some(&Cell::from_char('a')));
        assert_eq!(grid.get(2, 2), None);

        grid.resize(size(4, 4));
        assert_eq!(grid.get(0, 0), Some(&Cell::from_char('a')));
        // The cell dropped by the shrink stays gone, and exposed cells are
        // cleared.
        assert_eq!(grid.get(2, 2), Some(&Cell::EMPTY));
        assert_eq!(grid.get(3, 3), Some(&Cell::EMPTY));
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut grid = TextGrid::new(size(3, 3));
        grid.set(1, 1, Cell::from_char('k')).unwrap();
        grid.resize(size(3, 3));
        assert_eq!(grid.get(1, 1), Some(&Cell::from_char('k')));
    }

    #[test]
    fn paint_hard_copies_cells_verbatim() {
        // 3x1 source ["a"/red, "b"/none, "c"/blue] onto ["x","y","z"]:
        // style None is preserved, not defaulted.
        let mut target = TextGrid::new(size(3, 1));
        for (x, c) in ['x', 'y', 'z'].into_iter().enumerate() {
            target.set(x as i32, 0, Cell::from_char(c)).unwrap();
        }

        let mut src = TextGrid::new(size(3, 1));
        src.set(0, 0, Cell::from_char('a').with_style(style(1))).unwrap();
        src.set(1, 0, Cell::from_char('b')).unwrap();
        src.set(2, 0, Cell::from_char('c').with_style(style(4))).unwrap();

        target.paint_hard(Point::ZERO, &src, Point::ZERO).unwrap();

        assert_eq!(
            target.get(0, 0),
            Some(&Cell::from_char('a').with_style(style(1)))
        );
        assert_eq!(target.get(1, 0), Some(&Cell::from_char('b')));
        assert_eq!(
            target.get(2, 0),
            Some(&Cell::from_char('c').with_style(style(4)))
        );
    }

    #[test]
    fn paint_transparent_preserves_target_per_field() {
        let mut target = TextGrid::new(size(3, 1));
        target.set(0, 0, Cell::from_char('x')).unwrap();
        target
            .set(1, 0, Cell::from_char('y').with_style(style(2)))
            .unwrap();
        target.set(2, 0, Cell::from_char('z')).unwrap();

        let mut src = TextGrid::new(size(3, 1));
        src.set(0, 0, Cell::from_char('a').with_style(style(1))).unwrap();
        // Cell (1,0) stays fully transparent: neither glyph nor style.
        src.set(2, 0, Cell::from_char('c').with_style(style(4))).unwrap();

        target.paint_transparent(Point::ZERO, &src, Point::ZERO).unwrap();

        assert_eq!(
            target.get(0, 0),
            Some(&Cell::from_char('a').with_style(style(1)))
        );
        // Target keeps both its glyph and its prior style.
        assert_eq!(
            target.get(1, 0),
            Some(&Cell::from_char('y').with_style(style(2)))
        );
        assert_eq!(
            target.get(2, 0),
            Some(&Cell::from_char('c').with_style(style(4)))
        );
    }

    #[test]
    fn paint_transparent_fields_are_independent() {
        let mut target = TextGrid::new(size(1, 1));
        target
            .set(0, 0, Cell::from_char('t').with_style(style(2)))
            .unwrap();

        // Glyph without style: style is inherited from the target.
        let mut src = TextGrid::new(size(1, 1));
        src.set(0, 0, Cell::from_char('s')).unwrap();
        target.paint_transparent(Point::ZERO, &src, Point::ZERO).unwrap();
        assert_eq!(
            target.get(0, 0),
            Some(&Cell::from_char('s').with_style(style(2)))
        );

        // Style without glyph: glyph is inherited from the target.
        let mut src = TextGrid::new(size(1, 1));
        src.set(0, 0, Cell::new(None, Some(style(5)))).unwrap();
        target.paint_transparent(Point::ZERO, &src, Point::ZERO).unwrap();
        assert_eq!(
            target.get(0, 0),
            Some(&Cell::from_char('s').with_style(style(5)))
        );
    }

    #[test]
    fn paint_respects_offsets() {
        let mut target = TextGrid::new(size(4, 4));
        let mut src = TextGrid::new(size(2, 2));
        src.set(0, 0, Cell::from_char('p')).unwrap();
        src.set(1, 1, Cell::from_char('q')).unwrap();

        target.paint_hard(Point::ZERO, &src, Point::new(1, 2)).unwrap();
        assert_eq!(target.get(1, 2), Some(&Cell::from_char('p')));
        assert_eq!(target.get(2, 3), Some(&Cell::from_char('q')));
        assert_eq!(target.get(0, 0), Some(&Cell::EMPTY));
    }

    #[test]
    fn paint_partial_overlap_touches_only_intersection() {
        let mut target = TextGrid::new(size(2, 1));
        target.set(0, 0, Cell::from_char('x')).unwrap();
        target.set(1, 0, Cell::from_char('y')).unwrap();

        let mut src = TextGrid::new(size(2, 1));
        src.set(0, 0, Cell::from_char('a')).unwrap();
        src.set(1, 0, Cell::from_char('b')).unwrap();

        // Source shifted right by one: only its first column lands inside.
        target.paint_hard(Point::ZERO, &src, Point::new(1, 0)).unwrap();
        assert_eq!(target.get(0, 0), Some(&Cell::from_char('x')));
        assert_eq!(target.get(1, 0), Some(&Cell::from_char('a')));
    }

    #[test]
    fn paint_disjoint_grids_is_an_error() {
        let mut target = TextGrid::new(size(2, 2));
        let src = TextGrid::new(size(2, 2));
        assert_eq!(
            target.paint_hard(Point::ZERO, &src, Point::new(5, 5)),
            Err(GridError::Disjoint)
        );
        assert_eq!(
            target.paint_transparent(Point::ZERO, &src, Point::new(-2, 0)),
            Err(GridError::Disjoint)
        );
    }

    #[test]
    fn paint_is_idempotent() {
        let mut once = TextGrid::new(size(3, 3));
        let mut src = TextGrid::new(size(2, 2));
        src.set(0, 0, Cell::from_char('r').with_style(style(1))).unwrap();

        once.paint_hard(Point::ZERO, &src, Point::new(1, 1)).unwrap();
        let mut twice = once.clone();
        twice.paint_hard(Point::ZERO, &src, Point::new(1, 1)).unwrap();
        assert_eq!(once, twice);
    }
}
