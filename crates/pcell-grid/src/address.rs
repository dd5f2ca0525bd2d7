//! View-relative cell coordinates.

/// A cell in the current view: `row` indexes the filtered rows, `col` the
/// visible columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddr {
    pub row: usize,
    pub col: usize,
}

impl CellAddr {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular selection spanned by an anchor and a moving focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: CellAddr,
    /// Opposite corner; may sit above or left of `anchor`.
    pub focus: CellAddr,
}

impl Selection {
    pub fn single(cell: CellAddr) -> Self {
        Self {
            anchor: cell,
            focus: cell,
        }
    }

    pub fn spanning(anchor: CellAddr, focus: CellAddr) -> Self {
        Self { anchor, focus }
    }

    pub fn top_left(&self) -> CellAddr {
        CellAddr::new(
            self.anchor.row.min(self.focus.row),
            self.anchor.col.min(self.focus.col),
        )
    }

    pub fn bottom_right(&self) -> CellAddr {
        CellAddr::new(
            self.anchor.row.max(self.focus.row),
            self.anchor.col.max(self.focus.col),
        )
    }

    pub fn height(&self) -> usize {
        self.bottom_right().row - self.top_left().row + 1
    }

    pub fn width(&self) -> usize {
        self.bottom_right().col - self.top_left().col + 1
    }

    /// Cells row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = CellAddr> {
        let (top, bottom) = (self.top_left(), self.bottom_right());
        (top.row..=bottom.row)
            .flat_map(move |row| (top.col..=bottom.col).map(move |col| CellAddr::new(row, col)))
    }
}
