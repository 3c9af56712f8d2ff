use crate::prelude::*;

/// Maps the coordinate space of one puzzle board to the cell entities that
/// occupy it.
///
/// Coordinates are `(x, y)` where `y` is the row index and `x` is the cell's
/// 0-based rank within its row. Rows hold between one and three cells, and
/// how many a given row holds changes the adjacency around it (see
/// [`board::topology`](crate::board::topology)), so per-row widths are
/// derived from the live key set rather than stored alongside it.
///
/// A grid is built whole by a level load and replaced whole by the next one;
/// nothing ever patches an installed grid cell-by-cell.
#[derive(Clone, Component, Debug, Default, Eq, PartialEq, Reflect)]
pub struct HexGrid {
    hexes: HashMap<IVec2, Entity>,
}

impl HexGrid {
    pub fn new() -> Self {
        HexGrid::default()
    }

    /// Number of cells on the board.
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    pub fn contains_point(&self, pt: IVec2) -> bool {
        self.hexes.contains_key(&pt)
    }

    /// The cell entity at `pt`, if that coordinate is part of the board.
    pub fn hex_at(&self, pt: IVec2) -> Option<Entity> {
        self.hexes.get(&pt).copied()
    }

    /// Places a cell entity at `pt`, returning any entity previously there.
    /// Level building validates against duplicates before placing, so the
    /// returned value is [`None`] on every well-formed build.
    pub fn place(&mut self, pt: IVec2, hex: Entity) -> Option<Entity> {
        self.hexes.insert(pt, hex)
    }

    /// Count of coordinates on row `y`. Recomputed on demand; the boards
    /// this game plays on are a couple dozen cells at most.
    pub fn row_width(&self, y: i32) -> usize {
        self.hexes.keys().filter(|pt| pt.y == y).count()
    }

    pub fn points(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.hexes.keys().copied()
    }

    pub fn hexes(&self) -> impl Iterator<Item = Entity> + '_ {
        self.hexes.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Entity)> + '_ {
        self.hexes.iter().map(|(pt, hex)| (*pt, *hex))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn place_and_look_up() {
        let mut grid = HexGrid::new();
        let hex = Entity::from_raw(1);

        assert_eq!(grid.place(IVec2::new(0, 0), hex), None);
        assert_eq!(grid.hex_at(IVec2::new(0, 0)), Some(hex));
        assert!(grid.contains_point(IVec2::new(0, 0)));
        assert!(!grid.contains_point(IVec2::new(1, 0)));
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_empty());
    }

    #[test]
    fn place_returns_displaced_entity() {
        let mut grid = HexGrid::new();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);

        grid.place(IVec2::new(2, 1), first);
        assert_eq!(grid.place(IVec2::new(2, 1), second), Some(first));
        assert_eq!(grid.hex_at(IVec2::new(2, 1)), Some(second));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn row_width_counts_only_that_row() {
        let mut grid = HexGrid::new();
        grid.place(IVec2::new(0, 0), Entity::from_raw(1));
        grid.place(IVec2::new(0, 1), Entity::from_raw(2));
        grid.place(IVec2::new(1, 1), Entity::from_raw(3));
        grid.place(IVec2::new(2, 1), Entity::from_raw(4));

        assert_eq!(grid.row_width(0), 1);
        assert_eq!(grid.row_width(1), 3);
        assert_eq!(grid.row_width(2), 0);
        assert_eq!(grid.row_width(-1), 0);
    }
}
