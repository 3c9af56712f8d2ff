//! Coordinate resolution for the irregular hex packing.
//!
//! Boards are authored as stacked rows of one, two or three cells, offset
//! from each other like hexagonal packing. There is no closed formula for
//! "the cell up-left of me": which offsets are meaningful depends on the
//! width of the cell's own row and of the rows one and two steps away, so
//! every resolver here starts from the pressed cell's row width and builds a
//! candidate offset list for that case.
//!
//! All resolvers are pure reads of the grid. They return coordinates in
//! candidate-table order, deduplicated, never including the origin, and
//! filtered to cells actually on the board. Running off an edge is
//! expected, not an error.

use crate::prelude::*;

type Offset = (i32, i32);

fn at(pos: IVec2, (dx, dy): Offset) -> IVec2 {
    IVec2::new(pos.x + dx, pos.y + dy)
}

/// Resolves candidate offsets against the live grid: absolute coordinates,
/// absent cells dropped, duplicates collapsed.
fn resolve(grid: &HexGrid, pos: IVec2, offsets: &[Offset]) -> Vec<IVec2> {
    let mut out = Vec::with_capacity(offsets.len());
    for &offset in offsets {
        let pt = at(pos, offset);
        if grid.contains_point(pt) && !out.contains(&pt) {
            out.push(pt);
        }
    }
    out
}

// A row relates to the row two above it through the row between them; how
// the pair of intervening widths reads decides which long vertical offsets
// line up. The same classification runs downward with the rows below.

fn is_top_middle(grid: &HexGrid, y: i32) -> bool {
    matches!(
        (grid.row_width(y - 1), grid.row_width(y - 2)),
        (2, 3) | (3, 2)
    )
}

fn is_top_left(grid: &HexGrid, y: i32) -> bool {
    matches!(
        (grid.row_width(y - 1), grid.row_width(y - 2)),
        (2, 1) | (1, 2)
    )
}

fn is_bottom_middle(grid: &HexGrid, y: i32) -> bool {
    matches!(
        (grid.row_width(y + 1), grid.row_width(y + 2)),
        (2, 3) | (3, 2)
    )
}

fn is_bottom_left(grid: &HexGrid, y: i32) -> bool {
    matches!(
        (grid.row_width(y + 1), grid.row_width(y + 2)),
        (2, 1) | (1, 2)
    )
}

/// Cells diagonally touching `pos`.
pub fn diagonals(grid: &HexGrid, pos: IVec2) -> Vec<IVec2> {
    let IVec2 { x, y } = pos;
    let mut offsets: Vec<Offset> = Vec::new();
    match grid.row_width(y) {
        1 => offsets.extend([(0, -1), (1, -1), (0, 1), (1, 1)]),
        2 => {
            offsets.extend([(0, -1), (1, -1), (0, 1), (1, 1)]);
            if grid.row_width(y - 1) < 3 && grid.contains_point(IVec2::new(x - 1, y - 1)) {
                offsets.push((-1, -1));
            }
            if grid.row_width(y + 1) < 3 && grid.contains_point(IVec2::new(x - 1, y + 1)) {
                offsets.push((-1, 1));
            }
        },
        3 => match x {
            0 => offsets.extend([(0, -1), (0, 1)]),
            1 => offsets.extend([(-1, -1), (0, -1), (-1, 1), (0, 1)]),
            _ => offsets.extend([(-1, -1), (-1, 1)]),
        },
        _ => {},
    }
    resolve(grid, pos, &offsets)
}

/// Cells forming a triangle with `pos`: a width-dependent local spread plus
/// at most one capping cell two rows up (see `top_hex_offset`).
pub fn triangle(grid: &HexGrid, pos: IVec2) -> Vec<IVec2> {
    let IVec2 { x, y } = pos;
    let mut offsets: Vec<Offset> = Vec::new();
    match grid.row_width(y) {
        1 => offsets.extend([(0, 1), (1, 1)]),
        2 => {
            offsets.extend([(0, -2), (0, 1), (1, 1)]);
            if grid.row_width(y + 1) < 3 && grid.contains_point(IVec2::new(x - 1, y + 1)) {
                offsets.push((-1, 1));
            }
        },
        3 => {
            if is_top_left(grid, y) && grid.contains_point(IVec2::new(x - 1, y - 2)) {
                offsets.push((-1, -2));
            } else if is_top_middle(grid, y) && grid.contains_point(IVec2::new(x, y - 2)) {
                offsets.push((0, -2));
            }
            match x {
                0 => offsets.push((0, 1)),
                1 => offsets.extend([(-1, 1), (0, 1)]),
                _ => offsets.push((-1, 1)),
            }
        },
        _ => {},
    }
    if let Some(top_hex) = top_hex_offset(grid, pos) {
        offsets.push(top_hex);
    }
    resolve(grid, pos, &offsets)
}

/// The one cell two rows up that caps a triangle, probed in a
/// width-dependent priority order. At most one candidate is taken.
fn top_hex_offset(grid: &HexGrid, pos: IVec2) -> Option<Offset> {
    let IVec2 { x, y } = pos;
    let candidates: &[Offset] = match grid.row_width(y) {
        1 => &[(1, -2), (0, -2)],
        2 => &[(0, -2), (-1, -2)],
        3 => match x {
            0 => &[(-1, -2), (0, -2)],
            1 => &[(-1, -2), (0, -2), (1, -2)],
            _ => &[(1, -2), (0, -2)],
        },
        _ => &[],
    };
    candidates
        .iter()
        .copied()
        .find(|&offset| grid.contains_point(at(pos, offset)))
}

/// Every cell surrounding `pos`, including the vertically-aligned cells two
/// rows away when the intervening widths line them up.
pub fn neighbours(grid: &HexGrid, pos: IVec2) -> Vec<IVec2> {
    let IVec2 { x, y } = pos;
    let mut offsets: Vec<Offset> = Vec::new();
    match grid.row_width(y) {
        1 => {
            offsets.extend([(0, 1), (1, 1), (0, -1), (1, -1)]);
            if is_top_left(grid, y) {
                offsets.push((0, -2));
            } else if is_top_middle(grid, y) {
                offsets.push((1, -2));
            }
            if is_bottom_left(grid, y) {
                offsets.push((0, 2));
            } else if is_bottom_middle(grid, y) {
                offsets.push((1, 2));
            }
        },
        2 => {
            offsets.extend([(0, 1), (1, 1), (0, -1), (1, -1), (0, -2), (0, 2)]);
            if grid.row_width(y - 1) < 3 {
                offsets.push((-1, -1));
            }
            if grid.row_width(y + 1) < 3 {
                offsets.push((-1, 1));
            }
        },
        3 => {
            if is_top_middle(grid, y) {
                offsets.push((0, -2));
            } else if is_top_left(grid, y) {
                offsets.push((-1, -2));
            }
            offsets.extend([(0, 1), (0, -1)]);
            if x > 0 {
                offsets.extend([(-1, 1), (-1, -1)]);
            }
            if is_bottom_middle(grid, y) {
                offsets.push((0, 2));
            } else if is_bottom_left(grid, y) {
                offsets.push((-1, 2));
            }
        },
        _ => {},
    }
    resolve(grid, pos, &offsets)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Builds a grid shaped by per-row widths, rows indexed from 0.
    fn grid_of_rows(widths: &[usize]) -> HexGrid {
        let mut grid = HexGrid::new();
        let mut raw = 0;
        for (y, &width) in widths.iter().enumerate() {
            for x in 0..width {
                grid.place(IVec2::new(x as i32, y as i32), Entity::from_raw(raw));
                raw += 1;
            }
        }
        grid
    }

    fn pts(pairs: &[(i32, i32)]) -> Vec<IVec2> {
        pairs.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[test]
    fn diagonals_from_a_single_cell_row() {
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(
            diagonals(&grid, IVec2::new(0, 0)),
            pts(&[(0, 1), (1, 1)]),
            "upward candidates fall off the board, downward ones stay"
        );
        assert_eq!(
            diagonals(&grid, IVec2::new(0, 4)),
            pts(&[(0, 3), (1, 3)])
        );
    }

    #[test]
    fn diagonals_from_a_two_cell_row_reach_left_past_narrow_rows() {
        // Rows [1, 2, 1]: the right-hand cell of the middle row leans left
        // over both single-cell rows.
        let grid = grid_of_rows(&[1, 2, 1]);
        assert_eq!(
            diagonals(&grid, IVec2::new(1, 1)),
            pts(&[(0, 0), (0, 2)])
        );
        // Against a three-wide row below, the leftward candidate is not
        // offered.
        let pyramid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(
            diagonals(&pyramid, IVec2::new(0, 1)),
            pts(&[(0, 0), (0, 2), (1, 2)])
        );
    }

    #[test]
    fn diagonals_from_a_three_cell_row_split_by_column() {
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(diagonals(&grid, IVec2::new(0, 2)), pts(&[(0, 1), (0, 3)]));
        assert_eq!(
            diagonals(&grid, IVec2::new(1, 2)),
            pts(&[(0, 1), (1, 1), (0, 3), (1, 3)])
        );
        assert_eq!(diagonals(&grid, IVec2::new(2, 2)), pts(&[(1, 1), (1, 3)]));
    }

    #[test]
    fn triangle_from_the_apex_points_down() {
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(triangle(&grid, IVec2::new(0, 0)), pts(&[(0, 1), (1, 1)]));
    }

    #[test]
    fn triangle_two_wide_collapses_duplicate_top_candidates() {
        // At (0, 3) the (0, -2) local candidate and the probed top hex are
        // the same cell; it must appear once.
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(triangle(&grid, IVec2::new(0, 3)), pts(&[(0, 1), (0, 4)]));
    }

    #[test]
    fn triangle_three_wide_over_a_narrowing_top() {
        // Rows [1, 2, 3]: widths above row 2 read (2, 1), so the row is
        // top-left and the upward candidate is (-1, -2). With no row below,
        // the downward spread is gone and the apex is all that's left.
        let grid = grid_of_rows(&[1, 2, 3]);
        assert_eq!(triangle(&grid, IVec2::new(1, 2)), pts(&[(0, 0)]));
    }

    #[test]
    fn triangle_three_wide_over_a_middle_top() {
        // Rows [3, 2, 3]: widths above row 2 read (2, 3), so the row is
        // top-middle; the straight-up candidate joins the probed top hex.
        let grid = grid_of_rows(&[3, 2, 3]);
        assert_eq!(
            triangle(&grid, IVec2::new(1, 2)),
            pts(&[(1, 0), (0, 0)])
        );
    }

    #[test]
    fn neighbours_of_the_apex_include_the_lined_up_far_row() {
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(
            neighbours(&grid, IVec2::new(0, 0)),
            pts(&[(0, 1), (1, 1), (1, 2)])
        );
        assert_eq!(
            neighbours(&grid, IVec2::new(0, 4)),
            pts(&[(0, 3), (1, 3), (1, 2)])
        );
    }

    #[test]
    fn neighbours_from_a_two_cell_row() {
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(
            neighbours(&grid, IVec2::new(0, 1)),
            pts(&[(0, 2), (1, 2), (0, 0), (0, 3)])
        );
    }

    #[test]
    fn neighbours_from_the_middle_of_a_three_cell_row() {
        let grid = grid_of_rows(&[1, 2, 3, 2, 1]);
        assert_eq!(
            neighbours(&grid, IVec2::new(1, 2)),
            pts(&[(0, 0), (1, 3), (1, 1), (0, 3), (0, 1), (0, 4)])
        );
    }

    #[test]
    fn resolvers_never_return_absent_cells_or_the_origin() {
        for widths in [
            &[1, 2, 3, 2, 1][..],
            &[3, 2, 3][..],
            &[2, 3, 2][..],
            &[1][..],
            &[2, 1, 2][..],
        ] {
            let grid = grid_of_rows(widths);
            for pos in grid.points() {
                for related in [
                    diagonals(&grid, pos),
                    triangle(&grid, pos),
                    neighbours(&grid, pos),
                ] {
                    for pt in related {
                        assert!(grid.contains_point(pt), "{pt} is not on the board");
                        assert_ne!(pt, pos, "a resolver returned its own origin");
                    }
                }
            }
        }
    }
}
