use serde::{Deserialize, Serialize};

use crate::prelude::*;

mod board_op;
pub mod topology;

pub use board_op::{sys_board_ops, BoardOp, BoardOpError};

/// Marker for a puzzle board entity. A playable board also carries a
/// [`HexGrid`] and an [`IsCleared`] latch (see [`BoardBundle`]).
#[derive(Clone, Component, Copy, Debug, Default, Reflect)]
pub struct Board;

/// Indicates this actor drives the given board.
#[derive(Component, Debug, Deref, DerefMut)]
pub struct InBoard(pub Entity);

/// Per-cell toggle rule: which cells react when this one is activated.
///
/// `Empty` is not a dead cell. Activating one runs the full flip path with
/// the cell itself as the sole target, so its state nets out unchanged while
/// still pulsing feedback twice (see `board_op`).
#[derive(Clone, Component, Copy, Debug, Deserialize, Eq, PartialEq, Reflect, Serialize)]
pub enum HexRule {
    Empty,
    ToggleSelf,
    ToggleSelfAndDiagonals,
    ToggleSelfAndTriangle,
    ToggleSelfAndNeighbours,
}

/// Lit state of one cell. Only the board-op system writes this.
#[derive(Component, Debug, Default, Deref, DerefMut, Reflect)]
pub struct IsOn(pub bool);

/// Win latch. Set once per transition into the all-off state, reset by a
/// level load.
#[derive(Component, Debug, Default, Deref, DerefMut, Reflect)]
pub struct IsCleared(pub bool);

/// Presentation hook carried by cells authored with a display id. The core
/// never reads it.
#[derive(Component, Debug, Reflect, getset::Getters)]
pub struct HexPiece {
    #[getset(get = "pub")]
    display_id: String,
}

impl HexPiece {
    pub fn new(display_id: &str) -> Self {
        HexPiece {
            display_id: display_id.to_owned(),
        }
    }
}

#[derive(Bundle, Debug, Default)]
pub struct BoardBundle {
    board_marker: Board,
    grid: HexGrid,
    cleared: IsCleared,
}

/// Fired once per elementary flip. The haptics service listens for these;
/// the pulse count per activation is part of the engine's contract.
#[derive(Clone, Copy, Debug, Default, Event)]
pub struct HapticPulse;

/// Fired when a board transitions into the all-off state.
#[derive(Clone, Copy, Debug, Deref, Event)]
pub struct BoardCleared(pub Entity);

pub mod key {
    use typed_key::{typed_key, Key};

    pub const PRESSED: Key<[i32; 2]> = typed_key!("pressed");
    pub const FLIPPED: Key<Vec<[i32; 2]>> = typed_key!("flipped");
}

/// True when every cell of `grid` reads as off. Vacuously true for an empty
/// grid.
pub fn board_is_cleared<F: Fn(Entity) -> Option<bool>>(grid: &HexGrid, is_on: F) -> bool {
    grid.hexes().all(|hex| is_on(hex) == Some(false))
}

/// Re-evaluates the win condition for every board touched by a successful
/// activation this update. Runs after the op systems so it sees the settled
/// state of the frame.
pub fn sys_board_cleared(
    mut evr_results: EventReader<OpResult<BoardOp>>,
    actors: Query<&InBoard>,
    mut boards: Query<(Entity, &HexGrid, &mut IsCleared), With<Board>>,
    hexes: Query<&IsOn>,
    mut evw_cleared: EventWriter<BoardCleared>,
) {
    for op_result in evr_results.read() {
        if !op_result.is_ok() {
            continue;
        }
        let Ok(&InBoard(board_id)) = actors.get(op_result.source().source()) else {
            continue;
        };
        let Ok((board_id, grid, mut cleared)) = boards.get_mut(board_id) else {
            continue;
        };
        if **cleared {
            continue;
        }
        if board_is_cleared(grid, |hex| get_assert!(hex, hexes).map(|is_on| is_on.0)) {
            **cleared = true;
            evw_cleared.send(BoardCleared(board_id));
        }
    }
}
