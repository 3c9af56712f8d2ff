use thiserror::Error;

use super::{key, topology, Board, HapticPulse, HexRule, InBoard, IsOn};
use crate::prelude::*;

/// Things an actor can do to a board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoardOp {
    ActivateHex { pos: IVec2 },
}

impl OpSubtype for BoardOp {
    type Error = BoardOpError;
}

#[derive(Clone, Debug, Error)]
pub enum BoardOpError {
    #[error("actor is not in a board")]
    NotInBoard,
    #[error("board has no grid")]
    NoGrid,
    #[error("no hex at {0}")]
    NoHexAt(IVec2),
    #[error("hex at {0} is missing its cell components")]
    BrokenHex(IVec2),
    #[error(transparent)]
    Metadata(#[from] MetadataErr),
}

/// Applies activations: resolve the pressed cell's rule into an affected
/// set, flip it, then flip the pressed cell itself. Each elementary flip
/// pulses the haptics event once, so the pulse count is exactly the flip
/// count. An `Empty` cell flips twice (once as its own affected set, once
/// as the pressed cell) and lands back in the state it started in.
pub fn sys_board_ops(
    mut evr_ops: EventReader<Op<BoardOp>>,
    actors: Query<&InBoard>,
    boards: Query<&HexGrid, With<Board>>,
    mut hexes: Query<(&HexRule, &mut IsOn)>,
    mut evw_pulse: EventWriter<HapticPulse>,
    mut evw_results: EventWriter<OpResult<BoardOp>>,
) {
    for op in evr_ops.read() {
        let BoardOp::ActivateHex { pos } = *op.op();
        let result = activate_hex(
            pos,
            op.source(),
            &actors,
            &boards,
            &mut hexes,
            &mut evw_pulse,
        );
        if let Err(err) = &result {
            log::warn!("activation at {pos} rejected: {err}");
        }
        evw_results.send(OpResult::new(op, result));
    }
}

fn activate_hex(
    pos: IVec2,
    source: Entity,
    actors: &Query<&InBoard>,
    boards: &Query<&HexGrid, With<Board>>,
    hexes: &mut Query<(&HexRule, &mut IsOn)>,
    evw_pulse: &mut EventWriter<HapticPulse>,
) -> Result<Metadata, BoardOpError> {
    let &InBoard(board_id) = actors.get(source).map_err(|_| BoardOpError::NotInBoard)?;
    let grid = boards.get(board_id).map_err(|_| BoardOpError::NoGrid)?;
    let pressed_id = grid.hex_at(pos).ok_or(BoardOpError::NoHexAt(pos))?;
    let &rule = hexes
        .get(pressed_id)
        .map_err(|_| BoardOpError::BrokenHex(pos))?
        .0;

    let mut flipped = Vec::new();
    for target in affected_hexes(rule, pos, grid) {
        let Some(hex_id) = grid.hex_at(target) else {
            continue;
        };
        if let Some((_, mut is_on)) = get_assert_mut!(hex_id, hexes) {
            **is_on = !**is_on;
            evw_pulse.send(HapticPulse);
            flipped.push(target);
        }
    }

    // The pressed cell flips last, on top of any flip its own rule already
    // dealt it.
    let (_, mut is_on) = hexes
        .get_mut(pressed_id)
        .map_err(|_| BoardOpError::BrokenHex(pos))?;
    **is_on = !**is_on;
    evw_pulse.send(HapticPulse);
    flipped.push(pos);

    let mut metadata = Metadata::new();
    metadata.put(key::PRESSED, pos.to_array())?;
    metadata.put(
        key::FLIPPED,
        flipped.iter().map(|pt| pt.to_array()).collect::<Vec<_>>(),
    )?;
    Ok(metadata)
}

/// The coordinates a rule reaches beyond the pressed cell itself. `Empty`
/// deliberately targets the pressed cell: combined with the unconditional
/// final flip that nets out to no state change but two observable pulses.
fn affected_hexes(rule: HexRule, pos: IVec2, grid: &HexGrid) -> Vec<IVec2> {
    match rule {
        HexRule::Empty => vec![pos],
        HexRule::ToggleSelf => Vec::new(),
        HexRule::ToggleSelfAndDiagonals => topology::diagonals(grid, pos),
        HexRule::ToggleSelfAndTriangle => topology::triangle(grid, pos),
        HexRule::ToggleSelfAndNeighbours => topology::neighbours(grid, pos),
    }
}
