pub mod board;
mod common;
pub mod hex_grid;
pub mod level;
pub mod op;
pub mod prelude;

use self::board::{sys_board_cleared, sys_board_ops, BoardCleared, BoardOp, HapticPulse};
use self::level::{sys_level_ops, LevelDeck, LevelOp};
use self::prelude::*;

/// Scheduling landmarks for the core: ops mutate state first, outcomes (win
/// detection) resolve strictly after, within the same update.
#[derive(SystemSet, Clone, Debug, Eq, Hash, PartialEq)]
pub enum HexCoreSet {
    ProcessOps,
    Resolve,
}

#[derive(Debug)]
pub struct HexCorePlugin;

impl Plugin for HexCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelDeck>()
            .add_event::<Op<BoardOp>>()
            .add_event::<OpResult<BoardOp>>()
            .add_event::<Op<LevelOp>>()
            .add_event::<OpResult<LevelOp>>()
            .add_event::<HapticPulse>()
            .add_event::<BoardCleared>()
            .configure_sets(
                Update,
                (HexCoreSet::ProcessOps, HexCoreSet::Resolve).chain(),
            )
            .add_systems(
                Update,
                (
                    // Level rebuilds apply before activations so the two can
                    // never interleave within one update.
                    (sys_level_ops, sys_board_ops)
                        .chain()
                        .in_set(HexCoreSet::ProcessOps),
                    sys_board_cleared.in_set(HexCoreSet::Resolve),
                ),
            );
    }
}

/// Fetches an entity's item from a query, returning [`None`] (with a debug
/// assertion) when the entity is missing even though an invariant says it
/// shouldn't be.
#[macro_export]
macro_rules! get_assert {
    ($id:expr, $q:expr) => {{
        let id = $id;
        let res = $q.get(id);
        debug_assert!(res.is_ok(), "expected query to contain [{id:?}]");
        res.ok()
    }};
}

/// Mutable counterpart of [`get_assert`].
#[macro_export]
macro_rules! get_assert_mut {
    ($id:expr, $q:expr) => {{
        let id = $id;
        let res = $q.get_mut(id);
        debug_assert!(res.is_ok(), "expected query to contain [{id:?}]");
        res.ok()
    }};
}
