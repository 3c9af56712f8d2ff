use std::collections::BTreeMap;
use std::fs::{read_dir, read_to_string};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, HexPiece, HexRule, InBoard, IsCleared, IsOn};
use crate::prelude::*;

pub mod key {
    use typed_key::{typed_key, Key};

    pub const LEVEL_INDEX: Key<usize> = typed_key!("level_index");
    pub const HEX_COUNT: Key<usize> = typed_key!("hex_count");
}

/// One authored cell. `row` and `col_in_row` order the cell within the
/// layout; the coordinate the engine plays on is assigned at build time (see
/// [`LevelDef::hex_entries`]). `display_id` names a sprite pair for the
/// presentation layer and is opaque here.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HexDef {
    pub row: u32,
    pub col_in_row: u32,
    pub rule: HexRule,
    #[serde(default)]
    pub is_on: bool,
    #[serde(default)]
    pub display_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LevelDef {
    #[serde(default)]
    pub name: Option<String>,
    pub hexes: Vec<HexDef>,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LevelDefError {
    #[error("row {row} holds {width} hexes, rows hold at most 3")]
    RowTooWide { row: u32, width: usize },
    #[error("duplicate hex at row {row}, column {col}")]
    DuplicateHex { row: u32, col: u32 },
}

impl LevelDef {
    /// Resolves authored descriptors into engine coordinates: descriptors
    /// group by row, sort by authored column, and take their 0-based rank
    /// within the row as `x`, with `y` the row index.
    ///
    /// Malformed layouts are rejected outright: a duplicate authored
    /// coordinate would otherwise silently drop a cell, and a row wider
    /// than three has no adjacency rules to play by.
    pub fn hex_entries(&self) -> Result<Vec<(IVec2, &HexDef)>, LevelDefError> {
        let mut rows: BTreeMap<u32, Vec<&HexDef>> = BTreeMap::new();
        for hex in &self.hexes {
            rows.entry(hex.row).or_default().push(hex);
        }
        let mut entries = Vec::with_capacity(self.hexes.len());
        for (row, mut hexes) in rows {
            if hexes.len() > 3 {
                return Err(LevelDefError::RowTooWide {
                    row,
                    width: hexes.len(),
                });
            }
            hexes.sort_by_key(|hex| hex.col_in_row);
            for pair in hexes.windows(2) {
                if pair[0].col_in_row == pair[1].col_in_row {
                    return Err(LevelDefError::DuplicateHex {
                        row,
                        col: pair[0].col_in_row,
                    });
                }
            }
            entries.extend(
                hexes
                    .into_iter()
                    .enumerate()
                    .map(|(x, hex)| (IVec2::new(x as i32, row as i32), hex)),
            );
        }
        Ok(entries)
    }

    pub fn validate(&self) -> Result<(), LevelDefError> {
        self.hex_entries().map(|_| ())
    }
}

/// The ordered set of levels available to play, plus which one is on the
/// board right now.
#[derive(Debug, Default, Resource, getset::CopyGetters)]
pub struct LevelDeck {
    levels: Vec<LevelDef>,
    #[getset(get_copy = "pub")]
    current: Option<usize>,
}

#[derive(Debug, Error)]
pub enum LevelLoadingError {
    #[error("io error reading level files: {0}")]
    Io(#[from] std::io::Error),
    #[error("level file [{path:?}] failed to parse: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LevelDeck {
    pub fn new(levels: Vec<LevelDef>) -> Self {
        LevelDeck {
            levels,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    /// Whether a [`LevelOp::LoadNext`] has somewhere to go.
    pub fn has_next(&self) -> bool {
        match self.current {
            Some(index) => index + 1 < self.levels.len(),
            None => !self.levels.is_empty(),
        }
    }

    /// Reads every `*.level.json` file directly under `dir`, one level per
    /// file, ordered by file name.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LevelLoadingError> {
        let mut paths: Vec<PathBuf> = read_dir(dir)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                let subextension = path
                    .file_stem()
                    .map(Path::new)
                    .and_then(Path::extension)
                    .and_then(|os_str| os_str.to_str());
                (path.is_file() && subextension == Some("level")).then_some(path)
            })
            .collect();
        paths.sort();
        let mut levels = Vec::with_capacity(paths.len());
        for path in paths {
            let contents = read_to_string(&path)?;
            let level = serde_json::from_str(&contents)
                .map_err(|source| LevelLoadingError::Parse {
                    path: path.clone(),
                    source,
                })?;
            levels.push(level);
        }
        Ok(LevelDeck::new(levels))
    }
}

/// Deck navigation. Every variant funnels into the same build path; a level
/// that fails validation leaves the board exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LevelOp {
    Load { index: usize },
    LoadNext,
    Restart,
}

impl OpSubtype for LevelOp {
    type Error = LevelOpError;
}

#[derive(Clone, Debug, Error)]
pub enum LevelOpError {
    #[error("actor is not in a board")]
    NotInBoard,
    #[error("board is missing its grid components")]
    NoBoard,
    #[error("level index {index} is out of range, the deck holds {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("no level after the current one")]
    NoNextLevel,
    #[error("no level loaded to restart")]
    NoLevelLoaded,
    #[error(transparent)]
    BadLevel(#[from] LevelDefError),
    #[error(transparent)]
    Metadata(#[from] MetadataErr),
}

pub fn sys_level_ops(
    mut commands: Commands,
    mut evr_ops: EventReader<Op<LevelOp>>,
    mut deck: ResMut<LevelDeck>,
    actors: Query<&InBoard>,
    mut boards: Query<(&mut HexGrid, &mut IsCleared), With<Board>>,
    mut evw_results: EventWriter<OpResult<LevelOp>>,
) {
    for op in evr_ops.read() {
        let result = load_level(
            *op.op(),
            op.source(),
            &mut commands,
            &mut deck,
            &actors,
            &mut boards,
        );
        if let Err(err) = &result {
            log::warn!("level op {:?} rejected: {err}", op.op());
        }
        evw_results.send(OpResult::new(op, result));
    }
}

fn load_level(
    op: LevelOp,
    source: Entity,
    commands: &mut Commands,
    deck: &mut LevelDeck,
    actors: &Query<&InBoard>,
    boards: &mut Query<(&mut HexGrid, &mut IsCleared), With<Board>>,
) -> Result<Metadata, LevelOpError> {
    let index = match op {
        LevelOp::Load { index } => index,
        LevelOp::LoadNext => match deck.current() {
            Some(current) => current + 1,
            None => 0,
        },
        LevelOp::Restart => deck.current().ok_or(LevelOpError::NoLevelLoaded)?,
    };
    if matches!(op, LevelOp::LoadNext) && index >= deck.len() {
        return Err(LevelOpError::NoNextLevel);
    }
    let &InBoard(board_id) = actors.get(source).map_err(|_| LevelOpError::NotInBoard)?;
    let (mut grid, mut cleared) = boards
        .get_mut(board_id)
        .map_err(|_| LevelOpError::NoBoard)?;
    let def = deck.get(index).ok_or(LevelOpError::OutOfRange {
        index,
        len: deck.len(),
    })?;
    // Validation comes before any despawn so a bad level leaves the previous
    // grid in play.
    let entries = def.hex_entries()?;

    let mut next_grid = HexGrid::new();
    for (pos, hex) in entries {
        let mut hex_commands = commands.spawn((hex.rule, IsOn(hex.is_on)));
        if let Some(display_id) = &hex.display_id {
            hex_commands.insert(HexPiece::new(display_id));
        }
        next_grid.place(pos, hex_commands.id());
    }
    let previous: Vec<Entity> = grid.hexes().collect();
    for hex_id in previous {
        commands.entity(hex_id).despawn();
    }
    let hex_count = next_grid.len();
    *grid = next_grid;
    **cleared = false;
    deck.current = Some(index);

    let mut metadata = Metadata::new();
    metadata.put(key::LEVEL_INDEX, index)?;
    metadata.put(key::HEX_COUNT, hex_count)?;
    Ok(metadata)
}
