//! Immutable terrain grid and per-lane spawn tables.

use nexus_lanes_core::{lane_for_column, CellCoord, Lane, TerrainKind, BOARD_COLUMNS};

const STANDARD_LAYOUT: [&str; 8] = [
    "NNINNINN", "BBIBBIBB", "CCICCICC", "KKIKKIKK", "POIPPIOP", "PPIOPIPP", "PPIPPIPP",
    "NNINNINN",
];

/// Reasons a glyph grid could not be turned into a board.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Boards need a monster nexus row, a hero nexus row and room between them.
    #[error("board needs at least 3 rows, found {0}")]
    TooFewRows(usize),
    /// Every row must span exactly the lane layout width.
    #[error("row {row} has {width} cells, expected {expected}")]
    RowWidth {
        /// Offending row.
        row: usize,
        /// Cells found in the row.
        width: usize,
        /// Cells every row must have.
        expected: u32,
    },
    /// The glyph does not name a terrain kind.
    #[error("unknown terrain glyph `{glyph}` at row {row}, column {column}")]
    UnknownGlyph {
        /// Row of the glyph.
        row: usize,
        /// Column of the glyph.
        column: usize,
        /// Glyph that failed to parse.
        glyph: char,
    },
    /// A spawn table entry does not fit the lane it was declared for.
    #[error("{role} cell {cell} for {lane} must be an accessible cell of that lane on row {row}")]
    MisplacedSpawn {
        /// Hero home or monster spawn.
        role: &'static str,
        /// Lane the entry belongs to.
        lane: Lane,
        /// Declared cell.
        cell: CellCoord,
        /// Row the entry must sit on.
        row: u32,
    },
}

/// Terrain grid plus the hero home and monster spawn cell of every lane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: u32,
    terrain: Vec<TerrainKind>,
    hero_homes: [CellCoord; 3],
    monster_spawns: [CellCoord; 3],
}

impl Board {
    /// Parses a glyph grid, row 0 first, and validates the spawn tables.
    ///
    /// `hero_homes` and `monster_spawns` are indexed by [`Lane::index`].
    pub fn from_glyph_rows<S: AsRef<str>>(
        rows: &[S],
        hero_homes: [CellCoord; 3],
        monster_spawns: [CellCoord; 3],
    ) -> Result<Self, BoardError> {
        if rows.len() < 3 {
            return Err(BoardError::TooFewRows(rows.len()));
        }

        let mut terrain = Vec::with_capacity(rows.len() * BOARD_COLUMNS as usize);
        for (row, line) in rows.iter().enumerate() {
            let glyphs: Vec<char> = line.as_ref().trim().chars().collect();
            if glyphs.len() != BOARD_COLUMNS as usize {
                return Err(BoardError::RowWidth {
                    row,
                    width: glyphs.len(),
                    expected: BOARD_COLUMNS,
                });
            }
            for (column, glyph) in glyphs.into_iter().enumerate() {
                let kind = TerrainKind::from_glyph(glyph).ok_or(BoardError::UnknownGlyph {
                    row,
                    column,
                    glyph,
                })?;
                terrain.push(kind);
            }
        }

        let board = Self {
            rows: rows.len() as u32,
            terrain,
            hero_homes,
            monster_spawns,
        };
        board.validate_spawn_table("hero home", hero_homes, board.last_row())?;
        board.validate_spawn_table("monster spawn", monster_spawns, 0)?;
        Ok(board)
    }

    /// The 8×8 three-lane layout: monster nexus on row 0, then bush, cave and
    /// koulou bands, plain ground with a few obstacles, and the hero nexus on
    /// row 7. Heroes start on the left column of each lane, monsters on the
    /// right column.
    #[must_use]
    pub fn standard() -> Self {
        let homes = Lane::ALL.map(|lane| CellCoord::new(lane.columns()[0], 7));
        let spawns = Lane::ALL.map(|lane| CellCoord::new(lane.columns()[1], 0));
        let terrain = STANDARD_LAYOUT
            .iter()
            .flat_map(|row| row.chars())
            .filter_map(TerrainKind::from_glyph)
            .collect();
        Self {
            rows: STANDARD_LAYOUT.len() as u32,
            terrain,
            hero_homes: homes,
            monster_spawns: spawns,
        }
    }

    fn validate_spawn_table(
        &self,
        role: &'static str,
        cells: [CellCoord; 3],
        row: u32,
    ) -> Result<(), BoardError> {
        for (lane, cell) in Lane::ALL.into_iter().zip(cells) {
            let fits = cell.row() == row
                && lane_for_column(cell.column()) == Some(lane)
                && self.is_accessible(cell)
                && self.terrain(cell) != Some(TerrainKind::Obstacle);
            if !fits {
                return Err(BoardError::MisplacedSpawn {
                    role,
                    lane,
                    cell,
                    row,
                });
            }
        }
        Ok(())
    }

    /// Number of columns, always [`BOARD_COLUMNS`].
    #[must_use]
    pub const fn columns(&self) -> u32 {
        BOARD_COLUMNS
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Index of the hero nexus row.
    #[must_use]
    pub const fn last_row(&self) -> u32 {
        self.rows - 1
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < BOARD_COLUMNS && cell.row() < self.rows
    }

    /// Terrain at the cell, or `None` off the board.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<TerrainKind> {
        if !self.contains(cell) {
            return None;
        }
        let index = (cell.row() * BOARD_COLUMNS + cell.column()) as usize;
        self.terrain.get(index).copied()
    }

    /// Reports whether the cell is on the board and not a wall.
    #[must_use]
    pub fn is_accessible(&self, cell: CellCoord) -> bool {
        self.terrain(cell).is_some_and(TerrainKind::is_accessible)
    }

    /// Home nexus cell of the hero assigned to `lane`.
    #[must_use]
    pub const fn hero_home(&self, lane: Lane) -> CellCoord {
        self.hero_homes[lane.index()]
    }

    /// Monster spawn cell of `lane`.
    #[must_use]
    pub const fn monster_spawn(&self, lane: Lane) -> CellCoord {
        self.monster_spawns[lane.index()]
    }

    /// Cells whose glyph marks a removable obstacle.
    pub fn obstacle_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.terrain
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == TerrainKind::Obstacle)
            .map(|(index, _)| {
                let index = index as u32;
                CellCoord::new(index % BOARD_COLUMNS, index / BOARD_COLUMNS)
            })
    }
}
