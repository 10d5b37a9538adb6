//! The lake grid: cells, positions, directions and neighbor queries.
//!
//! Cells are stored row-major. Each cell knows its own position, holds at
//! most one [`Item`] and at most one occupant. Placement onto an occupied
//! slot is an error; the only in-place replacement is a neutralized hazard
//! becoming the gear that neutralized it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LakeError;
use crate::item::{HazardKind, Item};
use crate::researcher::ResearcherId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta; `None` if either coordinate goes negative.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const OFFSETS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const OFFSETS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One of the four slide directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) unit step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Boundary that holds cliff edges instead of walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CliffSide {
    Right,
    Bottom,
    Left,
}

impl CliffSide {
    pub const ALL: [CliffSide; 3] = [CliffSide::Right, CliffSide::Bottom, CliffSide::Left];

    /// Direction that looks toward this side from the interior.
    pub fn facing(self) -> Direction {
        match self {
            CliffSide::Right => Direction::Right,
            CliffSide::Bottom => Direction::Down,
            CliffSide::Left => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    item: Option<Item>,
    occupant: Option<ResearcherId>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            item: None,
            occupant: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn item(&self) -> Option<Item> {
        self.item
    }

    pub fn occupant(&self) -> Option<ResearcherId> {
        self.occupant
    }

    pub fn hazard(&self) -> Option<HazardKind> {
        self.item.and_then(Item::hazard)
    }

    pub fn has_item(&self) -> bool {
        self.item.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
    cliff_side: Option<CliffSide>,
}

impl Grid {
    /// Allocate an empty grid; no items, no occupants, no cliff side yet.
    pub fn new(columns: usize, rows: usize) -> Self {
        let mut cells = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for col in 0..columns {
                cells.push(Cell::new(Position::new(row, col)));
            }
        }
        Self {
            columns,
            rows,
            cells,
            cliff_side: None,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cliff_side(&self) -> Option<CliffSide> {
        self.cliff_side
    }

    pub(crate) fn set_cliff_side(&mut self, side: CliffSide) {
        self.cliff_side = Some(side);
    }

    pub fn entrance_column(&self) -> usize {
        self.columns / 2
    }

    /// Position of the Entrance item on row 0.
    pub fn entrance(&self) -> Position {
        Position::new(0, self.entrance_column())
    }

    /// Cell directly below the entrance, where researchers step onto the ice.
    pub fn entry_cell(&self) -> Position {
        Position::new(1, self.entrance_column())
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.columns
    }

    pub fn is_border(&self, pos: Position) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row == self.rows - 1 || pos.col == self.columns - 1
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.columns + pos.col)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell, LakeError> {
        match self.index(pos) {
            Some(i) => Ok(&mut self.cells[i]),
            None => Err(LakeError::Grid {
                at: pos,
                reason: "position outside the grid",
            }),
        }
    }

    pub fn item_at(&self, pos: Position) -> Option<Item> {
        self.cell(pos).and_then(Cell::item)
    }

    pub fn hazard_at(&self, pos: Position) -> Option<HazardKind> {
        self.cell(pos).and_then(Cell::hazard)
    }

    pub fn occupant_at(&self, pos: Position) -> Option<ResearcherId> {
        self.cell(pos).and_then(Cell::occupant)
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rows of cells, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.columns)
    }

    /// Put an item on an item-free cell.
    pub fn place_item(&mut self, pos: Position, item: Item) -> Result<(), LakeError> {
        let cell = self.cell_mut(pos)?;
        if cell.item.is_some() {
            return Err(LakeError::Grid {
                at: pos,
                reason: "cell already holds an item",
            });
        }
        cell.item = Some(item);
        Ok(())
    }

    /// Swap a cell's item for another. Used when gear lands on its hazard.
    pub(crate) fn replace_item(&mut self, pos: Position, item: Item) -> Result<(), LakeError> {
        self.cell_mut(pos)?.item = Some(item);
        Ok(())
    }

    pub fn place_occupant(&mut self, pos: Position, id: ResearcherId) -> Result<(), LakeError> {
        let cell = self.cell_mut(pos)?;
        if cell.occupant.is_some() {
            return Err(LakeError::Grid {
                at: pos,
                reason: "cell already occupied",
            });
        }
        cell.occupant = Some(id);
        Ok(())
    }

    pub fn clear_occupant(&mut self, pos: Position) -> Option<ResearcherId> {
        self.cell_mut(pos).ok().and_then(|c| c.occupant.take())
    }

    /// Move the occupant of `from` to the free cell `to`.
    pub(crate) fn move_occupant(&mut self, from: Position, to: Position) -> Result<(), LakeError> {
        if from == to {
            return Ok(());
        }
        if self.occupant_at(to).is_some() || !self.contains(to) {
            return Err(LakeError::Grid {
                at: to,
                reason: "destination unavailable",
            });
        }
        let id = self.clear_occupant(from).ok_or(LakeError::Grid {
            at: from,
            reason: "no occupant to move",
        })?;
        self.place_occupant(to, id)
    }

    pub fn find_occupant(&self, id: ResearcherId) -> Option<Position> {
        self.cells
            .iter()
            .find(|c| c.occupant == Some(id))
            .map(Cell::position)
    }

    /// In-bounds neighbor one step in `dir`.
    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        pos.offset(dr, dc).filter(|p| self.contains(*p))
    }

    pub fn neighbors4(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.neighbors(pos, &OFFSETS_4)
    }

    pub fn neighbors8(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.neighbors(pos, &OFFSETS_8)
    }

    fn neighbors<'a>(
        &'a self,
        pos: Position,
        offsets: &'static [(isize, isize)],
    ) -> impl Iterator<Item = Position> + 'a {
        offsets
            .iter()
            .filter_map(move |&(dr, dc)| pos.offset(dr, dc))
            .filter(move |p| self.contains(*p))
    }

    pub fn is_next_to_wall(&self, pos: Position) -> bool {
        self.neighbors8(pos)
            .any(|p| self.item_at(p) == Some(Item::Wall))
    }

    pub fn is_next_to_cliff(&self, pos: Position) -> bool {
        self.neighbors4(pos)
            .any(|p| self.hazard_at(p) == Some(HazardKind::CliffEdge))
    }

    pub fn is_next_to_ice_block(&self, pos: Position) -> bool {
        self.neighbors8(pos)
            .any(|p| self.hazard_at(p) == Some(HazardKind::IceBlock))
    }

    pub fn count_items(&self, item: Item) -> usize {
        self.cells.iter().filter(|c| c.item == Some(item)).count()
    }
}
