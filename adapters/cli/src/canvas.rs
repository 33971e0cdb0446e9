//! Text render target for terminals.

use std::fmt;

use creepline_core::{CellCoord, CellPoint, Grid, TowerKind};
use creepline_world::{DrawPrimitive, RenderTarget};

const BLOCKED: char = '-';
const PLACEABLE: char = '.';
const SPAWN: char = '@';
const GOAL: char = 'X';
const CREEP: char = 'c';
const SHOT: char = '*';

/// One character per cell, later primitives overwriting earlier ones.
#[derive(Clone, Debug)]
pub(crate) struct AsciiCanvas {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub(crate) fn new(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: vec![BLOCKED; grid.cell_count()],
        }
    }

    fn put(&mut self, cell: CellCoord, glyph: char) {
        if cell.column() >= self.width || cell.row() >= self.height {
            return;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = glyph;
        }
    }

    fn put_point(&mut self, point: CellPoint, glyph: char) {
        if let Some(cell) = point.nearest_cell() {
            self.put(cell, glyph);
        }
    }
}

fn tower_glyph(kind: TowerKind) -> char {
    match kind {
        TowerKind::GenericTower => 'G',
        TowerKind::LaserTower => 'L',
        TowerKind::SlownessTower => 'S',
        TowerKind::WeaknessTower => 'W',
    }
}

impl RenderTarget for AsciiCanvas {
    fn draw(&mut self, primitive: DrawPrimitive) {
        match primitive {
            DrawPrimitive::PlaceableCell { cell } => self.put(cell, PLACEABLE),
            DrawPrimitive::Tower { cell, kind } => self.put(cell, tower_glyph(kind)),
            DrawPrimitive::Creep { position, .. } => self.put_point(position, CREEP),
            DrawPrimitive::Shot { position, .. } => self.put_point(position, SHOT),
            DrawPrimitive::Beam { to, .. } => self.put_point(to, SHOT),
            DrawPrimitive::SourceSpinner { cell, .. } => self.put(cell, SPAWN),
            DrawPrimitive::GoalPulse { cell, .. } => self.put(cell, GOAL),
            DrawPrimitive::HealthBar { .. } => {}
        }
    }
}

impl fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.width.max(1) as usize;
        for (row, line) in self.cells.chunks(width).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for glyph in line {
                write!(f, "{glyph}")?;
            }
        }
        Ok(())
    }
}
