//! Parsers for the coordinate and tower arguments accepted on the command line.

use std::str::FromStr;

use anyhow::{anyhow, Context, Error, Result};
use creepline_core::{CellCoord, CellPoint, TowerKind};

/// Tower requested with `KIND@X,Y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerPlacement {
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
}

impl FromStr for TowerPlacement {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (kind, cell) = value
            .split_once('@')
            .ok_or_else(|| anyhow!("expected KIND@X,Y, got `{value}`"))?;
        let kind = kind.trim().parse::<TowerKind>()?;
        let cell = parse_cell(cell)?;
        Ok(Self { kind, cell })
    }
}

fn split_pair(value: &str) -> Result<(&str, &str)> {
    value
        .split_once(',')
        .map(|(x, y)| (x.trim(), y.trim()))
        .ok_or_else(|| anyhow!("expected X,Y, got `{value}`"))
}

/// Parses an integer cell coordinate written as `X,Y`.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord> {
    let (column, row) = split_pair(value)?;
    let column = column
        .parse::<u32>()
        .with_context(|| format!("invalid column `{column}`"))?;
    let row = row
        .parse::<u32>()
        .with_context(|| format!("invalid row `{row}`"))?;
    Ok(CellCoord::new(column, row))
}

/// Parses a point in cell units written as `X,Y`.
pub(crate) fn parse_point(value: &str) -> Result<CellPoint> {
    let (column, row) = split_pair(value)?;
    let column = column
        .parse::<f32>()
        .with_context(|| format!("invalid column `{column}`"))?;
    let row = row
        .parse::<f32>()
        .with_context(|| format!("invalid row `{row}`"))?;
    Ok(CellPoint::new(column, row))
}
