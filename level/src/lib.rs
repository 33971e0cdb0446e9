#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level definition documents for Creepline.
//!
//! A level is authored as a JSON document describing the grid, the goal, the
//! starting economy, and the waves of creeps. [`LevelDefinition`] mirrors the
//! document shape one-to-one; [`Level`] is the validated form consumed by the
//! world, with catalogue names resolved and every spawn time expanded into a
//! concrete offset.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use creepline_core::{CellCoord, CreepKind, Grid, SpawnEvent, UnknownKind, WavePlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("could not read level file {path}")]
    Unreadable {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The document is not valid JSON or does not have the expected shape.
    #[error("malformed level document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// One of the grid dimensions is zero.
    #[error("grid must have positive dimensions, got {width}x{height}")]
    EmptyGrid {
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
    },
    /// The goal lies outside the grid.
    #[error("goal {goal} lies outside the {width}x{height} grid")]
    GoalOutOfBounds {
        /// Declared goal cell.
        goal: CellCoord,
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
    },
    /// A creep spawns outside the grid.
    #[error("wave {wave}: spawn cell {cell} lies outside the grid")]
    SpawnOutOfBounds {
        /// Zero-based index of the offending wave.
        wave: usize,
        /// Declared spawn cell.
        cell: CellCoord,
    },
    /// A creep spawns directly on the goal.
    #[error("wave {wave}: spawn cell {cell} coincides with the goal")]
    SpawnOnGoal {
        /// Zero-based index of the offending wave.
        wave: usize,
        /// Declared spawn cell.
        cell: CellCoord,
    },
    /// A creep type name is not part of the catalogue.
    #[error("wave {wave}: {source}")]
    UnknownCreepType {
        /// Zero-based index of the offending wave.
        wave: usize,
        /// Catalogue lookup failure.
        #[source]
        source: UnknownKind,
    },
    /// A spawn time is negative, empty, or otherwise unusable.
    #[error("wave {wave}: invalid spawn time, {reason}")]
    InvalidSpawnTime {
        /// Zero-based index of the offending wave.
        wave: usize,
        /// Human readable description of the problem.
        reason: &'static str,
    },
    /// A creep is declared with no life.
    #[error("wave {wave}: creeps must have at least one hit point")]
    InvalidLife {
        /// Zero-based index of the offending wave.
        wave: usize,
    },
    /// A wave start time is negative or not finite.
    #[error("wave {wave}: start time must be a non-negative number of seconds")]
    InvalidWaveStart {
        /// Zero-based index of the offending wave.
        wave: usize,
    },
}

impl LevelError {
    /// Reports whether the error stems from the file being unreadable rather
    /// than from its contents.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }
}

/// Level document exactly as authored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LevelDefinition {
    /// Display name of the level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Grid dimensions as `[width, height]`.
    pub grid_size: [u32; 2],
    /// Goal cell as `[column, row]`.
    pub goal: [u32; 2],
    /// Money available at the start.
    pub starting_money: u64,
    /// Lives available at the start.
    pub starting_lives: u32,
    /// Waves in authoring order.
    #[serde(default)]
    pub waves: Vec<WaveDefinition>,
}

/// Wave entry of a level document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WaveDefinition {
    /// Seconds after the invasion starts at which the wave begins.
    pub start_time: f64,
    /// Creep groups spawned by the wave.
    pub creeps: Vec<CreepDefinition>,
}

/// Creep group entry of a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreepDefinition {
    /// Catalogue name of the creep type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Starting life of every creep in the group.
    pub hp: u32,
    /// Money awarded per kill.
    pub bounty: u32,
    /// Spawn cell as `[column, row]`.
    pub spawn_at: [u32; 2],
    /// When the creeps appear, relative to the wave start.
    pub spawn_time: SpawnTime,
}

/// Spawn times accepted by the level format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpawnTime {
    /// A single creep at the given offset.
    Instant(f64),
    /// One creep per listed offset.
    List(Vec<f64>),
    /// `count` creeps starting at `start`, `interval` seconds apart.
    Sequence {
        /// Offset of the first creep.
        start: f64,
        /// Seconds between two consecutive creeps.
        interval: f64,
        /// Number of creeps.
        count: u32,
    },
}

impl SpawnTime {
    /// Expands the spawn times into concrete offsets in declaration order.
    ///
    /// The returned message describes the first problem encountered.
    pub fn offsets(&self) -> Result<Vec<Duration>, &'static str> {
        match self {
            Self::Instant(at) => Ok(vec![seconds(*at)?]),
            Self::List(instants) => {
                if instants.is_empty() {
                    return Err("the list of instants is empty");
                }
                instants.iter().map(|at| seconds(*at)).collect()
            }
            Self::Sequence {
                start,
                interval,
                count,
            } => {
                if *count == 0 {
                    return Err("a sequence must spawn at least one creep");
                }
                if !interval.is_finite() || *interval < 0.0 {
                    return Err("the interval must be a non-negative number of seconds");
                }
                (0..*count)
                    .map(|step| seconds(start + f64::from(step) * interval))
                    .collect()
            }
        }
    }
}

fn seconds(value: f64) -> Result<Duration, &'static str> {
    if !value.is_finite() || value < 0.0 {
        return Err("instants must be non-negative numbers of seconds");
    }
    Duration::try_from_secs_f64(value).map_err(|_| "instant does not fit in a duration")
}

impl LevelDefinition {
    /// Parses a level document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a level document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LevelError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialises the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the escalating practice level produced by the level generator:
    /// a 16x16 grid with the goal in the middle and a single spawn point in
    /// the top-left corner.
    #[must_use]
    pub fn generated(wave_count: u32) -> Self {
        let mut time = 3.0;
        let mut waves = Vec::new();
        for index in 0..wave_count {
            let tier = index + 1;
            let count = 5 * tier;
            let interval = 2.0;
            waves.push(WaveDefinition {
                start_time: time,
                creeps: vec![CreepDefinition {
                    kind: CreepKind::GenericCreep.name().to_owned(),
                    hp: 40 * tier,
                    bounty: 10 * tier,
                    spawn_at: [0, 0],
                    spawn_time: SpawnTime::Sequence {
                        start: 0.0,
                        interval,
                        count,
                    },
                }],
            });
            time += f64::from(count) * interval + 10.0;
        }

        Self {
            name: Some(format!("Generated ({wave_count} waves)")),
            grid_size: [16, 16],
            goal: [8, 8],
            starting_money: 100,
            starting_lives: 10,
            waves,
        }
    }

    /// Validates the document and resolves it into a [`Level`].
    pub fn validate(&self) -> Result<Level, LevelError> {
        let [width, height] = self.grid_size;
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyGrid { width, height });
        }

        let goal = CellCoord::new(self.goal[0], self.goal[1]);
        let grid = Grid::new(
            width,
            height,
            goal,
            self.starting_money,
            self.starting_lives,
        );
        if !grid.contains(goal) {
            return Err(LevelError::GoalOutOfBounds {
                goal,
                width,
                height,
            });
        }

        let mut spawn_points = Vec::new();
        let mut waves = Vec::with_capacity(self.waves.len());
        for (wave, definition) in self.waves.iter().enumerate() {
            let start = seconds(definition.start_time)
                .map_err(|_| LevelError::InvalidWaveStart { wave })?;

            let mut events = Vec::new();
            for creep in &definition.creeps {
                let kind: CreepKind = creep
                    .kind
                    .parse()
                    .map_err(|source| LevelError::UnknownCreepType { wave, source })?;
                if creep.hp == 0 {
                    return Err(LevelError::InvalidLife { wave });
                }
                let cell = CellCoord::new(creep.spawn_at[0], creep.spawn_at[1]);
                if !grid.contains(cell) {
                    return Err(LevelError::SpawnOutOfBounds { wave, cell });
                }
                if cell == goal {
                    return Err(LevelError::SpawnOnGoal { wave, cell });
                }
                let offsets = creep
                    .spawn_time
                    .offsets()
                    .map_err(|reason| LevelError::InvalidSpawnTime { wave, reason })?;

                if !spawn_points.contains(&cell) {
                    spawn_points.push(cell);
                }
                events.extend(offsets.into_iter().map(|offset| SpawnEvent {
                    offset,
                    kind,
                    cell,
                    life: creep.hp,
                    bounty: creep.bounty,
                }));
            }

            waves.push(WavePlan { start, events });
        }
        spawn_points.sort();

        Ok(Level {
            name: self.name.clone().unwrap_or_else(|| String::from("Untitled")),
            grid,
            waves,
            spawn_points,
        })
    }
}

/// Validated level ready to be instantiated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    name: String,
    grid: Grid,
    waves: Vec<WavePlan>,
    spawn_points: Vec<CellCoord>,
}

impl Level {
    /// Reads, parses and validates the level stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LevelError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::parse(&contents)?;
        log::debug!(
            "loaded level {:?} from {} with {} waves",
            level.name,
            path.display(),
            level.waves.len()
        );
        Ok(level)
    }

    /// Parses and validates a JSON level document.
    pub fn parse(json: &str) -> Result<Self, LevelError> {
        LevelDefinition::from_json_str(json)?.validate()
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static grid description.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Waves in authoring order.
    #[must_use]
    pub fn waves(&self) -> &[WavePlan] {
        &self.waves
    }

    /// Distinct spawn cells referenced by any wave, sorted.
    #[must_use]
    pub fn spawn_points(&self) -> &[CellCoord] {
        &self.spawn_points
    }

    /// Total number of creeps the level will spawn.
    #[must_use]
    pub fn creep_count(&self) -> usize {
        self.waves.iter().map(|wave| wave.events.len()).sum()
    }

    /// Splits the level into its grid, waves and spawn points.
    #[must_use]
    pub fn into_parts(self) -> (Grid, Vec<WavePlan>, Vec<CellCoord>) {
        (self.grid, self.waves, self.spawn_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_expands_evenly_spaced_offsets() {
        let time = SpawnTime::Sequence {
            start: 1.0,
            interval: 0.5,
            count: 3,
        };
        assert_eq!(
            time.offsets(),
            Ok(vec![
                Duration::from_secs(1),
                Duration::from_millis(1500),
                Duration::from_secs(2),
            ])
        );
    }

    #[test]
    fn degenerate_spawn_times_are_rejected() {
        assert!(SpawnTime::Instant(-1.0).offsets().is_err());
        assert!(SpawnTime::List(Vec::new()).offsets().is_err());
        assert!(SpawnTime::Sequence {
            start: 0.0,
            interval: 1.0,
            count: 0,
        }
        .offsets()
        .is_err());
        assert!(SpawnTime::Sequence {
            start: 0.0,
            interval: -1.0,
            count: 2,
        }
        .offsets()
        .is_err());
    }

    #[test]
    fn generated_level_escalates_waves() {
        let definition = LevelDefinition::generated(3);
        let starts: Vec<f64> = definition.waves.iter().map(|wave| wave.start_time).collect();
        assert_eq!(starts, vec![3.0, 23.0, 53.0]);

        let level = definition.validate().expect("generated level is valid");
        assert_eq!(level.grid().goal(), CellCoord::new(8, 8));
        assert_eq!(level.spawn_points(), &[CellCoord::new(0, 0)]);
        assert_eq!(level.creep_count(), 5 + 10 + 15);
        let third = &level.waves()[2];
        assert_eq!(third.events[0].life, 120);
        assert_eq!(third.events[0].bounty, 30);
    }

    #[test]
    fn generated_level_survives_json_round_trip() {
        let definition = LevelDefinition::generated(2);
        let json = definition.to_json_pretty().expect("serialise");
        assert!(json.contains("\"spawn-time\""));
        assert_eq!(LevelDefinition::from_json_str(&json).expect("parse"), definition);
    }
}
