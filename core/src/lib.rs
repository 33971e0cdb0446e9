#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Creepline engine.
//!
//! This crate defines the vocabulary that connects the level loader, the
//! authoritative level instance, pure systems, and adapters. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what actually happened. Catalogue data for towers, creeps and
//! projectiles lives here so every crate agrees on costs, ranges and effects.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest fraction of its base speed a slowed creep may walk at.
pub const MIN_SPEED_FACTOR: f32 = 0.1;

/// Lifecycle of a level instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelState {
    /// No invasion is running; placement and inspection are allowed.
    Idle,
    /// The invasion schedule is active and creeps are spawning.
    Running,
    /// Every creep was cleared after the schedule ran out.
    Won,
    /// The player ran out of lives.
    Lost,
}

impl LevelState {
    /// Reports whether the state can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Commands that express all permissible level mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Starts the invasion schedule.
    StartInvasion,
    /// Pulls the next wave forward so it starts on the following tick.
    SendNextWave,
    /// Advances the simulation by one fixed step.
    Tick {
        /// Duration of simulated time covered by the step.
        dt: Duration,
    },
    /// Requests construction of a tower on a single cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell that receives the tower.
        cell: CellCoord,
    },
    /// Requests the sale of an existing tower.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Administrative money grant that bypasses normal income.
    AddMoney {
        /// Amount credited to the player.
        amount: u64,
    },
}

/// Events reported by the level instance after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The invasion schedule started running.
    InvasionStarted,
    /// Outcome of a request to send the next wave early.
    NextWaveRequested {
        /// Whether a pending wave was pulled forward.
        accepted: bool,
    },
    /// A wave reached its start offset.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
    },
    /// A creep entered the grid.
    CreepSpawned {
        /// Identifier assigned to the creep.
        creep: CreepId,
        /// Type of the creep.
        kind: CreepKind,
        /// Cell the creep spawned on.
        cell: CellCoord,
    },
    /// A tower was constructed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was constructed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Money deducted for the construction.
        cost: u64,
    },
    /// A tower placement request was rejected without changing state.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Reason the placement failed.
        reason: PlacementError,
    },
    /// A tower was sold and its cell freed.
    TowerSold {
        /// Identifier of the tower that was sold.
        tower: TowerId,
        /// Cell the tower occupied.
        cell: CellCoord,
        /// Money refunded to the player.
        refund: u64,
    },
    /// A tower sale request was rejected.
    TowerSaleRejected {
        /// Identifier provided in the request.
        tower: TowerId,
        /// Reason the sale failed.
        reason: SaleError,
    },
    /// A tower registered a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Creep the projectile is aimed at.
        target: CreepId,
        /// Type of the projectile.
        kind: ProjectileKind,
    },
    /// A projectile delivered its effect.
    ProjectileImpacted {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Creep that received the effect.
        target: CreepId,
    },
    /// A projectile expired because its target vanished.
    ProjectileExpired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// A creep died and its bounty was paid.
    CreepKilled {
        /// Identifier of the creep.
        creep: CreepId,
        /// Money awarded to the player.
        bounty: u64,
    },
    /// A creep reached the goal and cost the player a life.
    CreepReachedGoal {
        /// Identifier of the creep.
        creep: CreepId,
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// Money was granted through the administrative surface.
    MoneyGranted {
        /// Amount credited.
        amount: u64,
    },
    /// The level was won.
    LevelWon,
    /// The level was lost.
    LevelLost,
}

/// Unique identifier assigned to a creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreepId(u32);

impl CreepId {
    /// Creates a new creep identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Continuous position of the cell centre.
    #[must_use]
    pub fn center(self) -> CellPoint {
        CellPoint::new(self.column as f32, self.row as f32)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Continuous position measured in cell units; cell centres sit on integers.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellPoint {
    column: f32,
    row: f32,
}

impl CellPoint {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Horizontal component in cell units.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Vertical component in cell units.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: CellPoint) -> f32 {
        let dx = self.column - other.column;
        let dy = self.row - other.row;
        dx * dx + dy * dy
    }

    /// Cell whose unit square contains the point, if it is not negative.
    #[must_use]
    pub fn nearest_cell(self) -> Option<CellCoord> {
        let column = self.column.round();
        let row = self.row.round();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// Static description of the playfield, immutable after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    goal: CellCoord,
    starting_money: u64,
    starting_lives: u32,
}

impl Grid {
    /// Creates a grid description.
    ///
    /// Callers are expected to validate that the dimensions are positive and
    /// that the goal lies inside them; the level loader does so before
    /// constructing a grid.
    #[must_use]
    pub const fn new(
        width: u32,
        height: u32,
        goal: CellCoord,
        starting_money: u64,
        starting_lives: u32,
    ) -> Self {
        Self {
            width,
            height,
            goal,
            starting_money,
            starting_lives,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell creeps walk toward.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Money available when the level starts.
    #[must_use]
    pub const fn starting_money(&self) -> u64 {
        self.starting_money
    }

    /// Lives available when the level starts.
    #[must_use]
    pub const fn starting_lives(&self) -> u32 {
        self.starting_lives
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(0);
        let height = usize::try_from(self.height).unwrap_or(0);
        width.saturating_mul(height)
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |column| CellCoord::new(column, row)))
    }

    /// Four-connected neighbors in the fixed order down, up, right, left.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let mut candidates = [None; 4];
        let mut count = 0;

        if let Some(row) = cell.row().checked_add(1) {
            if row < self.height {
                candidates[count] = Some(CellCoord::new(cell.column(), row));
                count += 1;
            }
        }

        if let Some(row) = cell.row().checked_sub(1) {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }

        if let Some(column) = cell.column().checked_add(1) {
            if column < self.width {
                candidates[count] = Some(CellCoord::new(column, cell.row()));
                count += 1;
            }
        }

        if let Some(column) = cell.column().checked_sub(1) {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }

        candidates.into_iter().take(count).flatten()
    }
}

/// Error returned when a catalogue name does not match any known type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {category} type: {name}")]
pub struct UnknownKind {
    category: &'static str,
    name: String,
}

impl UnknownKind {
    fn new(category: &'static str, name: &str) -> Self {
        Self {
            category,
            name: name.to_owned(),
        }
    }

    /// Name that failed to resolve.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How a tower chooses its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Re-selects the closest creep in range every tick.
    Closest,
    /// Keeps the current target while it stays alive and in range.
    LockOn,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap tower that lobs slow, heavy shots.
    GenericTower,
    /// Expensive tower that fires rapid beams.
    LaserTower,
    /// Tower whose shots slow creeps down.
    SlownessTower,
    /// Tower whose shots make creeps take more damage.
    WeaknessTower,
}

impl TowerKind {
    /// Every tower type in catalogue order.
    pub const ALL: [TowerKind; 4] = [
        Self::GenericTower,
        Self::LaserTower,
        Self::SlownessTower,
        Self::WeaknessTower,
    ];

    /// Catalogue name of the tower type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenericTower => "GenericTower",
            Self::LaserTower => "LaserTower",
            Self::SlownessTower => "SlownessTower",
            Self::WeaknessTower => "WeaknessTower",
        }
    }

    /// Money required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> u64 {
        match self {
            Self::GenericTower => 35,
            Self::LaserTower => 100,
            Self::SlownessTower => 60,
            Self::WeaknessTower => 80,
        }
    }

    /// Money refunded when the tower is sold.
    #[must_use]
    pub const fn sell_value(self) -> u64 {
        self.cost() / 2
    }

    /// Targeting radius measured in cells.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::GenericTower | Self::LaserTower | Self::WeaknessTower => 3.0,
            Self::SlownessTower => 2.5,
        }
    }

    /// Time between two shots while a target is held.
    #[must_use]
    pub const fn fire_period(self) -> Duration {
        match self {
            Self::GenericTower => Duration::from_secs(1),
            Self::LaserTower => Duration::from_millis(250),
            Self::SlownessTower => Duration::from_secs(2),
            Self::WeaknessTower => Duration::from_secs(3),
        }
    }

    /// Projectile fired by the tower.
    #[must_use]
    pub const fn projectile(self) -> ProjectileKind {
        match self {
            Self::GenericTower => ProjectileKind::Generic,
            Self::LaserTower => ProjectileKind::Laser,
            Self::SlownessTower => ProjectileKind::Slowness,
            Self::WeaknessTower => ProjectileKind::Weakness,
        }
    }

    /// Targeting strategy installed on new towers of this type.
    #[must_use]
    pub const fn targeting(self) -> TargetingMode {
        match self {
            Self::GenericTower | Self::SlownessTower => TargetingMode::Closest,
            Self::LaserTower | Self::WeaknessTower => TargetingMode::LockOn,
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TowerKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownKind::new("tower", name))
    }
}

/// Types of creeps that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreepKind {
    /// Plain walker.
    GenericCreep,
}

impl CreepKind {
    /// Every creep type in catalogue order.
    pub const ALL: [CreepKind; 1] = [Self::GenericCreep];

    /// Catalogue name of the creep type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenericCreep => "GenericCreep",
        }
    }

    /// Unbuffed walking speed in cells per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::GenericCreep => 1.0,
        }
    }
}

impl fmt::Display for CreepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CreepKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownKind::new("creep", name))
    }
}

/// How a projectile reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delivery {
    /// Travels visually toward the target and hits after a fixed delay.
    Timed,
    /// Draws an instant line to the target and hits after a fixed delay.
    Beam,
}

/// Effect applied to a creep when a projectile lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Nominal damage, scaled by the target's vulnerability.
    Damage(u32),
    /// Timed status effect.
    Buff(Buff),
}

/// Types of projectiles towers can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Heavy shot.
    Generic,
    /// Short beam.
    Laser,
    /// Shot that slows its target.
    Slowness,
    /// Shot that weakens its target.
    Weakness,
}

impl ProjectileKind {
    /// Delivery mechanism of the projectile.
    #[must_use]
    pub const fn delivery(self) -> Delivery {
        match self {
            Self::Laser => Delivery::Beam,
            Self::Generic | Self::Slowness | Self::Weakness => Delivery::Timed,
        }
    }

    /// Delay between firing and impact.
    #[must_use]
    pub const fn delay(self) -> Duration {
        match self {
            Self::Laser => Duration::from_millis(100),
            Self::Generic | Self::Slowness | Self::Weakness => Duration::from_secs(1),
        }
    }

    /// Effect delivered on impact.
    #[must_use]
    pub const fn effect(self) -> Effect {
        match self {
            Self::Generic => Effect::Damage(20),
            Self::Laser => Effect::Damage(10),
            Self::Slowness => Effect::Buff(Buff::new(BuffKind::Speed, -20.0, Duration::from_secs(5))),
            Self::Weakness => Effect::Buff(Buff::new(
                BuffKind::Vulnerability,
                500.0,
                Duration::from_secs(10),
            )),
        }
    }
}

/// Attribute modified by a buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    /// Percentage added to walking speed; negative values slow.
    Speed,
    /// Percentage added to damage taken; negative values armour.
    Vulnerability,
}

/// Timed, stacking status effect carried by a creep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Buff {
    kind: BuffKind,
    strength: f32,
    remaining: Duration,
}

impl Buff {
    /// Creates a buff with its full duration remaining.
    #[must_use]
    pub const fn new(kind: BuffKind, strength: f32, duration: Duration) -> Self {
        Self {
            kind,
            strength,
            remaining: duration,
        }
    }

    /// Attribute the buff modifies.
    #[must_use]
    pub const fn kind(&self) -> BuffKind {
        self.kind
    }

    /// Percentage strength of the buff.
    #[must_use]
    pub const fn strength(&self) -> f32 {
        self.strength
    }

    /// Time left before the buff is discarded.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Counts the buff down and reports whether it is still active.
    pub fn decay(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        !self.remaining.is_zero()
    }
}

/// Scales nominal damage by the summed vulnerability percentage.
///
/// The result is rounded to the nearest integer and never negative.
#[must_use]
pub fn scaled_damage(raw: u32, vulnerability: f32) -> u32 {
    let scaled = (raw as f32 * (1.0 + vulnerability / 100.0)).round();
    if scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f32 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Converts a summed speed percentage into a multiplier of base speed.
#[must_use]
pub fn speed_factor(speed: f32) -> f32 {
    (1.0 + speed / 100.0).max(MIN_SPEED_FACTOR)
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The player cannot afford the tower.
    InsufficientFunds,
    /// The cell is forbidden, occupied, or would sever a path to the goal.
    NotPlaceable,
}

/// Reasons a tower sale request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Single scheduled creep spawn inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEvent {
    /// Offset from the wave start.
    pub offset: Duration,
    /// Type of creep to create.
    pub kind: CreepKind,
    /// Cell the creep appears on.
    pub cell: CellCoord,
    /// Starting and maximum life.
    pub life: u32,
    /// Money awarded when the creep dies.
    pub bounty: u32,
}

/// Batch of spawn events sharing a start offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavePlan {
    /// Offset from the start of the invasion.
    pub start: Duration,
    /// Spawn events of the wave.
    pub events: Vec<SpawnEvent>,
}

/// Immutable representation of a single creep used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreepSnapshot {
    /// Unique identifier assigned to the creep.
    pub id: CreepId,
    /// Type of the creep.
    pub kind: CreepKind,
    /// Interpolated position between the two cells the creep walks across.
    pub position: CellPoint,
    /// Current life.
    pub life: u32,
    /// Maximum life.
    pub max_life: u32,
}

/// Read-only snapshot describing all live creeps.
#[derive(Clone, Debug, Default)]
pub struct CreepView {
    snapshots: Vec<CreepSnapshot>,
}

impl CreepView {
    /// Creates a new creep view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CreepSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured creep snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CreepSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured creeps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no creeps were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreepSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Economy and progress figures consumed by an interface once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EconomySnapshot {
    /// Money available to the player.
    pub money: u64,
    /// Lives left.
    pub lives: u32,
    /// Number of waves started so far.
    pub wave: u32,
    /// Current lifecycle state.
    pub state: LevelState,
}

impl EconomySnapshot {
    /// Reports whether the level was won.
    #[must_use]
    pub fn won(&self) -> bool {
        self.state == LevelState::Won
    }

    /// Reports whether the level was lost.
    #[must_use]
    pub fn lost(&self) -> bool {
        self.state == LevelState::Lost
    }
}
