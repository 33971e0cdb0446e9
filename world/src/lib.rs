#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Creepline.
//!
//! A [`LevelInstance`] owns everything that changes while a level is played:
//! the economy, the obstacle map, navigation and placement analysis, creeps,
//! towers, projectiles and decorations. Adapters mutate it through [`apply`]
//! and read it through the [`query`] module.

mod creeps;
mod decorations;
mod navigation;
mod placement;
mod presentation;
mod projectiles;
mod towers;

use std::time::Duration;

use creepline_core::{
    CellCoord, CellPoint, Command, CreepId, CreepKind, CreepView, Event, Grid, LevelState,
    PlacementError, ProjectileId, ProjectileKind, SaleError, TowerId, TowerKind, WavePlan,
};
use creepline_level::Level;
use creepline_system_invasion::InvasionSchedule;
use creepline_system_tower_targeting::CreepLookup;

use crate::{
    creeps::{CreepOutcome, CreepStore},
    decorations::Decorations,
    presentation::{HealthBar, RenderHandle},
    projectiles::{ProjectileStore, TowerProjectileFactory},
    towers::TowerRegistry,
};

pub use navigation::NavigationProvider;
pub use placement::PlacementOracle;
pub use presentation::{
    DrawPrimitive, InspectionPanel, PanelAction, RenderTarget, Renderable, Selectable,
};
pub use towers::TowerMap;

/// A level being played.
#[derive(Debug)]
pub struct LevelInstance {
    name: String,
    grid: Grid,
    spawn_points: Vec<CellCoord>,
    state: LevelState,
    money: u64,
    lives: u32,
    schedule: InvasionSchedule,
    towers: TowerRegistry,
    navigation: NavigationProvider,
    placement: PlacementOracle,
    creeps: CreepStore,
    projectiles: ProjectileStore,
    decorations: Decorations,
    lookup: CreepLookup,
    renderables: Vec<RenderHandle>,
    outcomes: Vec<CreepOutcome>,
    elapsed: Duration,
    tick_index: u64,
}

impl LevelInstance {
    /// Instantiates a validated level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        let name = level.name().to_owned();
        let (grid, waves, spawn_points) = level.into_parts();
        Self::from_parts(name, grid, waves, spawn_points)
    }

    /// Instantiates a level from already validated pieces.
    ///
    /// The goal must lie inside the grid and the spawn points must be grid
    /// cells other than the goal.
    #[must_use]
    pub fn from_parts(
        name: String,
        grid: Grid,
        waves: Vec<WavePlan>,
        spawn_points: Vec<CellCoord>,
    ) -> Self {
        let towers = TowerRegistry::new(&grid);
        let mut navigation = NavigationProvider::new(&grid);
        navigation.rebuild(towers.map());
        let mut placement = PlacementOracle::new(&grid, &spawn_points);
        placement.update_tower_restrictions(towers.map());

        let decorations = Decorations::new(&spawn_points, grid.goal());
        let mut renderables: Vec<RenderHandle> = (0..spawn_points.len())
            .map(RenderHandle::SourceSpinner)
            .collect();
        renderables.push(RenderHandle::GoalPulse);

        Self {
            name,
            state: LevelState::Idle,
            money: grid.starting_money(),
            lives: grid.starting_lives(),
            schedule: InvasionSchedule::new(waves),
            towers,
            navigation,
            placement,
            creeps: CreepStore::default(),
            projectiles: ProjectileStore::default(),
            decorations,
            lookup: CreepLookup::new(),
            renderables,
            outcomes: Vec::new(),
            elapsed: Duration::ZERO,
            tick_index: 0,
            grid,
            spawn_points,
        }
    }

    /// Starts the invasion. Only an idle level can be started.
    pub fn start_invasion(&mut self) -> bool {
        if self.state != LevelState::Idle {
            return false;
        }
        self.state = LevelState::Running;
        log::info!(
            "invasion of {:?} started with {} waves",
            self.name,
            self.schedule.wave_count()
        );
        true
    }

    /// Pulls the next wave forward while the invasion is running.
    pub fn send_next_wave(&mut self) -> bool {
        self.state == LevelState::Running && self.schedule.send_next_wave()
    }

    /// Credits money outside the normal income.
    pub fn add_money(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    /// Constructs a tower, paying its cost.
    ///
    /// Rejected requests leave the level untouched.
    pub fn create_tower_at(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        if !self.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        let cost = kind.cost();
        if self.money < cost {
            return Err(PlacementError::InsufficientFunds);
        }
        if !self.placement.can_place_tower_here(cell) {
            return Err(PlacementError::NotPlaceable);
        }

        self.money -= cost;
        let tower = self.towers.insert(kind, cell);
        self.rebuild_obstacles();
        self.renderables.push(RenderHandle::Tower(tower));
        Ok(tower)
    }

    /// Sells a tower, refunding its sell value.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<u64, SaleError> {
        let removed = self.towers.remove(tower).ok_or(SaleError::MissingTower)?;
        self.money = self.money.saturating_add(removed.sell_value);
        self.rebuild_obstacles();
        Ok(removed.sell_value)
    }

    /// Creates a creep outside the invasion schedule.
    ///
    /// Returns `None` when the cell lies outside the grid or holds a tower.
    pub fn create_creep_at(
        &mut self,
        kind: CreepKind,
        life: u32,
        bounty: u32,
        cell: CellCoord,
    ) -> Option<CreepId> {
        if !self.grid.contains(cell) || self.towers.map().has_tower(cell) {
            return None;
        }
        let creep = self.spawn_creep(kind, life, bounty, cell);
        self.placement
            .update_creep_restrictions(self.creeps.occupied_cells());
        Some(creep)
    }

    /// Registers a projectile fired from `origin` at `target`.
    pub fn register_projectile(
        &mut self,
        kind: ProjectileKind,
        origin: CellPoint,
        target: CreepId,
    ) -> ProjectileId {
        let projectile = self.projectiles.register(kind, origin, target);
        self.renderables.push(RenderHandle::Projectile(projectile));
        projectile
    }

    /// Advances the simulation by one fixed step.
    ///
    /// The step runs in a fixed order: spawn due creeps, animate decorations,
    /// snapshot creeps, update towers, advance projectiles, walk creeps,
    /// refresh creep placement restrictions, and finally evaluate the
    /// outcome. Finished levels ignore further steps.
    pub fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.state.is_terminal() {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.state == LevelState::Running {
            let batch = self.schedule.advance(dt);
            for wave in batch.started_waves {
                log::info!("wave {wave} started");
                out_events.push(Event::WaveStarted { wave });
            }
            for spawn in batch.spawns {
                let creep = self.spawn_creep(spawn.kind, spawn.life, spawn.bounty, spawn.cell);
                out_events.push(Event::CreepSpawned {
                    creep,
                    kind: spawn.kind,
                    cell: spawn.cell,
                });
            }
        }

        self.decorations.advance(dt);

        self.lookup.rebuild(&creep_view(&self.creeps));

        for tower in self.towers.iter_mut() {
            let origin = tower.cell.center();
            let target = tower
                .targeting
                .acquire(origin, tower.kind.range(), &self.lookup);
            let mut factory = TowerProjectileFactory {
                tower: tower.id,
                origin,
                store: &mut self.projectiles,
                handles: &mut self.renderables,
                out_events: &mut *out_events,
            };
            let _ = tower.firing.update(dt, target, &mut factory);
        }

        self.projectiles.advance(dt, &mut self.creeps, out_events);

        self.outcomes.clear();
        self.creeps
            .advance(dt, &self.navigation, &mut self.outcomes);
        for outcome in self.outcomes.drain(..) {
            match outcome {
                CreepOutcome::Killed { creep, bounty } => {
                    let bounty = u64::from(bounty);
                    self.money = self.money.saturating_add(bounty);
                    out_events.push(Event::CreepKilled { creep, bounty });
                }
                CreepOutcome::ReachedGoal { creep } => {
                    self.lives = self.lives.saturating_sub(1);
                    out_events.push(Event::CreepReachedGoal {
                        creep,
                        lives_remaining: self.lives,
                    });
                }
            }
        }

        self.placement
            .update_creep_restrictions(self.creeps.occupied_cells());
        self.prune_renderables();

        self.evaluate_outcome(out_events);
    }

    /// Draws the level, first dropping handles to entities that no longer
    /// exist. Ticks prune the same way, so headless runs stay bounded.
    pub fn render(&mut self, target: &mut dyn RenderTarget) {
        self.prune_renderables();
        let creeps = &self.creeps;
        let towers = &self.towers;
        let projectiles = &self.projectiles;

        for cell in self.placement.placeable_cells() {
            target.draw(DrawPrimitive::PlaceableCell { cell });
        }

        for handle in &self.renderables {
            match handle {
                RenderHandle::SourceSpinner(index) => {
                    if let Some(spinner) = self.decorations.spinners.get(*index) {
                        spinner.render(target);
                    }
                }
                RenderHandle::GoalPulse => self.decorations.goal.render(target),
                RenderHandle::Tower(id) => {
                    if let Some(tower) = towers.get(*id) {
                        tower.render(target);
                    }
                }
                RenderHandle::Creep(id) => {
                    if let Some(creep) = creeps.get(*id) {
                        creep.render(target);
                    }
                }
                RenderHandle::HealthBar(id) => {
                    if let Some(creep) = creeps.get(*id) {
                        HealthBar(creep).render(target);
                    }
                }
                RenderHandle::Projectile(id) => {
                    if let Some(projectile) = projectiles.get(*id) {
                        projectile.render(target);
                    }
                }
            }
        }
    }

    /// Builds the inspection panel of whatever lies under `point`, preferring
    /// towers over creeps.
    #[must_use]
    pub fn select_at(&self, point: CellPoint) -> Option<InspectionPanel> {
        if let Some(tower) = self.towers.iter().find(|tower| tower.contains(point)) {
            return Some(tower.build_panel(self));
        }
        self.creeps
            .iter()
            .find(|creep| creep.contains(point))
            .map(|creep| creep.build_panel(self))
    }

    fn spawn_creep(&mut self, kind: CreepKind, life: u32, bounty: u32, cell: CellCoord) -> CreepId {
        let creep = self.creeps.spawn(kind, life, bounty, cell);
        self.renderables.push(RenderHandle::Creep(creep));
        self.renderables.push(RenderHandle::HealthBar(creep));
        creep
    }

    /// Drops handles whose entity no longer exists in its owning collection.
    fn prune_renderables(&mut self) {
        let creeps = &self.creeps;
        let towers = &self.towers;
        let projectiles = &self.projectiles;
        self.renderables.retain(|handle| match handle {
            RenderHandle::SourceSpinner(_) | RenderHandle::GoalPulse => true,
            RenderHandle::Tower(id) => towers.contains(*id),
            RenderHandle::Creep(id) | RenderHandle::HealthBar(id) => creeps.get(*id).is_some(),
            RenderHandle::Projectile(id) => projectiles.get(*id).is_some(),
        });
    }

    fn rebuild_obstacles(&mut self) {
        self.navigation.rebuild(self.towers.map());
        self.placement.update_tower_restrictions(self.towers.map());
    }

    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        if self.state != LevelState::Running {
            return;
        }

        if self.lives == 0 {
            self.state = LevelState::Lost;
            log::info!("level {:?} lost after {:?}", self.name, self.elapsed);
            out_events.push(Event::LevelLost);
        } else if self.schedule.invasion_ended() && self.creeps.is_empty() {
            self.state = LevelState::Won;
            log::info!("level {:?} won after {:?}", self.name, self.elapsed);
            out_events.push(Event::LevelWon);
        }
    }
}

fn creep_view(creeps: &CreepStore) -> CreepView {
    CreepView::from_snapshots(creeps.iter().map(|creep| creep.snapshot()).collect())
}

/// Applies the provided command to the level, reporting outcomes as events.
pub fn apply(level: &mut LevelInstance, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartInvasion => {
            if level.start_invasion() {
                out_events.push(Event::InvasionStarted);
            }
        }
        Command::SendNextWave => {
            let accepted = level.send_next_wave();
            out_events.push(Event::NextWaveRequested { accepted });
        }
        Command::Tick { dt } => level.tick(dt, out_events),
        Command::PlaceTower { kind, cell } => match level.create_tower_at(kind, cell) {
            Ok(tower) => out_events.push(Event::TowerPlaced {
                tower,
                kind,
                cell,
                cost: kind.cost(),
            }),
            Err(reason) => {
                log::debug!("rejected {kind} at {cell}: {reason:?}");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        },
        Command::SellTower { tower } => {
            let sale = level
                .towers
                .get(tower)
                .map(|state| state.cell)
                .ok_or(SaleError::MissingTower)
                .and_then(|cell| level.sell_tower(tower).map(|refund| (cell, refund)));
            match sale {
                Ok((cell, refund)) => out_events.push(Event::TowerSold {
                    tower,
                    cell,
                    refund,
                }),
                Err(reason) => {
                    log::debug!("rejected sale of tower {}: {reason:?}", tower.get());
                    out_events.push(Event::TowerSaleRejected { tower, reason });
                }
            }
        }
        Command::AddMoney { amount } => {
            level.add_money(amount);
            out_events.push(Event::MoneyGranted { amount });
        }
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use std::time::Duration;

    use creepline_core::{
        CellCoord, CreepView, EconomySnapshot, Grid, LevelState, TowerId, TowerSnapshot, TowerView,
    };
    use creepline_system_invasion::InvasionSchedule;

    use super::{LevelInstance, NavigationProvider, PlacementOracle, TowerMap};

    /// Display name of the level.
    #[must_use]
    pub fn name(level: &LevelInstance) -> &str {
        &level.name
    }

    /// Static grid description.
    #[must_use]
    pub fn grid(level: &LevelInstance) -> &Grid {
        &level.grid
    }

    /// Distinct creep spawn points.
    #[must_use]
    pub fn spawn_points(level: &LevelInstance) -> &[CellCoord] {
        &level.spawn_points
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(level: &LevelInstance) -> LevelState {
        level.state
    }

    /// Economy figures an interface polls once per tick.
    #[must_use]
    pub fn economy(level: &LevelInstance) -> EconomySnapshot {
        EconomySnapshot {
            money: level.money,
            lives: level.lives,
            wave: level.schedule.wave_number(),
            state: level.state,
        }
    }

    /// Navigation tree toward the goal.
    #[must_use]
    pub fn navigation(level: &LevelInstance) -> &NavigationProvider {
        &level.navigation
    }

    /// Current placement restrictions.
    #[must_use]
    pub fn placement(level: &LevelInstance) -> &PlacementOracle {
        &level.placement
    }

    /// Reports whether a tower may be placed on the cell right now.
    #[must_use]
    pub fn can_place_tower_here(level: &LevelInstance, cell: CellCoord) -> bool {
        level.placement.can_place_tower_here(cell)
    }

    /// Dense obstacle map.
    #[must_use]
    pub fn tower_map(level: &LevelInstance) -> &TowerMap {
        level.towers.map()
    }

    /// Invasion schedule with its clock and wave cursor.
    #[must_use]
    pub fn schedule(level: &LevelInstance) -> &InvasionSchedule {
        &level.schedule
    }

    /// Snapshot of every live creep.
    #[must_use]
    pub fn creep_view(level: &LevelInstance) -> CreepView {
        super::creep_view(&level.creeps)
    }

    /// Snapshot of every tower.
    #[must_use]
    pub fn tower_view(level: &LevelInstance) -> TowerView {
        TowerView::from_snapshots(
            level
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    cell: tower.cell,
                })
                .collect(),
        )
    }

    /// Tower occupying the cell, if any.
    #[must_use]
    pub fn tower_at(level: &LevelInstance, cell: CellCoord) -> Option<TowerId> {
        level.towers.map().get(cell)
    }

    /// Number of constructed towers.
    #[must_use]
    pub fn tower_count(level: &LevelInstance) -> usize {
        level.towers.len()
    }

    /// Number of live creeps.
    #[must_use]
    pub fn creep_count(level: &LevelInstance) -> usize {
        level.creeps.len()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn projectile_count(level: &LevelInstance) -> usize {
        level.projectiles.len()
    }

    /// Number of render handles retained after the last prune.
    #[must_use]
    pub fn renderable_count(level: &LevelInstance) -> usize {
        level.renderables.len()
    }

    /// Simulated time covered by all ticks so far.
    #[must_use]
    pub fn elapsed(level: &LevelInstance) -> Duration {
        level.elapsed
    }

    /// Number of ticks processed.
    #[must_use]
    pub fn tick_index(level: &LevelInstance) -> u64 {
        level.tick_index
    }
}
