#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when towers fire at their targets.
//!
//! Firing strategies never create projectiles themselves. They hand the
//! request to a [`ProjectileFactory`] supplied by the level for the duration
//! of a single tower update, which keeps projectile storage in one place.

use std::time::Duration;

use creepline_core::{CreepId, ProjectileId, ProjectileKind, TowerKind};

/// Registers projectiles on behalf of the tower currently being updated.
pub trait ProjectileFactory {
    /// Creates a projectile of the given kind aimed at `target` and returns
    /// its identifier.
    fn fire(&mut self, kind: ProjectileKind, target: CreepId) -> ProjectileId;
}

/// Periodic firing strategy.
///
/// The cooldown only runs while the tower holds a target, and a tower fires
/// at most once per update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    projectile: ProjectileKind,
    period: Duration,
    ready_in: Duration,
}

impl Firing {
    /// Creates a strategy that fires `projectile` every `period`, starting
    /// with the first update that has a target.
    #[must_use]
    pub const fn periodic(projectile: ProjectileKind, period: Duration) -> Self {
        Self {
            projectile,
            period,
            ready_in: Duration::ZERO,
        }
    }

    /// Strategy installed on new towers of the given kind.
    #[must_use]
    pub const fn for_tower(kind: TowerKind) -> Self {
        Self::periodic(kind.projectile(), kind.fire_period())
    }

    /// Projectile fired by the strategy.
    #[must_use]
    pub const fn projectile(&self) -> ProjectileKind {
        self.projectile
    }

    /// Time left before the next shot, counted only while a target is held.
    #[must_use]
    pub const fn ready_in(&self) -> Duration {
        self.ready_in
    }

    /// Advances the cooldown and fires through `factory` when it elapses.
    pub fn update(
        &mut self,
        dt: Duration,
        target: Option<CreepId>,
        factory: &mut dyn ProjectileFactory,
    ) -> Option<ProjectileId> {
        let target = target?;

        if dt < self.ready_in {
            self.ready_in -= dt;
            return None;
        }

        let overshoot = dt - self.ready_in;
        self.ready_in = self.period.saturating_sub(overshoot);
        Some(factory.fire(self.projectile, target))
    }
}
