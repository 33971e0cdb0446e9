//! Projectiles in flight and the factory towers fire through.

use std::time::Duration;

use creepline_core::{
    CellPoint, CreepId, Delivery, Effect, Event, ProjectileId, ProjectileKind, TowerId,
};
use creepline_system_tower_combat::ProjectileFactory;

use crate::{creeps::CreepStore, presentation::RenderHandle};

/// A projectile travelling toward, or beaming at, its target.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) target: CreepId,
    pub(crate) origin: CellPoint,
    pub(crate) position: CellPoint,
    pub(crate) remaining: Duration,
}

impl Projectile {
    pub(crate) fn delivery(&self) -> Delivery {
        self.kind.delivery()
    }

    pub(crate) fn effect(&self) -> Effect {
        self.kind.effect()
    }

    /// Moves the displayed position toward the target, keeping the time left
    /// proportional to the distance left.
    fn track(&mut self, target: CellPoint, dt: Duration) {
        match self.delivery() {
            Delivery::Beam => self.position = target,
            Delivery::Timed => {
                let before = self.remaining.as_secs_f32();
                let after = self.remaining.saturating_sub(dt).as_secs_f32();
                let ratio = if before > 0.0 { after / before } else { 0.0 };
                self.position = CellPoint::new(
                    target.column() + ratio * (self.position.column() - target.column()),
                    target.row() + ratio * (self.position.row() - target.row()),
                );
            }
        }
    }
}

/// Projectiles in flight ordered by identifier.
#[derive(Debug, Default)]
pub(crate) struct ProjectileStore {
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
}

impl ProjectileStore {
    pub(crate) fn register(
        &mut self,
        kind: ProjectileKind,
        origin: CellPoint,
        target: CreepId,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.projectiles.push(Projectile {
            id,
            kind,
            target,
            origin,
            position: origin,
            remaining: kind.delay(),
        });
        id
    }

    pub(crate) fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles
            .binary_search_by_key(&id, |projectile| projectile.id)
            .ok()
            .map(|index| &self.projectiles[index])
    }

    pub(crate) fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Advances every projectile, applying effects to live targets once
    /// their delay elapses and expiring those whose target vanished.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        creeps: &mut CreepStore,
        out_events: &mut Vec<Event>,
    ) {
        self.projectiles.retain_mut(|projectile| {
            let Some(creep) = creeps
                .get_mut(projectile.target)
                .filter(|creep| creep.is_alive())
            else {
                log::debug!(
                    "projectile {} expired, target {} is gone",
                    projectile.id.get(),
                    projectile.target.get()
                );
                out_events.push(Event::ProjectileExpired {
                    projectile: projectile.id,
                });
                return false;
            };

            projectile.track(creep.position(), dt);
            if dt < projectile.remaining {
                projectile.remaining -= dt;
                return true;
            }

            creep.apply(projectile.effect());
            out_events.push(Event::ProjectileImpacted {
                projectile: projectile.id,
                target: projectile.target,
            });
            false
        });
    }
}

/// Factory handed to a single tower's firing strategy during its update.
pub(crate) struct TowerProjectileFactory<'a> {
    pub(crate) tower: TowerId,
    pub(crate) origin: CellPoint,
    pub(crate) store: &'a mut ProjectileStore,
    pub(crate) handles: &'a mut Vec<RenderHandle>,
    pub(crate) out_events: &'a mut Vec<Event>,
}

impl ProjectileFactory for TowerProjectileFactory<'_> {
    fn fire(&mut self, kind: ProjectileKind, target: CreepId) -> ProjectileId {
        let projectile = self.store.register(kind, self.origin, target);
        self.handles.push(RenderHandle::Projectile(projectile));
        self.out_events.push(Event::ProjectileFired {
            projectile,
            tower: self.tower,
            target,
            kind,
        });
        projectile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creepline_core::{CellCoord, CreepKind};

    #[test]
    fn timed_projectile_hits_after_its_delay() {
        let mut creeps = CreepStore::default();
        let creep = creeps.spawn(CreepKind::GenericCreep, 50, 1, CellCoord::new(2, 0));
        let mut store = ProjectileStore::default();
        let id = store.register(ProjectileKind::Generic, CellPoint::new(0.0, 0.0), creep);
        let mut events = Vec::new();

        store.advance(Duration::from_millis(500), &mut creeps, &mut events);
        let projectile = store.get(id).expect("in flight");
        assert!((projectile.position.column() - 1.0).abs() < 1e-5);
        assert!(events.is_empty());

        store.advance(Duration::from_millis(500), &mut creeps, &mut events);
        assert_eq!(store.len(), 0);
        assert_eq!(
            events,
            vec![Event::ProjectileImpacted {
                projectile: id,
                target: creep,
            }]
        );
        assert_eq!(creeps.get(creep).expect("alive").life, 30);
    }

    #[test]
    fn beam_tracks_target_and_hits_quickly() {
        let mut creeps = CreepStore::default();
        let creep = creeps.spawn(CreepKind::GenericCreep, 50, 1, CellCoord::new(1, 1));
        let mut store = ProjectileStore::default();
        let _ = store.register(ProjectileKind::Laser, CellPoint::new(0.0, 0.0), creep);
        let mut events = Vec::new();

        store.advance(Duration::from_millis(100), &mut creeps, &mut events);
        assert_eq!(store.len(), 0);
        assert_eq!(creeps.get(creep).expect("alive").life, 40);
    }

    #[test]
    fn projectile_without_target_expires_silently() {
        let mut creeps = CreepStore::default();
        let mut store = ProjectileStore::default();
        let id = store.register(
            ProjectileKind::Weakness,
            CellPoint::new(0.0, 0.0),
            CreepId::new(42),
        );
        let mut events = Vec::new();

        store.advance(Duration::from_millis(16), &mut creeps, &mut events);
        assert_eq!(events, vec![Event::ProjectileExpired { projectile: id }]);
        assert_eq!(store.len(), 0);
    }
}
