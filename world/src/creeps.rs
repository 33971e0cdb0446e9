//! Creep state and the walking model.

use std::time::Duration;

use creepline_core::{
    scaled_damage, speed_factor, Buff, BuffKind, CellCoord, CellPoint, CreepId, CreepKind,
    CreepSnapshot, Effect,
};

use crate::navigation::NavigationProvider;

/// A creep walking between two adjacent cells.
#[derive(Clone, Debug)]
pub(crate) struct Creep {
    pub(crate) id: CreepId,
    pub(crate) kind: CreepKind,
    pub(crate) life: u32,
    pub(crate) max_life: u32,
    pub(crate) bounty: u32,
    pub(crate) from: CellCoord,
    pub(crate) to: CellCoord,
    pub(crate) progress: f32,
    pub(crate) buffs: Vec<Buff>,
}

impl Creep {
    fn new(id: CreepId, kind: CreepKind, life: u32, bounty: u32, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            life,
            max_life: life,
            bounty,
            from: cell,
            to: cell,
            progress: 1.0,
            buffs: Vec::new(),
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Interpolated position between the `from` and `to` cells.
    pub(crate) fn position(&self) -> CellPoint {
        let t = self.progress.clamp(0.0, 1.0);
        let from = self.from.center();
        let to = self.to.center();
        CellPoint::new(
            from.column() + (to.column() - from.column()) * t,
            from.row() + (to.row() - from.row()) * t,
        )
    }

    pub(crate) fn buff_total(&self, kind: BuffKind) -> f32 {
        self.buffs
            .iter()
            .filter(|buff| buff.kind() == kind)
            .map(Buff::strength)
            .sum()
    }

    pub(crate) fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Damage(raw) => {
                let damage = scaled_damage(raw, self.buff_total(BuffKind::Vulnerability));
                self.life = self.life.saturating_sub(damage);
            }
            Effect::Buff(buff) => self.buffs.push(buff),
        }
    }

    pub(crate) fn health_fraction(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    pub(crate) fn snapshot(&self) -> CreepSnapshot {
        CreepSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position(),
            life: self.life,
            max_life: self.max_life,
        }
    }

    fn decay_buffs(&mut self, dt: Duration) {
        self.buffs.retain_mut(|buff| buff.decay(dt));
    }

    /// Walks along the navigation tree and reports whether the goal was
    /// reached.
    fn walk(&mut self, dt: Duration, navigation: &NavigationProvider) -> bool {
        let speed = self.kind.speed() * speed_factor(self.buff_total(BuffKind::Speed));
        self.progress += speed * dt.as_secs_f32();

        while self.progress > 1.0 {
            if self.at_goal(navigation.goal()) {
                return true;
            }

            let Some(next) = navigation.next_step(self.to) else {
                log::warn!(
                    "creep {} at {} has no route to the goal",
                    self.id.get(),
                    self.to
                );
                self.from = self.to;
                self.progress = 1.0;
                return false;
            };

            self.from = self.to;
            self.to = next;
            self.progress -= 1.0;
        }

        self.at_goal(navigation.goal())
    }

    fn at_goal(&self, goal: CellCoord) -> bool {
        self.from == goal && self.to == goal
    }
}

/// Outcome of advancing a single creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CreepOutcome {
    Killed { creep: CreepId, bounty: u32 },
    ReachedGoal { creep: CreepId },
}

/// Live creeps ordered by identifier.
#[derive(Debug, Default)]
pub(crate) struct CreepStore {
    creeps: Vec<Creep>,
    next_creep_id: u32,
}

impl CreepStore {
    pub(crate) fn spawn(
        &mut self,
        kind: CreepKind,
        life: u32,
        bounty: u32,
        cell: CellCoord,
    ) -> CreepId {
        let id = CreepId::new(self.next_creep_id);
        self.next_creep_id = self.next_creep_id.saturating_add(1);
        self.creeps.push(Creep::new(id, kind, life, bounty, cell));
        id
    }

    pub(crate) fn get(&self, id: CreepId) -> Option<&Creep> {
        self.creeps
            .binary_search_by_key(&id, |creep| creep.id)
            .ok()
            .map(|index| &self.creeps[index])
    }

    pub(crate) fn get_mut(&mut self, id: CreepId) -> Option<&mut Creep> {
        self.creeps
            .binary_search_by_key(&id, |creep| creep.id)
            .ok()
            .map(|index| &mut self.creeps[index])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Creep> {
        self.creeps.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.creeps.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.creeps.len()
    }

    /// Cells blocked for placement: both ends of every creep's current step.
    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.creeps
            .iter()
            .flat_map(|creep| [creep.from, creep.to])
    }

    /// Decays buffs, walks live creeps, and removes the dead and those that
    /// reached the goal.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        navigation: &NavigationProvider,
        outcomes: &mut Vec<CreepOutcome>,
    ) {
        self.creeps.retain_mut(|creep| {
            if !creep.is_alive() {
                outcomes.push(CreepOutcome::Killed {
                    creep: creep.id,
                    bounty: creep.bounty,
                });
                return false;
            }

            creep.decay_buffs(dt);
            if creep.walk(dt, navigation) {
                outcomes.push(CreepOutcome::ReachedGoal { creep: creep.id });
                return false;
            }
            true
        });
    }
}
