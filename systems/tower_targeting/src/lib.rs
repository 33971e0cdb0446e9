#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets from a per-tick creep snapshot.
//!
//! [`CreepLookup`] is rebuilt once per tick from the live creep list and
//! answers spatial queries for every tower. [`Targeting`] is the per-tower
//! strategy that decides which creep, if any, the tower aims at.

use creepline_core::{CellPoint, CreepId, CreepView, TargetingMode};
use glam::Vec2;

/// Spatial snapshot of live creeps that reuses its scratch buffer between
/// ticks.
#[derive(Debug, Default)]
pub struct CreepLookup {
    candidates: Vec<CreepCandidate>,
}

impl CreepLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot with the provided creeps.
    pub fn rebuild(&mut self, creeps: &CreepView) {
        self.candidates.clear();
        self.candidates.reserve(creeps.len());
        self.candidates
            .extend(creeps.iter().filter(|creep| creep.life > 0).map(|creep| {
                CreepCandidate {
                    id: creep.id,
                    position: to_vec2(creep.position),
                }
            }));
    }

    /// Number of creeps captured by the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Reports whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Position of a creep captured by the snapshot.
    #[must_use]
    pub fn position(&self, creep: CreepId) -> Option<CellPoint> {
        self.find(creep)
            .map(|candidate| CellPoint::new(candidate.position.x, candidate.position.y))
    }

    /// Reports whether the creep is in the snapshot and strictly closer than
    /// `range` to `origin`.
    #[must_use]
    pub fn in_range(&self, creep: CreepId, origin: CellPoint, range: f32) -> bool {
        self.find(creep).is_some_and(|candidate| {
            candidate.position.distance_squared(to_vec2(origin)) < range * range
        })
    }

    /// Closest creep strictly within `range` of `origin`.
    ///
    /// Equidistant creeps resolve to the lowest identifier.
    #[must_use]
    pub fn closest_in_range(&self, origin: CellPoint, range: f32) -> Option<CreepId> {
        let origin = to_vec2(origin);
        let limit = range * range;
        let mut best: Option<BestCandidate> = None;

        for candidate in &self.candidates {
            let distance_sq = candidate.position.distance_squared(origin);
            if distance_sq >= limit {
                continue;
            }

            let current = BestCandidate {
                distance_sq,
                creep: candidate.id,
            };

            match &mut best {
                Some(existing) => {
                    if current.precedes(existing) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map(|candidate| candidate.creep)
    }

    fn find(&self, creep: CreepId) -> Option<&CreepCandidate> {
        self.candidates
            .binary_search_by_key(&creep, |candidate| candidate.id)
            .ok()
            .map(|index| &self.candidates[index])
    }
}

/// Per-tower targeting strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Targeting {
    mode: TargetingMode,
    current: Option<CreepId>,
}

impl Targeting {
    /// Creates a strategy with no target.
    #[must_use]
    pub const fn new(mode: TargetingMode) -> Self {
        Self {
            mode,
            current: None,
        }
    }

    /// Strategy in use.
    #[must_use]
    pub const fn mode(&self) -> TargetingMode {
        self.mode
    }

    /// Target chosen by the latest call to [`Targeting::acquire`].
    #[must_use]
    pub const fn current(&self) -> Option<CreepId> {
        self.current
    }

    /// Chooses the target for this tick.
    ///
    /// Closest targeting re-selects every tick. Lock-on keeps the previous
    /// target while it stays in the snapshot and in range, falling back to
    /// the closest creep otherwise.
    pub fn acquire(
        &mut self,
        origin: CellPoint,
        range: f32,
        creeps: &CreepLookup,
    ) -> Option<CreepId> {
        let kept = match self.mode {
            TargetingMode::Closest => None,
            TargetingMode::LockOn => self
                .current
                .filter(|creep| creeps.in_range(*creep, origin, range)),
        };
        self.current = kept.or_else(|| creeps.closest_in_range(origin, range));
        self.current
    }
}

fn to_vec2(point: CellPoint) -> Vec2 {
    Vec2::new(point.column(), point.row())
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CreepCandidate {
    id: CreepId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    creep: CreepId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.creep < other.creep
    }
}
