#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic invasion schedule that releases creep spawns over time.
//!
//! The schedule owns the invasion clock. Each call to
//! [`InvasionSchedule::advance`] moves the clock forward by one step and
//! returns every spawn whose absolute time fell inside the step, so the
//! caller decides how spawns turn into creeps.

use std::time::Duration;

use creepline_core::{SpawnEvent, WavePlan};

#[derive(Clone, Debug)]
struct ScheduledWave {
    start: Duration,
    events: Vec<SpawnEvent>,
    cursor: usize,
    started: bool,
}

impl ScheduledWave {
    fn pending(&self) -> usize {
        self.events.len() - self.cursor
    }
}

/// Spawns and wave starts released by a single schedule step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnBatch {
    /// One-based numbers of the waves that started during the step.
    pub started_waves: Vec<u32>,
    /// Spawn events that became due, ordered by absolute time.
    pub spawns: Vec<SpawnEvent>,
}

impl SpawnBatch {
    /// Reports whether the step released nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.started_waves.is_empty() && self.spawns.is_empty()
    }
}

/// Time-ordered collection of waves with per-wave spawn cursors.
#[derive(Clone, Debug)]
pub struct InvasionSchedule {
    waves: Vec<ScheduledWave>,
    clock: Duration,
    remaining: usize,
    started: u32,
}

impl InvasionSchedule {
    /// Creates a schedule from validated wave plans.
    ///
    /// Waves are ordered by start offset and events within a wave by their
    /// offset; ties keep their declaration order.
    #[must_use]
    pub fn new(plans: Vec<WavePlan>) -> Self {
        let mut waves: Vec<ScheduledWave> = plans
            .into_iter()
            .map(|plan| {
                let mut events = plan.events;
                events.sort_by_key(|event| event.offset);
                ScheduledWave {
                    start: plan.start,
                    events,
                    cursor: 0,
                    started: false,
                }
            })
            .collect();
        waves.sort_by_key(|wave| wave.start);
        let remaining = waves.iter().map(ScheduledWave::pending).sum();

        Self {
            waves,
            clock: Duration::ZERO,
            remaining,
            started: 0,
        }
    }

    /// Advances the invasion clock and releases every spawn that became due.
    ///
    /// A spawn is due once `wave start + offset` is at or before the new
    /// clock value. Spawns released by earlier steps are never repeated.
    pub fn advance(&mut self, dt: Duration) -> SpawnBatch {
        self.clock = self.clock.saturating_add(dt);
        let now = self.clock;

        let mut batch = SpawnBatch::default();
        let mut due: Vec<(Duration, SpawnEvent)> = Vec::new();
        for (index, wave) in self.waves.iter_mut().enumerate() {
            if wave.start > now {
                break;
            }

            if !wave.started {
                wave.started = true;
                self.started += 1;
                batch
                    .started_waves
                    .push(u32::try_from(index + 1).unwrap_or(u32::MAX));
            }

            let elapsed = now - wave.start;
            let pending = &wave.events[wave.cursor..];
            let count = pending.partition_point(|event| event.offset <= elapsed);
            due.extend(
                pending[..count]
                    .iter()
                    .map(|event| (wave.start + event.offset, *event)),
            );
            wave.cursor += count;
            self.remaining -= count;
        }

        due.sort_by_key(|(at, _)| *at);
        batch.spawns = due.into_iter().map(|(_, event)| event).collect();
        batch
    }

    /// Pulls every wave that has not started yet forward so the next one
    /// starts immediately. Returns `false` when no wave is pending.
    pub fn send_next_wave(&mut self) -> bool {
        let Some(next) = self.waves.iter().find(|wave| !wave.started) else {
            return false;
        };
        let gap = next.start.saturating_sub(self.clock);
        for wave in self.waves.iter_mut().filter(|wave| !wave.started) {
            wave.start = wave.start.saturating_sub(gap);
        }
        true
    }

    /// Reports whether every scheduled spawn has been released.
    #[must_use]
    pub fn invasion_ended(&self) -> bool {
        self.remaining == 0
    }

    /// Number of waves that have started so far.
    #[must_use]
    pub fn wave_number(&self) -> u32 {
        self.started
    }

    /// Total number of waves in the schedule.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Number of spawns not yet released.
    #[must_use]
    pub fn remaining_events(&self) -> usize {
        self.remaining
    }

    /// Time elapsed on the invasion clock.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    /// Time left until the next wave starts, if one is pending.
    #[must_use]
    pub fn next_wave_in(&self) -> Option<Duration> {
        self.waves
            .iter()
            .find(|wave| !wave.started)
            .map(|wave| wave.start.saturating_sub(self.clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creepline_core::{CellCoord, CreepKind};

    fn event(offset_ms: u64) -> SpawnEvent {
        SpawnEvent {
            offset: Duration::from_millis(offset_ms),
            kind: CreepKind::GenericCreep,
            cell: CellCoord::new(0, 0),
            life: 10,
            bounty: 1,
        }
    }

    #[test]
    fn events_are_sorted_within_each_wave() {
        let mut schedule = InvasionSchedule::new(vec![WavePlan {
            start: Duration::ZERO,
            events: vec![event(300), event(100), event(200)],
        }]);
        let batch = schedule.advance(Duration::from_secs(1));
        let offsets: Vec<u64> = batch
            .spawns
            .iter()
            .map(|spawn| spawn.offset.as_millis() as u64)
            .collect();
        assert_eq!(offsets, vec![100, 200, 300]);
    }

    #[test]
    fn empty_schedule_has_ended_immediately() {
        let mut schedule = InvasionSchedule::new(Vec::new());
        assert!(schedule.invasion_ended());
        assert!(!schedule.send_next_wave());
        assert!(schedule.advance(Duration::from_secs(1)).is_empty());
    }
}
