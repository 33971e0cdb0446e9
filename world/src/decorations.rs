//! Cosmetic markers for spawn points and the goal.

use std::{f32::consts::TAU, time::Duration};

use creepline_core::CellCoord;

const SPINNER_DEGREES_PER_SECOND: f32 = 45.0;
const PULSE_PHASE_SPEED: f32 = 2.0;
const PULSE_MIN_RADIUS: f32 = 0.1;
const PULSE_MAX_RADIUS: f32 = 0.45;

/// Rotating marker drawn on a creep spawn point.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SourceSpinner {
    pub(crate) cell: CellCoord,
    angle: f32,
}

impl SourceSpinner {
    /// Rotation in degrees, kept within `[0, 360)`.
    pub(crate) fn angle_degrees(&self) -> f32 {
        self.angle
    }

    fn advance(&mut self, dt: Duration) {
        self.angle = (self.angle + SPINNER_DEGREES_PER_SECOND * dt.as_secs_f32()).rem_euclid(360.0);
    }
}

/// Pulsing marker drawn on the goal.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GoalPulse {
    pub(crate) cell: CellCoord,
    phase: f32,
}

impl GoalPulse {
    /// Marker radius in cells, oscillating between the minimum and maximum.
    pub(crate) fn radius(&self) -> f32 {
        let wave = 0.5 + 0.5 * self.phase.sin();
        PULSE_MIN_RADIUS + (PULSE_MAX_RADIUS - PULSE_MIN_RADIUS) * wave
    }

    fn advance(&mut self, dt: Duration) {
        self.phase = (self.phase + PULSE_PHASE_SPEED * dt.as_secs_f32()).rem_euclid(TAU);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Decorations {
    pub(crate) spinners: Vec<SourceSpinner>,
    pub(crate) goal: GoalPulse,
}

impl Decorations {
    pub(crate) fn new(spawn_points: &[CellCoord], goal: CellCoord) -> Self {
        Self {
            spinners: spawn_points
                .iter()
                .map(|cell| SourceSpinner {
                    cell: *cell,
                    angle: 0.0,
                })
                .collect(),
            goal: GoalPulse {
                cell: goal,
                phase: 0.0,
            },
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        for spinner in &mut self.spinners {
            spinner.advance(dt);
        }
        self.goal.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_turns_at_constant_rate_and_wraps() {
        let mut decorations = Decorations::new(&[CellCoord::new(0, 0)], CellCoord::new(3, 3));
        decorations.advance(Duration::from_secs(2));
        assert!((decorations.spinners[0].angle_degrees() - 90.0).abs() < 1e-4);
        decorations.advance(Duration::from_secs(8));
        assert!((decorations.spinners[0].angle_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn goal_pulse_stays_within_bounds() {
        let mut decorations = Decorations::new(&[], CellCoord::new(1, 1));
        for _ in 0..100 {
            decorations.advance(Duration::from_millis(37));
            let radius = decorations.goal.radius();
            assert!(radius >= PULSE_MIN_RADIUS - 1e-5 && radius <= PULSE_MAX_RADIUS + 1e-5);
        }
    }
}
