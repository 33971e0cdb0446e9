//! Boundary between the simulation and whatever draws or inspects it.
//!
//! The level never rasterises anything. Every visible entity describes itself
//! as [`DrawPrimitive`] values handed to a [`RenderTarget`], and selectable
//! entities describe themselves as an [`InspectionPanel`].

use creepline_core::{
    CellCoord, CellPoint, Command, CreepId, CreepKind, Delivery, ProjectileId, ProjectileKind,
    TowerId, TowerKind,
};

use crate::{
    creeps::Creep,
    decorations::{GoalPulse, SourceSpinner},
    projectiles::Projectile,
    towers::Tower,
    LevelInstance,
};

/// Single drawing instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawPrimitive {
    /// Highlights a cell that currently accepts a tower.
    PlaceableCell {
        /// Highlighted cell.
        cell: CellCoord,
    },
    /// A constructed tower.
    Tower {
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Type of the tower.
        kind: TowerKind,
    },
    /// A creep body.
    Creep {
        /// Interpolated creep position.
        position: CellPoint,
        /// Type of the creep.
        kind: CreepKind,
    },
    /// Health bar floating above a creep.
    HealthBar {
        /// Interpolated creep position.
        position: CellPoint,
        /// Remaining life as a fraction of maximum life.
        fraction: f32,
    },
    /// A timed projectile in flight.
    Shot {
        /// Displayed projectile position.
        position: CellPoint,
        /// Type of the projectile.
        kind: ProjectileKind,
    },
    /// A beam between a tower and its target.
    Beam {
        /// Start of the beam.
        from: CellPoint,
        /// End of the beam.
        to: CellPoint,
        /// Type of the projectile.
        kind: ProjectileKind,
    },
    /// Rotating marker on a spawn point.
    SourceSpinner {
        /// Spawn cell.
        cell: CellCoord,
        /// Rotation in degrees.
        angle_degrees: f32,
    },
    /// Pulsing marker on the goal.
    GoalPulse {
        /// Goal cell.
        cell: CellCoord,
        /// Marker radius in cells.
        radius: f32,
    },
}

/// Sink for drawing instructions.
pub trait RenderTarget {
    /// Receives one drawing instruction.
    fn draw(&mut self, primitive: DrawPrimitive);
}

impl RenderTarget for Vec<DrawPrimitive> {
    fn draw(&mut self, primitive: DrawPrimitive) {
        self.push(primitive);
    }
}

/// Entity that can describe itself to a render target.
pub trait Renderable {
    /// Emits the drawing instructions for the entity.
    fn render(&self, target: &mut dyn RenderTarget);

    /// Pick test used by selection; entities are not pickable by default.
    fn contains(&self, _point: CellPoint) -> bool {
        false
    }
}

/// Entity that can open an inspection panel.
pub trait Selectable {
    /// Builds the panel shown when the entity is selected.
    fn build_panel(&self, level: &LevelInstance) -> InspectionPanel;
}

/// Action offered by an inspection panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    /// Sells the tower.
    Sell(TowerId),
}

impl PanelAction {
    /// Command that performs the action.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::Sell(tower) => Command::SellTower { tower },
        }
    }
}

/// Description of a selected entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectionPanel {
    /// Heading of the panel.
    pub title: String,
    /// Informational lines.
    pub lines: Vec<String>,
    /// Actions the player may trigger.
    pub actions: Vec<PanelAction>,
}

/// Weak reference to something drawable, resolved against the owning
/// collection on every render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenderHandle {
    SourceSpinner(usize),
    GoalPulse,
    Tower(TowerId),
    Creep(CreepId),
    HealthBar(CreepId),
    Projectile(ProjectileId),
}

impl Renderable for Tower {
    fn render(&self, target: &mut dyn RenderTarget) {
        target.draw(DrawPrimitive::Tower {
            cell: self.cell,
            kind: self.kind,
        });
    }

    fn contains(&self, point: CellPoint) -> bool {
        let center = self.cell.center();
        (point.column() - center.column()).abs() <= 0.5 && (point.row() - center.row()).abs() <= 0.5
    }
}

impl Selectable for Tower {
    fn build_panel(&self, level: &LevelInstance) -> InspectionPanel {
        let mut lines = vec![
            format!("Cell: {}", self.cell),
            format!("Range: {:.1}", self.kind.range()),
            format!("Fire period: {:.2}s", self.kind.fire_period().as_secs_f32()),
            format!("Sell value: {}", self.sell_value),
        ];
        if let Some(creep) = self.targeting.current().and_then(|id| level.creeps.get(id)) {
            lines.push(format!("Target: creep {}", creep.id.get()));
        }
        InspectionPanel {
            title: self.kind.name().to_owned(),
            lines,
            actions: vec![PanelAction::Sell(self.id)],
        }
    }
}

impl Renderable for Creep {
    fn render(&self, target: &mut dyn RenderTarget) {
        target.draw(DrawPrimitive::Creep {
            position: self.position(),
            kind: self.kind,
        });
    }

    fn contains(&self, point: CellPoint) -> bool {
        self.position().distance_squared(point) < 0.25
    }
}

impl Selectable for Creep {
    fn build_panel(&self, _level: &LevelInstance) -> InspectionPanel {
        let mut lines = vec![
            format!("Life: {}/{}", self.life, self.max_life),
            format!("Bounty: {}", self.bounty),
        ];
        lines.extend(self.buffs.iter().map(|buff| {
            format!(
                "{:?} {:+.0}% ({:.1}s)",
                buff.kind(),
                buff.strength(),
                buff.remaining().as_secs_f32()
            )
        }));
        InspectionPanel {
            title: self.kind.name().to_owned(),
            lines,
            actions: Vec::new(),
        }
    }
}

/// Health bar bound to a creep.
pub(crate) struct HealthBar<'a>(pub(crate) &'a Creep);

impl Renderable for HealthBar<'_> {
    fn render(&self, target: &mut dyn RenderTarget) {
        target.draw(DrawPrimitive::HealthBar {
            position: self.0.position(),
            fraction: self.0.health_fraction(),
        });
    }
}

impl Renderable for Projectile {
    fn render(&self, target: &mut dyn RenderTarget) {
        match self.delivery() {
            Delivery::Timed => target.draw(DrawPrimitive::Shot {
                position: self.position,
                kind: self.kind,
            }),
            Delivery::Beam => target.draw(DrawPrimitive::Beam {
                from: self.origin,
                to: self.position,
                kind: self.kind,
            }),
        }
    }
}

impl Renderable for SourceSpinner {
    fn render(&self, target: &mut dyn RenderTarget) {
        target.draw(DrawPrimitive::SourceSpinner {
            cell: self.cell,
            angle_degrees: self.angle_degrees(),
        });
    }
}

impl Renderable for GoalPulse {
    fn render(&self, target: &mut dyn RenderTarget) {
        target.draw(DrawPrimitive::GoalPulse {
            cell: self.cell,
            radius: self.radius(),
        });
    }
}
