#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progression controller sequencing layers, boss intros and context collapse.
//!
//! The controller owns no entities. Each tick the world reports a
//! [`LayerStatus`] and the controller answers with [`Directive`] values: begin
//! the next wave or boss, announce a cleared layer, start the collapse, or end
//! the run. Every stage change happens once, so terminal directives are never
//! repeated while the world stays in the same condition.

pub mod collapse;

use collapse_arena_core::{ArenaBounds, ArenaConfig, BossKind};
use collapse_arena_system_bosses::INTRO_SECS;

pub use collapse::Collapse;

/// Pause between a cleared layer and the next one.
pub const INTERMISSION_SECS: f32 = 1.5;

/// Where the run currently stands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    /// Waiting before the next layer begins.
    Intermission {
        /// Seconds left in the pause.
        remaining: f32,
    },
    /// A wave layer is spawning or being fought.
    Wave,
    /// The boss is playing its spawn-in animation.
    BossIntro {
        /// Seconds left in the intro.
        remaining: f32,
    },
    /// The boss fight is underway.
    BossFight,
    /// The final layer was cleared.
    Victory,
    /// The player died.
    Defeat,
}

impl Stage {
    /// Reports whether the run is over.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }

    /// Reports whether a layer is being fought and the collapse clock runs.
    #[must_use]
    pub const fn is_fighting(&self) -> bool {
        matches!(self, Self::Wave | Self::BossFight)
    }
}

/// Snapshot of the current layer reported by the world every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerStatus {
    /// The wave's spawn queue is exhausted.
    pub all_spawned: bool,
    /// Enemies still alive in the arena.
    pub hostiles_alive: usize,
    /// The boss finished its death cinematic.
    pub boss_finished: bool,
    /// The player's health reached zero.
    pub player_dead: bool,
}

/// Instruction issued to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Build the spawn queue of a wave layer.
    BeginWave {
        /// Zero-based run layer.
        layer: u32,
        /// Zero-based zone.
        zone: u32,
    },
    /// Spawn the zone boss in its intro.
    BeginBoss {
        /// Zero-based run layer.
        layer: u32,
        /// Zero-based zone.
        zone: u32,
        /// Boss archetype of the zone.
        kind: BossKind,
    },
    /// The safe arena started shrinking.
    CollapseStarted {
        /// Layer being fought.
        layer: u32,
    },
    /// The layer was cleared.
    LayerCleared {
        /// Cleared layer.
        layer: u32,
    },
    /// The final layer was cleared.
    Victory,
    /// The player died.
    Defeat {
        /// Layer the player died on.
        layer: u32,
    },
}

/// Layer sequencing state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct Progression {
    stage: Stage,
    layer: u32,
    layers_per_zone: u32,
    total_layers: u32,
    bosses: Vec<BossKind>,
    collapse: Collapse,
}

impl Progression {
    /// Creates a controller positioned before the first layer.
    #[must_use]
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            stage: Stage::Intermission { remaining: 0.0 },
            layer: 0,
            layers_per_zone: config.layers_per_zone(),
            total_layers: config.total_layers(),
            bosses: config.zones.iter().map(|zone| zone.boss).collect(),
            collapse: Collapse::new(config.collapse.clone()),
        }
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Zero-based run layer.
    #[must_use]
    pub const fn layer(&self) -> u32 {
        self.layer
    }

    /// Zero-based zone of the current layer.
    #[must_use]
    pub fn zone(&self) -> u32 {
        self.layer / self.layers_per_zone.max(1)
    }

    /// Number of layers in the run.
    #[must_use]
    pub const fn total_layers(&self) -> u32 {
        self.total_layers
    }

    /// Reports whether the current layer is a boss layer.
    #[must_use]
    pub fn is_boss_layer(&self) -> bool {
        let per_zone = self.layers_per_zone.max(1);
        self.layer % per_zone == per_zone - 1
    }

    /// Context collapse state.
    #[must_use]
    pub const fn collapse(&self) -> &Collapse {
        &self.collapse
    }

    /// Safe rectangle inside `arena`.
    #[must_use]
    pub fn safe_area(&self, arena: &ArenaBounds) -> ArenaBounds {
        self.collapse.safe_area(arena)
    }

    /// Checks completion, advances timers and appends resulting directives.
    pub fn update(&mut self, dt: f32, status: &LayerStatus, out: &mut Vec<Directive>) {
        if self.stage.is_terminal() {
            return;
        }
        if status.player_dead {
            self.stage = Stage::Defeat;
            out.push(Directive::Defeat { layer: self.layer });
            return;
        }

        match self.stage {
            Stage::Intermission { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.begin_layer(out);
                } else {
                    self.stage = Stage::Intermission { remaining };
                }
            }
            Stage::Wave => {
                if status.all_spawned && status.hostiles_alive == 0 {
                    self.clear_layer(out);
                } else {
                    self.advance_collapse(dt, out);
                }
            }
            Stage::BossIntro { remaining } => {
                let remaining = remaining - dt;
                self.stage = if remaining <= 0.0 {
                    Stage::BossFight
                } else {
                    Stage::BossIntro { remaining }
                };
            }
            Stage::BossFight => {
                if status.boss_finished {
                    self.clear_layer(out);
                } else {
                    self.advance_collapse(dt, out);
                }
            }
            Stage::Victory | Stage::Defeat => {}
        }
    }

    /// Ends the run as a defeat without waiting for the player to die.
    pub fn abandon(&mut self, out: &mut Vec<Directive>) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = Stage::Defeat;
        out.push(Directive::Defeat { layer: self.layer });
    }

    fn begin_layer(&mut self, out: &mut Vec<Directive>) {
        let zone = self.zone();
        if self.is_boss_layer() {
            let kind = self
                .bosses
                .get(zone as usize)
                .copied()
                .unwrap_or(BossKind::Hive);
            self.stage = Stage::BossIntro {
                remaining: INTRO_SECS,
            };
            out.push(Directive::BeginBoss {
                layer: self.layer,
                zone,
                kind,
            });
        } else {
            self.stage = Stage::Wave;
            out.push(Directive::BeginWave {
                layer: self.layer,
                zone,
            });
        }
    }

    fn clear_layer(&mut self, out: &mut Vec<Directive>) {
        out.push(Directive::LayerCleared { layer: self.layer });
        self.collapse.reset();
        if self.layer + 1 >= self.total_layers {
            self.stage = Stage::Victory;
            out.push(Directive::Victory);
            return;
        }
        self.layer += 1;
        self.stage = Stage::Intermission {
            remaining: INTERMISSION_SECS,
        };
    }

    fn advance_collapse(&mut self, dt: f32, out: &mut Vec<Directive>) {
        if !self.stage.is_fighting() {
            return;
        }
        if self.collapse.advance(dt) {
            out.push(Directive::CollapseStarted { layer: self.layer });
        }
    }
}
