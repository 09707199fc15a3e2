//! Evolution state machine: stage roster, energy accumulation, growth scale.
//!
//! ## Progression rules
//!
//! | Event                         | Effect                                                    |
//! |-------------------------------|-----------------------------------------------------------|
//! | `consume(e)`                  | `energy += e`; scale = lerp(min, max, energy / threshold) |
//! | `energy >= threshold`         | advance exactly one stage; energy = 0; scale = new min    |
//! | threshold hit on final stage  | no transition; scale saturates at the stage maximum       |
//!
//! Overshoot past a threshold is discarded, and a single `consume` call never
//! advances more than one stage no matter how large the credit is.
//!
//! This module only tracks state.  Side effects of a transition (avatar swap,
//! spawner notification) are performed by the controller from the returned
//! [`Growth`] report.

use crate::error::{ControllerError, ControllerResult};
use serde::Deserialize;
use std::sync::Arc;

/// One tier of the growth progression.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    /// Damage stamped on every spitball fired in this stage.
    pub attack_damage: u32,
    /// Energy required to leave this stage.
    pub energy_until_next: u32,
    pub scale_min: f32,
    pub scale_max: f32,
    /// Multiplier on left-stick input when accumulating velocity.
    pub move_speed_scale: f32,
    /// Asset path of the stage's avatar; opaque to the controller.
    #[serde(default)]
    pub avatar: String,
}

/// Ordered, validated, immutable list of stages.
///
/// Construction is the only place stage data is checked, so every index in
/// `0..len()` is safe to use and every threshold is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRoster {
    stages: Vec<EvolutionStage>,
}

impl StageRoster {
    /// Validate `stages` and wrap them in a roster.
    ///
    /// Rejects an empty list, any zero threshold, and any inverted or
    /// non-finite scale range or speed multiplier.
    pub fn new(stages: Vec<EvolutionStage>) -> ControllerResult<Self> {
        if stages.is_empty() {
            return Err(ControllerError::EmptyRoster);
        }
        for (index, stage) in stages.iter().enumerate() {
            if stage.energy_until_next == 0 {
                return Err(ControllerError::ZeroThreshold {
                    stage: index,
                    name: stage.name.clone(),
                });
            }
            let finite = stage.scale_min.is_finite() && stage.scale_max.is_finite();
            if !finite || stage.scale_min <= 0.0 || stage.scale_min > stage.scale_max {
                return Err(ControllerError::InvalidScaleRange {
                    stage: index,
                    scale_min: stage.scale_min,
                    scale_max: stage.scale_max,
                });
            }
            crate::error::validate_non_negative("move_speed_scale", stage.move_speed_scale)?;
        }
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: an empty roster cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EvolutionStage> {
        self.stages.get(index)
    }

    pub fn final_index(&self) -> usize {
        self.stages.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvolutionStage> {
        self.stages.iter()
    }
}

/// Result of crediting energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Growth {
    /// Visual scale after the credit was applied (before any transition).
    pub scale: f32,
    /// New stage index when the credit crossed the threshold.
    pub promoted_to: Option<usize>,
}

/// Runtime progression state for one character.
#[derive(Debug, Clone)]
pub struct Evolution {
    roster: Arc<StageRoster>,
    index: usize,
    energy: u32,
    scale: f32,
}

impl Evolution {
    /// Start at stage 0 with no energy, at stage 0's minimum scale.
    pub fn new(roster: Arc<StageRoster>) -> Self {
        let scale = roster.stages[0].scale_min;
        Self {
            roster,
            index: 0,
            energy: 0,
            scale,
        }
    }

    pub fn roster(&self) -> &StageRoster {
        &self.roster
    }

    pub fn stage_index(&self) -> usize {
        self.index
    }

    pub fn stage_energy(&self) -> u32 {
        self.energy
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn current(&self) -> &EvolutionStage {
        &self.roster.stages[self.index]
    }

    pub fn is_final_stage(&self) -> bool {
        self.index == self.roster.final_index()
    }

    /// Energy progress through the current stage; may exceed 1.0 on the final stage.
    pub fn progress(&self) -> f32 {
        self.energy as f32 / self.current().energy_until_next as f32
    }

    /// Credit `amount` energy, rescale, and advance one stage if the threshold is met.
    pub fn consume(&mut self, amount: u32) -> Growth {
        self.energy = self.energy.saturating_add(amount);

        let stage = self.current();
        let (scale_min, scale_max, energy_until_next) =
            (stage.scale_min, stage.scale_max, stage.energy_until_next);
        let t = self.progress().clamp(0.0, 1.0);
        self.scale = scale_min + (scale_max - scale_min) * t;
        let scale = self.scale;

        let promoted_to = if self.energy >= energy_until_next && !self.is_final_stage() {
            let next = self.index + 1;
            self.enter(next);
            Some(next)
        } else {
            None
        };

        Growth { scale, promoted_to }
    }

    /// Jump to stage `index`, discarding accumulated energy.
    ///
    /// Transitions are forward-only; re-entering the current stage is allowed
    /// and simply resets its energy.
    pub fn transition_to(&mut self, index: usize) -> ControllerResult<&EvolutionStage> {
        if index >= self.roster.len() {
            return Err(ControllerError::StageOutOfRange {
                index,
                stage_count: self.roster.len(),
            });
        }
        if index < self.index {
            return Err(ControllerError::StageRegression {
                from: self.index,
                to: index,
            });
        }
        self.enter(index);
        Ok(self.current())
    }

    fn enter(&mut self, index: usize) {
        self.index = index;
        self.energy = 0;
        self.scale = self.roster.stages[index].scale_min;
    }
}
