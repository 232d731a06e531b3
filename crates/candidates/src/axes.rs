//! Stylistic axes and the target-parameter vectors candidates are scored against.

use crate::candidate::CandidateKind;
use serde::{Deserialize, Serialize};

/// Value an unknown or unreadable axis takes.
pub const NEUTRAL: f64 = 0.5;

/// Axes scored on scene-description fragments.
pub const SCENE_AXES: [&str; 6] = [
    "desc_style",
    "perspective",
    "sensory",
    "thought",
    "tension",
    "reality",
];

/// Axes scored on character fragments (and every kind that is not a scene).
pub const CHARACTER_AXES: [&str; 5] = [
    "char_count",
    "char_mental",
    "char_belief",
    "char_trauma",
    "char_voice",
];

/// User-tunable target parameters.
///
/// Keyed form uses the `p_`-prefixed names; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    pub p_desc_style: f64,
    pub p_perspective: f64,
    pub p_sensory: f64,
    pub p_thought: f64,
    pub p_tension: f64,
    pub p_reality: f64,

    pub p_char_count: f64,
    pub p_char_mental: f64,
    pub p_char_belief: f64,
    pub p_char_trauma: f64,
    pub p_char_voice: f64,

    /// Desired total length of the selection, in characters.
    pub length: f64,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            p_desc_style: 0.5,
            p_perspective: 0.5,
            p_sensory: 0.5,
            p_thought: 0.5,
            p_tension: 0.5,
            p_reality: 0.5,
            p_char_count: 0.2,
            p_char_mental: 0.5,
            p_char_belief: 0.5,
            p_char_trauma: 0.0,
            p_char_voice: 0.5,
            length: 500.0,
        }
    }
}

impl TargetParams {
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn scene_target(&self) -> TargetVector<6> {
        TargetVector {
            axes: SCENE_AXES,
            values: [
                self.p_desc_style,
                self.p_perspective,
                self.p_sensory,
                self.p_thought,
                self.p_tension,
                self.p_reality,
            ],
        }
    }

    pub fn character_target(&self) -> TargetVector<5> {
        TargetVector {
            axes: CHARACTER_AXES,
            values: [
                self.p_char_count,
                self.p_char_mental,
                self.p_char_belief,
                self.p_char_trauma,
                self.p_char_voice,
            ],
        }
    }

    /// Squared distance between a candidate's attributes and the target
    /// vector its kind routes to.
    pub fn squared_distance(&self, kind: &CandidateKind, attribute: impl Fn(&str) -> f64) -> f64 {
        if kind.is_scene() {
            self.scene_target().squared_distance(attribute)
        } else {
            self.character_target().squared_distance(attribute)
        }
    }

    /// Check every target is usable: axis targets in [0, 1], length finite
    /// and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let scene = self.scene_target();
        let character = self.character_target();
        let targets = scene
            .axes
            .iter()
            .zip(scene.values)
            .chain(character.axes.iter().zip(character.values));
        for (axis, value) in targets {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("p_{axis} must be within [0, 1], got {value}"));
            }
        }
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(format!("target length must be a non-negative number, got {}", self.length));
        }
        Ok(())
    }
}

/// Fixed axis set paired with target values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetVector<const N: usize> {
    pub axes: [&'static str; N],
    pub values: [f64; N],
}

impl<const N: usize> TargetVector<N> {
    pub fn get(&self, axis: &str) -> Option<f64> {
        self.axes
            .iter()
            .position(|a| *a == axis)
            .map(|idx| self.values[idx])
    }

    pub fn squared_distance(&self, attribute: impl Fn(&str) -> f64) -> f64 {
        self.axes
            .iter()
            .zip(self.values.iter())
            .map(|(axis, target)| {
                let diff = attribute(*axis) - target;
                diff * diff
            })
            .sum()
    }
}
