//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Named tuning constants for detection, reactions and the decision loop
//!
//! Every numeric threshold the brain uses lives here with a documented
//! default, so the values are independently testable and tunable instead of
//! being scattered as literals. Out-of-range inputs are clamped at the
//! boundary, never rejected.

use crate::memory::{DEFAULT_BEHAVIOR_CAPACITY, DEFAULT_POSITION_CAPACITY};
use crate::motivation::MotivationRates;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-type detection radii for polling, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Radius for needs (default 150)
    pub need_radius: f32,
    /// Radius for yarn toys (default 150)
    pub yarn_radius: f32,
    /// Radius for the laser dot (default 300)
    pub laser_radius: f32,
}

impl DetectionConfig {
    /// Merge a partial update, clamping radii non-negative
    pub fn apply(&mut self, patch: DetectionConfigPatch) {
        if let Some(v) = patch.need_radius {
            self.need_radius = v.max(0.0);
        }
        if let Some(v) = patch.yarn_radius {
            self.yarn_radius = v.max(0.0);
        }
        if let Some(v) = patch.laser_radius {
            self.laser_radius = v.max(0.0);
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            need_radius: 150.0,
            yarn_radius: 150.0,
            laser_radius: 300.0,
        }
    }
}

/// Partial detection-config update with merge semantics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DetectionConfigPatch {
    pub need_radius: Option<f32>,
    pub yarn_radius: Option<f32>,
    pub laser_radius: Option<f32>,
}

/// Gating thresholds for push-side reactions.
///
/// Comparison strictness matters and differs per event; see the listener.
/// Boosted interest values may legitimately exceed 1.0, so the moving-target
/// thresholds are not clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionThresholds {
    /// Need reacts when interest is strictly above this (default 0.7)
    pub need_interest: f32,
    /// ... and independence strictly below this (default 0.5)
    pub need_independence_cap: f32,
    /// Yarn reacts at or above this interest (default 0.5)
    pub yarn_interest: f32,
    /// ... with curiosity at or above this (default 0.3)
    pub yarn_curiosity_floor: f32,
    /// Widened radius for rolling yarn (default 200)
    pub yarn_moving_radius: f32,
    /// Multiplier on clamped interest for rolling yarn (default 1.3)
    pub yarn_moving_boost: f32,
    /// Rolling yarn reacts at or above this boosted interest (default 0.6)
    pub yarn_moving_interest: f32,
    /// ... with energy at or above this (default 0.3)
    pub yarn_moving_energy_floor: f32,
    /// Laser activation reacts strictly above this interest (default 0.5)
    pub laser_interest: f32,
    /// ... with curiosity strictly above this (default 0.3)
    pub laser_curiosity_floor: f32,
    /// Multiplier on clamped interest for a moving laser (default 1.5)
    pub laser_moving_boost: f32,
    /// Moving laser reacts strictly above this boosted interest (default 0.6)
    pub laser_moving_interest: f32,
    /// ... with energy strictly above this (default 0.2)
    pub laser_moving_energy_floor: f32,
}

impl Default for ReactionThresholds {
    fn default() -> Self {
        Self {
            need_interest: 0.7,
            need_independence_cap: 0.5,
            yarn_interest: 0.5,
            yarn_curiosity_floor: 0.3,
            yarn_moving_radius: 200.0,
            yarn_moving_boost: 1.3,
            yarn_moving_interest: 0.6,
            yarn_moving_energy_floor: 0.3,
            laser_interest: 0.5,
            laser_curiosity_floor: 0.3,
            laser_moving_boost: 1.5,
            laser_moving_interest: 0.6,
            laser_moving_energy_floor: 0.2,
        }
    }
}

/// Full tuning surface of one brain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainConfig {
    pub detection: DetectionConfig,
    pub thresholds: ReactionThresholds,
    pub rates: MotivationRates,
    /// Shortest pause between decision ticks (default 2 s)
    pub tick_interval_min: Duration,
    /// Longest pause between decision ticks (default 5 s)
    pub tick_interval_max: Duration,
    /// Independence at or above this suppresses reaction pre-emption
    /// of the weighted behavior choice (default 0.5)
    pub reaction_independence_gate: f32,
    /// Ring-buffer capacity for visited positions (default 32)
    pub position_memory: usize,
    /// Ring-buffer capacity for previous behaviors (default 16)
    pub behavior_memory: usize,
}

impl BrainConfig {
    /// Merge a partial update, then normalize out-of-range values
    pub fn apply(&mut self, patch: BrainConfigPatch) {
        if let Some(detection) = patch.detection {
            self.detection.apply(detection);
        }
        if let Some(rates) = patch.rates {
            self.rates = MotivationRates::new(
                rates.rest_per_sec,
                rates.stimulation_per_sec,
                rates.exploration_per_sec,
            );
        }
        if let Some(min) = patch.tick_interval_min {
            self.tick_interval_min = min;
        }
        if let Some(max) = patch.tick_interval_max {
            self.tick_interval_max = max;
        }
        if let Some(gate) = patch.reaction_independence_gate {
            self.reaction_independence_gate = gate.clamp(0.0, 1.0);
        }
        if self.tick_interval_max < self.tick_interval_min {
            self.tick_interval_max = self.tick_interval_min;
        }
    }
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            thresholds: ReactionThresholds::default(),
            rates: MotivationRates::default(),
            tick_interval_min: Duration::from_secs(2),
            tick_interval_max: Duration::from_secs(5),
            reaction_independence_gate: 0.5,
            position_memory: DEFAULT_POSITION_CAPACITY,
            behavior_memory: DEFAULT_BEHAVIOR_CAPACITY,
        }
    }
}

/// Partial brain-config update with merge semantics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BrainConfigPatch {
    pub detection: Option<DetectionConfigPatch>,
    pub rates: Option<MotivationRates>,
    pub tick_interval_min: Option<Duration>,
    pub tick_interval_max: Option<Duration>,
    pub reaction_independence_gate: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.need_radius, 150.0);
        assert_eq!(config.yarn_radius, 150.0);
        assert_eq!(config.laser_radius, 300.0);
    }

    #[test]
    fn test_detection_patch_merges() {
        let mut config = DetectionConfig::default();
        config.apply(DetectionConfigPatch {
            laser_radius: Some(400.0),
            ..Default::default()
        });
        assert_eq!(config.laser_radius, 400.0);
        // Untouched fields keep their values
        assert_eq!(config.need_radius, 150.0);
    }

    #[test]
    fn test_detection_patch_clamps_negative() {
        let mut config = DetectionConfig::default();
        config.apply(DetectionConfigPatch {
            need_radius: Some(-50.0),
            ..Default::default()
        });
        assert_eq!(config.need_radius, 0.0);
    }

    #[test]
    fn test_brain_config_normalizes_interval_order() {
        let mut config = BrainConfig::default();
        config.apply(BrainConfigPatch {
            tick_interval_min: Some(Duration::from_secs(10)),
            ..Default::default()
        });
        assert_eq!(config.tick_interval_min, Duration::from_secs(10));
        assert_eq!(config.tick_interval_max, Duration::from_secs(10));
    }

    #[test]
    fn test_brain_config_clamps_gate() {
        let mut config = BrainConfig::default();
        config.apply(BrainConfigPatch {
            reaction_independence_gate: Some(3.0),
            ..Default::default()
        });
        assert_eq!(config.reaction_independence_gate, 1.0);
    }
}
