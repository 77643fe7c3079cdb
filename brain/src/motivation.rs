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

//! Internal motivations that accumulate over time until satisfied

use crate::state::BehaviorType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-second growth rates for each motivation while it goes unmet.
///
/// Negative rates are clamped to zero rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotivationRates {
    pub rest_per_sec: f32,
    pub stimulation_per_sec: f32,
    pub exploration_per_sec: f32,
}

impl MotivationRates {
    /// Create rates, clamping negatives to zero
    pub fn new(rest_per_sec: f32, stimulation_per_sec: f32, exploration_per_sec: f32) -> Self {
        Self {
            rest_per_sec: rest_per_sec.max(0.0),
            stimulation_per_sec: stimulation_per_sec.max(0.0),
            exploration_per_sec: exploration_per_sec.max(0.0),
        }
    }
}

impl Default for MotivationRates {
    fn default() -> Self {
        Self {
            rest_per_sec: 0.001,
            stimulation_per_sec: 0.002,
            exploration_per_sec: 0.0015,
        }
    }
}

/// Decaying internal needs, independent of personality.
///
/// Each component stays in [0.0, 1.0] and climbs toward 1.0 until a chosen
/// behavior satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotivationState {
    pub rest: f32,
    pub stimulation: f32,
    pub exploration: f32,
}

/// How much a completed behavior tick reduces its matching motivation.
const REST_SATISFACTION: f32 = 0.15;
const PLAY_SATISFACTION: f32 = 0.20;
const WANDER_SATISFACTION: f32 = 0.05;
const EXPLORE_SATISFACTION: f32 = 0.15;
const OBSERVE_SATISFACTION: f32 = 0.08;

impl MotivationState {
    /// Create a motivation state, clamping each component into [0, 1]
    pub fn new(rest: f32, stimulation: f32, exploration: f32) -> Self {
        Self {
            rest: rest.clamp(0.0, 1.0),
            stimulation: stimulation.clamp(0.0, 1.0),
            exploration: exploration.clamp(0.0, 1.0),
        }
    }

    /// Accumulate unmet needs for the elapsed wall time
    pub fn decay(&mut self, elapsed: Duration, rates: &MotivationRates) {
        let secs = elapsed.as_secs_f32();
        self.rest = (self.rest + rates.rest_per_sec * secs).clamp(0.0, 1.0);
        self.stimulation = (self.stimulation + rates.stimulation_per_sec * secs).clamp(0.0, 1.0);
        self.exploration = (self.exploration + rates.exploration_per_sec * secs).clamp(0.0, 1.0);
    }

    /// Reduce the motivation matching a behavior the cat just carried out
    pub fn satisfy(&mut self, behavior: BehaviorType) {
        match behavior {
            BehaviorType::Resting => self.rest = (self.rest - REST_SATISFACTION).max(0.0),
            BehaviorType::Playing => {
                self.stimulation = (self.stimulation - PLAY_SATISFACTION).max(0.0)
            }
            BehaviorType::Wandering => {
                self.stimulation = (self.stimulation - WANDER_SATISFACTION).max(0.0)
            }
            BehaviorType::Exploring => {
                self.exploration = (self.exploration - EXPLORE_SATISFACTION).max(0.0)
            }
            BehaviorType::Observing => {
                self.exploration = (self.exploration - OBSERVE_SATISFACTION).max(0.0)
            }
        }
    }
}

impl Default for MotivationState {
    fn default() -> Self {
        Self::new(0.3, 0.5, 0.4)
    }
}
