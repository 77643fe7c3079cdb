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

//! Bounded rolling history of what a cat has seen and done

use crate::spatial::Point;
use crate::state::BehaviorType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default capacity of the visited-position ring buffer
pub const DEFAULT_POSITION_CAPACITY: usize = 32;
/// Default capacity of the previous-behavior ring buffer
pub const DEFAULT_BEHAVIOR_CAPACITY: usize = 16;

/// How many recent behaviors the novelty bias looks at
const NOVELTY_WINDOW: usize = 5;
/// Down-weight applied per recent repetition of the same behavior
const NOVELTY_PENALTY: f32 = 0.25;

/// Rolling memory for a single cat.
///
/// Ring buffers evict oldest-first. Mutated only by the owning brain and by
/// boundary-hit notifications from the mover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainMemory {
    visited_positions: VecDeque<Point>,
    previous_behaviors: VecDeque<BehaviorType>,
    position_capacity: usize,
    behavior_capacity: usize,
    last_interaction: Option<DateTime<Utc>>,
    boundary_hits: u64,
}

impl BrainMemory {
    /// Create an empty memory with default capacities
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POSITION_CAPACITY, DEFAULT_BEHAVIOR_CAPACITY)
    }

    /// Create an empty memory with explicit ring-buffer capacities
    pub fn with_capacity(position_capacity: usize, behavior_capacity: usize) -> Self {
        // A zero-capacity ring would make every record a no-op
        let position_capacity = position_capacity.max(1);
        let behavior_capacity = behavior_capacity.max(1);
        Self {
            visited_positions: VecDeque::with_capacity(position_capacity),
            previous_behaviors: VecDeque::with_capacity(behavior_capacity),
            position_capacity,
            behavior_capacity,
            last_interaction: None,
            boundary_hits: 0,
        }
    }

    /// Record a visited position, evicting the oldest when full
    pub fn record_position(&mut self, position: Point) {
        if self.visited_positions.len() == self.position_capacity {
            self.visited_positions.pop_front();
        }
        self.visited_positions.push_back(position);
    }

    /// Record a chosen behavior, evicting the oldest when full
    pub fn record_behavior(&mut self, behavior: BehaviorType) {
        if self.previous_behaviors.len() == self.behavior_capacity {
            self.previous_behaviors.pop_front();
        }
        self.previous_behaviors.push_back(behavior);
    }

    /// Mark the moment of the most recent stimulus interaction
    pub fn touch_interaction(&mut self, at: DateTime<Utc>) {
        self.last_interaction = Some(at);
    }

    /// Count a boundary collision reported by the mover
    pub fn record_boundary_hit(&mut self) {
        self.boundary_hits += 1;
    }

    /// Positions visited recently, oldest first
    pub fn visited_positions(&self) -> impl Iterator<Item = &Point> {
        self.visited_positions.iter()
    }

    /// Behaviors chosen recently, oldest first
    pub fn previous_behaviors(&self) -> impl Iterator<Item = &BehaviorType> {
        self.previous_behaviors.iter()
    }

    /// Timestamp of the last stimulus interaction, if any
    pub fn last_interaction(&self) -> Option<DateTime<Utc>> {
        self.last_interaction
    }

    /// Total boundary collisions since creation
    pub fn boundary_hits(&self) -> u64 {
        self.boundary_hits
    }

    /// Novelty bias for behavior selection in (0, 1].
    ///
    /// A behavior repeated within the recent window is down-weighted so the
    /// cat does not loop on the same activity.
    pub fn novelty_weight(&self, behavior: BehaviorType) -> f32 {
        let repeats = self
            .previous_behaviors
            .iter()
            .rev()
            .take(NOVELTY_WINDOW)
            .filter(|b| **b == behavior)
            .count() as f32;
        1.0 / (1.0 + NOVELTY_PENALTY * repeats)
    }

    /// Forget everything; boundary hits reset too since the cat is gone
    pub fn clear(&mut self) {
        self.visited_positions.clear();
        self.previous_behaviors.clear();
        self.last_interaction = None;
        self.boundary_hits = 0;
    }
}

impl Default for BrainMemory {
    fn default() -> Self {
        Self::new()
    }
}
