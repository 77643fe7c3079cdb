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

//! Behavior states and the transition policy between them

use serde::{Deserialize, Serialize};

/// High-level activity a cat is currently engaged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorType {
    Wandering,
    Resting,
    Playing,
    Observing,
    Exploring,
}

impl BehaviorType {
    /// All behavior variants, for iteration in selection and tests
    pub const ALL: [BehaviorType; 5] = [
        BehaviorType::Wandering,
        BehaviorType::Resting,
        BehaviorType::Playing,
        BehaviorType::Observing,
        BehaviorType::Exploring,
    ];

    /// Stable lowercase label, matching the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            BehaviorType::Wandering => "wandering",
            BehaviorType::Resting => "resting",
            BehaviorType::Playing => "playing",
            BehaviorType::Observing => "observing",
            BehaviorType::Exploring => "exploring",
        }
    }
}

impl std::fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Governs which behavior transitions are legal and holds the current one.
///
/// Wandering, observing and exploring form a fully reversible cluster.
/// Resting and playing are entered only from wandering or observing and exit
/// only back to wandering or observing. Self-transitions are legal (a
/// behavior may be re-chosen on consecutive ticks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorStateMachine {
    current: BehaviorType,
}

impl BehaviorStateMachine {
    /// Create a state machine starting in the given behavior
    pub fn new(initial: BehaviorType) -> Self {
        Self { current: initial }
    }

    /// The behavior the cat is currently in
    pub fn current(&self) -> BehaviorType {
        self.current
    }

    /// Check whether a transition is legal
    pub fn is_valid_transition(&self, from: BehaviorType, to: BehaviorType) -> bool {
        use BehaviorType::*;
        if from == to {
            return true;
        }
        match (from, to) {
            // Reversible cluster
            (Wandering | Observing | Exploring, Wandering | Observing | Exploring) => true,
            // Terminal-ish states, in and out via wandering/observing only
            (Wandering | Observing, Resting | Playing) => true,
            (Resting | Playing, Wandering | Observing) => true,
            _ => false,
        }
    }

    /// Request a transition.
    ///
    /// An invalid request is dropped: the current behavior is unchanged and
    /// the rejection is logged at debug, never raised.
    pub fn transition(&mut self, to: BehaviorType) -> bool {
        if self.is_valid_transition(self.current, to) {
            self.current = to;
            true
        } else {
            tracing::debug!(from = %self.current, to = %to, "Rejected behavior transition");
            false
        }
    }
}

impl Default for BehaviorStateMachine {
    fn default() -> Self {
        Self::new(BehaviorType::Wandering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversible_cluster_symmetric() {
        let machine = BehaviorStateMachine::default();
        use BehaviorType::*;
        for a in [Wandering, Observing, Exploring] {
            for b in [Wandering, Observing, Exploring] {
                assert!(machine.is_valid_transition(a, b));
                assert!(machine.is_valid_transition(b, a));
            }
        }
    }

    #[test]
    fn test_resting_playing_restricted() {
        let machine = BehaviorStateMachine::default();
        use BehaviorType::*;
        assert!(machine.is_valid_transition(Wandering, Resting));
        assert!(machine.is_valid_transition(Observing, Playing));
        assert!(!machine.is_valid_transition(Exploring, Resting));
        assert!(!machine.is_valid_transition(Exploring, Playing));
        assert!(!machine.is_valid_transition(Resting, Playing));
        assert!(!machine.is_valid_transition(Playing, Resting));
        assert!(!machine.is_valid_transition(Resting, Exploring));
    }

    #[test]
    fn test_self_transition_valid() {
        let mut machine = BehaviorStateMachine::new(BehaviorType::Resting);
        assert!(machine.transition(BehaviorType::Resting));
        assert_eq!(machine.current(), BehaviorType::Resting);
    }

    #[test]
    fn test_invalid_request_leaves_state_unchanged() {
        let mut machine = BehaviorStateMachine::new(BehaviorType::Exploring);
        assert!(!machine.transition(BehaviorType::Playing));
        assert_eq!(machine.current(), BehaviorType::Exploring);
    }

    #[test]
    fn test_valid_request_moves_state() {
        let mut machine = BehaviorStateMachine::new(BehaviorType::Wandering);
        assert!(machine.transition(BehaviorType::Playing));
        assert_eq!(machine.current(), BehaviorType::Playing);
        assert!(machine.transition(BehaviorType::Observing));
        assert_eq!(machine.current(), BehaviorType::Observing);
    }
}
