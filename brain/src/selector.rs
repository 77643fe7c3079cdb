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

//! Behavior selection from motivations, personality, memory and reactions

use crate::events::{Reaction, ReactionKind};
use crate::memory::BrainMemory;
use crate::motivation::MotivationState;
use crate::personality::PersonalityProfile;
use crate::state::{BehaviorStateMachine, BehaviorType};
use rand::Rng;

/// Random jitter added to each weight so ties do not always break the same way
const WEIGHT_JITTER: f32 = 0.03;

/// Turns the cat's internal state into one behavior per tick.
///
/// A queued reaction may pre-empt the weighted choice when the cat is
/// dependent enough; otherwise every candidate behavior gets a weight from
/// motivation scaled by personality, down-weighted by the memory novelty
/// bias, and the best legal candidate wins.
pub struct BehaviorSelector;

impl BehaviorSelector {
    /// Choose the next behavior. Only returns transitions the state machine
    /// accepts from its current behavior.
    pub fn choose<R: Rng + ?Sized>(
        motivation: &MotivationState,
        personality: &PersonalityProfile,
        memory: &BrainMemory,
        machine: &BehaviorStateMachine,
        pending_reaction: Option<&Reaction>,
        companions: usize,
        independence_gate: f32,
        rng: &mut R,
    ) -> BehaviorType {
        let current = machine.current();

        // Reaction pre-emption, gated by independence: aloof cats shrug
        if let Some(reaction) = pending_reaction
            && personality.independence < independence_gate
            && let Some(target) = Self::reaction_target(reaction.kind)
            && machine.is_valid_transition(current, target)
        {
            tracing::debug!(kind = ?reaction.kind, behavior = %target, "Reaction pre-empts choice");
            return target;
        }

        let mut best = current;
        let mut best_weight = f32::MIN;
        for candidate in BehaviorType::ALL {
            if !machine.is_valid_transition(current, candidate) {
                continue;
            }
            let weight = Self::weight(candidate, motivation, personality, companions)
                * memory.novelty_weight(candidate)
                + rng.random_range(0.0..WEIGHT_JITTER);
            if weight > best_weight {
                best_weight = weight;
                best = candidate;
            }
        }
        best
    }

    /// Behavior a reaction pushes toward, if any
    fn reaction_target(kind: ReactionKind) -> Option<BehaviorType> {
        match kind {
            ReactionKind::NeedDetected => Some(BehaviorType::Observing),
            ReactionKind::YarnDetected
            | ReactionKind::YarnMoving
            | ReactionKind::LaserDetected
            | ReactionKind::LaserMoving => Some(BehaviorType::Playing),
            ReactionKind::LaserDeactivated => None,
        }
    }

    fn weight(
        behavior: BehaviorType,
        motivation: &MotivationState,
        personality: &PersonalityProfile,
        companions: usize,
    ) -> f32 {
        match behavior {
            // Tiredness dominates when energy is low
            BehaviorType::Resting => motivation.rest * (1.2 - personality.energy),
            BehaviorType::Playing => {
                motivation.stimulation
                    * (0.4 + 0.6 * personality.playfulness)
                    * (0.4 + 0.6 * personality.energy)
            }
            // Baseline activity so an unmotivated cat still drifts around
            BehaviorType::Wandering => {
                0.25 + 0.35 * motivation.stimulation * personality.energy
            }
            BehaviorType::Observing => {
                let company = if companions > 0 {
                    0.2 * personality.sociability
                } else {
                    0.0
                };
                motivation.exploration * (0.3 + 0.4 * (1.0 - personality.energy)) + company
            }
            BehaviorType::Exploring => {
                motivation.exploration * (0.4 + 0.6 * personality.curiosity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Reaction;
    use uuid::Uuid;

    fn choose(
        motivation: MotivationState,
        personality: PersonalityProfile,
        machine: &BehaviorStateMachine,
        reaction: Option<Reaction>,
    ) -> BehaviorType {
        let memory = BrainMemory::new();
        let mut rng = rand::rng();
        BehaviorSelector::choose(
            &motivation,
            &personality,
            &memory,
            machine,
            reaction.as_ref(),
            0,
            0.5,
            &mut rng,
        )
    }

    #[test]
    fn test_exhausted_cat_rests() {
        let machine = BehaviorStateMachine::new(BehaviorType::Wandering);
        let motivation = MotivationState::new(1.0, 0.0, 0.0);
        let personality = PersonalityProfile::new(0.5, 0.5, 0.5, 0.5, 0.1);
        assert_eq!(
            choose(motivation, personality, &machine, None),
            BehaviorType::Resting
        );
    }

    #[test]
    fn test_understimulated_playful_cat_plays() {
        let machine = BehaviorStateMachine::new(BehaviorType::Wandering);
        let motivation = MotivationState::new(0.0, 1.0, 0.0);
        let personality = PersonalityProfile::new(0.5, 1.0, 0.5, 0.5, 1.0);
        assert_eq!(
            choose(motivation, personality, &machine, None),
            BehaviorType::Playing
        );
    }

    #[test]
    fn test_curious_cat_explores() {
        let machine = BehaviorStateMachine::new(BehaviorType::Wandering);
        let motivation = MotivationState::new(0.0, 0.0, 1.0);
        let personality = PersonalityProfile::new(1.0, 0.3, 0.5, 0.3, 0.9);
        assert_eq!(
            choose(motivation, personality, &machine, None),
            BehaviorType::Exploring
        );
    }

    #[test]
    fn test_reaction_preempts_for_dependent_cat() {
        let machine = BehaviorStateMachine::new(BehaviorType::Wandering);
        let motivation = MotivationState::new(1.0, 0.0, 0.0);
        let personality = PersonalityProfile::new(0.5, 0.5, 0.2, 0.5, 0.1);
        let reaction = Reaction::new(ReactionKind::LaserMoving, Uuid::new_v4(), 0.9);
        assert_eq!(
            choose(motivation, personality, &machine, Some(reaction)),
            BehaviorType::Playing
        );
    }

    #[test]
    fn test_reaction_ignored_by_independent_cat() {
        let machine = BehaviorStateMachine::new(BehaviorType::Wandering);
        let motivation = MotivationState::new(1.0, 0.0, 0.0);
        let personality = PersonalityProfile::new(0.5, 0.5, 0.9, 0.5, 0.1);
        let reaction = Reaction::new(ReactionKind::LaserMoving, Uuid::new_v4(), 0.9);
        assert_eq!(
            choose(motivation, personality, &machine, Some(reaction)),
            BehaviorType::Resting
        );
    }

    #[test]
    fn test_preemption_respects_state_machine() {
        // Playing is not reachable from Exploring, so the weighted choice runs
        let machine = BehaviorStateMachine::new(BehaviorType::Exploring);
        let motivation = MotivationState::new(0.0, 0.0, 1.0);
        let personality = PersonalityProfile::new(1.0, 0.5, 0.2, 0.3, 0.9);
        let reaction = Reaction::new(ReactionKind::YarnMoving, Uuid::new_v4(), 0.9);
        let chosen = choose(motivation, personality, &machine, Some(reaction));
        assert!(machine.is_valid_transition(BehaviorType::Exploring, chosen));
        assert_ne!(chosen, BehaviorType::Playing);
    }

    #[test]
    fn test_choice_always_valid_transition() {
        let mut rng = rand::rng();
        let memory = BrainMemory::new();
        for initial in BehaviorType::ALL {
            let machine = BehaviorStateMachine::new(initial);
            for _ in 0..50 {
                let motivation = MotivationState::new(
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                );
                let personality = PersonalityProfile::new(
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                );
                let chosen = BehaviorSelector::choose(
                    &motivation,
                    &personality,
                    &memory,
                    &machine,
                    None,
                    0,
                    0.5,
                    &mut rng,
                );
                assert!(machine.is_valid_transition(initial, chosen));
            }
        }
    }

    #[test]
    fn test_novelty_bias_breaks_repetition() {
        // A cat that just played several times gets steered elsewhere even
        // though playing still has the highest raw weight.
        let mut memory = BrainMemory::new();
        for _ in 0..5 {
            memory.record_behavior(BehaviorType::Playing);
        }
        let machine = BehaviorStateMachine::new(BehaviorType::Playing);
        let motivation = MotivationState::new(0.1, 0.6, 0.4);
        let personality = PersonalityProfile::new(0.5, 0.8, 0.5, 0.5, 0.8);
        let mut rng = rand::rng();
        let chosen = BehaviorSelector::choose(
            &motivation,
            &personality,
            &memory,
            &machine,
            None,
            0,
            0.5,
            &mut rng,
        );
        assert_ne!(chosen, BehaviorType::Playing);
    }
}
