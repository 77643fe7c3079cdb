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

//! # Purrbox Brain
//!
//! Autonomous decision core for independent animated cats sharing a 2D
//! field. Each cat owns a [`CatBrain`] that continuously decides what to do
//! (wander, rest, play, observe, explore) from a fixed personality, decaying
//! internal motivations and nearby stimuli (needs, yarn, a laser pointer).
//!
//! Rendering, sprite generation, persistence and movement execution are
//! external; the brain only requests targets and state changes through the
//! [`Mover`] trait and reads stimuli from an injected [`StimulusRegistry`]
//! shared by every cat in the field.

pub mod brain;
pub mod config;
pub mod detector;
pub mod evaluator;
pub mod events;
pub mod listener;
pub mod memory;
pub mod motivation;
pub mod mover;
pub mod personality;
pub mod selector;
pub mod spatial;
pub mod state;
pub mod stimulus;

pub use brain::CatBrain;
pub use config::{BrainConfig, BrainConfigPatch, DetectionConfig, DetectionConfigPatch, ReactionThresholds};
pub use detector::InteractionDetector;
pub use events::{EventBus, Reaction, ReactionKind, Subscription};
pub use listener::InteractionListener;
pub use memory::BrainMemory;
pub use motivation::{MotivationRates, MotivationState};
pub use mover::{Mover, MoverEvent};
pub use personality::{PersonalityPatch, PersonalityPreset, PersonalityProfile};
pub use selector::BehaviorSelector;
pub use spatial::{Bounds, Point};
pub use state::{BehaviorStateMachine, BehaviorType};
pub use stimulus::{Stimulus, StimulusKind, StimulusRegistry, StimulusSignal, StimulusState};
