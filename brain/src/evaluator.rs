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

//! Interest scoring: how compelling a stimulus is to a given cat
//!
//! The score is `clamp01(affinity) * falloff(distance)`, where affinity is a
//! linear blend of the personality traits relevant to the stimulus kind and
//! falloff reduces the score the farther away the stimulus is. Scores are in
//! [0, 1]; the moving-target boosts the listener applies afterwards may push
//! the compared value above 1.

use crate::personality::PersonalityProfile;
use crate::spatial::Point;
use crate::stimulus::{Stimulus, StimulusKind};

/// Fraction of the score lost at the edge of the detection radius.
/// A stimulus at the full radius still scores 70% of its affinity.
pub const DISTANCE_FALLOFF: f32 = 0.3;

/// Score a stimulus for an agent at `agent_position`, normalized against the
/// detection radius in effect for this stimulus kind.
///
/// Guarantees: monotone non-decreasing in each relevant trait, monotone
/// non-increasing in distance, output clamped to [0, 1].
pub fn evaluate_interest(
    stimulus: &Stimulus,
    agent_position: Point,
    personality: &PersonalityProfile,
    radius: f32,
) -> f32 {
    let affinity = affinity(stimulus.kind, personality).clamp(0.0, 1.0);
    let distance = agent_position.distance(stimulus.position);
    let normalized = if radius > 0.0 {
        (distance / radius).min(1.0)
    } else {
        1.0
    };
    let falloff = 1.0 - DISTANCE_FALLOFF * normalized;
    (affinity * falloff).clamp(0.0, 1.0)
}

fn affinity(kind: StimulusKind, p: &PersonalityProfile) -> f32 {
    match kind {
        StimulusKind::Need => 0.5 + 0.5 * p.curiosity,
        StimulusKind::Yarn => 0.3 + 0.4 * p.playfulness + 0.3 * p.curiosity,
        StimulusKind::Laser => 0.2 + 0.5 * p.energy + 0.3 * p.curiosity,
    }
}
