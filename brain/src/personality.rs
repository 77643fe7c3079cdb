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

//! Personality trait vector driving individual cat temperament

use serde::{Deserialize, Serialize};

/// Fixed personality profile for a cat.
///
/// Five traits, each held in [0.0, 1.0]. Out-of-range inputs are clamped,
/// never rejected. The profile only changes through [`PersonalityProfile::apply`]
/// or by selecting a preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub curiosity: f32,
    pub playfulness: f32,
    pub independence: f32,
    pub sociability: f32,
    pub energy: f32,
}

impl PersonalityProfile {
    /// Create a profile, clamping every trait into [0, 1]
    pub fn new(
        curiosity: f32,
        playfulness: f32,
        independence: f32,
        sociability: f32,
        energy: f32,
    ) -> Self {
        Self {
            curiosity,
            playfulness,
            independence,
            sociability,
            energy,
        }
        .clamped()
    }

    /// Merge a partial update into this profile, clamping the result
    pub fn apply(&mut self, patch: PersonalityPatch) {
        if let Some(v) = patch.curiosity {
            self.curiosity = v;
        }
        if let Some(v) = patch.playfulness {
            self.playfulness = v;
        }
        if let Some(v) = patch.independence {
            self.independence = v;
        }
        if let Some(v) = patch.sociability {
            self.sociability = v;
        }
        if let Some(v) = patch.energy {
            self.energy = v;
        }
        *self = self.clamped();
    }

    fn clamped(self) -> Self {
        Self {
            curiosity: self.curiosity.clamp(0.0, 1.0),
            playfulness: self.playfulness.clamp(0.0, 1.0),
            independence: self.independence.clamp(0.0, 1.0),
            sociability: self.sociability.clamp(0.0, 1.0),
            energy: self.energy.clamp(0.0, 1.0),
        }
    }
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        PersonalityPreset::Balanced.profile()
    }
}

impl From<PersonalityPreset> for PersonalityProfile {
    fn from(preset: PersonalityPreset) -> Self {
        preset.profile()
    }
}

/// Named personality presets. Selecting one overwrites the full vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityPreset {
    Playful,
    Lazy,
    Curious,
    Aloof,
    Energetic,
    Balanced,
}

impl PersonalityPreset {
    /// The constant trait vector for this preset
    pub fn profile(&self) -> PersonalityProfile {
        match self {
            //                                          cur  play ind  soc  nrg
            Self::Playful => PersonalityProfile::new(0.7, 0.9, 0.3, 0.7, 0.8),
            Self::Lazy => PersonalityProfile::new(0.3, 0.2, 0.6, 0.4, 0.2),
            Self::Curious => PersonalityProfile::new(0.9, 0.6, 0.4, 0.5, 0.6),
            Self::Aloof => PersonalityProfile::new(0.4, 0.3, 0.9, 0.2, 0.4),
            Self::Energetic => PersonalityProfile::new(0.6, 0.8, 0.4, 0.6, 0.9),
            Self::Balanced => PersonalityProfile::new(0.5, 0.5, 0.5, 0.5, 0.5),
        }
    }
}

/// Partial personality update with merge semantics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PersonalityPatch {
    pub curiosity: Option<f32>,
    pub playfulness: Option<f32>,
    pub independence: Option<f32>,
    pub sociability: Option<f32>,
    pub energy: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_traits() {
        let profile = PersonalityProfile::new(1.5, -0.2, 0.5, 2.0, -1.0);
        assert_eq!(profile.curiosity, 1.0);
        assert_eq!(profile.playfulness, 0.0);
        assert_eq!(profile.independence, 0.5);
        assert_eq!(profile.sociability, 1.0);
        assert_eq!(profile.energy, 0.0);
    }

    #[test]
    fn test_apply_merges_and_clamps() {
        let mut profile = PersonalityPreset::Balanced.profile();
        profile.apply(PersonalityPatch {
            curiosity: Some(0.9),
            energy: Some(7.0),
            ..Default::default()
        });
        assert_eq!(profile.curiosity, 0.9);
        assert_eq!(profile.energy, 1.0);
        // Unpatched traits keep their prior values
        assert_eq!(profile.playfulness, 0.5);
        assert_eq!(profile.independence, 0.5);
    }

    #[test]
    fn test_presets_within_range() {
        for preset in [
            PersonalityPreset::Playful,
            PersonalityPreset::Lazy,
            PersonalityPreset::Curious,
            PersonalityPreset::Aloof,
            PersonalityPreset::Energetic,
            PersonalityPreset::Balanced,
        ] {
            let p = preset.profile();
            for trait_value in [
                p.curiosity,
                p.playfulness,
                p.independence,
                p.sociability,
                p.energy,
            ] {
                assert!((0.0..=1.0).contains(&trait_value));
            }
        }
    }

    #[test]
    fn test_preset_overwrites_full_vector() {
        let mut profile = PersonalityProfile::new(0.1, 0.1, 0.1, 0.1, 0.1);
        profile = PersonalityPreset::Playful.into();
        assert_eq!(profile, PersonalityPreset::Playful.profile());
    }
}
