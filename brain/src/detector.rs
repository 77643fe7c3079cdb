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

//! Polling-side detection of stimuli near a cat

use crate::config::{DetectionConfig, DetectionConfigPatch};
use crate::spatial::Point;
use crate::stimulus::{Stimulus, StimulusRegistry};
use std::sync::Arc;

/// Polls the shared stimulus registry for elements within range.
///
/// Holds the registry as an optional injected reference; when absent every
/// query deterministically returns an empty result instead of erroring, so a
/// cat without an environment keeps running its baseline loop.
pub struct InteractionDetector {
    source: Option<Arc<StimulusRegistry>>,
    config: DetectionConfig,
}

impl InteractionDetector {
    /// Create a detector against an optional stimulus registry
    pub fn new(source: Option<Arc<StimulusRegistry>>, config: DetectionConfig) -> Self {
        if source.is_none() {
            tracing::warn!("Interaction detector created without a stimulus registry");
        }
        Self { source, config }
    }

    /// Swap the stimulus registry (or detach it entirely)
    pub fn set_source(&mut self, source: Option<Arc<StimulusRegistry>>) {
        self.source = source;
    }

    /// Current detection configuration
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Merge a partial configuration update (radii clamped non-negative)
    pub fn update_config(&mut self, patch: DetectionConfigPatch) {
        self.config.apply(patch);
    }

    /// Needs within the configured radius of the agent position
    pub fn nearby_needs(&self, position: Point) -> Vec<Stimulus> {
        match &self.source {
            Some(registry) => registry.needs_near(position, self.config.need_radius),
            None => Vec::new(),
        }
    }

    /// Yarn toys within the configured radius of the agent position
    pub fn nearby_yarns(&self, position: Point) -> Vec<Stimulus> {
        match &self.source {
            Some(registry) => registry.yarns_near(position, self.config.yarn_radius),
            None => Vec::new(),
        }
    }

    /// The laser dot, when active and within the configured radius
    pub fn nearby_laser(&self, position: Point) -> Option<Stimulus> {
        let registry = self.source.as_ref()?;
        registry
            .active_laser()
            .filter(|laser| laser.position.distance(position) <= self.config.laser_radius)
    }
}
