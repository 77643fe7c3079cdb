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

//! Movement executor interface
//!
//! The brain never moves a cat itself. It requests targets and state changes
//! through this trait and the embedding environment's mover carries them
//! out, reporting positions and boundary collisions back.

use crate::spatial::{Bounds, Point};
use crate::state::BehaviorType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// External collaborator that executes movement and animation requests
#[cfg_attr(test, mockall::automock)]
pub trait Mover: Send + Sync {
    /// Request a move to a single target
    fn move_to(&self, target: Point, duration_hint: Option<Duration>);

    /// Request a move along a sequence of points
    fn move_along_path(&self, points: &[Point], duration_hint: Option<Duration>);

    /// Tell the mover which behavior to animate
    fn set_state(&self, behavior: BehaviorType);

    /// Pause in-flight movement
    fn pause(&self);

    /// Resume paused movement
    fn resume(&self);

    /// Current position of the cat
    fn position(&self) -> Point;

    /// Movement boundaries of the field
    fn boundaries(&self) -> Bounds;

    /// Toggle the laser-interested visual cue
    fn set_laser_interested(&self, interested: bool);
}

/// Feedback from the mover into the brain's memory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoverEvent {
    /// The cat ran into a field boundary
    BoundaryHit { position: Point },
    /// A requested move finished
    MoveEnd { position: Point },
}
