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

//! Minimal movement executor for the headless simulator
//!
//! Steps a cat toward its requested target at constant speed and reports
//! boundary collisions and completed moves. No tweening or physics; the real
//! renderer-side mover owns that.

use purrbox_brain::{BehaviorType, Bounds, Mover, MoverEvent, Point};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Movement speed in pixels per second
const SPEED: f32 = 60.0;
/// Distance at which a target counts as reached
const ARRIVAL_EPSILON: f32 = 2.0;

/// A stepping mover for one simulated cat
pub struct SimMover {
    name: String,
    bounds: Bounds,
    position: Mutex<Point>,
    path: Mutex<VecDeque<Point>>,
    paused: AtomicBool,
    laser_interested: AtomicBool,
}

impl SimMover {
    /// Create a mover at a starting position within the field bounds
    pub fn new(name: impl Into<String>, bounds: Bounds, start: Point) -> Self {
        Self {
            name: name.into(),
            bounds,
            position: Mutex::new(bounds.clamp(start)),
            path: Mutex::new(VecDeque::new()),
            paused: AtomicBool::new(false),
            laser_interested: AtomicBool::new(false),
        }
    }

    /// Advance the simulation by `delta`, returning feedback for the brain
    pub fn step(&self, delta: Duration) -> Vec<MoverEvent> {
        let mut events = Vec::new();
        if self.paused.load(Ordering::SeqCst) {
            return events;
        }
        let mut path = self.path.lock().unwrap_or_else(|e| e.into_inner());
        let Some(target) = path.front().copied() else {
            return events;
        };
        let mut position = self.position.lock().unwrap_or_else(|e| e.into_inner());

        let dx = target.x - position.x;
        let dy = target.y - position.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let reach = SPEED * delta.as_secs_f32();

        let next = if distance <= reach {
            target
        } else {
            Point::new(
                position.x + dx / distance * reach,
                position.y + dy / distance * reach,
            )
        };

        if !self.bounds.contains(next) {
            let clamped = self.bounds.clamp(next);
            *position = clamped;
            path.clear();
            events.push(MoverEvent::BoundaryHit { position: clamped });
            return events;
        }

        *position = next;
        if next.distance(target) <= ARRIVAL_EPSILON {
            path.pop_front();
            if path.is_empty() {
                events.push(MoverEvent::MoveEnd { position: next });
            }
        }
        events
    }
}

impl Mover for SimMover {
    fn move_to(&self, target: Point, _duration_hint: Option<Duration>) {
        let mut path = self.path.lock().unwrap_or_else(|e| e.into_inner());
        path.clear();
        path.push_back(target);
    }

    fn move_along_path(&self, points: &[Point], _duration_hint: Option<Duration>) {
        let mut path = self.path.lock().unwrap_or_else(|e| e.into_inner());
        path.clear();
        path.extend(points.iter().copied());
    }

    fn set_state(&self, behavior: BehaviorType) {
        tracing::info!(cat = %self.name, behavior = %behavior, "Behavior change");
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    fn position(&self) -> Point {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn boundaries(&self) -> Bounds {
        self.bounds
    }

    fn set_laser_interested(&self, interested: bool) {
        if self.laser_interested.swap(interested, Ordering::SeqCst) != interested {
            tracing::info!(cat = %self.name, interested, "Laser interest cue");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover() -> SimMover {
        SimMover::new(
            "test",
            Bounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
            Point::new(50.0, 50.0),
        )
    }

    #[test]
    fn test_step_moves_toward_target() {
        let m = mover();
        m.move_to(Point::new(80.0, 50.0), None);
        m.step(Duration::from_millis(100));
        let pos = m.position();
        assert!(pos.x > 50.0 && pos.x < 80.0);
        assert_eq!(pos.y, 50.0);
    }

    #[test]
    fn test_arrival_emits_move_end() {
        let m = mover();
        m.move_to(Point::new(52.0, 50.0), None);
        let events = m.step(Duration::from_secs(1));
        assert!(matches!(events.as_slice(), [MoverEvent::MoveEnd { .. }]));
    }

    #[test]
    fn test_paused_mover_stays_put() {
        let m = mover();
        m.move_to(Point::new(80.0, 50.0), None);
        m.pause();
        assert!(m.step(Duration::from_secs(1)).is_empty());
        assert_eq!(m.position(), Point::new(50.0, 50.0));
        // Movement picks back up after resume
        m.resume();
        m.step(Duration::from_millis(100));
        assert!(m.position().x > 50.0);
    }
}
