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

mod config;
mod mover;

use crate::config::{Arguments, Configuration};
use crate::mover::SimMover;
use clap::Parser;
use purrbox_brain::{
    Bounds, BrainConfig, CatBrain, Mover, Point, Reaction, StimulusRegistry, StimulusState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution
    let config = Configuration::load(&arguments.config_file)?;
    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!("Starting Purrbox field simulator...");

    let bounds = Bounds::new(
        Point::new(0.0, 0.0),
        Point::new(config.field.width, config.field.height),
    );
    let registry = Arc::new(StimulusRegistry::new());

    // Spawn the clowder
    let mut cats = Vec::new();
    let companion_count = config.cats.len().saturating_sub(1);
    let mut rng = rand::rng();
    for cat in &config.cats {
        let start = bounds.random_point(&mut rng);
        let mover = Arc::new(SimMover::new(cat.name.clone(), bounds, start));
        let brain = CatBrain::new(
            uuid::Uuid::new_v4(),
            cat.preset.profile(),
            BrainConfig::default(),
            Some(Arc::clone(&registry)),
        );
        brain.attach_mover(Arc::clone(&mover) as Arc<dyn Mover>);
        brain.set_companions(companion_count);

        let name = cat.name.clone();
        brain.reactions().subscribe(move |reaction: &Reaction| {
            tracing::info!(
                cat = %name,
                kind = ?reaction.kind,
                interest = reaction.interest,
                "Reaction",
            );
        });

        brain.start();
        tracing::info!(cat = %cat.name, preset = ?cat.preset, at = %start, "Cat spawned");
        cats.push((brain, mover));
    }

    let scenario = tokio::spawn(run_scenario(Arc::clone(&registry), bounds));

    let duration = Duration::from_secs(config.scenario.duration_secs.into_inner());
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let deadline = tokio::time::Instant::now() + duration;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Advance every mover and feed feedback events into its brain
                for (brain, mover) in &cats {
                    for event in mover.step(Duration::from_millis(100)) {
                        brain.handle_mover_event(event);
                    }
                }
            }
            _ = tokio::time::sleep_until(deadline) => break,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted; shutting down");
                break;
            }
        }
    }

    scenario.abort();
    for (brain, _) in &cats {
        brain.destroy();
    }
    tracing::info!("Simulation complete");
    Ok(())
}

/// Scripted stimulus timeline: a need, a rolling yarn, then a laser sweep
async fn run_scenario(registry: Arc<StimulusRegistry>, bounds: Bounds) {
    let center = Point::new(
        (bounds.min.x + bounds.max.x) / 2.0,
        (bounds.min.y + bounds.max.y) / 2.0,
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    tracing::info!("Scenario: placing a need");
    registry.place_need(center);

    tokio::time::sleep(Duration::from_secs(5)).await;
    tracing::info!("Scenario: rolling a yarn across the field");
    let yarn = registry.place_yarn(Point::new(bounds.min.x + 20.0, center.y));
    for i in 1..=10 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let x = bounds.min.x + 20.0 + (bounds.max.x - bounds.min.x - 40.0) * (i as f32 / 10.0);
        registry.move_yarn(
            yarn,
            Point::new(x, center.y),
            StimulusState::Rolling,
            Some(Point::new(60.0, 0.0)),
        );
    }
    registry.move_yarn(
        yarn,
        Point::new(bounds.max.x - 20.0, center.y),
        StimulusState::Idle,
        None,
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    tracing::info!("Scenario: laser sweep");
    registry.activate_laser(center);
    for i in 0..20 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let angle = i as f32 * 0.6;
        registry.move_laser(Point::new(
            center.x + angle.cos() * 120.0,
            center.y + angle.sin() * 120.0,
        ));
    }
    registry.deactivate_laser();
    tracing::info!("Scenario: finished");
}
