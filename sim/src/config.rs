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

use clap::Parser;
use purrbox_brain::PersonalityPreset;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "sim/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = "sim/.env"
    )]
    pub env_file: Option<String>,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            env_file: Some(".env".to_string()),
        }
    }
}

/// Errors raised while loading the simulator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub field: FieldConfig,
    pub cats: Vec<CatConfig>,
    pub scenario: ScenarioConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, ConfigError> {
        let conf = serde_yaml::from_reader(std::fs::File::open(path)?)?;
        Ok(conf)
    }
}

/// Dimensions of the shared field in pixels
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// One cat to spawn into the field
#[derive(Debug, Serialize, Deserialize)]
pub struct CatConfig {
    pub name: String,
    pub preset: PersonalityPreset,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// How long the scripted run lasts before shutdown
    pub duration_secs: EnvField<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            duration_secs: EnvField::from(45),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_default() {
        let args = Arguments::default();
        assert_eq!(args.config_file, "config.yaml");
        assert_eq!(args.env_file, Some(".env".to_string()));
    }

    #[test]
    fn test_configuration_defaults() {
        let config = Configuration::default();
        assert_eq!(config.field.width, 800.0);
        assert_eq!(config.field.height, 600.0);
        assert!(config.cats.is_empty());
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(Configuration::load("non_existent.yaml").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &file_path,
            concat!(
                "field:\n  width: 1024\n  height: 768\n",
                "cats:\n  - name: \"Mochi\"\n    preset: playful\n",
                "  - name: \"Biscuit\"\n    preset: lazy\n",
                "scenario:\n  duration_secs: 30\n",
            ),
        )
        .unwrap();

        let config = Configuration::load(file_path.to_str().unwrap()).unwrap();
        assert_eq!(config.field.width, 1024.0);
        assert_eq!(config.cats.len(), 2);
        assert_eq!(config.cats[0].name, "Mochi");
        assert_eq!(config.cats[0].preset, PersonalityPreset::Playful);
        assert_eq!(config.scenario.duration_secs.into_inner(), 30);
    }
}
