use std::path::Path;

use anyhow::{Context, Result};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::script::ScriptedPress;

#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct Config {
    pub tick_hz: f32,
    /// Builtin ship spec to spawn.
    pub ship: String,
    /// Scripted key presses, by tick range.
    pub script: Vec<ScriptedPress>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: 30.0,
            ship: "mining_skiff".to_string(),
            script: Vec::new(),
        }
    }
}

pub fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        warn!(path, "config file not found; using defaults");
        return Ok(Config::default());
    }
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?;
    let cfg = toml::from_str(&raw).with_context(|| format!("parse config {path}"))?;
    Ok(cfg)
}
