/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Visualiser configuration.
//!
//! `network` is forwarded verbatim (camelCase JSON) to the engine on mount;
//! the remaining sections tune the selection overlay, pin debounce, and label
//! synthesis. Every field has a default, so a TOML file only lists overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::graph::label::DEFAULT_VALUE_LIMIT;
use crate::input::pin::DEFAULT_PIN_INTERVAL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontOptions {
    pub size: f32,
    pub face: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowOptions {
    pub enabled: bool,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeOptions {
    pub font: FontOptions,
    pub shadow: ShadowOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarnesHutOptions {
    pub spring_length: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsOptions {
    pub min_velocity: f32,
    pub barnes_hut: BarnesHutOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrowOptions {
    pub to: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothOptions {
    pub enabled: bool,
    pub force_direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeOptions {
    pub hover_width: f32,
    pub selection_width: f32,
    pub arrow_strikethrough: bool,
    pub arrows: ArrowOptions,
    pub smooth: SmoothOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionOptions {
    pub hover: bool,
    pub multiselect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub improved_layout: bool,
}

/// Options handed to the engine when it is mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkOptions {
    pub auto_resize: bool,
    pub nodes: NodeOptions,
    pub physics: PhysicsOptions,
    pub edges: EdgeOptions,
    pub interaction: InteractionOptions,
    pub layout: LayoutOptions,
}

/// Look of the marquee rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionOverlayStyle {
    pub stroke: String,
    pub fill: String,
    pub dash: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Minimum milliseconds between two executed pin batches.
    pub interval_ms: u64,
}

impl PinConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Characters kept from a property value before `...` is appended.
    pub value_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VisualiserConfig {
    pub network: NetworkOptions,
    pub selection: SelectionOverlayStyle,
    pub pinning: PinConfig,
    pub labels: LabelConfig,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            size: 15.0,
            face: "Geogrotesque-Ultralight".to_string(),
        }
    }
}

impl Default for ShadowOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 10.0,
            x: 2.0,
            y: 2.0,
        }
    }
}

impl Default for BarnesHutOptions {
    fn default() -> Self {
        Self {
            spring_length: 140.0,
        }
    }
}

impl Default for PhysicsOptions {
    fn default() -> Self {
        Self {
            min_velocity: 0.75,
            barnes_hut: BarnesHutOptions::default(),
        }
    }
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self { to: true }
    }
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            force_direction: "none".to_string(),
        }
    }
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            hover_width: 2.0,
            selection_width: 2.0,
            arrow_strikethrough: false,
            arrows: ArrowOptions::default(),
            smooth: SmoothOptions::default(),
        }
    }
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            hover: true,
            multiselect: true,
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            improved_layout: false,
        }
    }
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            auto_resize: true,
            nodes: NodeOptions::default(),
            physics: PhysicsOptions::default(),
            edges: EdgeOptions::default(),
            interaction: InteractionOptions::default(),
            layout: LayoutOptions::default(),
        }
    }
}

impl Default for SelectionOverlayStyle {
    fn default() -> Self {
        Self {
            stroke: "rgb(0, 102, 0)".to_string(),
            fill: "rgba(0, 255, 0, 0.2)".to_string(),
            dash: vec![5.0],
        }
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_PIN_INTERVAL.as_millis() as u64,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            value_limit: DEFAULT_VALUE_LIMIT,
        }
    }
}

impl VisualiserConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Engine-side representation of `network`.
    pub fn engine_options(&self) -> Result<serde_json::Value, ConfigError> {
        serde_json::to_value(&self.network).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.value_limit == 0 {
            return Err(ConfigError::Invalid(
                "labels.value_limit must be at least 1".to_string(),
            ));
        }
        if self
            .selection
            .dash
            .iter()
            .any(|segment| !segment.is_finite() || *segment < 0.0)
        {
            return Err(ConfigError::Invalid(
                "selection.dash segments must be finite and non-negative".to_string(),
            ));
        }
        if !(self.network.nodes.font.size > 0.0) {
            return Err(ConfigError::Invalid(
                "network.nodes.font.size must be positive".to_string(),
            ));
        }
        if self.network.physics.min_velocity < 0.0 {
            return Err(ConfigError::Invalid(
                "network.physics.minVelocity must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors from loading configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "Parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
