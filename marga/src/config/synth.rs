//! Main SynthConfig, loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::arc::ArcSection;
use super::motor::MotorSection;
use super::render::RenderOptions;
use super::segment::SegmentSection;

/// Full synthesis configuration.
///
/// Passed by reference into every call. Every field has a default, so a
/// YAML file only needs the values it overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Segmenter thresholds
    #[serde(default)]
    pub segment: SegmentSection,

    /// Arc stability thresholds
    #[serde(default)]
    pub arc: ArcSection,

    /// Motor run thresholds
    #[serde(default)]
    pub motor: MotorSection,

    /// Renderer output options
    #[serde(default)]
    pub render: RenderOptions,
}

impl SynthConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.segment;
        positive("segment.min_distance_mm", s.min_distance_mm)?;
        positive("segment.min_heading_deg", s.min_heading_deg)?;
        positive(
            "segment.heading_to_distance_mm_per_deg",
            s.heading_to_distance_mm_per_deg,
        )?;
        non_negative("segment.residual_fraction", s.residual_fraction)?;

        let a = &self.arc;
        non_negative("arc.min_distance_mm", a.min_distance_mm)?;
        non_negative("arc.min_heading_deg", a.min_heading_deg)?;
        positive("arc.ratio_scale_mm_per_deg", a.ratio_scale_mm_per_deg)?;
        positive("arc.ratio_min", a.ratio_min)?;
        positive("arc.ratio_max", a.ratio_max)?;
        if a.ratio_min > a.ratio_max {
            return Err(ConfigError::invalid(
                "arc.ratio_min",
                format!("{} exceeds ratio_max {}", a.ratio_min, a.ratio_max),
            ));
        }
        if a.min_streak == 0 {
            return Err(ConfigError::invalid("arc.min_streak", "must be at least 1"));
        }

        let m = &self.motor;
        non_negative("motor.start_threshold_deg", m.start_threshold_deg)?;
        non_negative("motor.min_angle_deg", m.min_angle_deg)?;
        non_negative("motor.stop_speed_deg_s", m.stop_speed_deg_s)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{} must be finite and positive", value),
        ))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{} must be finite and non-negative", value),
        ))
    }
}
