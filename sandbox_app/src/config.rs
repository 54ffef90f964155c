//! Sandbox run configuration

use serde::{Deserialize, Serialize};

use rigid_physics::config::{Config, ConfigError};
use rigid_physics::physics::PhysicsSettings;

/// How the headless sandbox drives the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Scene settings and layout
    pub physics: PhysicsSettings,
    /// Fixed simulation step in seconds
    pub physics_step: f32,
    /// Most physics steps run for one frame before time is dropped
    pub max_steps_per_frame: u32,
    /// Frame time fed to the accumulator when not running in real time
    pub frame_time: f32,
    /// Use the wall clock instead of `frame_time`
    pub realtime: bool,
    /// Frames to run
    pub frames: u64,
    /// Log body transforms every this many frames; 0 disables
    pub report_every: u64,
    /// Reset the scene once this frame is reached
    pub reset_after: Option<u64>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            physics_step: 1.0 / 60.0,
            max_steps_per_frame: 5,
            frame_time: 1.0 / 60.0,
            realtime: false,
            frames: 600,
            report_every: 60,
            reset_after: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config for SandboxConfig {}

impl SandboxConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("physics_step", self.physics_step), ("frame_time", self.frame_time)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be finite and > 0, got {value}")));
            }
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid("max_steps_per_frame must be at least 1".to_string()));
        }
        self.physics.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigid_physics::config::ConfigFormat;

    #[test]
    fn test_shipped_config_parses() {
        let config = SandboxConfig::parse(include_str!("../config/petanque.toml"), ConfigFormat::Toml)
            .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.physics.rng_seed, Some(2024));
        assert_eq!(config.physics.layout, PhysicsSettings::default().layout);
        assert_eq!(config.reset_after, Some(300));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(SandboxConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_step_rejected() {
        let config = SandboxConfig {
            physics_step: 0.0,
            ..SandboxConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_ron_overrides() {
        let config = SandboxConfig::parse("(frames: 10, realtime: true)", ConfigFormat::Ron).unwrap();
        assert_eq!(config.frames, 10);
        assert!(config.realtime);
        assert_eq!(config.report_every, 60);
    }
}
