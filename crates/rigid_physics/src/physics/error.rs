//! Physics error types

use thiserror::Error;

/// Reasons a body or scene description is rejected
///
/// These only surface when bodies are created or a scene is built. Stepping a
/// scene never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Inverse mass was negative or not finite
    #[error("inverse mass must be finite and >= 0, got {0}")]
    InvalidInverseMass(f32),

    /// A material coefficient fell outside `[0, 1]`
    #[error("{name} must lie in [0, 1], got {value}")]
    CoefficientOutOfRange {
        /// Which coefficient
        name: &'static str,
        /// The rejected value
        value: f32,
    },

    /// Shape dimensions were not strictly positive and finite
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Position, orientation or velocity contained NaN or infinity
    #[error("non-finite {0}")]
    NonFiniteState(&'static str),

    /// Physics settings were inconsistent
    #[error("invalid physics settings: {0}")]
    InvalidConfig(String),

    /// A body group in the scene layout could not be built
    #[error("body group '{group}': {source}")]
    InvalidGroup {
        /// Group name from the layout
        group: String,
        /// What was wrong with it
        #[source]
        source: Box<PhysicsError>,
    },
}
