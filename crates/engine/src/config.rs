//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CARTWHEEL_IMAGE_QUALITY` - Stored image quality, `0.0..=1.0` (default: 0.8)
//! - `CARTWHEEL_CHECKOUT_DISTANCE` - Shipping distance used at checkout (default: 10)
//! - `CARTWHEEL_CASCADE_DELETE` - Remove cart lines together with their product (default: false)

use thiserror::Error;

use crate::image::{DEFAULT_IMAGE_QUALITY, validate_quality};

/// Shipping distance assumed at checkout when none is configured.
pub const DEFAULT_CHECKOUT_DISTANCE: f64 = 10.0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Quality passed to the image encoder when products are added.
    pub image_quality: f32,
    /// Distance fed to the shipping strategy when summarizing an order.
    pub checkout_distance: f64,
    /// Whether deleting a product also deletes the cart line referencing it.
    pub cascade_delete: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            image_quality: DEFAULT_IMAGE_QUALITY,
            checkout_distance: DEFAULT_CHECKOUT_DISTANCE,
            cascade_delete: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the process environment.
    ///
    /// Binaries that want `.env` support load it before calling this.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparsable or out
    /// of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is unparsable or out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let image_quality = match lookup("CARTWHEEL_IMAGE_QUALITY") {
            Some(raw) => {
                let quality = parse_var::<f32>("CARTWHEEL_IMAGE_QUALITY", &raw)?;
                validate_quality(quality).map_err(|e| {
                    ConfigError::InvalidEnvVar("CARTWHEEL_IMAGE_QUALITY".to_string(), e.to_string())
                })?;
                quality
            }
            None => defaults.image_quality,
        };

        let checkout_distance = match lookup("CARTWHEEL_CHECKOUT_DISTANCE") {
            Some(raw) => {
                let distance = parse_var::<f64>("CARTWHEEL_CHECKOUT_DISTANCE", &raw)?;
                if !distance.is_finite() || distance < 0.0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "CARTWHEEL_CHECKOUT_DISTANCE".to_string(),
                        format!("must be a finite, non-negative number (got {raw})"),
                    ));
                }
                distance
            }
            None => defaults.checkout_distance,
        };

        let cascade_delete = match lookup("CARTWHEEL_CASCADE_DELETE") {
            Some(raw) => parse_var::<bool>("CARTWHEEL_CASCADE_DELETE", &raw)?,
            None => defaults.cascade_delete,
        };

        Ok(Self {
            image_quality,
            checkout_distance,
            cascade_delete,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a trimmed environment value.
fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
