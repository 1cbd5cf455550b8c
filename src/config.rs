//! Serde-backed configuration for the production and extraction features.
//!
//! These structs are the data-file boundary: asset pipelines deserialize
//! them (JSON, or any other serde format) and hand them to the feature
//! constructors. The `new` constructors validate; deserializing does not,
//! so external data should go through [`ProducerConfig::validate`] and
//! friends before use. Collision categories have their own serde types in
//! [`crate::collision`].

use serde::{Deserialize, Serialize};

use crate::error::TickworkError;

/// Production speed of a `ProducerModel`, in steps per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProducerConfig {
    pub steps_per_second: f64,
}

impl ProducerConfig {
    pub fn new(steps_per_second: f64) -> Result<ProducerConfig, TickworkError> {
        let config = ProducerConfig { steps_per_second };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TickworkError> {
        if !self.steps_per_second.is_finite() || self.steps_per_second <= 0.0 {
            return Err(TickworkError::Config(format!(
                "steps_per_second must be finite and positive, got {}",
                self.steps_per_second
            )));
        }
        Ok(())
    }
}

/// Work and size of one production request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducibleConfig {
    /// Steps of work needed to complete the request.
    pub steps: u32,
    /// Size of the result, in tiles.
    pub width: u32,
    pub height: u32,
}

impl ProducibleConfig {
    pub fn new(steps: u32, width: u32, height: u32) -> Result<ProducibleConfig, TickworkError> {
        let config = ProducibleConfig {
            steps,
            width,
            height,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TickworkError> {
        if self.steps == 0 {
            return Err(TickworkError::Config(
                "producible steps must be positive".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TickworkError::Config(format!(
                "producible size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Rates and load size of an `ExtractorModel`. Rates are per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub capacity: u32,
    pub extract_per_tick: f64,
    pub drop_off_per_tick: f64,
}

impl ExtractorConfig {
    pub fn new(
        capacity: u32,
        extract_per_tick: f64,
        drop_off_per_tick: f64,
    ) -> Result<ExtractorConfig, TickworkError> {
        let config = ExtractorConfig {
            capacity,
            extract_per_tick,
            drop_off_per_tick,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TickworkError> {
        if self.capacity == 0 {
            return Err(TickworkError::Config(
                "extractor capacity must be positive".to_string(),
            ));
        }
        for (name, rate) in [
            ("extract_per_tick", self.extract_per_tick),
            ("drop_off_per_tick", self.drop_off_per_tick),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(TickworkError::Config(format!(
                    "{name} must be finite and positive, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_configs_pass() {
        assert!(ProducerConfig::new(2.5).is_ok());
        assert!(ProducibleConfig::new(40, 2, 3).is_ok());
        assert!(ExtractorConfig::new(5, 1.0, 2.5).is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ProducerConfig::new(0.0),
            Err(TickworkError::Config(_))
        ));
        assert!(matches!(
            ProducerConfig::new(f64::NAN),
            Err(TickworkError::Config(_))
        ));
        assert!(matches!(
            ProducibleConfig::new(0, 1, 1),
            Err(TickworkError::Config(_))
        ));
        assert!(matches!(
            ProducibleConfig::new(5, 1, 0),
            Err(TickworkError::Config(_))
        ));
        assert!(matches!(
            ExtractorConfig::new(0, 1.0, 1.0),
            Err(TickworkError::Config(_))
        ));
        assert!(matches!(
            ExtractorConfig::new(5, -1.0, 1.0),
            Err(TickworkError::Config(_))
        ));
    }

    #[test]
    fn configs_deserialize_from_data_files() {
        let producible: ProducibleConfig =
            serde_json::from_str(r#"{"steps": 40, "width": 2, "height": 3}"#).unwrap();
        assert_eq!(producible, ProducibleConfig::new(40, 2, 3).unwrap());

        let extractor: ExtractorConfig = serde_json::from_str(
            r#"{"capacity": 5, "extract_per_tick": 1.0, "drop_off_per_tick": 2.5}"#,
        )
        .unwrap();
        extractor.validate().unwrap();
        assert_eq!(extractor.capacity, 5);
    }
}
