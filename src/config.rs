//! Construction parameters for a pool.

use crate::error::PoolError;

/// Slot count used when none is given.
pub const DEFAULT_INITIAL_COUNT: u32 = 100;
/// Growth increment used when none is given.
pub const DEFAULT_GROWTH_STEP: u32 = 100;

/// Fixed configuration of a [`MantissaPool`](crate::MantissaPool).
///
/// `precision` counts words per slot *including* the reference-count header,
/// so each handle exposes `precision - 1` payload words.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub precision: u32,
    pub initial_count: u32,
    pub growth_step: u32,
    /// Optional ceiling on the number of slots the pool may grow to.
    pub max_slots: Option<u32>,
}

impl PoolConfig {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            initial_count: DEFAULT_INITIAL_COUNT,
            growth_step: DEFAULT_GROWTH_STEP,
            max_slots: None,
        }
    }

    pub fn with_initial_count(mut self, initial_count: u32) -> Self {
        self.initial_count = initial_count;
        self
    }

    pub fn with_growth_step(mut self, growth_step: u32) -> Self {
        self.growth_step = growth_step;
        self
    }

    pub fn with_max_slots(mut self, max_slots: u32) -> Self {
        self.max_slots = Some(max_slots);
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.precision == 0 {
            return Err(PoolError::InvalidConfig(
                "precision must leave room for the header word",
            ));
        }
        if self.initial_count == 0 {
            return Err(PoolError::InvalidConfig("initial_count must be positive"));
        }
        if self.growth_step == 0 {
            return Err(PoolError::InvalidConfig("growth_step must be positive"));
        }
        if let Some(max) = self.max_slots {
            if self.initial_count > max {
                return Err(PoolError::InvalidConfig(
                    "initial_count exceeds max_slots",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PoolConfig::new(8);
        assert_eq!(c.initial_count, 100);
        assert_eq!(c.growth_step, 100);
        assert_eq!(c.max_slots, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_parameters() {
        assert!(matches!(
            PoolConfig::new(0).validate(),
            Err(PoolError::InvalidConfig(_))
        ));
        assert!(matches!(
            PoolConfig::new(4).with_initial_count(0).validate(),
            Err(PoolError::InvalidConfig(_))
        ));
        assert!(matches!(
            PoolConfig::new(4).with_growth_step(0).validate(),
            Err(PoolError::InvalidConfig(_))
        ));
    }

    #[test]
    fn initial_count_must_fit_ceiling() {
        let c = PoolConfig::new(4).with_initial_count(10).with_max_slots(5);
        assert!(c.validate().is_err());
        let c = PoolConfig::new(4).with_initial_count(5).with_max_slots(5);
        assert!(c.validate().is_ok());
    }
}
