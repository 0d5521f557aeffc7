//! Construction parameters for [`ProbeTable`](crate::ProbeTable).

use crate::error::{Result, TableError};

/// Default number of slots allocated up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
/// Default ceiling on `(live + tombstones) / capacity` before a growable table rehashes.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// How a table reacts when it runs out of room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// Never resize. Inserts fail with `TableFull` once no free slot is reachable.
    Fixed,
    /// Rehash before an insert would push the used fraction past `max_load_factor`.
    /// Capacity doubles if live entries alone exceed the threshold, otherwise the
    /// table is rebuilt at the same size to purge tombstones.
    Double { max_load_factor: f64 },
}

impl Default for Growth {
    fn default() -> Self {
        Growth::Double {
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

/// Configuration for a probe table.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Slots allocated at construction.
    pub initial_capacity: usize,
    /// Resize policy.
    pub growth: Growth,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth: Growth::default(),
        }
    }
}

impl Config {
    /// A non-growing table with exactly `capacity` slots.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            growth: Growth::Fixed,
        }
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(TableError::InvalidConfig(
                "initial_capacity must be positive".to_string(),
            ));
        }
        if let Growth::Double { max_load_factor } = self.growth {
            if !(max_load_factor > 0.0 && max_load_factor <= 1.0) {
                return Err(TableError::InvalidConfig(format!(
                    "max_load_factor must be in (0, 1], got {max_load_factor}"
                )));
            }
        }
        Ok(())
    }
}
