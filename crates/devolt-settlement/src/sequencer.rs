//! Input sequencing guard.
//!
//! Each input index is processed exactly once. Indices must be strictly
//! increasing; a repeated or out-of-order index returns
//! [`DevoltError::InputAlreadyProcessed`] and the input is dropped.
//!
//! Only the high-water mark is kept, so memory stays constant however long
//! the machine runs.

use devolt_types::{DevoltError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSequencer {
    /// Highest index accepted so far.
    last: Option<u64>,
    /// Number of inputs accepted.
    accepted: u64,
}

impl InputSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `index` without recording it.
    ///
    /// # Errors
    /// [`DevoltError::InputAlreadyProcessed`] if `index` is not above the
    /// last accepted index.
    pub fn check(&self, index: u64) -> Result<()> {
        match self.last {
            Some(last) if index <= last => Err(DevoltError::InputAlreadyProcessed { index, last }),
            _ => Ok(()),
        }
    }

    /// Check and record `index`.
    pub fn admit(&mut self, index: u64) -> Result<()> {
        self.check(index)?;
        self.last = Some(index);
        self.accepted += 1;
        Ok(())
    }

    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.last
    }

    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}
