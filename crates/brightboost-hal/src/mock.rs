//! Mock implementations for testing without real hardware
//!
//! # Usage
//!
//! ```
//! use brightboost_hal::BrightnessRegister;
//! use brightboost_hal::mock::MockRegister;
//!
//! let register = MockRegister::new(80);
//! register.write(120).unwrap();
//! assert_eq!(register.writes(), vec![120]);
//! ```

use crate::{BrightnessRegister, DeviceError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Shared mock state for synchronized access
#[derive(Debug, Default)]
pub struct MockState {
    /// Current register value
    pub value: i32,
    /// Every value successfully written, in order
    pub writes: Vec<i32>,
    /// Number of rejected writes
    pub failed_writes: usize,
    /// Make reads fail
    pub fail_reads: bool,
    /// Make writes fail
    pub fail_writes: bool,
}

/// In-memory brightness register. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRegister {
    state: Arc<RwLock<MockState>>,
}

impl MockRegister {
    pub fn new(value: i32) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                value,
                ..Default::default()
            })),
        }
    }

    /// Get shared state for manipulation in tests
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        Arc::clone(&self.state)
    }

    /// Current value, ignoring `fail_reads`
    pub fn value(&self) -> i32 {
        self.state.read().map(|s| s.value).unwrap_or_default()
    }

    /// Simulate the user or the system changing brightness
    pub fn set_value(&self, value: i32) {
        if let Ok(mut state) = self.state.write() {
            state.value = value;
        }
    }

    pub fn writes(&self) -> Vec<i32> {
        self.state
            .read()
            .map(|s| s.writes.clone())
            .unwrap_or_default()
    }

    pub fn failed_writes(&self) -> usize {
        self.state.read().map(|s| s.failed_writes).unwrap_or(0)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_reads = fail;
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_writes = fail;
        }
    }
}

impl BrightnessRegister for MockRegister {
    fn read(&self) -> Result<i32> {
        let state = self
            .state
            .read()
            .map_err(|_| DeviceError::InvalidValue("poisoned mock state".into()))?;
        if state.fail_reads {
            return Err(DeviceError::NotFound(PathBuf::from("/mock/brightness")));
        }
        Ok(state.value)
    }

    fn write(&self, value: i32) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DeviceError::WriteFailed("poisoned mock state".into()))?;
        if state.fail_writes {
            state.failed_writes += 1;
            return Err(DeviceError::WriteFailed("[MOCK] write rejected".into()));
        }
        state.value = value;
        state.writes.push(value);
        tracing::debug!("[MOCK] Brightness set to {}", value);
        Ok(())
    }
}
