//! Hardware Abstraction Layer (HAL)
//!
//! The daemon only ever touches one piece of hardware: the panel backlight,
//! exposed by the kernel as a sysfs file holding a single integer. This crate
//! wraps that file behind the [`BrightnessRegister`] trait so the decision and
//! ramp logic can be exercised against [`mock::MockRegister`] on a desktop.
//!
//! # Example
//!
//! ```no_run
//! use brightboost_hal::{BrightnessRegister, SysfsBacklight};
//!
//! fn main() -> brightboost_hal::Result<()> {
//!     let backlight = SysfsBacklight::detect();
//!     let current = backlight.read()?;
//!     backlight.write(current + 10)?;
//!     Ok(())
//! }
//! ```

pub mod backlight;
pub mod mock;
pub mod register;

pub use backlight::{DEFAULT_BRIGHTNESS_PATH, SysfsBacklight};
pub use register::{BrightnessRegister, DeviceError};

/// HAL Result type
pub type Result<T> = std::result::Result<T, DeviceError>;
