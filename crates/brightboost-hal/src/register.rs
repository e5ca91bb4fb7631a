//! Brightness register abstraction

use crate::Result;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Backlight register not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid register contents: {0:?}")]
    InvalidValue(String),

    #[error("Register write failed: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A read/write integer register controlling panel brightness.
///
/// Implementations must not buffer: every `write` reaches the device (or
/// fails) before returning, so a stepped ramp produces one device update per
/// step.
pub trait BrightnessRegister {
    /// Read the raw brightness value.
    fn read(&self) -> Result<i32>;

    /// Overwrite the register with `value`.
    fn write(&self, value: i32) -> Result<()>;

    /// Read the register, treating any failure as 0 (display off / unknown).
    fn read_or_zero(&self) -> i32 {
        match self.read() {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Brightness read failed, using 0: {}", e);
                0
            }
        }
    }
}

impl<R: BrightnessRegister + ?Sized> BrightnessRegister for &R {
    fn read(&self) -> Result<i32> {
        (**self).read()
    }

    fn write(&self, value: i32) -> Result<()> {
        (**self).write(value)
    }
}

impl<R: BrightnessRegister + ?Sized> BrightnessRegister for Box<R> {
    fn read(&self) -> Result<i32> {
        (**self).read()
    }

    fn write(&self, value: i32) -> Result<()> {
        (**self).write(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl BrightnessRegister for Broken {
        fn read(&self) -> Result<i32> {
            Err(DeviceError::NotFound(PathBuf::from("/nowhere")))
        }

        fn write(&self, _value: i32) -> Result<()> {
            Err(DeviceError::WriteFailed("read-only".into()))
        }
    }

    #[test]
    fn test_read_or_zero_on_failure() {
        assert_eq!(Broken.read_or_zero(), 0);
    }

    #[test]
    fn test_boxed_register_delegates() {
        let boxed: Box<dyn BrightnessRegister> = Box::new(Broken);
        assert!(boxed.write(10).is_err());
        assert_eq!(boxed.read_or_zero(), 0);
    }

    fn sum_of_reads(register: &dyn BrightnessRegister) -> Result<i32> {
        Ok(register.read()? + register.read()?)
    }

    #[test]
    fn test_errors_propagate_through_result() {
        assert!(matches!(
            sum_of_reads(&Broken),
            Err(DeviceError::NotFound(_))
        ));
        let mock = crate::mock::MockRegister::new(20);
        assert_eq!(sum_of_reads(&mock).unwrap(), 40);
    }

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::NotFound(PathBuf::from("/sys/class/backlight/x"));
        assert!(format!("{}", err).contains("not found"));

        let err = DeviceError::InvalidValue("abc".into());
        assert_eq!(format!("{}", err), "Invalid register contents: \"abc\"");
    }
}
