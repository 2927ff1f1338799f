use crate::error::RuntimeError;

/// Inclusive range of delay units a worker may sample from.
///
/// # Example
/// ```rust
/// use fanvisor::DelayBounds;
///
/// let b = DelayBounds::new(1, 5).unwrap();
/// assert!(b.contains(5));
/// assert_eq!(b.clamp(9), 5);
/// assert!(DelayBounds::new(5, 1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayBounds {
    /// Smallest delay (inclusive).
    pub min: u64,
    /// Largest delay (inclusive).
    pub max: u64,
}

impl DelayBounds {
    /// Creates validated bounds.
    pub fn new(min: u64, max: u64) -> Result<Self, RuntimeError> {
        Self { min, max }.validate()
    }

    /// Returns `self` if `min <= max`, otherwise [`RuntimeError::InvalidBounds`].
    pub fn validate(self) -> Result<Self, RuntimeError> {
        if self.min > self.max {
            return Err(RuntimeError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(self)
    }

    /// True if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps `value` into `[min, max]`. Bounds must be valid.
    #[inline]
    pub fn clamp(&self, value: u64) -> u64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for DelayBounds {
    /// `[1, 5]`.
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}
