use std::fmt;

/// Identity of a worker within one run.
///
/// Wraps the zero-based launch index. [`Display`](fmt::Display) renders the
/// one-based ordinal, which is what console output and error messages show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(usize);

impl WorkerId {
    /// Creates an id from a zero-based index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based launch index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// One-based ordinal ("worker 1" is index 0).
    #[inline]
    pub const fn ordinal(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_ordinal() {
        let id = WorkerId::new(0);
        assert_eq!(id.index(), 0);
        assert_eq!(id.to_string(), "1");
    }
}
