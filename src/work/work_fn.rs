//! # Function-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(WorkerId, u64) -> Fut`, producing a fresh
//! future per worker. Shared state, if any, goes into the closure explicitly
//! (e.g. an `Arc<...>`).
//!
//! ## Example
//! ```rust
//! use fanvisor::{WorkFn, WorkRef, WorkError, WorkerId};
//!
//! let w: WorkRef = WorkFn::arc("odd-only", |id: WorkerId, _delay: u64| async move {
//!     if id.index() % 2 == 0 {
//!         return Err(WorkError::Fail { error: format!("{id} is even") });
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(w.name(), "odd-only");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::WorkError,
    work::{Work, WorkerId},
};

/// Function-backed work implementation.
#[derive(Debug)]
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates new function-backed work.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`](crate::WorkRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the work and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(WorkerId, u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn perform(&self, worker: WorkerId, delay: u64) -> Result<(), WorkError> {
        (self.f)(worker, delay).await
    }
}
