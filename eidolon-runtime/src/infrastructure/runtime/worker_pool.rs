// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Worker Pool (C6 support)
//!
//! A process-wide pool of `max_threads` tokens a pipeline's `execution`
//! block configures (§4.6 "Worker pool", §5 "Scheduling model"). A module
//! acquires a token, offloads a blocking closure to `tokio::task::
//! spawn_blocking`, and awaits completion cooperatively — this is a
//! semaphore gate in front of `spawn_blocking`, not a dedicated thread pool,
//! which keeps it a thin generalisation of [`GlobalResourceManager`]'s
//! two-level token pattern down to the single pool the spec calls for.
//!
//! Every offloaded closure runs supervised: start/success/failure are
//! logged and a panic inside the closure becomes a [`RuntimeError`] instead
//! of an unwinding panic on the awaiting task.

use std::sync::Arc;

use tokio::sync::Semaphore;

use eidolon_domain::EidolonError;

use crate::error::RuntimeError;

/// Bounds concurrent blocking work to a pipeline's configured `max_threads`
/// (§6 `execution.max_threads`).
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    max_threads: usize,
}

impl WorkerPool {
    pub fn new(max_threads: usize) -> Self {
        let max_threads = max_threads.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_threads)),
            max_threads,
        }
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// How many tokens are currently free; exposed for diagnostics only.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Runs `work` on a blocking-pool thread, waiting for a token first
    /// (§5 "CPU-bound or blocking operations are offloaded to the shared
    /// worker pool; the task awaits their completion"). A panic inside
    /// `work` surfaces as [`RuntimeError::Domain`]`(`[`EidolonError::Internal`]`)`
    /// rather than propagating as a `JoinError` unwind.
    pub async fn run_blocking<F, T>(&self, name: &'static str, work: F) -> Result<T, RuntimeError>
    where
        F: FnOnce() -> Result<T, RuntimeError> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| RuntimeError::Domain(EidolonError::internal("worker pool semaphore closed")))?;

        tracing::debug!(target: "engine", task = name, "worker pool task starting");
        let outcome = tokio::task::spawn_blocking(work).await;
        match outcome {
            Ok(result) => {
                match &result {
                    Ok(_) => tracing::debug!(target: "engine", task = name, "worker pool task completed"),
                    Err(e) => tracing::error!(target: "engine", task = name, error = %e, "worker pool task failed"),
                }
                result
            }
            Err(join_error) if join_error.is_panic() => {
                tracing::error!(target: "engine", task = name, "worker pool task panicked");
                Err(RuntimeError::Domain(EidolonError::internal(format!(
                    "worker pool task '{name}' panicked: {join_error}"
                ))))
            }
            Err(join_error) => Err(RuntimeError::Domain(EidolonError::internal(format!(
                "worker pool task '{name}' did not complete: {join_error}"
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_blocking_work_and_returns_its_result() {
        let pool = WorkerPool::new(2);
        let result = pool.run_blocking("double", || Ok(21 * 2)).await.unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn propagates_a_panic_as_a_runtime_error_instead_of_unwinding() {
        let pool = WorkerPool::new(1);
        let result: Result<(), RuntimeError> = pool
            .run_blocking("boom", || -> Result<(), RuntimeError> { panic!("kaboom") })
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("panicked"));
    }

    #[tokio::test]
    async fn gates_concurrency_at_max_threads() {
        let pool = WorkerPool::new(3);
        assert_eq!(pool.max_threads(), 3);
        assert_eq!(pool.available_permits(), 3);
    }

    #[test]
    fn clamps_zero_max_threads_to_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.max_threads(), 1);
    }
}
