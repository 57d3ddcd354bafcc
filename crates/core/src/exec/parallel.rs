// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded parallel fan-out preserving input order.
//!
//! Two worker-pool shapes are offered: [`ParallelRunner::run`] dispatches
//! async operations as tokio tasks sharing the caller's memory space, and
//! [`ParallelRunner::run_blocking`] dispatches blocking closures onto
//! dedicated worker threads, so inputs and outputs must be transferable
//! across that boundary (`Send + 'static`).

use crate::error::ExecError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Fans an operation out over a batch of inputs with at most `max_workers`
/// in flight.
///
/// Results are collected in input order regardless of completion order, and
/// a failed position stays in place as that position's error; no input is
/// ever dropped.
#[derive(Debug, Clone)]
pub struct ParallelRunner {
    max_workers: usize,
}

impl ParallelRunner {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Run an async operation over `inputs` as tokio tasks.
    pub async fn run<I, T, F, Fut>(&self, inputs: Vec<I>, op: F) -> Vec<Result<T, ExecError>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<T, ExecError>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut handles = Vec::with_capacity(inputs.len());

        for input in inputs {
            let semaphore = Arc::clone(&semaphore);
            let op = op.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                op(input).await
            }));
        }

        collect(handles).await
    }

    /// Run a blocking operation over `inputs` on dedicated worker threads.
    pub async fn run_blocking<I, T, F>(&self, inputs: Vec<I>, op: F) -> Vec<Result<T, ExecError>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Result<T, ExecError> + Clone + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut handles = Vec::with_capacity(inputs.len());

        for input in inputs {
            let semaphore = Arc::clone(&semaphore);
            let op = op.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                match tokio::task::spawn_blocking(move || op(input)).await {
                    Ok(result) => result,
                    Err(join) => resume_worker_panic(join),
                }
            }));
        }

        collect(handles).await
    }
}

/// Await all handles, preserving input order.
async fn collect<T>(
    handles: Vec<tokio::task::JoinHandle<Result<T, ExecError>>>,
) -> Vec<Result<T, ExecError>> {
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(join) => resume_worker_panic(join),
        });
    }
    results
}

/// Workers are never aborted, so a join failure is a worker panic;
/// propagate it to the caller.
fn resume_worker_panic<T>(join: tokio::task::JoinError) -> T {
    match join.try_into_panic() {
        Ok(payload) => std::panic::resume_unwind(payload),
        Err(join) => unreachable!("parallel worker vanished: {join}"),
    }
}

#[cfg(test)]
#[path = "parallel_tests.rs"]
mod tests;
