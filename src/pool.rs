//! Worker fan-out
//!
//! Runs one async operation per input item across a fixed number of tokio
//! tasks. Every task owns a client from [`CanvasClient::for_worker`], so
//! impersonation in one worker never leaks into another.

use crate::client::CanvasClient;
use crate::error::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fixed-size pool of worker tasks
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with `workers` tasks (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Number of worker tasks
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `f` to every item; results come back in input order.
    ///
    /// A panic inside `f` becomes [`Error::Worker`] for that item and the
    /// worker carries on. Impersonation left active by `f` is cleared before
    /// the worker takes its next item.
    pub async fn run<I, R, F>(&self, client: &CanvasClient, items: Vec<I>, f: F) -> Vec<Result<R>>
    where
        I: Send + 'static,
        R: Send + 'static,
        F: for<'c> Fn(&'c mut CanvasClient, I) -> BoxFuture<'c, Result<R>> + Send + Sync + 'static,
    {
        let total = items.len();
        let queue: Arc<Mutex<VecDeque<(usize, I)>>> =
            Arc::new(Mutex::new(items.into_iter().enumerate().collect()));
        let f = Arc::new(f);

        let mut handles = Vec::with_capacity(self.workers.min(total));
        for worker in 0..self.workers.min(total) {
            let queue = Arc::clone(&queue);
            let f = Arc::clone(&f);
            let mut client = client.for_worker();

            handles.push(tokio::spawn(async move {
                let mut done = Vec::new();
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some((index, item)) = next else {
                        break;
                    };

                    let outcome = AssertUnwindSafe(f(&mut client, item)).catch_unwind().await;
                    let result = outcome.unwrap_or_else(|panic| {
                        let message = panic_message(panic.as_ref());
                        warn!("Worker {worker} panicked on item {index}: {message}");
                        Err(Error::Worker { message })
                    });

                    if let Some(user) = client.end_impersonation() {
                        warn!("Worker {worker} left impersonation of user {user} active; cleared");
                    }

                    done.push((index, result));
                }
                debug!("Worker {worker} finished {} items", done.len());
                done
            }));
        }

        let mut results: Vec<Option<Result<R>>> = (0..total).map(|_| None).collect();
        for handle in handles {
            match handle.await {
                Ok(done) => {
                    for (index, result) in done {
                        results[index] = Some(result);
                    }
                }
                Err(e) => warn!("Worker task failed: {e}"),
            }
        }

        results
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(Error::Worker {
                        message: "item was not processed".to_string(),
                    })
                })
            })
            .collect()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
