//! Ordered multi-step scenarios with teardown that runs no matter how the
//! body ends.
//!
//! A scenario body receives a [`Scenario`] handle, creates resources through
//! its template and registers them with [`Scenario::track`]. Once the body
//! has finished (returned `Ok`, returned an error, or panicked)
//! [`run_scenario`] removes whatever is still tracked.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::StatusCode;

use crate::cleanup::remove_resource;
use crate::resource::{RemoteResourceHandle, ResourceKind};
use crate::template::{ApiResponse, RequestTemplate};
use crate::{HarnessError, HarnessResult};

#[derive(Clone)]
pub struct Scenario {
    inner: Arc<ScenarioInner>,
}

struct ScenarioInner {
    name: String,
    template: Arc<RequestTemplate>,
    handles: Mutex<Vec<RemoteResourceHandle>>,
    steps: AtomicUsize,
}

impl Scenario {
    pub fn new(name: impl Into<String>, template: Arc<RequestTemplate>) -> Self {
        Self {
            inner: Arc::new(ScenarioInner {
                name: name.into(),
                template,
                handles: Mutex::new(Vec::new()),
                steps: AtomicUsize::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn api(&self) -> &RequestTemplate {
        &self.inner.template
    }

    fn handles_mut(&self) -> MutexGuard<'_, Vec<RemoteResourceHandle>> {
        // Never held across an await, so a poisoned vec is still whole.
        self.inner
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a created resource for teardown and returns it.
    pub fn track(&self, handle: RemoteResourceHandle) -> RemoteResourceHandle {
        tracing::debug!(scenario = %self.inner.name, resource = %handle, "tracking");
        self.handles_mut().push(handle.clone());
        handle
    }

    /// Handles still owned by the scenario, in creation order.
    pub fn handles(&self) -> Vec<RemoteResourceHandle> {
        self.handles_mut().clone()
    }

    /// Steps completed or started so far.
    pub fn step_count(&self) -> usize {
        self.inner.steps.load(Ordering::SeqCst)
    }

    /// Runs the next numbered step. Steps are numbered in the order they are
    /// awaited; a failure is reported with its number and name.
    pub async fn step<T, F>(&self, name: &str, step: F) -> HarnessResult<T>
    where
        F: Future<Output = HarnessResult<T>>,
    {
        let index = self.inner.steps.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(scenario = %self.inner.name, step = index, "{}", name);

        step.await.map_err(|source| HarnessError::Step {
            index,
            name: name.to_string(),
            source: Box::new(source),
        })
    }

    /// Removes `handle` now. It is untracked even if the removal fails, so a
    /// failed explicit delete is not retried by teardown.
    ///
    /// Deleting a board also untracks the lists and cards owned by that
    /// board, since the service removes them with it.
    pub async fn delete(&self, handle: &RemoteResourceHandle) -> HarnessResult<()> {
        self.handles_mut()
            .retain(|h| !h.same_resource(handle) && !h.is_owned_by(handle));

        remove_resource(self.api(), handle).await
    }

    /// Asserts a rejection status. If the service unexpectedly accepted the
    /// call, the created resource is tracked first so teardown removes it.
    pub fn expect_rejection(
        &self,
        response: ApiResponse,
        kind: ResourceKind,
        expected: StatusCode,
    ) -> HarnessResult<ApiResponse> {
        if response.status().is_success()
            && let Ok(handle) = response
                .json()
                .and_then(|json| RemoteResourceHandle::from_json(kind, &json))
        {
            tracing::warn!(scenario = %self.inner.name, resource = %handle, "rejection expected but resource was created");
            self.track(handle);
        }
        response.expect_status(expected)
    }

    /// Removes every remaining handle, newest first. Lists and cards are left
    /// to their board when the board is tracked too. Keeps going past
    /// failures and reports the first one.
    pub async fn teardown(&self) -> HarnessResult<()> {
        let handles: Vec<RemoteResourceHandle> = self.handles_mut().drain(..).collect();
        let mut first_error = None;

        for handle in handles.iter().rev() {
            if handles.iter().any(|board| handle.is_owned_by(board)) {
                continue;
            }
            if let Err(e) = remove_resource(self.api(), handle).await {
                tracing::error!(scenario = %self.inner.name, resource = %handle, "teardown failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Runs `body` as a scenario named `name` and tears it down afterwards.
///
/// The body runs on its own task so a panicking assertion still reaches
/// teardown; the panic is resumed once teardown is done. A body error wins
/// over a teardown error.
pub async fn run_scenario<F, Fut>(
    name: &str,
    template: Arc<RequestTemplate>,
    body: F,
) -> HarnessResult<()>
where
    F: FnOnce(Scenario) -> Fut,
    Fut: Future<Output = HarnessResult<()>> + Send + 'static,
{
    let scenario = Scenario::new(name, template);
    let outcome = tokio::spawn(body(scenario.clone())).await;
    let teardown = scenario.teardown().await;

    match outcome {
        Ok(Ok(())) => teardown,
        Ok(Err(e)) => {
            if let Err(t) = teardown {
                tracing::error!(scenario = name, "teardown also failed: {}", t);
            }
            Err(e)
        }
        Err(join_error) => match join_error.try_into_panic() {
            Ok(panic) => std::panic::resume_unwind(panic),
            Err(join_error) => Err(HarnessError::Aborted(join_error.to_string())),
        },
    }
}
