//! Shared utilities for use cases.
//!
//! Contains cancellation checks and the timeout-bounded, retrying dispatch
//! loop used by [`ExecuteBatchUseCase`](super::execute_batch::ExecuteBatchUseCase).

use crate::config::RetryPolicy;
use crate::ports::execution_progress::ExecutionProgressNotifier;
use crate::ports::tool_dispatcher::{DispatchRequest, ToolDispatcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use toolflow_domain::{InvocationFault, InvocationRequest};
use tracing::{debug, warn};

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Resolve when the token is cancelled; never resolve without a token.
pub(crate) async fn wait_cancelled(token: &Option<CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}

/// Final result of a dispatch plus the number of attempts it took.
#[derive(Debug)]
pub(crate) struct DispatchAttempts {
    pub result: Result<serde_json::Value, InvocationFault>,
    pub attempts: u32,
}

/// Dispatch with exponential backoff inside one overall deadline.
///
/// `budget` bounds the whole dispatch: every attempt and every backoff wait
/// must finish before it runs out. A retry whose backoff would cross the
/// deadline is not attempted. A cancellation ends the loop immediately,
/// whether it arrives during a call or during a backoff wait.
pub(crate) async fn dispatch_with_retry<D: ToolDispatcher + ?Sized + 'static>(
    dispatcher: &Arc<D>,
    request: &InvocationRequest,
    call: &DispatchRequest,
    budget: Duration,
    policy: &RetryPolicy,
    cancellation_token: &Option<CancellationToken>,
    progress: &dyn ExecutionProgressNotifier,
) -> DispatchAttempts {
    let deadline = Instant::now() + budget;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        debug!(tool = %call.tool_name, invocation = %request.id, attempt, "Dispatching");

        let fault = match dispatch_once(dispatcher, call, deadline, budget, cancellation_token).await
        {
            Ok(value) => {
                return DispatchAttempts {
                    result: Ok(value),
                    attempts: attempt,
                };
            }
            Err(fault) => fault,
        };

        if matches!(fault, InvocationFault::Cancelled { .. }) || !policy.should_retry(&fault, attempt)
        {
            return DispatchAttempts {
                result: Err(fault),
                attempts: attempt,
            };
        }

        let delay = policy.backoff_delay(attempt);
        if Instant::now() + delay >= deadline {
            debug!(
                tool = %call.tool_name,
                invocation = %request.id,
                attempt,
                budget_ms = budget.as_millis() as u64,
                "Timeout budget exhausted, not retrying"
            );
            return DispatchAttempts {
                result: Err(fault),
                attempts: attempt,
            };
        }

        warn!(
            tool = %call.tool_name,
            invocation = %request.id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %fault,
            "Dispatch failed, retrying"
        );
        progress.on_retry(request, attempt, &fault, delay);

        let cancelled = tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = wait_cancelled(cancellation_token) => true,
        };
        if cancelled {
            return DispatchAttempts {
                result: Err(InvocationFault::cancelled(&call.tool_name)),
                attempts: attempt,
            };
        }
    }
}

/// One attempt: run the call as its own task and wait until `deadline`.
///
/// On expiry or cancellation the task is aborted and never awaited again.
async fn dispatch_once<D: ToolDispatcher + ?Sized + 'static>(
    dispatcher: &Arc<D>,
    call: &DispatchRequest,
    deadline: Instant,
    budget: Duration,
    cancellation_token: &Option<CancellationToken>,
) -> Result<serde_json::Value, InvocationFault> {
    if is_cancelled(cancellation_token) {
        return Err(InvocationFault::cancelled(&call.tool_name));
    }

    let task_dispatcher = Arc::clone(dispatcher);
    let task_call = call.clone();
    let mut handle = tokio::spawn(async move { task_dispatcher.invoke(&task_call).await });

    let waited = tokio::select! {
        joined = tokio::time::timeout_at(deadline, &mut handle) => Some(joined),
        _ = wait_cancelled(cancellation_token) => None,
    };

    match waited {
        Some(Ok(Ok(result))) => result,
        Some(Ok(Err(join_error))) => Err(InvocationFault::unexpected(
            &call.tool_name,
            format!("dispatch task failed: {}", join_error),
        )),
        Some(Err(_elapsed)) => {
            handle.abort();
            Err(InvocationFault::timeout(
                &call.tool_name,
                budget.as_millis() as u64,
            ))
        }
        None => {
            handle.abort();
            Err(InvocationFault::cancelled(&call.tool_name))
        }
    }
}
