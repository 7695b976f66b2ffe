//! Progress reporting for batch execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use toolflow_application::ports::execution_progress::ExecutionProgressNotifier;
use toolflow_domain::{
    ExecutionRecord, ExecutionStatus, ExecutionSummary, InvocationFault, InvocationRequest,
};

/// Reports progress during batch execution with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn status_marker(status: ExecutionStatus) -> colored::ColoredString {
    match status {
        ExecutionStatus::Completed => "v".green(),
        ExecutionStatus::FailedRetryable => "!".yellow(),
        _ => "x".red(),
    }
}

impl ExecutionProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::batch_style());
        bar.set_prefix("Executing");
        bar.set_message("Starting...");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_invocation_start(&self, request: &InvocationRequest, _index: usize, _total: usize) {
        let tool = request.tool_name.clone();
        self.with_bar(|bar| bar.set_message(tool));
    }

    fn on_retry(
        &self,
        request: &InvocationRequest,
        attempt: u32,
        fault: &InvocationFault,
        delay: Duration,
    ) {
        let line = format!(
            "  {} {} attempt {} failed, retrying in {}ms: {}",
            "!".yellow(),
            request.tool_name,
            attempt,
            delay.as_millis(),
            fault
        );
        self.with_bar(|bar| bar.println(line));
    }

    fn on_invocation_complete(&self, record: &ExecutionRecord, _index: usize, _total: usize) {
        let message = format!("{} {}", status_marker(record.status), record.tool_name);
        self.with_bar(|bar| {
            bar.set_message(message);
            bar.inc(1);
        });
    }

    fn on_batch_complete(&self, summary: &ExecutionSummary) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            let message = if summary.has_errors {
                format!("{} failed", summary.failed).red().to_string()
            } else {
                "complete!".green().to_string()
            };
            bar.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ExecutionProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, total: usize) {
        println!("{} {} ({} invocations)", "->".cyan(), "Executing batch".bold(), total);
    }

    fn on_retry(
        &self,
        request: &InvocationRequest,
        attempt: u32,
        fault: &InvocationFault,
        delay: Duration,
    ) {
        println!(
            "  {} {} attempt {} failed, retrying in {}ms: {}",
            "!".yellow(),
            request.tool_name,
            attempt,
            delay.as_millis(),
            fault
        );
    }

    fn on_invocation_complete(&self, record: &ExecutionRecord, index: usize, total: usize) {
        println!(
            "  {} [{}/{}] {} ({}ms)",
            status_marker(record.status),
            index + 1,
            total,
            record.tool_name,
            record.duration_ms
        );
    }

    fn on_batch_complete(&self, _summary: &ExecutionSummary) {
        println!();
    }
}
