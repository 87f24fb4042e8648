//! Query debouncing for search-as-you-type input.
//!
//! A background task holds the most recent input value and forwards it downstream
//! only once it has stayed unchanged for the configured delay.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Default quiet period before a query is dispatched.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(400);

/// Debounces query values into a downstream channel.
///
/// Each new value restarts the wait; a value superseded before the delay elapses is
/// never emitted. Pushing the value that is already pending keeps the original
/// deadline, and a settled value equal to the last emitted one is not sent again.
/// Dropping the debouncer cancels any pending emission.
#[derive(Debug)]
pub struct QueryDebouncer {
    input: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl QueryDebouncer {
    /// Spawns the debounce task on the current runtime.
    pub fn spawn(delay: Duration, output: mpsc::UnboundedSender<String>) -> Self {
        Self::start(delay, output, None)
    }

    /// Spawns the debounce task treating `initial` as already emitted.
    ///
    /// Used when the consumer has acted on an initial value itself, so settling
    /// back on that value does not trigger a duplicate emission.
    pub fn spawn_seeded(
        delay: Duration,
        output: mpsc::UnboundedSender<String>,
        initial: impl Into<String>,
    ) -> Self {
        Self::start(delay, output, Some(initial.into()))
    }

    fn start(
        delay: Duration,
        output: mpsc::UnboundedSender<String>,
        last_emitted: Option<String>,
    ) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debounce(delay, rx, output, last_emitted));
        Self { input, task }
    }

    /// Records a new input value.
    pub fn push(&self, value: impl Into<String>) {
        // The task only stops once the downstream consumer is gone.
        let _ = self.input.send(value.into());
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_debounce(
    delay: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
    mut last_emitted: Option<String>,
) {
    let mut pending: Option<(String, Instant)> = None;

    loop {
        let Some((value, deadline)) = pending.take() else {
            match input.recv().await {
                Some(value) => pending = Some((value, Instant::now() + delay)),
                None => return,
            }
            continue;
        };

        tokio::select! {
            next = input.recv() => match next {
                Some(next) if next == value => pending = Some((value, deadline)),
                Some(next) => pending = Some((next, Instant::now() + delay)),
                None => return,
            },
            () = sleep_until(deadline) => {
                if last_emitted.as_deref() == Some(value.as_str()) {
                    continue;
                }
                if output.send(value.clone()).is_err() {
                    return;
                }
                last_emitted = Some(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::advance;

    use super::*;

    const DELAY: Duration = Duration::from_millis(400);

    fn debouncer() -> (QueryDebouncer, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (QueryDebouncer::spawn(DELAY, tx), rx)
    }

    /// Lets the debounce task observe everything sent so far.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_emit_only_final_value() {
        let (debouncer, mut rx) = debouncer();

        for value in ["d", "da", "dar", "dark"] {
            debouncer.push(value);
            settle().await;
            advance(Duration::from_millis(100)).await;
        }
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        advance(DELAY).await;
        settle().await;
        assert_eq!(rx.try_recv(), Ok("dark".to_string()));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_waits_full_delay() {
        let (debouncer, mut rx) = debouncer();

        debouncer.push("matrix");
        settle().await;
        advance(Duration::from_millis(399)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Ok("matrix".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_pending_value_keeps_deadline() {
        let (debouncer, mut rx) = debouncer();

        debouncer.push("heat");
        settle().await;
        advance(Duration::from_millis(300)).await;
        debouncer.push("heat");
        settle().await;
        advance(Duration::from_millis(100)).await;
        settle().await;

        assert_eq!(rx.try_recv(), Ok("heat".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settling_on_last_emitted_value_is_silent() {
        let (debouncer, mut rx) = debouncer();

        debouncer.push("alien");
        settle().await;
        advance(DELAY).await;
        settle().await;
        assert_eq!(rx.recv().await, Some("alien".to_string()));

        debouncer.push("aliens");
        settle().await;
        advance(Duration::from_millis(50)).await;
        debouncer.push("alien");
        settle().await;
        advance(DELAY).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (debouncer, mut rx) = debouncer();

        debouncer.push("up");
        settle().await;
        advance(DELAY).await;
        settle().await;
        debouncer.push("");
        settle().await;
        advance(DELAY).await;
        settle().await;

        assert_eq!(rx.try_recv(), Ok("up".to_string()));
        assert_eq!(rx.try_recv(), Ok(String::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_value_is_not_re_emitted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let debouncer = QueryDebouncer::spawn_seeded(DELAY, tx, "");

        debouncer.push("x");
        settle().await;
        advance(Duration::from_millis(100)).await;
        debouncer.push("");
        settle().await;
        advance(DELAY).await;
        settle().await;

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_emission() {
        let (debouncer, mut rx) = debouncer();

        debouncer.push("never");
        settle().await;
        drop(debouncer);
        advance(DELAY * 2).await;
        settle().await;

        assert_eq!(rx.recv().await, None);
    }
}
