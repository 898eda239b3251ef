use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// Runs a task after a quiet period; scheduling again restarts the wait.
///
/// Only the wait is cancellable. Once the delay elapses the task is detached
/// and runs to completion even if something newer is scheduled later.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tokio::spawn(task);
        }));
    }

    /// Drop the scheduled task if its delay has not elapsed yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn only_last_of_a_burst_runs() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for n in 0..3 {
            let tx = tx.clone();
            debouncer.schedule(async move {
                let _ = tx.send(n);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(rx.recv().await, Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_delay_prevents_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let counter = runs.clone();
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn task_past_its_delay_survives_a_new_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        let first = tx.clone();
        debouncer.schedule(async move {
            let _ = release_rx.await;
            let _ = first.send("first");
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        debouncer.schedule(async move {
            let _ = tx.send("second");
        });
        let _ = release_tx.send(());

        tokio::time::sleep(Duration::from_millis(100)).await;
        let mut got = vec![rx.recv().await, rx.recv().await];
        got.sort();
        assert_eq!(got, [Some("first"), Some("second")]);
    }
}
