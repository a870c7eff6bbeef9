//! Quiet-period debouncing for fast-changing input such as the search box

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Publishes the latest input only once it has been stable for `quiet`.
///
/// Every `set` restarts the timer. Subscribers observe the settled value
/// through a `watch` channel; settling on the value already published does
/// not notify them again.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, quiet: Duration) -> Self {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output) = watch::channel(initial);
        let task = tokio::spawn(run(input_rx, output_tx, quiet));

        Self { input, output, task }
    }

    pub fn set(&self, value: T) {
        // The task only stops when we are dropped
        let _ = self.input.send(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// Most recently settled value
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T: PartialEq>(
    mut input: mpsc::UnboundedReceiver<T>,
    output: watch::Sender<T>,
    quiet: Duration,
) {
    let mut pending: Option<T> = None;

    loop {
        match pending.take() {
            None => match input.recv().await {
                Some(value) => pending = Some(value),
                None => return,
            },
            Some(value) => {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => return,
                    },
                    _ = tokio::time::sleep(quiet) => {
                        output.send_if_modified(|current| {
                            if *current == value {
                                false
                            } else {
                                *current = value;
                                true
                            }
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Instant};

    #[tokio::test(start_paused = true)]
    async fn burst_emits_once_after_quiet_period() {
        let debouncer = Debouncer::new(String::new(), Duration::from_secs(5));
        let mut out = debouncer.subscribe();
        let start = Instant::now();

        debouncer.set("i".to_string());
        sleep(Duration::from_secs(1)).await;
        debouncer.set("in".to_string());
        sleep(Duration::from_secs(1)).await;
        debouncer.set("inc".to_string());

        out.changed().await.unwrap();
        let elapsed = start.elapsed();
        assert_eq!(*out.borrow_and_update(), "inc");
        assert!(elapsed >= Duration::from_secs(7), "emitted early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(7_050), "emitted late: {elapsed:?}");

        // Nothing else follows
        assert!(timeout(Duration::from_secs(30), out.changed()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_settles_while_input_keeps_changing() {
        let debouncer = Debouncer::new(0u32, Duration::from_millis(500));
        let out = debouncer.subscribe();

        for n in 1..=10 {
            debouncer.set(n);
            sleep(Duration::from_millis(300)).await;
        }
        assert!(!out.has_changed().unwrap());
        assert_eq!(debouncer.current(), 0);

        sleep(Duration::from_millis(300)).await;
        assert_eq!(debouncer.current(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn settling_on_same_value_does_not_notify() {
        let debouncer = Debouncer::new("dune".to_string(), Duration::from_millis(500));
        let mut out = debouncer.subscribe();

        debouncer.set("dun".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.set("dune".to_string());

        assert!(timeout(Duration::from_secs(5), out.changed()).await.is_err());
        assert_eq!(debouncer.current(), "dune");
    }
}
