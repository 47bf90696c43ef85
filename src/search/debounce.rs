//! Debounced input
//!
//! Collapses a burst of values into the last one, delivered once no new value
//! has arrived for the quiet period.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Sending half of a debounced channel
#[derive(Debug, Clone)]
pub struct Trigger<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Trigger<T> {
    /// Queue a value; returns false once the receiving half is gone
    pub fn fire(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Receiving half of a debounced channel
#[derive(Debug)]
pub struct Debounced<T> {
    rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
}

/// Create a debounced channel with the given quiet period
pub fn channel<T>(quiet: Duration) -> (Trigger<T>, Debounced<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Trigger { tx }, Debounced { rx, quiet })
}

impl<T> Debounced<T> {
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Wait for the next settled value
    ///
    /// Returns `None` once every trigger is dropped and nothing is pending. A
    /// value pending when the triggers close is delivered immediately.
    pub async fn next(&mut self) -> Option<T> {
        let mut pending = self.rx.recv().await?;
        let mut deadline = Instant::now() + self.quiet;

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(value) => {
                        pending = value;
                        deadline = Instant::now() + self.quiet;
                    }
                    None => return Some(pending),
                },
                _ = tokio::time::sleep_until(deadline) => return Some(pending),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_single_value_after_quiet_period() {
        let (trigger, mut debounced) = channel(Duration::from_millis(500));
        let start = Instant::now();

        trigger.fire("Pune");
        let task = tokio::spawn(async move { (debounced.next().await, start.elapsed()) });

        let (value, elapsed) = task.await.unwrap();
        assert_eq!(value, Some("Pune"));
        assert!(elapsed >= Duration::from_millis(500));
        drop(trigger);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last() {
        let (trigger, mut debounced) = channel(Duration::from_millis(500));

        let task = tokio::spawn(async move {
            let first = debounced.next().await;
            let second = debounced.next().await;
            (first, second)
        });

        for value in ["P", "Pu", "Pun", "Pune"] {
            trigger.fire(value.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;
        trigger.fire("Goa".to_string());
        drop(trigger);

        let (first, second) = task.await.unwrap();
        assert_eq!(first.as_deref(), Some("Pune"));
        assert_eq!(second.as_deref(), Some("Goa"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_ends() {
        let (trigger, mut debounced) = channel::<u32>(Duration::from_millis(500));
        drop(trigger);
        assert_eq!(debounced.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_after_receiver_dropped() {
        let (trigger, debounced) = channel(Duration::from_millis(10));
        drop(debounced);
        assert!(!trigger.fire(1));
    }
}
