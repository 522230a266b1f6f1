use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Enforces a fixed pause between consecutive external calls.
///
/// The first call runs immediately; each later call starts no sooner than
/// `min_interval` after the previous one finished.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_finished: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_finished: None,
        }
    }

    pub async fn run<F: Future>(&mut self, call: F) -> F::Output {
        if let Some(last) = self.last_finished {
            sleep_until(last + self.min_interval).await;
        }

        let output = call.await;
        self.last_finished = Some(Instant::now());
        output
    }
}
