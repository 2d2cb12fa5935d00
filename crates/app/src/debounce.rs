use std::time::Duration;

use tokio::task::JoinHandle;

use procure_core::config::SEARCH_DEBOUNCE_MS;

/// Coalesces search keystrokes: each submission cancels the pending timer,
/// so only the latest value fires after the delay elapses. Single-flight per
/// debouncer; independent inputs get independent debouncers.
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn submit<F>(&mut self, value: String, on_fire: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::time::{advance, Instant};

    use super::SearchDebouncer;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_keystroke_fires() {
        let fired: Arc<Mutex<Vec<(String, Instant)>>> = Arc::new(Mutex::new(Vec::new()));
        let started = Instant::now();
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(300));

        // Keystrokes at t=0, t=100, t=200. The yield lets each spawned timer
        // register its deadline at the keystroke instant before time advances.
        for (index, value) in ["d", "dr", "dri"].into_iter().enumerate() {
            if index > 0 {
                advance(Duration::from_millis(100)).await;
            }
            let fired = Arc::clone(&fired);
            debouncer.submit(value.to_string(), move |v| {
                fired.lock().expect("fired lock").push((v, Instant::now()));
            });
            tokio::task::yield_now().await;
        }

        advance(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;

        let fired = fired.lock().expect("fired lock");
        assert_eq!(fired.len(), 1, "earlier pending triggers must be cancelled");
        assert_eq!(fired[0].0, "dri");
        let fired_at_ms = (fired[0].1 - started).as_millis();
        assert!(fired_at_ms >= 500, "fired at {fired_at_ms}ms, expected >= 500ms");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_the_pending_trigger() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(300));

        let sink = Arc::clone(&fired);
        debouncer.submit("drill".to_string(), move |v| {
            sink.lock().expect("fired lock").push(v);
        });
        debouncer.cancel();

        advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;

        assert!(fired.lock().expect("fired lock").is_empty());
    }
}
