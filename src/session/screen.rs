use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Loading,
    Loaded,
}

/// Screen that shows a loading state for a fixed delay, then flips to loaded.
///
/// The transition is one way and is not tied to any outstanding request.
#[derive(Debug)]
pub struct ProcessingScreen {
    state: ScreenState,
    delay: Duration,
}

impl ProcessingScreen {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            state: ScreenState::Loading,
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns true only on the call that performs the transition
    pub fn mark_loaded(&mut self) -> bool {
        if self.state == ScreenState::Loaded {
            return false;
        }
        debug!("Processing screen loaded after {:?}", self.delay);
        self.state = ScreenState::Loaded;
        true
    }

    pub async fn run(&mut self) -> ScreenState {
        if self.state == ScreenState::Loading {
            tokio::time::sleep(self.delay).await;
            self.mark_loaded();
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_transition_is_one_way() {
        let mut screen = ProcessingScreen::new(2000);
        assert_eq!(screen.state(), ScreenState::Loading);
        assert!(screen.mark_loaded());
        assert!(!screen.mark_loaded());
        assert_eq!(screen.state(), ScreenState::Loaded);
    }

    #[tokio::test]
    async fn test_run_waits_for_delay() {
        let mut screen = ProcessingScreen::new(20);
        let started = Instant::now();
        assert_eq!(screen.run().await, ScreenState::Loaded);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_run_when_already_loaded_returns_immediately() {
        let mut screen = ProcessingScreen::new(60_000);
        screen.mark_loaded();
        assert_eq!(screen.run().await, ScreenState::Loaded);
    }
}
