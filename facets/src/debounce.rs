use std::time::Duration;

/// Identifies one scheduled debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceToken(u64);

/// Trailing-edge debounce without a timer of its own.
///
/// The host starts a timer for every scheduled token and reports back when it
/// elapses; only the most recently scheduled, uncancelled token fires.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    issued: u64,
    pending: Option<u64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            issued: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn schedule(&mut self) -> DebounceToken {
        self.issued += 1;
        self.pending = Some(self.issued);
        DebounceToken(self.issued)
    }

    /// Consume `token` if it is still the pending one.
    pub fn fire(&mut self, token: DebounceToken) -> bool {
        if self.pending == Some(token.0) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_fires() {
        let mut d = Debouncer::new(Duration::from_millis(500));
        let a = d.schedule();
        let b = d.schedule();
        let c = d.schedule();

        assert!(!d.fire(a));
        assert!(!d.fire(b));
        assert!(d.fire(c));
        assert!(!d.fire(c));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_drops_pending_token() {
        let mut d = Debouncer::new(Duration::from_millis(500));
        let a = d.schedule();
        d.cancel();
        assert!(!d.fire(a));
    }
}
