/// Doubling retry delay for forecast refreshes, in whole seconds.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: u64,
    base: u64,
    max: u64,
    attempts: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(base: u64, max: u64) -> Self {
        let base = base.max(1);
        Self {
            current: base,
            base,
            max: max.max(base),
            attempts: 0,
        }
    }

    /// Delay before the next retry; each call doubles the following one up to `max`.
    pub fn next_delay(&mut self) -> u64 {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        self.attempts = self.attempts.saturating_add(1);
        delay
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reset(&mut self) {
        self.current = self.base;
        self.attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_until_capped() {
        let mut backoff = Backoff::new(10, 300);
        let delays: Vec<u64> = (0..7).map(|_| backoff.next_delay()).collect();
        assert_eq!(delays, vec![10, 20, 40, 80, 160, 300, 300]);
        assert_eq!(backoff.attempts(), 7);
    }

    #[test]
    fn success_restarts_from_base() {
        let mut backoff = Backoff::new(10, 300);
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.attempts(), 0);
        assert_eq!(backoff.next_delay(), 10);
    }

    #[test]
    fn degenerate_bounds_are_lifted() {
        let mut zero = Backoff::new(0, 0);
        assert_eq!(zero.next_delay(), 1);
        assert_eq!(zero.next_delay(), 1);

        let mut inverted = Backoff::new(60, 5);
        assert_eq!(inverted.next_delay(), 60);
        assert_eq!(inverted.next_delay(), 60);
    }

    #[test]
    fn huge_ceiling_does_not_overflow() {
        let mut backoff = Backoff::new(u64::MAX / 2 + 1, u64::MAX);
        backoff.next_delay();
        assert_eq!(backoff.next_delay(), u64::MAX);
    }
}
