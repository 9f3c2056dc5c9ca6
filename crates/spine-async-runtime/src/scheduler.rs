use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stamp for one render request; larger is newer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Hands out generations and remembers the newest one.
///
/// Clones share the same counter, so the designer can stamp requests while
/// the worker checks them.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    latest: Arc<AtomicU64>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request, making every earlier one stale
    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase() {
        let scheduler = RenderScheduler::new();
        let first = scheduler.next();
        let second = scheduler.clone().next();
        assert!(second > first);
        assert!(!scheduler.is_current(first));
        assert!(scheduler.is_current(second));
    }
}
