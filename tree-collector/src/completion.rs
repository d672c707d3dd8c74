//! Fan-in completion trigger.
//!
//! A [`CompletionTrigger`] is a cloneable handle bound to a callback. Every clone is
//! one holder; the callback runs exactly once, when the last holder is released.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

type Callback = Box<dyn FnOnce() + Send>;

struct TriggerInner {
    on_complete: Mutex<Option<Callback>>,
}

impl Drop for TriggerInner {
    fn drop(&mut self) {
        if let Some(callback) = self.on_complete.get_mut().take() {
            callback();
        }
    }
}

/// Shared handle whose callback fires when the last clone is dropped.
#[derive(Clone)]
pub struct CompletionTrigger {
    inner: Arc<TriggerInner>,
}

impl CompletionTrigger {
    /// Create a trigger with a single holder.
    pub fn new(on_complete: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(TriggerInner {
                on_complete: Mutex::new(Some(Box::new(on_complete))),
            }),
        }
    }

    /// Give up this holder. Equivalent to dropping it.
    pub fn release(self) {
        drop(self);
    }

    /// Number of holders still alive.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl fmt::Debug for CompletionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionTrigger")
            .field("holders", &self.holders())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_trigger() -> (CompletionTrigger, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let trigger = CompletionTrigger::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (trigger, fired)
    }

    #[test]
    fn test_fires_when_sole_holder_released() {
        let (trigger, fired) = counting_trigger();

        trigger.release();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_waits_for_last_holder() {
        let (trigger, fired) = counting_trigger();
        let holders: Vec<_> = (0..3).map(|_| trigger.clone()).collect();
        assert_eq!(trigger.holders(), 4);

        trigger.release();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let mut holders = holders.into_iter();
        holders.next().unwrap().release();
        holders.next().unwrap().release();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        holders.next().unwrap().release();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_from_other_threads() {
        let (trigger, fired) = counting_trigger();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let holder = trigger.clone();
                std::thread::spawn(move || holder.release())
            })
            .collect();
        trigger.release();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
