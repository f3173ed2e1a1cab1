//! Task wake-up primitives used between the interrupt handler and the dispatcher.

/// Wakes the dispatcher after the interrupt handler queued a release.
///
/// Implementations must latch: a notification that arrives while the
/// dispatcher is busy makes the next [`wait`](Notifier::wait) return at once.
pub trait Notifier {
    /// Signals the dispatcher from interrupt context.
    ///
    /// Returns `true` if a task of higher priority than the interrupted one
    /// was unblocked, in which case the engine calls
    /// [`yield_from_isr`](Notifier::yield_from_isr) before returning.
    fn notify_from_isr(&self) -> bool;

    /// Requests a context switch on interrupt exit.
    fn yield_from_isr(&self) {}

    /// Blocks the dispatcher until notified.
    fn wait(&self);

    /// Backs off while a task-context caller waits on the dispatcher.
    ///
    /// Used by [`ButtonEngine::remove`](crate::ButtonEngine::remove) while the
    /// removed pin's observer is running. Never called from interrupt context.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify_from_isr(&self) -> bool {
        (**self).notify_from_isr()
    }

    fn yield_from_isr(&self) {
        (**self).yield_from_isr()
    }

    fn wait(&self) {
        (**self).wait()
    }

    fn relax(&self) {
        (**self).relax()
    }
}

/// Notifier for applications that drain the channel from their own loop.
///
/// Nothing is signalled and [`wait`](Notifier::wait) returns immediately;
/// call [`ButtonEngine::process_next`](crate::ButtonEngine::process_next)
/// periodically instead of running the dispatcher loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Polled;

impl Notifier for Polled {
    fn notify_from_isr(&self) -> bool {
        false
    }

    fn wait(&self) {}
}

#[cfg(feature = "std")]
pub use self::std_notifier::StdNotifier;

#[cfg(feature = "std")]
mod std_notifier {
    use super::Notifier;
    use std::sync::{Condvar, Mutex, PoisonError};

    /// Condition-variable notifier for hosted targets and simulation.
    #[derive(Debug, Default)]
    pub struct StdNotifier {
        pending: Mutex<bool>,
        ready: Condvar,
    }

    impl StdNotifier {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Notifier for StdNotifier {
        fn notify_from_isr(&self) -> bool {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            *pending = true;
            self.ready.notify_one();
            false
        }

        fn wait(&self) {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            while !*pending {
                pending = self
                    .ready
                    .wait(pending)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            *pending = false;
        }

        fn relax(&self) {
            std::thread::yield_now();
        }
    }
}
