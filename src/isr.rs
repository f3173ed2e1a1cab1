//! Interrupt-context half of the engine.

use crate::channel::PendingRelease;
use crate::engine::ButtonEngine;
use crate::gpio::GpioDriver;
use crate::signal::Notifier;
use crate::time::TickSource;
use crate::types::{Edge, PinId};

/// What [`ButtonEngine::on_interrupt`] did with an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IsrAction {
    /// Depress recorded; the pin was re-armed for the release level.
    Depress,

    /// Release queued for the dispatcher; the pin stays masked until processed.
    Queued,

    /// Release dropped because the channel was full; the pin was re-armed.
    Dropped,

    /// Nothing recorded. The pin is left masked when it is not registered or
    /// the engine is not initialized, and re-armed when a release arrives
    /// with no depress on record.
    Ignored,
}

impl<'a, G, C, N, const MAX_BUTTONS: usize, const QUEUE_LEN: usize>
    ButtonEngine<'a, G, C, N, MAX_BUTTONS, QUEUE_LEN>
where
    G: GpioDriver,
    C: TickSource,
    N: Notifier,
{
    /// Interrupt handler for a registered pin.
    ///
    /// Call this from the GPIO interrupt routed to `pin`; it is the only
    /// engine method meant for interrupt context. Runs entirely inside one
    /// critical section: masks the pin, flips its trigger level, stamps the
    /// edge, and either re-arms (depress) or queues the release for the
    /// dispatcher. Never blocks, never allocates, never calls user code.
    ///
    /// If queueing woke a higher-priority task, yields to it via
    /// [`Notifier::yield_from_isr`] before returning.
    pub fn on_interrupt(&self, pin: PinId) -> IsrAction {
        let action = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let shared = &mut *shared;

            // A level interrupt re-fires for as long as the line sits at the
            // armed level, so the pin is masked before anything else.
            if self.gpio.disable_interrupt(pin).is_err() {
                shared.stats.mask_failures = shared.stats.mask_failures.saturating_add(1);
            }
            if !shared.initialized {
                return IsrAction::Ignored;
            }

            let Some(handle) = shared.registry.get_mut(pin) else {
                return IsrAction::Ignored;
            };

            let now = self.clock.now_from_isr();
            let edge = handle.record_edge(now);
            let trigger = handle.current_trigger();
            let pressed_at = handle.press_timestamp();

            let action = match (edge, pressed_at) {
                (Edge::Release, Some(pressed_at)) => {
                    let release = PendingRelease {
                        pin,
                        pressed_at,
                        released_at: now,
                    };
                    match shared.pending.try_send(release) {
                        Ok(()) => return IsrAction::Queued,
                        Err(_) => {
                            shared.stats.dropped = shared.stats.dropped.saturating_add(1);
                            IsrAction::Dropped
                        }
                    }
                }
                (Edge::Depress, _) => IsrAction::Depress,
                (Edge::Release, None) => IsrAction::Ignored,
            };

            if self.arm(pin, trigger).is_err() {
                shared.stats.rearm_failures = shared.stats.rearm_failures.saturating_add(1);
            }
            action
        });

        if action == IsrAction::Queued && self.notifier.notify_from_isr() {
            self.notifier.yield_from_isr();
        }
        action
    }
}
