//! Task-context half of the engine.
//!
//! The dispatcher drains the pending-release channel, classifies each
//! release, calls the button's observer and re-arms the pin. One dispatcher
//! serves every button, so a slow observer delays the others.

use crate::engine::ButtonEngine;
use crate::gpio::GpioDriver;
use crate::signal::Notifier;
use crate::time::TickSource;
use crate::timing::{Classification, TimingError, press_duration_ms};
use crate::types::PinId;
use log::{debug, info, warn};

/// Outcome of processing one queued release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// Classified; the observer was called unless it was a bounce.
    Classified(Classification),

    /// The timestamps were inconsistent; the observer was not called.
    TimingError(TimingError),

    /// The button was removed after the release was queued.
    Unregistered,
}

/// Record of one release handled by [`ButtonEngine::process_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dispatch {
    pub pin: PinId,
    pub outcome: DispatchOutcome,
}

impl<'a, G, C, N, const MAX_BUTTONS: usize, const QUEUE_LEN: usize>
    ButtonEngine<'a, G, C, N, MAX_BUTTONS, QUEUE_LEN>
where
    G: GpioDriver,
    C: TickSource,
    N: Notifier,
{
    /// Processes the oldest pending release, if any.
    ///
    /// Task context only. The observer runs outside the critical section,
    /// with the pin marked in flight so that a concurrent
    /// [`remove`](Self::remove) waits for it to return. The pin is re-armed
    /// on its current trigger level on every path, bounces and timing errors
    /// included, unless it has been removed.
    ///
    /// # Returns
    /// * `Some(dispatch)` - One release was processed
    /// * `None` - The channel was empty
    pub fn process_next(&self) -> Option<Dispatch> {
        let (release, config) = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let release = shared.pending.try_recv()?;
            let config = shared.registry.get(release.pin).map(|h| *h.config());
            if config.is_some() {
                shared.in_flight = Some(release.pin);
            }
            Some((release, config))
        })?;

        let pin = release.pin;
        let Some(config) = config else {
            return Some(Dispatch {
                pin,
                outcome: DispatchOutcome::Unregistered,
            });
        };

        let outcome =
            match press_duration_ms(release.pressed_at, release.released_at, C::TICK_RATE_HZ) {
                Ok(elapsed_ms) => {
                    let classification = config.thresholds().classify(elapsed_ms);
                    debug!(
                        "GPIO {}: {:?} after {}ms",
                        pin.0, classification, elapsed_ms
                    );
                    if let Some(event) = classification.event() {
                        config.observer().on_event(pin, event);
                    }
                    DispatchOutcome::Classified(classification)
                }
                Err(err) => {
                    warn!("GPIO {}: {}", pin.0, err);
                    DispatchOutcome::TimingError(err)
                }
            };

        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let shared = &mut *shared;
            shared.in_flight = None;
            shared.stats.record(outcome);

            if let Some(handle) = shared.registry.get(pin) {
                if self.arm(pin, handle.current_trigger()).is_err() {
                    shared.stats.rearm_failures = shared.stats.rearm_failures.saturating_add(1);
                }
            }
        });

        Some(Dispatch { pin, outcome })
    }

    /// Dispatcher loop. Never returns.
    ///
    /// Run this on a dedicated task with enough stack for the observers.
    /// Blocks in [`Notifier::wait`], then drains the channel.
    pub fn run(&self) -> ! {
        info!("button dispatcher running");
        loop {
            self.notifier.wait();
            while self.process_next().is_some() {}
        }
    }
}

/// Default stack budget for the dispatcher worker, in bytes.
#[cfg(feature = "std")]
pub const DEFAULT_WORKER_STACK_SIZE: usize = 4096;

/// Default scheduler priority for the dispatcher worker.
#[cfg(feature = "std")]
pub const DEFAULT_WORKER_PRIORITY: u8 = 10;

/// Worker thread settings for [`ButtonEngine::spawn_dispatcher`].
///
/// The worker is independent of [`init`](ButtonEngine::init) and
/// [`deinit`](ButtonEngine::deinit): it is started once and idles in
/// [`Notifier::wait`] while the engine is deinitialized.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub name: &'static str,
    pub stack_size: usize,
    /// Priority for RTOS-backed threads. Host threads have no priority
    /// control and only report it.
    pub priority: u8,
}

#[cfg(feature = "std")]
impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "button-dispatch",
            stack_size: DEFAULT_WORKER_STACK_SIZE,
            priority: DEFAULT_WORKER_PRIORITY,
        }
    }
}

#[cfg(feature = "std")]
impl<'a, G, C, N, const MAX_BUTTONS: usize, const QUEUE_LEN: usize>
    ButtonEngine<'a, G, C, N, MAX_BUTTONS, QUEUE_LEN>
where
    G: GpioDriver,
    C: TickSource,
    N: Notifier,
    Self: Sync + 'static,
{
    /// Spawns [`run`](Self::run) on a named worker thread.
    ///
    /// The thread lives for the rest of the program.
    pub fn spawn_dispatcher(
        &'static self,
        config: &WorkerConfig,
    ) -> std::io::Result<std::thread::JoinHandle<()>> {
        info!(
            "spawning {} (stack {} bytes, priority {})",
            config.name, config.stack_size, config.priority
        );
        std::thread::Builder::new()
            .name(config.name.into())
            .stack_size(config.stack_size)
            .spawn(move || {
                self.run();
            })
    }
}
