//! Engine context: registration, lifecycle and queries.
//!
//! Provides [`ButtonEngine`], which owns every [`ButtonHandle`] and the
//! pending-release channel. The interrupt half lives in `isr.rs`, the
//! deferred half in `dispatcher.rs`.

use crate::channel::{DEFAULT_QUEUE_LEN, PendingQueue};
use crate::config::ButtonConfig;
use crate::dispatcher::DispatchOutcome;
use crate::gpio::GpioDriver;
use crate::handle::ButtonHandle;
use crate::registry::Registry;
use crate::signal::Notifier;
use crate::time::TickSource;
use crate::timing::{Classification, Thresholds};
use crate::types::{ButtonError, Level, PinId};
use core::cell::RefCell;
use critical_section::Mutex;
use log::{info, warn};

/// Diagnostic counters.
///
/// Events lost or rejected in interrupt context have no caller to report
/// to, so they are counted here instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineStats {
    /// Releases dropped because the pending channel was full.
    pub dropped: u32,
    /// Releases classified as contact bounce.
    pub bounces: u32,
    /// Press events delivered.
    pub presses: u32,
    /// Hold events delivered.
    pub holds: u32,
    /// Releases whose timestamps preceded their press.
    pub timing_errors: u32,
    /// Failed attempts to re-arm an interrupt.
    pub rearm_failures: u32,
    /// Failed attempts to mask an interrupt.
    pub mask_failures: u32,
}

impl EngineStats {
    pub(crate) fn record(&mut self, outcome: DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Classified(Classification::Bounce) => &mut self.bounces,
            DispatchOutcome::Classified(Classification::Press) => &mut self.presses,
            DispatchOutcome::Classified(Classification::Hold) => &mut self.holds,
            DispatchOutcome::TimingError(_) => &mut self.timing_errors,
            DispatchOutcome::Unregistered => return,
        };
        *counter = counter.saturating_add(1);
    }
}

/// State shared between interrupt and task context, guarded by one critical section.
pub(crate) struct Shared<'a, const MAX_BUTTONS: usize, const QUEUE_LEN: usize> {
    pub(crate) initialized: bool,
    pub(crate) registry: Registry<'a, MAX_BUTTONS>,
    pub(crate) pending: PendingQueue<QUEUE_LEN>,
    pub(crate) stats: EngineStats,
    /// Pin whose release the dispatcher has taken but not finished with.
    pub(crate) in_flight: Option<PinId>,
}

/// Interrupt-driven debounce engine for GPIO buttons.
///
/// One engine owns all buttons on a board. It is an explicit context
/// object rather than global state, so independent instances can coexist.
/// Place it in a `static` (e.g. via `static_cell`) when the interrupt
/// handler and the dispatcher need `'static` access.
///
/// All mutable state sits behind a single `critical_section::Mutex`.
/// Entering it masks interrupts; it is never held while user code runs.
///
/// # Type Parameters
/// * `'a` - Lifetime of the tick source and of every registered observer
/// * `G` - GPIO driver
/// * `C` - Tick source
/// * `N` - Dispatcher notifier
/// * `MAX_BUTTONS` - Maximum number of registered buttons
/// * `QUEUE_LEN` - Capacity of the pending-release channel
pub struct ButtonEngine<
    'a,
    G: GpioDriver,
    C: TickSource,
    N: Notifier,
    const MAX_BUTTONS: usize,
    const QUEUE_LEN: usize = DEFAULT_QUEUE_LEN,
> {
    pub(crate) gpio: G,
    pub(crate) clock: &'a C,
    pub(crate) notifier: N,
    pub(crate) shared: Mutex<RefCell<Shared<'a, MAX_BUTTONS, QUEUE_LEN>>>,
}

impl<'a, G, C, N, const MAX_BUTTONS: usize, const QUEUE_LEN: usize>
    ButtonEngine<'a, G, C, N, MAX_BUTTONS, QUEUE_LEN>
where
    G: GpioDriver,
    C: TickSource,
    N: Notifier,
{
    /// Creates an uninitialized engine with no buttons.
    ///
    /// A tick source with `TICK_RATE_HZ == 0` is rejected at compile time:
    ///
    /// ```compile_fail
    /// use level_button::{ButtonEngine, GpioDriver, Level, PinId, Polled, Pull, Tick, TickSource};
    ///
    /// struct Gpio;
    ///
    /// impl GpioDriver for Gpio {
    ///     type Error = ();
    ///     const PIN_COUNT: u8 = 8;
    ///     fn set_direction_input(&self, _: PinId) -> Result<(), ()> { Ok(()) }
    ///     fn set_pull(&self, _: PinId, _: Pull) -> Result<(), ()> { Ok(()) }
    ///     fn install_isr_service(&self) -> Result<(), ()> { Ok(()) }
    ///     fn uninstall_isr_service(&self) {}
    ///     fn attach_isr(&self, _: PinId) -> Result<(), ()> { Ok(()) }
    ///     fn detach_isr(&self, _: PinId) -> Result<(), ()> { Ok(()) }
    ///     fn set_trigger_level(&self, _: PinId, _: Level) -> Result<(), ()> { Ok(()) }
    ///     fn enable_interrupt(&self, _: PinId) -> Result<(), ()> { Ok(()) }
    ///     fn disable_interrupt(&self, _: PinId) -> Result<(), ()> { Ok(()) }
    ///     fn read_level(&self, _: PinId) -> Level { Level::High }
    /// }
    ///
    /// struct Stopped;
    ///
    /// impl TickSource for Stopped {
    ///     const TICK_RATE_HZ: u32 = 0;
    ///     fn now(&self) -> Tick { Tick(0) }
    /// }
    ///
    /// let engine: ButtonEngine<'_, Gpio, Stopped, Polled, 1> =
    ///     ButtonEngine::new(Gpio, &Stopped, Polled);
    /// ```
    pub fn new(gpio: G, clock: &'a C, notifier: N) -> Self {
        const { assert!(C::TICK_RATE_HZ > 0, "TickSource::TICK_RATE_HZ must be non-zero") };
        Self {
            gpio,
            clock,
            notifier,
            shared: Mutex::new(RefCell::new(Shared {
                initialized: false,
                registry: Registry::new(),
                pending: PendingQueue::new(),
                stats: EngineStats::default(),
                in_flight: None,
            })),
        }
    }

    /// Installs the shared interrupt service and opens the pending channel.
    ///
    /// The dispatcher (see [`run`](Self::run)) may be started before or after
    /// this call; it only ever sees releases queued while initialized.
    ///
    /// # Errors
    /// * `InvalidState` - Already initialized; call [`deinit`](Self::deinit) first
    /// * `Driver` - The interrupt service could not be installed
    pub fn init(&self) -> Result<(), ButtonError<G::Error>> {
        if self.is_initialized() {
            return Err(ButtonError::InvalidState {
                expected: "uninitialized",
            });
        }

        info!("installing button ISR service");
        self.gpio
            .install_isr_service()
            .map_err(ButtonError::Driver)?;

        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.pending.clear();
            shared.initialized = true;
        });
        Ok(())
    }

    /// Removes every button, closes the channel and uninstalls the interrupt service.
    ///
    /// # Errors
    /// * `InvalidState` - Not initialized
    /// * `Driver` - A button could not be removed; the remaining buttons stay registered
    pub fn deinit(&self) -> Result<(), ButtonError<G::Error>> {
        if !self.is_initialized() {
            return Err(ButtonError::InvalidState {
                expected: "initialized",
            });
        }

        info!("removing all buttons and uninstalling ISR service");
        while let Some(pin) = critical_section::with(|cs| {
            self.shared
                .borrow_ref(cs)
                .registry
                .iter()
                .next()
                .map(|h| h.pin())
        }) {
            self.remove(pin)?;
        }

        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.pending.clear();
            shared.initialized = false;
        });
        self.gpio.uninstall_isr_service();
        Ok(())
    }

    /// Registers a button and arms its interrupt on the pressed level.
    ///
    /// The config is copied into an engine-owned [`ButtonHandle`]. On a driver
    /// failure the pin is masked, detached and forgotten, so no partial
    /// registration survives.
    ///
    /// # Errors
    /// * `PinOutOfRange` - Pin is not below `G::PIN_COUNT`
    /// * `InvalidThresholds` - `debounce_ms` is not shorter than `hold_ms`
    /// * `DuplicatePin` - Pin already registered; the existing button is untouched
    /// * `RegistryFull` - `MAX_BUTTONS` buttons are registered
    /// * `InvalidState` - [`init`](Self::init) has not been called
    /// * `Driver` - Pin or interrupt configuration failed
    pub fn add(&self, config: ButtonConfig<'a>) -> Result<PinId, ButtonError<G::Error>> {
        let pin = config.pin();

        if pin.0 >= G::PIN_COUNT {
            return Err(ButtonError::PinOutOfRange {
                pin,
                pin_count: G::PIN_COUNT,
            });
        }

        let Thresholds {
            debounce_ms,
            hold_ms,
        } = config.thresholds();
        if debounce_ms >= hold_ms {
            return Err(ButtonError::InvalidThresholds {
                debounce_ms,
                hold_ms,
            });
        }

        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            if !shared.initialized {
                return Err(ButtonError::InvalidState {
                    expected: "initialized",
                });
            }
            match shared.registry.insert(ButtonHandle::new(config)) {
                Ok(()) => Ok(()),
                Err(_) if shared.registry.contains(pin) => Err(ButtonError::DuplicatePin(pin)),
                Err(_) => Err(ButtonError::RegistryFull {
                    capacity: MAX_BUTTONS,
                }),
            }
        })?;

        info!("adding button on GPIO {}", pin.0);
        if let Err(err) = self.configure_pin(&config) {
            warn!("GPIO {} setup failed, rolling back: {:?}", pin.0, err);
            if let Err(mask_err) = self.gpio.disable_interrupt(pin) {
                warn!("GPIO {} rollback: mask failed: {:?}", pin.0, mask_err);
            }
            if let Err(detach_err) = self.gpio.detach_isr(pin) {
                warn!("GPIO {} rollback: detach failed: {:?}", pin.0, detach_err);
            }
            critical_section::with(|cs| {
                self.shared.borrow_ref_mut(cs).registry.remove(pin);
            });
            return Err(ButtonError::Driver(err));
        }

        Ok(pin)
    }

    /// Unregisters the button on `pin`.
    ///
    /// Masks the interrupt, detaches the handler, then drops the handle and
    /// any releases still queued for the pin. If the dispatcher is already
    /// handling a release for the pin, waits (via [`Notifier::relax`]) until
    /// its observer has returned. No observer call for this pin is made
    /// after this returns.
    ///
    /// Must not be called from the observer of `pin` itself while that
    /// observer is being dispatched; it would wait on its own call.
    ///
    /// # Errors
    /// * `NotFound` - No button on `pin`; other buttons are unaffected
    /// * `Driver` - Masking or detaching failed; the button stays registered
    ///   (its interrupt may be left masked)
    pub fn remove(&self, pin: PinId) -> Result<(), ButtonError<G::Error>> {
        if !self.contains(pin) {
            return Err(ButtonError::NotFound(pin));
        }

        info!("removing button on GPIO {}", pin.0);
        self.gpio
            .disable_interrupt(pin)
            .map_err(ButtonError::Driver)?;
        self.gpio.detach_isr(pin).map_err(ButtonError::Driver)?;

        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            // The dispatcher may have re-armed the pin since it was masked above.
            if self.gpio.disable_interrupt(pin).is_err() {
                shared.stats.mask_failures = shared.stats.mask_failures.saturating_add(1);
            }
            shared.registry.remove(pin);
            shared.pending.purge(pin);
        });

        while critical_section::with(|cs| self.shared.borrow_ref(cs).in_flight == Some(pin)) {
            self.notifier.relax();
        }
        Ok(())
    }

    /// Reads the raw (undebounced) state of the button on `pin`.
    ///
    /// # Errors
    /// `NotFound` if no button is registered on `pin`.
    pub fn is_pressed(&self, pin: PinId) -> Result<bool, ButtonError<G::Error>> {
        let pressed_level = critical_section::with(|cs| {
            self.shared
                .borrow_ref(cs)
                .registry
                .get(pin)
                .map(|h| h.config().level_when_pressed())
        })
        .ok_or(ButtonError::NotFound(pin))?;

        Ok(self.gpio.read_level(pin) == pressed_level)
    }

    /// Returns a snapshot of the handle registered on `pin`.
    pub fn handle(&self, pin: PinId) -> Option<ButtonHandle<'a>> {
        critical_section::with(|cs| self.shared.borrow_ref(cs).registry.get(pin).copied())
    }

    /// Returns the level `pin`'s interrupt is armed on, if registered.
    pub fn current_trigger(&self, pin: PinId) -> Option<Level> {
        self.handle(pin).map(|h| h.current_trigger())
    }

    pub fn contains(&self, pin: PinId) -> bool {
        critical_section::with(|cs| self.shared.borrow_ref(cs).registry.contains(pin))
    }

    /// Returns the number of registered buttons.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.shared.borrow_ref(cs).registry.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of releases waiting for the dispatcher.
    pub fn pending_len(&self) -> usize {
        critical_section::with(|cs| self.shared.borrow_ref(cs).pending.len())
    }

    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.shared.borrow_ref(cs).initialized)
    }

    pub fn stats(&self) -> EngineStats {
        critical_section::with(|cs| self.shared.borrow_ref(cs).stats)
    }

    /// Returns a reference to the GPIO driver.
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Arms `pin` on `level` and unmasks it.
    pub(crate) fn arm(&self, pin: PinId, level: Level) -> Result<(), G::Error> {
        self.gpio.set_trigger_level(pin, level)?;
        self.gpio.enable_interrupt(pin)
    }

    fn configure_pin(&self, config: &ButtonConfig<'a>) -> Result<(), G::Error> {
        let pin = config.pin();
        self.gpio.set_direction_input(pin)?;
        self.gpio.set_pull(pin, config.pull())?;
        self.gpio.disable_interrupt(pin)?;
        self.gpio
            .set_trigger_level(pin, config.level_when_pressed())?;
        self.gpio.attach_isr(pin)?;
        self.gpio.enable_interrupt(pin)
    }
}
