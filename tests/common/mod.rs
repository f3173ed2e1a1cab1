//! Shared test infrastructure for level-button integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use level_button::{
    ButtonEngine, ButtonEvent, ButtonObserver, Dispatch, GpioDriver, IsrAction, Level, Notifier,
    PinId, Polled, Pull, Tick, TickSource,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

// ============================================================================
// Mock GPIO
// ============================================================================

pub const PIN_COUNT: u8 = 40;

/// Observable state of one mock pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinState {
    pub input: bool,
    pub pull: Option<Pull>,
    pub attached: bool,
    pub trigger: Option<Level>,
    pub enabled: bool,
    /// Physical level of the line.
    pub line: Level,
}

impl Default for PinState {
    fn default() -> Self {
        Self {
            input: false,
            pull: None,
            attached: false,
            trigger: None,
            enabled: false,
            line: Level::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Injected(Op),
    ServiceNotInstalled,
    ServiceAlreadyInstalled,
    NotAttached,
}

/// Driver operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SetDirection,
    SetPull,
    Attach,
    Detach,
    SetTrigger,
    Enable,
    Disable,
}

#[derive(Debug)]
struct GpioState {
    pins: [PinState; PIN_COUNT as usize],
    service_installed: bool,
    failure: Option<(Op, PinId)>,
}

impl Default for GpioState {
    fn default() -> Self {
        Self {
            pins: [PinState::default(); PIN_COUNT as usize],
            service_installed: false,
            failure: None,
        }
    }
}

/// Mock GPIO modelling level-triggered interrupts.
///
/// An interrupt is pending whenever a pin is attached, enabled, and its
/// line sits at the armed trigger level. Tests deliver it with [`fire_if_armed`].
#[derive(Debug, Default)]
pub struct MockGpio {
    state: Mutex<GpioState>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, pin: PinId) -> PinState {
        self.state.lock().unwrap().pins[pin.0 as usize]
    }

    pub fn set_line(&self, pin: PinId, level: Level) {
        self.state.lock().unwrap().pins[pin.0 as usize].line = level;
    }

    pub fn service_installed(&self) -> bool {
        self.state.lock().unwrap().service_installed
    }

    /// Makes `op` fail for `pin` until cleared.
    pub fn fail_on(&self, op: Op, pin: PinId) {
        self.state.lock().unwrap().failure = Some((op, pin));
    }

    pub fn clear_failure(&self) {
        self.state.lock().unwrap().failure = None;
    }

    /// True if the level interrupt on `pin` would currently fire.
    pub fn interrupt_pending(&self, pin: PinId) -> bool {
        let p = self.pin(pin);
        p.attached && p.enabled && p.trigger == Some(p.line)
    }

    fn apply(
        &self,
        op: Op,
        pin: PinId,
        f: impl FnOnce(&mut GpioState) -> Result<(), MockError>,
    ) -> Result<(), MockError> {
        let mut state = self.state.lock().unwrap();
        if state.failure == Some((op, pin)) {
            return Err(MockError::Injected(op));
        }
        f(&mut state)
    }
}

impl GpioDriver for MockGpio {
    type Error = MockError;

    const PIN_COUNT: u8 = PIN_COUNT;

    fn set_direction_input(&self, pin: PinId) -> Result<(), MockError> {
        self.apply(Op::SetDirection, pin, |s| {
            s.pins[pin.0 as usize].input = true;
            Ok(())
        })
    }

    fn set_pull(&self, pin: PinId, pull: Pull) -> Result<(), MockError> {
        self.apply(Op::SetPull, pin, |s| {
            s.pins[pin.0 as usize].pull = Some(pull);
            Ok(())
        })
    }

    fn install_isr_service(&self) -> Result<(), MockError> {
        let mut state = self.state.lock().unwrap();
        if state.service_installed {
            return Err(MockError::ServiceAlreadyInstalled);
        }
        state.service_installed = true;
        Ok(())
    }

    fn uninstall_isr_service(&self) {
        self.state.lock().unwrap().service_installed = false;
    }

    fn attach_isr(&self, pin: PinId) -> Result<(), MockError> {
        self.apply(Op::Attach, pin, |s| {
            if !s.service_installed {
                return Err(MockError::ServiceNotInstalled);
            }
            s.pins[pin.0 as usize].attached = true;
            Ok(())
        })
    }

    fn detach_isr(&self, pin: PinId) -> Result<(), MockError> {
        self.apply(Op::Detach, pin, |s| {
            let p = &mut s.pins[pin.0 as usize];
            if !p.attached {
                return Err(MockError::NotAttached);
            }
            p.attached = false;
            Ok(())
        })
    }

    fn set_trigger_level(&self, pin: PinId, level: Level) -> Result<(), MockError> {
        self.apply(Op::SetTrigger, pin, |s| {
            s.pins[pin.0 as usize].trigger = Some(level);
            Ok(())
        })
    }

    fn enable_interrupt(&self, pin: PinId) -> Result<(), MockError> {
        self.apply(Op::Enable, pin, |s| {
            s.pins[pin.0 as usize].enabled = true;
            Ok(())
        })
    }

    fn disable_interrupt(&self, pin: PinId) -> Result<(), MockError> {
        self.apply(Op::Disable, pin, |s| {
            s.pins[pin.0 as usize].enabled = false;
            Ok(())
        })
    }

    fn read_level(&self, pin: PinId) -> Level {
        self.pin(pin).line
    }
}

// ============================================================================
// Mock Tick Source
// ============================================================================

/// Millisecond tick counter with controllable time.
#[derive(Debug, Default)]
pub struct MockClock {
    now: AtomicU64,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TickSource for MockClock {
    const TICK_RATE_HZ: u32 = 1000;

    fn now(&self) -> Tick {
        Tick(self.now.load(Ordering::SeqCst))
    }
}

// ============================================================================
// Observers and Notifiers
// ============================================================================

/// Observer that records every event it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<(PinId, ButtonEvent)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(PinId, ButtonEvent)> {
        self.events.lock().unwrap().clone()
    }
}

impl ButtonObserver for Recorder {
    fn on_event(&self, pin: PinId, event: ButtonEvent) {
        self.events.lock().unwrap().push((pin, event));
    }
}

/// Notifier that counts wake-ups and yields.
#[derive(Debug, Default)]
pub struct CountingNotifier {
    pub wakes_higher_priority: bool,
    pub notified: AtomicU32,
    pub yielded: AtomicU32,
}

impl Notifier for CountingNotifier {
    fn notify_from_isr(&self) -> bool {
        self.notified.fetch_add(1, Ordering::SeqCst);
        self.wakes_higher_priority
    }

    fn yield_from_isr(&self) {
        self.yielded.fetch_add(1, Ordering::SeqCst);
    }

    fn wait(&self) {}
}

// ============================================================================
// Engine Helpers
// ============================================================================

pub type TestEngine<'a> = ButtonEngine<'a, MockGpio, MockClock, Polled, 4>;

/// Creates and initializes an engine for up to four buttons.
pub fn new_engine(clock: &MockClock) -> TestEngine<'_> {
    let engine = ButtonEngine::new(MockGpio::new(), clock, Polled);
    engine.init().unwrap();
    engine
}

/// Delivers the level interrupt on `pin` if it is currently pending.
pub fn fire_if_armed<N: Notifier, const M: usize, const Q: usize>(
    engine: &ButtonEngine<'_, MockGpio, MockClock, N, M, Q>,
    pin: PinId,
) -> Option<IsrAction> {
    if engine.gpio().interrupt_pending(pin) {
        Some(engine.on_interrupt(pin))
    } else {
        None
    }
}

/// Moves the line of `pin` to `level` at time `at_ms`, delivering any interrupt.
pub fn drive<N: Notifier, const M: usize, const Q: usize>(
    engine: &ButtonEngine<'_, MockGpio, MockClock, N, M, Q>,
    clock: &MockClock,
    pin: PinId,
    level: Level,
    at_ms: u64,
) -> Option<IsrAction> {
    clock.set(at_ms);
    engine.gpio().set_line(pin, level);
    fire_if_armed(engine, pin)
}

/// Runs the dispatcher until the channel is empty.
///
/// After each release the re-armed pin may already sit at its trigger
/// level; that interrupt is delivered straight away, as hardware would.
pub fn dispatch_all<N: Notifier, const M: usize, const Q: usize>(
    engine: &ButtonEngine<'_, MockGpio, MockClock, N, M, Q>,
) -> Vec<Dispatch> {
    let mut dispatched = Vec::new();
    while let Some(dispatch) = engine.process_next() {
        fire_if_armed(engine, dispatch.pin);
        dispatched.push(dispatch);
    }
    dispatched
}
