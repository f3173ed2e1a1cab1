//! Button configuration and the observer interface.

use crate::timing::Thresholds;
use crate::types::{ButtonEvent, Level, PinId, Pull};

/// Default hold threshold in milliseconds.
pub const DEFAULT_HOLD_MS: u32 = 3000;

/// Default debounce threshold in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u32 = 15;

/// Receives press and hold events.
///
/// Always called from the dispatcher's task context, never from an interrupt.
/// Implementations must not block for long: every button sharing the
/// dispatcher waits while an observer runs.
pub trait ButtonObserver {
    /// Called once per classified release on `pin`.
    fn on_event(&self, pin: PinId, event: ButtonEvent);
}

impl<F> ButtonObserver for F
where
    F: Fn(PinId, ButtonEvent),
{
    fn on_event(&self, pin: PinId, event: ButtonEvent) {
        self(pin, event)
    }
}

/// Configuration for a single button.
///
/// The engine stores its own copy at registration, so the value passed to
/// [`ButtonEngine::add`](crate::ButtonEngine::add) may be dropped afterwards.
/// Only the observer is borrowed, for the lifetime `'a` of the engine.
#[derive(Clone, Copy)]
pub struct ButtonConfig<'a> {
    pin: PinId,
    pressed_level: Level,
    hold_ms: u32,
    debounce_ms: u32,
    observer: &'a (dyn ButtonObserver + Sync),
}

impl<'a> ButtonConfig<'a> {
    /// Creates a config for an active-low button with default thresholds.
    pub fn new(pin: PinId, observer: &'a (dyn ButtonObserver + Sync)) -> Self {
        Self {
            pin,
            pressed_level: Level::Low,
            hold_ms: DEFAULT_HOLD_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            observer,
        }
    }

    /// Sets the level that indicates "pressed".
    pub fn pressed_level(mut self, level: Level) -> Self {
        self.pressed_level = level;
        self
    }

    /// Sets the hold threshold.
    pub fn hold_ms(mut self, hold_ms: u32) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    /// Sets the debounce threshold.
    pub fn debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn level_when_pressed(&self) -> Level {
        self.pressed_level
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            debounce_ms: self.debounce_ms,
            hold_ms: self.hold_ms,
        }
    }

    /// Pull resistor that holds the line at its released level.
    pub fn pull(&self) -> Pull {
        match self.pressed_level {
            Level::Low => Pull::Up,
            Level::High => Pull::Down,
        }
    }

    pub fn observer(&self) -> &'a (dyn ButtonObserver + Sync) {
        self.observer
    }
}

impl core::fmt::Debug for ButtonConfig<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ButtonConfig")
            .field("pin", &self.pin)
            .field("pressed_level", &self.pressed_level)
            .field("hold_ms", &self.hold_ms)
            .field("debounce_ms", &self.debounce_ms)
            .finish_non_exhaustive()
    }
}
