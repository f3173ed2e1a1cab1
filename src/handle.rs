//! Per-pin button state.

use crate::config::ButtonConfig;
use crate::time::Tick;
use crate::types::{Edge, Level, PinId};

/// Engine-owned state for one registered button.
///
/// Holds a copy of the button's configuration, the level its interrupt is
/// armed on, and the timestamps of the most recent depress and release.
/// Mutated only by the interrupt handler, inside the engine's critical section.
#[derive(Debug, Clone, Copy)]
pub struct ButtonHandle<'a> {
    config: ButtonConfig<'a>,
    current_trigger: Level,
    press_timestamp: Option<Tick>,
    release_timestamp: Option<Tick>,
}

impl<'a> ButtonHandle<'a> {
    /// Creates a handle armed on the pressed level, so the first interrupt is a depress.
    pub fn new(config: ButtonConfig<'a>) -> Self {
        Self {
            current_trigger: config.level_when_pressed(),
            config,
            press_timestamp: None,
            release_timestamp: None,
        }
    }

    pub fn pin(&self) -> PinId {
        self.config.pin()
    }

    pub fn config(&self) -> &ButtonConfig<'a> {
        &self.config
    }

    /// Level the pin's interrupt is (or will be re-)armed on.
    pub fn current_trigger(&self) -> Level {
        self.current_trigger
    }

    pub fn press_timestamp(&self) -> Option<Tick> {
        self.press_timestamp
    }

    pub fn release_timestamp(&self) -> Option<Tick> {
        self.release_timestamp
    }

    /// Records an interrupt that fired on the currently armed level.
    ///
    /// The edge is a release iff the armed level differs from the pressed
    /// level. Flips the trigger so the next interrupt fires on the opposite
    /// level, and stamps the matching timestamp with `now`.
    pub(crate) fn record_edge(&mut self, now: Tick) -> Edge {
        let edge = if self.current_trigger == self.config.level_when_pressed() {
            Edge::Depress
        } else {
            Edge::Release
        };

        self.current_trigger = !self.current_trigger;

        match edge {
            Edge::Depress => self.press_timestamp = Some(now),
            Edge::Release => self.release_timestamp = Some(now),
        }

        edge
    }
}
