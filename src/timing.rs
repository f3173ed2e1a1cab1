//! Debounce timing policy.
//!
//! Maps the time a button spent depressed onto a [`Classification`]. The
//! policy is stateless; the dispatcher feeds it the press and release
//! timestamps recorded by the interrupt handler.

use crate::time::{Tick, ticks_to_millis};
use crate::types::ButtonEvent;

/// Result of classifying one depress/release pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification {
    /// Shorter than the debounce time. Contact bounce, ignored.
    Bounce,

    /// At least the debounce time, shorter than the hold time.
    Press,

    /// At least the hold time.
    Hold,
}

impl Classification {
    /// Event to deliver to the observer; `None` for a bounce.
    pub fn event(self) -> Option<ButtonEvent> {
        match self {
            Classification::Bounce => None,
            Classification::Press => Some(ButtonEvent::Press),
            Classification::Hold => Some(ButtonEvent::Hold),
        }
    }
}

/// Debounce and hold thresholds for one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    pub debounce_ms: u32,
    pub hold_ms: u32,
}

impl Thresholds {
    /// Classifies a press duration against these thresholds.
    ///
    /// Total over all durations. The bounce check comes first, so a
    /// configuration with `debounce_ms >= hold_ms` never reports `Press`;
    /// the engine rejects such configurations at registration.
    #[inline]
    pub fn classify(&self, elapsed_ms: u64) -> Classification {
        if elapsed_ms < self.debounce_ms as u64 {
            Classification::Bounce
        } else if elapsed_ms < self.hold_ms as u64 {
            Classification::Press
        } else {
            Classification::Hold
        }
    }
}

/// Timing errors detected while measuring a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// The release was stamped before the press (clock went backwards or wrapped).
    ReleaseBeforePress { pressed_at: Tick, released_at: Tick },
}

impl core::fmt::Display for TimingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimingError::ReleaseBeforePress {
                pressed_at,
                released_at,
            } => {
                write!(
                    f,
                    "release tick {} precedes press tick {}",
                    released_at.0, pressed_at.0
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimingError {}

/// Milliseconds between a press and its release.
///
/// # Errors
/// `ReleaseBeforePress` if `released_at < pressed_at`. A negative delta is
/// never coerced into a classification.
pub fn press_duration_ms(
    pressed_at: Tick,
    released_at: Tick,
    tick_rate_hz: u32,
) -> Result<u64, TimingError> {
    released_at
        .checked_since(pressed_at)
        .map(|ticks| ticks_to_millis(ticks, tick_rate_hz))
        .ok_or(TimingError::ReleaseBeforePress {
            pressed_at,
            released_at,
        })
}
