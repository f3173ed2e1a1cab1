//! Tick abstraction traits for platform-agnostic timing.

/// A reading of a monotonic tick counter.
///
/// Platforms with a narrower native counter (e.g. a 32-bit RTOS tick count)
/// should widen it before handing it to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u64);

impl Tick {
    /// Ticks elapsed since an earlier reading, or `None` if `earlier` is later than `self`.
    #[inline]
    pub fn checked_since(self, earlier: Tick) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

/// Trait for abstracting the monotonic tick counter.
pub trait TickSource {
    /// Tick frequency in Hz. Must be non-zero.
    const TICK_RATE_HZ: u32;

    /// Returns the current tick count from task context.
    fn now(&self) -> Tick;

    /// Returns the current tick count from interrupt context.
    ///
    /// Override this when the platform has a dedicated ISR-safe accessor.
    fn now_from_isr(&self) -> Tick {
        self.now()
    }
}

/// Converts a tick count to whole milliseconds at the given tick rate.
///
/// Splits the conversion so that the remainder product cannot overflow.
/// Saturates at `u64::MAX` for tick rates below 1 kHz.
#[inline]
pub fn ticks_to_millis(ticks: u64, tick_rate_hz: u32) -> u64 {
    let hz = tick_rate_hz as u64;
    (ticks / hz)
        .saturating_mul(1000)
        .saturating_add((ticks % hz) * 1000 / hz)
}
