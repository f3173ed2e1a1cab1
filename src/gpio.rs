//! GPIO and interrupt-controller abstraction.

use crate::types::{Level, PinId, Pull};

/// Trait for abstracting the GPIO and interrupt hardware.
///
/// Implement this for your HAL to let the engine configure pins and arm
/// level-triggered interrupts. The runtime must route an interrupt on an
/// attached pin to [`ButtonEngine::on_interrupt`](crate::ButtonEngine::on_interrupt).
///
/// Every method takes `&self` because the same driver is used from the
/// interrupt handler and from task context. `disable_interrupt`,
/// `set_trigger_level` and `enable_interrupt` are called from interrupt
/// context and must not block or allocate.
pub trait GpioDriver {
    /// Error reported by the underlying HAL.
    type Error: core::fmt::Debug;

    /// Number of GPIOs; valid pins are `0..PIN_COUNT`.
    const PIN_COUNT: u8;

    /// Configures `pin` as a digital input.
    fn set_direction_input(&self, pin: PinId) -> Result<(), Self::Error>;

    /// Configures the internal pull resistor of `pin`.
    fn set_pull(&self, pin: PinId, pull: Pull) -> Result<(), Self::Error>;

    /// Installs the shared per-pin interrupt dispatch service.
    fn install_isr_service(&self) -> Result<(), Self::Error>;

    /// Removes the shared interrupt dispatch service.
    fn uninstall_isr_service(&self);

    /// Routes interrupts on `pin` to the engine.
    fn attach_isr(&self, pin: PinId) -> Result<(), Self::Error>;

    /// Stops routing interrupts on `pin`.
    fn detach_isr(&self, pin: PinId) -> Result<(), Self::Error>;

    /// Arms `pin` to interrupt while the line is at `level`.
    fn set_trigger_level(&self, pin: PinId, level: Level) -> Result<(), Self::Error>;

    fn enable_interrupt(&self, pin: PinId) -> Result<(), Self::Error>;

    fn disable_interrupt(&self, pin: PinId) -> Result<(), Self::Error>;

    /// Reads the current electrical level of `pin`.
    fn read_level(&self, pin: PinId) -> Level;
}
