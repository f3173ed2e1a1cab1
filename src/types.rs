//! Core types shared by the engine and its collaborators.

/// A GPIO pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

impl From<u8> for PinId {
    fn from(pin: u8) -> Self {
        PinId(pin)
    }
}

impl From<PinId> for u8 {
    fn from(pin: PinId) -> Self {
        pin.0
    }
}

/// Logical level of a digital input, also used as an interrupt trigger level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Internal pull resistor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor.
    None,

    /// Pull-up, for buttons that short the pin to ground.
    Up,

    /// Pull-down, for buttons that connect the pin to the supply rail.
    Down,
}

/// Event delivered to a [`ButtonObserver`](crate::ButtonObserver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Released after at least the debounce time and before the hold time.
    Press,

    /// Released after at least the hold time.
    Hold,
}

/// Which physical transition an interrupt represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The button was pushed down.
    Depress,

    /// The button was let go.
    Release,
}

/// Coarse error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Bad pin, duplicate registration or inconsistent thresholds.
    InvalidArgument,

    /// No button is registered on the requested pin.
    NotFound,

    /// No room left for another button.
    ResourceExhausted,

    /// The GPIO collaborator reported an error.
    DriverFailure,

    /// Operation called while the engine was in the wrong lifecycle state.
    InvalidState,
}

/// Errors returned by engine operations.
///
/// `E` is the error type of the [`GpioDriver`](crate::GpioDriver) in use;
/// driver errors are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonError<E> {
    /// The pin number is not below the driver's pin count.
    PinOutOfRange { pin: PinId, pin_count: u8 },

    /// A button is already registered on this pin.
    DuplicatePin(PinId),

    /// `debounce_ms` must be strictly less than `hold_ms`.
    InvalidThresholds { debounce_ms: u32, hold_ms: u32 },

    /// No button is registered on this pin.
    NotFound(PinId),

    /// The registry holds its maximum number of buttons.
    RegistryFull { capacity: usize },

    /// The GPIO driver failed.
    Driver(E),

    /// Operation called from an invalid lifecycle state.
    InvalidState {
        /// Human-readable description of the expected state, e.g. "initialized"
        expected: &'static str,
    },
}

impl<E> ButtonError<E> {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ButtonError::PinOutOfRange { .. }
            | ButtonError::DuplicatePin(_)
            | ButtonError::InvalidThresholds { .. } => ErrorKind::InvalidArgument,
            ButtonError::NotFound(_) => ErrorKind::NotFound,
            ButtonError::RegistryFull { .. } => ErrorKind::ResourceExhausted,
            ButtonError::Driver(_) => ErrorKind::DriverFailure,
            ButtonError::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for ButtonError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ButtonError::PinOutOfRange { pin, pin_count } => {
                write!(f, "GPIO {} is out of range (pin count {})", pin.0, pin_count)
            }
            ButtonError::DuplicatePin(pin) => {
                write!(f, "a button is already registered on GPIO {}", pin.0)
            }
            ButtonError::InvalidThresholds {
                debounce_ms,
                hold_ms,
            } => {
                write!(
                    f,
                    "debounce time ({}ms) must be shorter than hold time ({}ms)",
                    debounce_ms, hold_ms
                )
            }
            ButtonError::NotFound(pin) => {
                write!(f, "no button registered on GPIO {}", pin.0)
            }
            ButtonError::RegistryFull { capacity } => {
                write!(f, "button registry is full ({} buttons)", capacity)
            }
            ButtonError::Driver(err) => {
                write!(f, "GPIO driver failure: {:?}", err)
            }
            ButtonError::InvalidState { expected } => {
                write!(f, "invalid state: engine must be {}", expected)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for ButtonError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_negation_is_an_involution() {
        assert_eq!(!Level::Low, Level::High);
        assert_eq!(!Level::High, Level::Low);
        assert_eq!(!!Level::Low, Level::Low);
    }

    #[test]
    fn errors_map_to_kinds() {
        type E = ButtonError<()>;
        assert_eq!(E::DuplicatePin(PinId(4)).kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            E::PinOutOfRange {
                pin: PinId(60),
                pin_count: 40
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(E::NotFound(PinId(4)).kind(), ErrorKind::NotFound);
        assert_eq!(
            E::RegistryFull { capacity: 4 }.kind(),
            ErrorKind::ResourceExhausted
        );
        assert_eq!(E::Driver(()).kind(), ErrorKind::DriverFailure);
    }
}
