#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ButtonEngine`**: Context object owning every registered button, the pending-release channel and the diagnostic counters
//! - **`ButtonConfig`**: Pin, pressed level, debounce and hold thresholds, and the observer of one button
//! - **`ButtonHandle`**: Engine-owned per-pin state: armed trigger level and the last press/release timestamps
//! - **`ButtonObserver`**: Trait (or closure) receiving `Press`/`Hold` events in task context
//! - **`GpioDriver`**: Trait to implement for your GPIO and interrupt hardware
//! - **`TickSource`**: Trait to implement for your monotonic tick counter
//! - **`Notifier`**: Trait to implement for your task runtime's ISR-to-task wake-up
//! - **`Thresholds`**: The debounce timing policy, classifying a press as `Bounce`, `Press` or `Hold`
//!
//! Interrupts are level-triggered. Each interrupt flips the pin's trigger to
//! the opposite level, so a missed edge can never leave the engine out of
//! step with the line. Depresses are handled entirely in the interrupt;
//! releases are queued and classified by the dispatcher, which then re-arms
//! the pin.

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod gpio;
pub mod handle;
pub mod isr;
pub mod registry;
pub mod signal;
pub mod time;
pub mod timing;
pub mod types;

pub use channel::{DEFAULT_QUEUE_LEN, PendingRelease};
pub use config::{ButtonConfig, ButtonObserver, DEFAULT_DEBOUNCE_MS, DEFAULT_HOLD_MS};
pub use dispatcher::{Dispatch, DispatchOutcome};
#[cfg(feature = "std")]
pub use dispatcher::{DEFAULT_WORKER_PRIORITY, DEFAULT_WORKER_STACK_SIZE, WorkerConfig};
pub use engine::{ButtonEngine, EngineStats};
pub use gpio::GpioDriver;
pub use handle::ButtonHandle;
pub use isr::IsrAction;
#[cfg(feature = "std")]
pub use signal::StdNotifier;
pub use signal::{Notifier, Polled};
pub use time::{Tick, TickSource};
pub use timing::{Classification, Thresholds, TimingError};
pub use types::{ButtonError, ButtonEvent, Edge, ErrorKind, Level, PinId, Pull};
