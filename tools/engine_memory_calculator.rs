#!/usr/bin/env rust-script
//! Memory calculator for level-button
//!
//! Prints the static footprint of the engine for different button and
//! channel capacities, so the const parameters can be sized for a target.
//!
//! Usage:
//!   cargo run --bin engine_memory_calculator

use level_button::{
    ButtonConfig, ButtonEngine, ButtonHandle, EngineStats, GpioDriver, Level, PendingRelease,
    PinId, Polled, Pull, Tick, TickSource,
};
use std::mem::size_of;

/// Zero-sized driver; only the engine's own state is measured.
struct NullGpio;

impl GpioDriver for NullGpio {
    type Error = ();

    const PIN_COUNT: u8 = 40;

    fn set_direction_input(&self, _pin: PinId) -> Result<(), ()> {
        Ok(())
    }

    fn set_pull(&self, _pin: PinId, _pull: Pull) -> Result<(), ()> {
        Ok(())
    }

    fn install_isr_service(&self) -> Result<(), ()> {
        Ok(())
    }

    fn uninstall_isr_service(&self) {}

    fn attach_isr(&self, _pin: PinId) -> Result<(), ()> {
        Ok(())
    }

    fn detach_isr(&self, _pin: PinId) -> Result<(), ()> {
        Ok(())
    }

    fn set_trigger_level(&self, _pin: PinId, _level: Level) -> Result<(), ()> {
        Ok(())
    }

    fn enable_interrupt(&self, _pin: PinId) -> Result<(), ()> {
        Ok(())
    }

    fn disable_interrupt(&self, _pin: PinId) -> Result<(), ()> {
        Ok(())
    }

    fn read_level(&self, _pin: PinId) -> Level {
        Level::High
    }
}

struct NullClock;

impl TickSource for NullClock {
    const TICK_RATE_HZ: u32 = 1000;

    fn now(&self) -> Tick {
        Tick(0)
    }
}

type Engine<const B: usize, const Q: usize> = ButtonEngine<'static, NullGpio, NullClock, Polled, B, Q>;

fn print_header() {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║        Level Button Engine Memory Footprint Calculator         ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!();
}

fn print_component_sizes() {
    println!("Component Sizes:");
    println!("├─ ButtonConfig:                 {} bytes", size_of::<ButtonConfig<'static>>());
    println!("├─ ButtonHandle:                 {} bytes", size_of::<ButtonHandle<'static>>());
    println!("├─ PendingRelease:               {} bytes", size_of::<PendingRelease>());
    println!("└─ EngineStats:                  {} bytes", size_of::<EngineStats>());
    println!();
}

fn print_engine_row<const B: usize, const Q: usize>() {
    let total = size_of::<Engine<B, Q>>();
    let handles = size_of::<ButtonHandle<'static>>() * B;
    let pending = size_of::<PendingRelease>() * Q;
    println!(
        "│ {:^8} │ {:^8} │ {:>10} B │ {:>11} B │ {:>11} B │",
        B, Q, total, handles, pending
    );
}

fn print_engine_table() {
    println!("ButtonEngine<_, _, Polled, MAX_BUTTONS, QUEUE_LEN> Memory Usage:");
    println!("┌──────────┬──────────┬──────────────┬───────────────┬───────────────┐");
    println!("│ Buttons  │ Queue    │ Engine       │ Handles       │ Channel       │");
    println!("│ (MAX)    │ (LEN)    │ Total Size   │ (Handle * B)  │ (Release * Q) │");
    println!("├──────────┼──────────┼──────────────┼───────────────┼───────────────┤");
    print_engine_row::<1, 2>();
    print_engine_row::<4, 2>();
    print_engine_row::<4, 4>();
    print_engine_row::<8, 4>();
    print_engine_row::<16, 8>();
    print_engine_row::<32, 8>();
    println!("└──────────┴──────────┴──────────────┴───────────────┴───────────────┘");
    println!();
}

fn main() {
    print_header();
    print_component_sizes();
    print_engine_table();

    println!("Notes:");
    println!("• All storage is inline; the engine never allocates");
    println!("• The channel needs one slot per button that can be released before");
    println!("  the dispatcher runs; overflow drops the release and re-arms the pin");
}
