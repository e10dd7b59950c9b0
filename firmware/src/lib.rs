//! Locale-aware serial console for RP2040.
//!
//! This crate wires the platform-agnostic [`uart_iostream`] streams to a
//! blocking RP2040 UART and runs a small interactive session on it.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART0 TX | 0    | Console output |
//! | UART0 RX | 1    | Console input |
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`wait-for-host`**: Do not prompt before the host has sent a byte
//!
//! # Re-exports
//!
//! This crate re-exports the commonly used items from [`uart_iostream`]
//! so consumers only need to depend on this crate.

#![no_std]

pub use uart_iostream::{
    setprecision, ByteSink, ByteSource, Category, Console, ConsoleError, InputError, Locale,
    Locales, Manipulator, OutputError, UnixTime,
};

pub mod uart_console;

pub use uart_console::{ConsoleConfig, UartSink, UartSource};

use embedded_hal::delay::DelayNs;
use fixed::types::I16F16;
use fixed_macro::fixed;
use heapless::String;

/// Service fee applied to every order in the demo session.
const FEE_RATE: I16F16 = fixed!(0.025: I16F16);

/// One round of the interactive demo.
///
/// Asks for a locale, a name, a unit price and a quantity, then prints the
/// total in that locale's conventions. `uptime_secs` is shown as a clock
/// value since the board has no RTC.
pub fn run_session<S, W, D>(
    console: &mut Console<'_, S, W, D>,
    uptime_secs: u64,
) -> Result<(), ConsoleError>
where
    S: ByteSource,
    W: ByteSink,
    D: DelayNs,
{
    let mut locale: String<24> = String::new();
    console.prompt("Locale (ASCII, en_150.UTF-8, sl_SI.UTF-8)? ", &mut locale)?;
    if console.locales().select(Category::ALL, &locale).is_err() {
        defmt::warn!("Unknown locale {}", locale.as_str());
        console.println("Unknown locale, keeping the current one.")?;
    }

    let mut name: String<32> = String::new();
    console.prompt("Name? ", &mut name)?;
    console.locales().to_upper_str(&mut name);

    let mut price = 0.0f64;
    let mut quantity = 0u32;
    console.prompt("Unit price? ", &mut price)?;
    console.prompt("Quantity? ", &mut quantity)?;

    let total = price * f64::from(quantity);
    console
        .output_mut()
        .write("Hello, ")?
        .write(&name)?
        .endl()?
        .write(Manipulator::Fixed)?
        .write(setprecision(2))?
        .write(Manipulator::ShowGrouping)?
        .write("Total: ")?
        .write(total)?
        .write(" (")?
        .write(quantity)?
        .write(" items, fee rate ")?
        .write(FEE_RATE)?
        .write(")")?
        .endl()?
        .write("Clock: ")?
        .write(UnixTime(uptime_secs as i64))?
        .endl()?
        .write(Manipulator::NoShowGrouping)?
        .write(Manipulator::DefaultFloat)?;

    Ok(())
}
