#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::pac;
use embassy_rp::uart::Uart;
use embassy_time::{Delay, Instant};
use static_cell::StaticCell;
use uart_iostream::locale::SL_SI_UTF8;
use uart_iostream_rp2040::{run_session, Console, ConsoleConfig, Locales, UartSink, UartSource};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

/// Locale registry shared by both console halves for the program lifetime.
static LOCALES: StaticCell<Locales> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("uart-iostream console starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());
    let config = ConsoleConfig::default();
    info!("Console config: {:?}", config);

    // --- UART Setup ---
    let uart = Uart::new_blocking(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        config.uart_config(),
    );
    let (tx, rx) = uart.split();
    let mut source = UartSource::new(rx, pac::UART0);
    let mut delay = Delay;
    config.settle(&mut source, &mut delay);

    // --- Locales ---
    let locales = LOCALES.init(Locales::new());
    if let Err(e) = locales.register(&SL_SI_UTF8) {
        error!("Locale registration failed: {:?}", e);
    }

    let mut console = Console::new(source, UartSink::new(tx), delay, locales);
    info!("Console initialized, waiting for input...");

    loop {
        let uptime = Instant::now().as_secs();
        if let Err(e) = run_session(&mut console, uptime) {
            error!("Console error: {:?}", e);
        }
    }
}
