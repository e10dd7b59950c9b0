use defmt::{error, info};
use embassy_rp::pac;
use embassy_rp::uart::{Blocking, Config as UartConfig, UartRx, UartTx};
use embassy_time::{block_for, Duration};
use embedded_hal::delay::DelayNs;
use uart_iostream::{ByteSink, ByteSource, InputError, OutputError, POLL_INTERVAL_MS};

/// Console bring-up parameters.
///
/// Defaults: 115 200 baud, no wait for the host, 100 ms settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct ConsoleConfig {
    /// Line speed in baud.
    pub baudrate: u32,
    /// Block until the host sends its first byte.
    pub wait_for_host: bool,
    /// Delay after bring-up before the first prompt.
    pub settle_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            wait_for_host: cfg!(feature = "wait-for-host"),
            settle_ms: 100,
        }
    }
}

impl ConsoleConfig {
    /// UART peripheral configuration (8N1 at [`baudrate`](Self::baudrate)).
    pub fn uart_config(&self) -> UartConfig {
        let mut config = UartConfig::default();
        config.baudrate = self.baudrate;
        config
    }

    /// Optionally wait for the host, then let the line settle.
    ///
    /// The byte that ends the wait is left in the FIFO for the first read.
    pub fn settle<D: DelayNs>(&self, source: &mut UartSource<'_>, delay: &mut D) {
        if self.wait_for_host {
            info!("Waiting for host...");
            while !source.rx_ready() {
                delay.delay_ms(POLL_INTERVAL_MS);
            }
        }
        block_for(Duration::from_millis(self.settle_ms));
    }
}

/// Receive half of a blocking RP2040 UART.
///
/// Availability is taken from the peripheral's RX FIFO flag, so polling
/// never blocks.
///
/// # Pins
///
/// Uses UART0 by default:
/// - GPIO 0: TX
/// - GPIO 1: RX
pub struct UartSource<'d> {
    rx: UartRx<'d, Blocking>,
    regs: pac::uart::Uart,
}

impl<'d> UartSource<'d> {
    /// Wrap `rx`; `regs` must be the register block of the same UART.
    pub fn new(rx: UartRx<'d, Blocking>, regs: pac::uart::Uart) -> Self {
        Self { rx, regs }
    }

    #[inline]
    fn rx_ready(&self) -> bool {
        !self.regs.uartfr().read().rxfe()
    }
}

impl ByteSource for UartSource<'_> {
    fn available(&mut self) -> Result<usize, InputError> {
        Ok(usize::from(self.rx_ready()))
    }

    fn read_byte(&mut self) -> Result<u8, InputError> {
        let mut byte = [0u8; 1];
        self.rx.blocking_read(&mut byte).map_err(|e| {
            error!("UART read error: {:?}", e);
            InputError::Io
        })?;
        Ok(byte[0])
    }
}

/// Transmit half of a blocking RP2040 UART.
pub struct UartSink<'d> {
    tx: UartTx<'d, Blocking>,
}

impl<'d> UartSink<'d> {
    pub fn new(tx: UartTx<'d, Blocking>) -> Self {
        Self { tx }
    }
}

impl ByteSink for UartSink<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.tx.blocking_write(bytes).map_err(|e| {
            error!("UART write error: {:?}", e);
            OutputError::Io
        })
    }
}
