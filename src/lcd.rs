//! The driver applications talk to
//!
//! [`Lcd`] owns the protocol: power-up sequence, busy-flag polling,
//! command and data dispatch, and cursor addressing.

use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, RegisterSelection},
    error::Error,
    sender::SendCommand,
    state::{LcdState, Phase},
};

mod impls;
mod init;

pub use init::{Config, Timing};

/// Rows a cursor position may address
pub const ROWS: u8 = 2;
/// Columns a cursor position may address, `col` must stay below this
pub const COLUMNS: u8 = 0x27;
/// DDRAM address of the first cell in the second row
pub const ROW_OFFSET: u8 = 0x40;

/// Outcome of [`Lcd::wait_ready()`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Readiness {
    /// Busy flag cleared
    Ready,
    /// Busy flag never cleared within the retry budget, caller goes on anyway
    TimedOut,
}

/// One LCD1602 wired to one [`SendCommand`]
///
/// Holding the sender and the delayer by `&mut` keeps this the only thing
/// touching those pins while it lives.
pub struct Lcd<'a, 'b, Sender: SendCommand, Delayer: DelayNs> {
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
    timing: Timing,
}

impl<'a, 'b, Sender: SendCommand, Delayer: DelayNs> Lcd<'a, 'b, Sender, Delayer> {
    /// Bind a sender and a delayer, nothing is sent until [`Lcd::init()`]
    pub fn new(sender: &'a mut Sender, delayer: &'b mut Delayer, config: Config) -> Self {
        Self {
            sender,
            delayer,
            state: config.state,
            timing: config.timing,
        }
    }

    #[allow(missing_docs)]
    pub fn get_phase(&self) -> Phase {
        self.state.get_phase()
    }

    #[allow(missing_docs)]
    pub fn get_timing(&self) -> Timing {
        self.timing
    }

    /// Poll busy flag until it clears, at most `1 + busy_retries` reads
    ///
    /// A display that never answers must not hang the caller, so running out of
    /// retries is reported as [`Readiness::TimedOut`] rather than an error.
    pub fn wait_ready(&mut self) -> Result<Readiness, Error> {
        let mut busy = self.sender.read_busy(self.delayer)?;

        let mut retries = 0;
        while busy && retries < self.timing.busy_retries {
            self.delayer.delay_us(self.timing.busy_poll_interval_us);
            busy = self.sender.read_busy(self.delayer)?;
            retries += 1;
        }

        if busy {
            warn!("LCD still busy after {} retries, going on", retries);
            Ok(Readiness::TimedOut)
        } else {
            Ok(Readiness::Ready)
        }
    }

    /// Wait for idle, then send one byte
    fn wait_and_send(&mut self, byte: u8, rs: RegisterSelection) -> Result<(), Error> {
        // a timed out wait still sends, see wait_ready()
        self.wait_ready()?;
        self.sender.send_byte(byte, rs, self.delayer)
    }

    pub(crate) fn send_command(&mut self, command: CommandSet) -> Result<(), Error> {
        self.wait_and_send(command.into(), RegisterSelection::Command)
    }

    /// Send a raw instruction byte
    pub fn write_command(&mut self, command: u8) -> Result<(), Error> {
        self.wait_and_send(command, RegisterSelection::Command)
    }

    /// Write one byte to DDRAM (or CGRAM) at current address
    ///
    /// Bytes go through as they are, they index the controller's character ROM.
    pub fn write_char(&mut self, byte: u8) -> Result<(), Error> {
        self.wait_and_send(byte, RegisterSelection::Data)
    }

    /// Write bytes one by one, each one waits for busy flag on its own
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        bytes.iter().try_for_each(|&byte| self.write_char(byte))
    }

    /// Write a string as its UTF-8 bytes, see [`Lcd::write_bytes()`]
    pub fn write_string(&mut self, str: &str) -> Result<(), Error> {
        self.write_bytes(str.as_bytes())
    }

    /// Move cursor to `row` and `col`
    ///
    /// Positions outside `row < 2` and `col < 0x27` are silently ignored.
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), Error> {
        if row >= ROWS || col >= COLUMNS {
            debug!("cursor position ({}, {}) dropped", row, col);
            return Ok(());
        }

        // in two line mode, the second line start at 0x40
        self.send_command(CommandSet::SetDDRAM(row * ROW_OFFSET + col))
    }

    /// Clear the display
    ///
    /// Clearing keeps the controller busy for ~1.5 ms, the busy flag doesn't
    /// cover that on every part. Add a [`Lcd::delay_ms()`] after this if the
    /// next write lands too early.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::ClearDisplay)
    }

    /// Block with the delayer this driver holds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    /// Block with the delayer this driver holds
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us);
    }
}
