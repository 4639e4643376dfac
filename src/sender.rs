//! Built-in sender
//!
//! A sender turns nibbles and bytes into EN / RS / RW strobes and data bus levels.
//! If you want to create a new sender, you will need to implement [`SendCommand`] trait

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    command::RegisterSelection,
    error::Error,
    utils::{split_nibbles, BitOps, BitState},
};

mod data_bus;

pub use data_bus::{BusDirection, DataBus, OpenDrainBus};

/// data must be stable this long before EN rises (datasheet asks for 40 ns)
pub const SETUP_DELAY_US: u32 = 1;
/// EN high time (datasheet asks for 450 ns)
pub const PULSE_WIDTH_US: u32 = 1;
/// wait between two enable cycles, on the safe side of the datasheet's timing diagram
pub const SETTLE_DELAY_MS: u32 = 1;
/// after releasing the bus, before the first read strobe
pub const READ_TURNAROUND_US: u32 = 1;
/// EN low time between the two read strobes of a status read
pub const READ_GAP_US: u32 = 2;

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
pub trait SendCommand {
    /// Drive every control line low, turn the bus to output and clear it
    fn prepare(&mut self) -> Result<(), Error>;

    /// One write cycle: a 4 bit value latched on the EN falling edge
    fn send_nibble(
        &mut self,
        nibble: u8,
        rs: RegisterSelection,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error>;

    /// One status read cycle, return the busy flag
    ///
    /// The bus must be back in output direction, and RW low, when this returns,
    /// no matter what was read or which pin failed.
    fn read_busy(&mut self, delayer: &mut impl DelayNs) -> Result<bool, Error>;

    /// A byte on a 4 pin bus, high nibble first
    fn send_byte(
        &mut self,
        byte: u8,
        rs: RegisterSelection,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error> {
        let [high, low] = split_nibbles(byte);
        self.send_nibble(high, rs, delayer)?;
        self.send_nibble(low, rs, delayer)
    }

    /// Wait specific duration, and send a byte
    fn delay_and_send(
        &mut self,
        byte: u8,
        rs: RegisterSelection,
        delayer: &mut impl DelayNs,
        delay_us: u32,
    ) -> Result<(), Error> {
        delayer.delay_us(delay_us);
        self.send_byte(byte, rs, delayer)
    }
}

/// Bit-banged sender, 3 control pins plus a 4 line [`DataBus`]
pub struct ParallelSender<ControlPin, Bus>
where
    ControlPin: OutputPin,
    Bus: DataBus,
{
    rs_pin: ControlPin,
    rw_pin: ControlPin,
    en_pin: ControlPin,
    data_bus: Bus,
}

impl<ControlPin, Bus> ParallelSender<ControlPin, Bus>
where
    ControlPin: OutputPin,
    Bus: DataBus,
{
    /// Control pins must already be configured as outputs
    pub fn new(rs: ControlPin, rw: ControlPin, en: ControlPin, data_bus: Bus) -> Self {
        Self {
            rs_pin: rs,
            rw_pin: rw,
            en_pin: en,
            data_bus,
        }
    }

    /// Give pins back
    pub fn release(self) -> (ControlPin, ControlPin, ControlPin, Bus) {
        (self.rs_pin, self.rw_pin, self.en_pin, self.data_bus)
    }

    fn set_en(&mut self, high: bool) -> Result<(), Error> {
        self.en_pin.set_state(high.into()).map_err(Error::control)
    }

    fn set_rs(&mut self, rs: RegisterSelection) -> Result<(), Error> {
        match rs {
            RegisterSelection::Command => self.rs_pin.set_low(),
            RegisterSelection::Data => self.rs_pin.set_high(),
        }
        .map_err(Error::control)
    }

    fn read_strobe(&mut self, delayer: &mut impl DelayNs) -> Result<u8, Error> {
        self.set_en(true)?;
        delayer.delay_us(PULSE_WIDTH_US);
        let nibble = self.data_bus.read_nibble().map_err(Error::bus);
        // EN must fall even if the sample failed
        let lowered = self.set_en(false);
        let nibble = nibble?;
        lowered?;
        Ok(nibble)
    }

    fn read_status(&mut self, delayer: &mut impl DelayNs) -> Result<bool, Error> {
        self.data_bus
            .set_direction(BusDirection::Input)
            .map_err(Error::bus)?;
        delayer.delay_us(READ_TURNAROUND_US);

        self.set_en(false)?;
        self.set_rs(RegisterSelection::Command)?;
        self.rw_pin.set_high().map_err(Error::control)?;

        // DB7 of the first strobe is the busy flag
        let high = self.read_strobe(delayer)?;
        delayer.delay_us(READ_GAP_US);

        // the second strobe carries the low bits of the address counter,
        // nothing uses them, but the controller expects the full cycle
        let address_low = self.read_strobe(delayer)?;

        let busy = high.check_bit(3) == BitState::Set;
        trace!(
            "status read: busy {}, address counter {}",
            busy,
            ((high & 0b0111) << 4) | address_low
        );
        Ok(busy)
    }

    fn restore_write_mode(&mut self) -> Result<(), Error> {
        let rw = self.rw_pin.set_low().map_err(Error::control);
        let bus = self
            .data_bus
            .set_direction(BusDirection::Output)
            .map_err(Error::bus);
        rw.and(bus)
    }
}

impl<ControlPin, Bus> SendCommand for ParallelSender<ControlPin, Bus>
where
    ControlPin: OutputPin,
    Bus: DataBus,
{
    fn prepare(&mut self) -> Result<(), Error> {
        self.data_bus
            .set_direction(BusDirection::Output)
            .map_err(Error::bus)?;

        self.set_en(false)?;
        self.set_rs(RegisterSelection::Command)?;
        self.rw_pin.set_low().map_err(Error::control)?;

        self.data_bus.write_nibble(0).map_err(Error::bus)
    }

    fn send_nibble(
        &mut self,
        nibble: u8,
        rs: RegisterSelection,
        delayer: &mut impl DelayNs,
    ) -> Result<(), Error> {
        let nibble = nibble & 0x0F;
        trace!("nibble {} (data: {})", nibble, rs == RegisterSelection::Data);

        self.set_rs(rs)?;
        self.data_bus.write_nibble(nibble).map_err(Error::bus)?;

        // start with enable low, and let data settle before the strobe
        self.set_en(false)?;
        delayer.delay_us(SETUP_DELAY_US);

        self.set_en(true)?;
        delayer.delay_us(PULSE_WIDTH_US);
        self.set_en(false)?;

        delayer.delay_ms(SETTLE_DELAY_MS);
        Ok(())
    }

    fn read_busy(&mut self, delayer: &mut impl DelayNs) -> Result<bool, Error> {
        let status = self.read_status(delayer);
        let restored = self.restore_write_mode();
        let busy = status?;
        restored?;
        Ok(busy)
    }
}
