use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::utils::{BitOps, BitState};

/// Direction of DB4 ~ DB7, seen from the MCU side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusDirection {
    /// MCU drives the bus, LCD latches on EN falling edge
    #[default]
    Output,
    /// MCU releases the bus, LCD drives it while EN is high
    Input,
}

/// The 4 data lines (DB4 ~ DB7) of a LCD1602 wired in 4 pin mode
///
/// Implement this if your platform can turn pins around in a way
/// [`OpenDrainBus`] doesn't cover (e.g. rewriting a port direction register).
pub trait DataBus: ErrorType {
    /// Switch the bus between driving and listening
    fn set_direction(&mut self, direction: BusDirection) -> Result<(), Self::Error>;

    /// Put a nibble on the bus, bit 0 on DB4, bit 3 on DB7
    fn write_nibble(&mut self, nibble: u8) -> Result<(), Self::Error>;

    /// Sample the bus, DB4 into bit 0, DB7 into bit 3
    fn read_nibble(&mut self) -> Result<u8, Self::Error>;
}

/// [`DataBus`] over 4 open drain pins with pull-ups
///
/// Open drain pins never need to change mode: driving the lines high
/// releases them, then the LCD can pull them low while we read.
pub struct OpenDrainBus<DBPin>
where
    DBPin: OutputPin + InputPin,
{
    db_pins: [DBPin; 4],
    direction: BusDirection,
}

impl<DBPin> OpenDrainBus<DBPin>
where
    DBPin: OutputPin + InputPin,
{
    #[allow(missing_docs)]
    pub fn new(db4: DBPin, db5: DBPin, db6: DBPin, db7: DBPin) -> Self {
        Self {
            db_pins: [db4, db5, db6, db7],
            direction: BusDirection::Output,
        }
    }

    /// Current direction of the bus
    pub fn direction(&self) -> BusDirection {
        self.direction
    }

    /// Give pins back
    pub fn release(self) -> [DBPin; 4] {
        self.db_pins
    }

    fn push_bits(&mut self, raw_bits: u8) -> Result<(), DBPin::Error> {
        self.db_pins
            .iter_mut()
            .enumerate()
            .try_for_each(|(index, pin)| match raw_bits.check_bit(index as u8) {
                BitState::Set => pin.set_high(),
                BitState::Clear => pin.set_low(),
            })
    }

    fn fetch_bits(&mut self) -> Result<u8, DBPin::Error> {
        self.db_pins
            .iter_mut()
            .enumerate()
            .try_fold(0u8, |acc, (index, pin)| {
                // read the real line level, the output latch stays high while listening
                Ok(acc.with_bit(index as u8, pin.is_high()?))
            })
    }
}

impl<DBPin> ErrorType for OpenDrainBus<DBPin>
where
    DBPin: OutputPin + InputPin,
{
    type Error = DBPin::Error;
}

impl<DBPin> DataBus for OpenDrainBus<DBPin>
where
    DBPin: OutputPin + InputPin,
{
    fn set_direction(&mut self, direction: BusDirection) -> Result<(), Self::Error> {
        if direction == BusDirection::Input {
            // in open drain mode, set pin high to release control
            self.push_bits(0b1111)?;
        }
        self.direction = direction;
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), Self::Error> {
        self.push_bits(nibble & 0x0F)
    }

    fn read_nibble(&mut self) -> Result<u8, Self::Error> {
        self.fetch_bits()
    }
}
