//! HD44780 instruction set, and the enums used to build each instruction

use crate::utils::BitOps;

/// Instructions the driver can issue, each one encodes to a single byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    /// Clear DDRAM and return cursor to address 0
    ClearDisplay,
    /// Return cursor (and display window) to address 0
    ReturnHome,
    #[allow(missing_docs)]
    EntryModeSet(MoveDirection, ShiftType),
    #[allow(missing_docs)]
    DisplayOnOff {
        display: State,
        cursor: State,
        cursor_blink: State,
    },
    #[allow(missing_docs)]
    CursorOrDisplayShift(ShiftType, MoveDirection),
    /// Always 4 bit data width, this driver has no 8 bit bus support
    FunctionSet(LineMode, Font),
    /// CGRAM address, lower 6 bits
    SetCGRAM(u8),
    /// DDRAM address, lower 7 bits
    SetDDRAM(u8),
}

/// Direction the address counter moves after a data write
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    #[allow(missing_docs)]
    RightToLeft,
    #[allow(missing_docs)]
    #[default]
    LeftToRight,
}

/// Whether only the cursor moves, or the whole display follows it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    #[allow(missing_docs)]
    #[default]
    CursorOnly,
    #[allow(missing_docs)]
    CursorAndDisplay,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Off,
    #[default]
    On,
}

impl From<State> for bool {
    fn from(state: State) -> Self {
        state == State::On
    }
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    #[default]
    Font5x8,
    Font5x11,
}

/// Which register a transfer targets, this is the level of RS line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    /// RS low, instruction register
    Command,
    /// RS high, data register
    Data,
}

/// First (and only 4 bit) transfer of the power-up sequence,
/// controller still thinks it's on an 8 bit bus at this point
pub(crate) const BOOTSTRAP_NIBBLE: u8 = 0x03;

/// Sent twice after [`BOOTSTRAP_NIBBLE`], switch controller to 4 bit data width
pub(crate) const BOOTSTRAP_FUNCTION_SET: u8 = 0x02;

impl From<CommandSet> for u8 {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => 0b0000_0001,

            CommandSet::ReturnHome => 0b0000_0010,

            CommandSet::EntryModeSet(dir, st) => 0b0000_0100u8
                .with_bit(1, dir == MoveDirection::LeftToRight)
                .with_bit(0, st == ShiftType::CursorAndDisplay),

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => 0b0000_1000u8
                .with_bit(2, bool::from(display))
                .with_bit(1, bool::from(cursor))
                .with_bit(0, bool::from(cursor_blink)),

            CommandSet::CursorOrDisplayShift(st, dir) => 0b0001_0000u8
                .with_bit(3, st == ShiftType::CursorAndDisplay)
                .with_bit(2, dir == MoveDirection::LeftToRight),

            // bit 4 (DL) stays cleared, 4 bit data width
            CommandSet::FunctionSet(line, font) => 0b0010_0000u8
                .with_bit(3, line == LineMode::TwoLine)
                .with_bit(2, font == Font::Font5x11),

            CommandSet::SetCGRAM(addr) => 0b0100_0000 | (addr & 0b0011_1111),

            CommandSet::SetDDRAM(addr) => 0b1000_0000 | (addr & 0b0111_1111),
        }
    }
}
