//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

impl From<bool> for BitState {
    fn from(value: bool) -> Self {
        match value {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}

/// Simple bit ops
///
/// All operations take the register value and return a new one,
/// nothing is modified in place.
pub trait BitOps: Sized {
    #[allow(missing_docs)]
    fn set_bit(self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn clear_bit(self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn check_bit(self, pos: u8) -> BitState;

    /// Set or clear the bit at `pos` according to `state`
    fn with_bit(self, pos: u8, state: impl Into<BitState>) -> Self {
        match state.into() {
            BitState::Set => self.set_bit(pos),
            BitState::Clear => self.clear_bit(pos),
        }
    }
}

// bit offsets above 7 are masked away, they never reach outside the byte
impl BitOps for u8 {
    fn set_bit(self, pos: u8) -> Self {
        self | (1u8 << (pos & 0b111))
    }

    fn clear_bit(self, pos: u8) -> Self {
        self & !(1u8 << (pos & 0b111))
    }

    fn check_bit(self, pos: u8) -> BitState {
        ((self >> (pos & 0b111)) & 1 == 1).into()
    }
}

/// Split a byte into its two nibbles, high nibble first
pub fn split_nibbles(byte: u8) -> [u8; 2] {
    [(byte >> 4) & 0x0F, byte & 0x0F]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_ops_do_not_touch_other_bits() {
        assert_eq!(0b0000_0000u8.set_bit(3), 0b0000_1000);
        assert_eq!(0b1111_1111u8.clear_bit(7), 0b0111_1111);
        assert_eq!(0b0000_1000u8.check_bit(3), BitState::Set);
        assert_eq!(0b0000_1000u8.check_bit(2), BitState::Clear);
        assert_eq!(0b0010_0000u8.with_bit(3, true), 0b0010_1000);
        assert_eq!(0b0010_1000u8.with_bit(3, false), 0b0010_0000);
    }

    #[test]
    fn split_nibbles_is_msb_first() {
        assert_eq!(split_nibbles(0x41), [0x4, 0x1]);
        assert_eq!(split_nibbles(0xFF), [0xF, 0xF]);
        assert_eq!(split_nibbles(0x02), [0x0, 0x2]);
    }
}
