use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, Font, LineMode, MoveDirection, ShiftType, State},
    error::Error,
    lcd::Lcd,
    sender::SendCommand,
};

#[allow(missing_docs)]
impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    /// Move cursor back to (0, 0), and undo any display shift
    pub fn return_home(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::ReturnHome)
    }

    pub fn get_line_mode(&self) -> LineMode {
        self.state.get_line_mode()
    }

    pub fn get_font(&self) -> Font {
        self.state.get_font()
    }

    pub fn set_display_state(&mut self, display: State) -> Result<(), Error> {
        self.state.set_display_state(display);
        self.send_display_control()
    }

    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    pub fn set_cursor_state(&mut self, cursor: State) -> Result<(), Error> {
        self.state.set_cursor_state(cursor);
        self.send_display_control()
    }

    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    pub fn set_cursor_blink_state(&mut self, blink: State) -> Result<(), Error> {
        self.state.set_cursor_blink(blink);
        self.send_display_control()
    }

    pub fn get_cursor_blink_state(&self) -> State {
        self.state.get_cursor_blink()
    }

    fn send_display_control(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::DisplayOnOff {
            display: self.get_display_state(),
            cursor: self.get_cursor_state(),
            cursor_blink: self.get_cursor_blink_state(),
        })
    }

    pub fn set_direction(&mut self, dir: MoveDirection) -> Result<(), Error> {
        self.state.set_direction(dir);
        self.send_entry_mode()
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    pub fn set_shift_type(&mut self, shift: ShiftType) -> Result<(), Error> {
        self.state.set_shift_type(shift);
        self.send_entry_mode()
    }

    pub fn get_shift_type(&self) -> ShiftType {
        self.state.get_shift_type()
    }

    fn send_entry_mode(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::EntryModeSet(
            self.get_direction(),
            self.get_shift_type(),
        ))
    }

    /// Move the cursor, or the whole display window, one cell
    pub fn shift_cursor_or_display(
        &mut self,
        shift_type: ShiftType,
        dir: MoveDirection,
    ) -> Result<(), Error> {
        self.send_command(CommandSet::CursorOrDisplayShift(shift_type, dir))
    }

    /// Store a 5x8 custom graph in CGRAM slot `index` (0 ~ 7)
    ///
    /// Print it with `write_char(index)`. An index above 7, or a row using more
    /// than the lower 5 bits, is ignored like an out of range cursor.
    /// Cursor is left at (0, 0) afterwards.
    pub fn write_graph_to_cgram(&mut self, index: u8, graph_data: &[u8; 8]) -> Result<(), Error> {
        if index >= 8 || graph_data.iter().any(|&line| line >= 0b10_0000) {
            debug!("custom graph {} dropped", index);
            return Ok(());
        }

        // if DDRAM is write from right to left, then when we change to CGRAM, graph will write from lower to upper
        // we will change it to left to right, to make writing correct
        let direction_flipped = self.get_direction() == MoveDirection::RightToLeft;
        if direction_flipped {
            self.set_direction(MoveDirection::LeftToRight)?;
        }

        self.send_command(CommandSet::SetCGRAM(index << 3))?;
        self.write_bytes(graph_data)?;

        // if writing direction is changed, then change it back
        if direction_flipped {
            self.set_direction(MoveDirection::RightToLeft)?;
        }

        // data writes go to CGRAM until a DDRAM address is set again
        self.set_cursor(0, 0)
    }
}

impl<'a, 'b, Sender, Delayer> fmt::Write for Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s).map_err(|_| fmt::Error)
    }
}
