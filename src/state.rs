use crate::command::{Font, LineMode, MoveDirection, ShiftType, State};

/// Where a [`Lcd`](crate::lcd::Lcd) is in its life
///
/// `Ready` is final, the driver never leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Nothing sent yet
    #[default]
    Uninit,
    /// Power-up sequence in progress, or it stopped on a pin error
    Initializing,
    /// Power-up sequence done
    Ready,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct LcdState {
    phase: Phase,
    line: LineMode,
    font: Font,
    display_on: State,
    cursor_on: State,
    cursor_blink: State,
    direction: MoveDirection,
    shift_type: ShiftType,
}

impl Default for LcdState {
    fn default() -> Self {
        Self {
            phase: Phase::Uninit,
            line: LineMode::TwoLine,
            font: Font::Font5x8,
            display_on: State::On,
            cursor_on: State::Off,
            cursor_blink: State::Off,
            direction: MoveDirection::LeftToRight,
            shift_type: ShiftType::CursorOnly,
        }
    }
}

impl LcdState {
    pub(crate) fn get_phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn get_line_mode(&self) -> LineMode {
        self.line
    }

    pub(crate) fn set_line_mode(&mut self, line: LineMode) {
        self.line = line;
    }

    pub(crate) fn get_font(&self) -> Font {
        self.font
    }

    pub(crate) fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub(crate) fn get_display_state(&self) -> State {
        self.display_on
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        self.display_on = display;
    }

    pub(crate) fn get_cursor_state(&self) -> State {
        self.cursor_on
    }

    pub(crate) fn set_cursor_state(&mut self, cursor: State) {
        self.cursor_on = cursor;
    }

    pub(crate) fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub(crate) fn set_cursor_blink(&mut self, blink: State) {
        self.cursor_blink = blink;
    }

    pub(crate) fn get_direction(&self) -> MoveDirection {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, dir: MoveDirection) {
        self.direction = dir;
    }

    pub(crate) fn get_shift_type(&self) -> ShiftType {
        self.shift_type
    }

    pub(crate) fn set_shift_type(&mut self, shift: ShiftType) {
        self.shift_type = shift;
    }
}
