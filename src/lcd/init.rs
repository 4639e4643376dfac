use embedded_hal::delay::DelayNs;

use crate::{
    command::{
        CommandSet, Font, LineMode, MoveDirection, RegisterSelection, ShiftType, State,
        BOOTSTRAP_FUNCTION_SET, BOOTSTRAP_NIBBLE,
    },
    error::Error,
    lcd::Lcd,
    sender::SendCommand,
    state::{LcdState, Phase},
};

/// fixed gap between the bootstrap transfers, busy flag can't be read yet
pub const BOOTSTRAP_GAP_US: u32 = 40;

/// Delays and retry budget of a [`Lcd`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub(crate) power_up_delay_ms: u32,
    pub(crate) busy_retries: u32,
    pub(crate) busy_poll_interval_us: u32,
    pub(crate) clear_delay_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_up_delay_ms: 50,
            busy_retries: 100,
            busy_poll_interval_us: 5,
            // clear display takes 1.52 ms
            clear_delay_ms: 2,
        }
    }
}

#[allow(missing_docs)]
impl Timing {
    pub fn get_power_up_delay_ms(&self) -> u32 {
        self.power_up_delay_ms
    }

    /// Wait after power-up, before the first transfer
    pub fn set_power_up_delay_ms(mut self, ms: u32) -> Self {
        self.power_up_delay_ms = ms;
        self
    }

    pub fn get_busy_retries(&self) -> u32 {
        self.busy_retries
    }

    /// How many more times busy flag is read after the first busy answer
    pub fn set_busy_retries(mut self, retries: u32) -> Self {
        self.busy_retries = retries;
        self
    }

    pub fn get_busy_poll_interval_us(&self) -> u32 {
        self.busy_poll_interval_us
    }

    pub fn set_busy_poll_interval_us(mut self, us: u32) -> Self {
        self.busy_poll_interval_us = us;
        self
    }

    pub fn get_clear_delay_ms(&self) -> u32 {
        self.clear_delay_ms
    }

    /// Extra wait after the clear display of the init sequence
    pub fn set_clear_delay_ms(mut self, ms: u32) -> Self {
        self.clear_delay_ms = ms;
        self
    }
}

/// [`Config`] is the init config of a [`Lcd`]
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    pub(crate) state: LcdState,
    pub(crate) timing: Timing,
}

#[allow(missing_docs)]
impl Config {
    pub fn get_timing(&self) -> Timing {
        self.timing
    }

    pub fn set_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn get_line_mode(&self) -> LineMode {
        self.state.get_line_mode()
    }

    pub fn set_line_mode(mut self, line: LineMode) -> Self {
        self.state.set_line_mode(line);
        self
    }

    pub fn get_font(&self) -> Font {
        self.state.get_font()
    }

    /// 5x11 font only works in one line mode, the controller ignores it otherwise
    pub fn set_font(mut self, font: Font) -> Self {
        self.state.set_font(font);
        self
    }

    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.state.set_display_state(display);
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.state.set_cursor_state(cursor);
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.state.get_cursor_blink()
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.state.set_cursor_blink(blink);
        self
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    pub fn set_direction(mut self, dir: MoveDirection) -> Self {
        self.state.set_direction(dir);
        self
    }

    pub fn get_shift_type(&self) -> ShiftType {
        self.state.get_shift_type()
    }

    pub fn set_shift_type(mut self, shift: ShiftType) -> Self {
        self.state.set_shift_type(shift);
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand,
    Delayer: DelayNs,
{
    /// Run the power-up sequence
    ///
    /// Does nothing on a driver that is already [`Phase::Ready`]. If a pin fails
    /// halfway, the driver stays in [`Phase::Initializing`] and `init()` may be
    /// called again.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.state.get_phase() == Phase::Ready {
            debug!("LCD already initialized");
            return Ok(());
        }
        self.state.set_phase(Phase::Initializing);

        self.sender.prepare()?;
        self.delayer.delay_ms(self.timing.power_up_delay_ms);

        // controller wakes up in 8 bit mode, and its busy flag means nothing yet,
        // so the first transfers are spaced by fixed delays
        debug!("LCD bootstrap to 4 bit bus");
        self.sender
            .send_nibble(BOOTSTRAP_NIBBLE, RegisterSelection::Command, self.delayer)?;
        for _ in 0..2 {
            self.sender.delay_and_send(
                BOOTSTRAP_FUNCTION_SET,
                RegisterSelection::Command,
                self.delayer,
                BOOTSTRAP_GAP_US,
            )?;
        }
        self.delayer.delay_us(BOOTSTRAP_GAP_US);

        debug!("LCD configure");
        self.send_command(CommandSet::FunctionSet(
            self.state.get_line_mode(),
            self.state.get_font(),
        ))?;

        self.send_command(CommandSet::DisplayOnOff {
            display: self.state.get_display_state(),
            cursor: self.state.get_cursor_state(),
            cursor_blink: self.state.get_cursor_blink(),
        })?;

        // busy flag doesn't cover a clear on every part
        self.send_command(CommandSet::ClearDisplay)?;
        self.delayer.delay_ms(self.timing.clear_delay_ms);

        self.send_command(CommandSet::EntryModeSet(
            self.state.get_direction(),
            self.state.get_shift_type(),
        ))?;

        self.state.set_phase(Phase::Ready);
        debug!("LCD ready");
        Ok(())
    }
}
