//! Drive LCD1602 with a STM32F411RET6 in 4 Pin Mode, by bit-banging GPIOA
//!
//! this demo calls every public function once, to check them on real hardware.

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V (It is best to use an external source for the 5V pin, such as the 5V output from a DAPLink device or USB.)
//!      V0 <-> potentiometer <-> 5V & GND (to adjust the display contrast)
//!      RS <-> PA0
//!      RW <-> PA1
//!      EN <-> PA2 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D4 <-> PA3
//!      D5 <-> PA4
//!      D6 <-> PA5
//!      D7 <-> PA6
//!       A <-> 5V
//!       K <-> GND

#![no_std]
#![no_main]

use core::fmt::Write;

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use lcd1602_bitbang::{
    command::{MoveDirection, ShiftType, State},
    lcd::{Config, Lcd, Readiness, Timing},
    sender::{OpenDrainBus, ParallelSender},
};

// a heart shape
const HEART: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    // init needed digital pins

    let gpioa = dp.GPIOA.split();

    // Push-pull mode for a fast interaction
    let rs_pin = gpioa.pa0.into_push_pull_output().erase();
    let rw_pin = gpioa.pa1.into_push_pull_output().erase();
    let en_pin = gpioa.pa2.into_push_pull_output().erase();

    // Open-drain with pull-up, so the LCD can drive the lines when we read busy flag
    let db4_pin = gpioa
        .pa3
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db5_pin = gpioa
        .pa4
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db6_pin = gpioa
        .pa5
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db7_pin = gpioa
        .pa6
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();

    // put pins together
    let data_bus = OpenDrainBus::new(db4_pin, db5_pin, db6_pin, db7_pin);
    let mut sender = ParallelSender::new(rs_pin, rw_pin, en_pin, data_bus);

    let config = Config::default()
        .set_cursor_state(State::On)
        .set_timing(Timing::default().set_busy_poll_interval_us(10));

    let mut lcd = Lcd::new(&mut sender, &mut delayer, config);

    // init LCD1602
    if let Err(e) = lcd.init() {
        rprintln!("LCD init failed: {}", e);
    }

    if let Err(e) = run(&mut lcd) {
        rprintln!("LCD pin error: {}", e);
    }

    #[allow(clippy::empty_loop)]
    loop {}
}

fn run<S, D>(lcd: &mut Lcd<'_, '_, S, D>) -> Result<(), lcd1602_bitbang::Error>
where
    S: lcd1602_bitbang::sender::SendCommand,
    D: embedded_hal::delay::DelayNs,
{
    if lcd.wait_ready()? == Readiness::TimedOut {
        rprintln!("LCD doesn't answer, check RW and DB7 wiring");
    }

    // draw a little heart in CGRAM
    lcd.write_graph_to_cgram(1, &HEART)?;

    lcd.set_cursor_blink_state(State::On)?;

    lcd.set_cursor(0, 1)?;
    lcd.write_string("hello,")?;

    lcd.set_cursor(1, 0)?;
    lcd.write_string("world!")?;
    lcd.write_char(1)?;

    lcd.delay_ms(1_000);

    // this one is off screen, and must be ignored
    lcd.set_cursor(2, 0)?;

    lcd.set_cursor_blink_state(State::Off)?;
    lcd.set_cursor_state(State::Off)?;

    // count on second line, with write! support
    for count in 0..10u8 {
        lcd.set_cursor(1, 10)?;
        write!(lcd, "n={}", count).ok();
        lcd.delay_ms(250);
    }

    // shift display window back and forth
    for _ in 0..4 {
        lcd.shift_cursor_or_display(ShiftType::CursorAndDisplay, MoveDirection::RightToLeft)?;
        lcd.delay_ms(250);
    }
    lcd.return_home()?;

    // and blinking display 3 times
    for _ in 0..3 {
        lcd.set_display_state(State::Off)?;
        lcd.delay_ms(500);
        lcd.set_display_state(State::On)?;
        lcd.delay_ms(500);
    }

    // clear has its own settle time, busy flag doesn't cover it everywhere
    lcd.clear()?;
    lcd.delay_ms(2);
    lcd.write_string("bye")?;

    Ok(())
}
