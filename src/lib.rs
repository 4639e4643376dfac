/*!
# LCD 1602 Bit-Bang Driver

Drive a HD44780 compatible LCD1602 over a 4 pin parallel bus, by toggling GPIOs.

Every command waits on the busy flag first, but only for a bounded number of
polls: a dead or unplugged display slows the caller down, it never hangs it.

Basic Usage:

1. Wrap DB4 ~ DB7 in a [`sender::DataBus`] <br/>
    [`sender::OpenDrainBus`] works with any 4 open drain pins with pull-ups.
    Implement [`sender::DataBus`] yourself if your pins need explicit direction switching.
<br/>
<br/>
2. Put RS, RW, EN and the bus together in a [`sender::ParallelSender`]
<br/>
<br/>
3. Use [`lcd::Lcd::new()`] to create a [`lcd::Lcd`], then [`lcd::Lcd::init()`] to run
   the power-up sequence
<br/>
<br/>
4. use any methods provide by [`lcd::Lcd`] to control LCD1602

```ignore
let bus = OpenDrainBus::new(db4, db5, db6, db7);
let mut sender = ParallelSender::new(rs, rw, en, bus);

let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default());
lcd.init()?;
lcd.set_cursor(1, 3)?;
lcd.write_string("hello")?;
```

## Logging

Enable feature `defmt` or `log` to get trace of every transfer,
and a warning whenever the busy flag wait gives up.
*/

#![no_std]
#![warn(missing_docs)]

// must go first, macros are used by all modules below
mod fmt;

pub mod command;
mod error;
pub mod lcd;
pub mod sender;
mod state;
pub mod utils;

#[cfg(test)]
mod sim;

pub use error::Error;
pub use state::Phase;
