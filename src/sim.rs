//! Simulated LCD wiring for host tests
//!
//! Every pin change, bus access and delay lands in one ordered log,
//! and the busy flag can be scripted.

extern crate std;

use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorKind, ErrorType, OutputPin},
};

use crate::{
    command::RegisterSelection,
    sender::{BusDirection, DataBus, ParallelSender},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    En,
    Rs,
    Rw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    BusWrite(u8),
    BusRead(u8),
    Direction(BusDirection),
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
}

/// What the controller saw, one entry per bus cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Prepare,
    Nibble(RegisterSelection, u8),
    Poll { busy: bool },
    DelayUs(u32),
    DelayMs(u32),
}

struct SimState {
    events: Vec<Event>,
    en: bool,
    rs: bool,
    rw: bool,
    direction: BusDirection,
    // u32::MAX means never ready
    busy_reads_left: u32,
    strobe: u32,
    fail_reads: bool,
}

impl SimState {
    fn push(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[derive(Clone)]
pub struct Sim {
    state: Rc<RefCell<SimState>>,
}

impl Sim {
    pub fn ready() -> Self {
        Self::busy_for(0)
    }

    pub fn never_ready() -> Self {
        Self::busy_for(u32::MAX)
    }

    /// Report busy for the first `reads` status reads
    pub fn busy_for(reads: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                events: Vec::new(),
                en: false,
                rs: false,
                rw: false,
                direction: BusDirection::Output,
                busy_reads_left: reads,
                strobe: 0,
                fail_reads: false,
            })),
        }
    }

    pub fn fail_bus_reads(&self) {
        self.state.borrow_mut().fail_reads = true;
    }

    pub fn parts(&self) -> (ParallelSender<SimPin, SimBus>, SimDelay) {
        let pin = |line| SimPin {
            line,
            state: self.state.clone(),
        };
        (
            ParallelSender::new(
                pin(Line::Rs),
                pin(Line::Rw),
                pin(Line::En),
                SimBus {
                    state: self.state.clone(),
                },
            ),
            SimDelay {
                state: self.state.clone(),
            },
        )
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn direction(&self) -> BusDirection {
        self.state.borrow().direction
    }

    pub fn level(&self, line: Line) -> bool {
        let state = self.state.borrow();
        match line {
            Line::En => state.en,
            Line::Rs => state.rs,
            Line::Rw => state.rw,
        }
    }

    /// Fold the raw log into bus cycles, panics on a malformed cycle
    pub fn steps(&self) -> Vec<Step> {
        let events = self.events();
        let mut steps = Vec::new();
        let mut i = 0;

        while i < events.len() {
            match events[i] {
                Event::DelayUs(us) => {
                    steps.push(Step::DelayUs(us));
                    i += 1;
                }
                Event::DelayMs(ms) => {
                    steps.push(Step::DelayMs(ms));
                    i += 1;
                }
                Event::Direction(BusDirection::Output) => {
                    assert_eq!(
                        events[i + 1..i + 5],
                        [
                            Event::Set(Line::En, false),
                            Event::Set(Line::Rs, false),
                            Event::Set(Line::Rw, false),
                            Event::BusWrite(0),
                        ],
                        "malformed prepare at event {}",
                        i
                    );
                    steps.push(Step::Prepare);
                    i += 5;
                }
                Event::Direction(BusDirection::Input) => {
                    let end = events[i..]
                        .iter()
                        .position(|e| *e == Event::Direction(BusDirection::Output))
                        .map(|offset| i + offset)
                        .expect("status read never gave the bus back");
                    let first_read = events[i..end]
                        .iter()
                        .find_map(|e| match e {
                            Event::BusRead(nibble) => Some(*nibble),
                            _ => None,
                        })
                        .expect("status read without a strobe");
                    assert_eq!(
                        events[end - 1],
                        Event::Set(Line::Rw, false),
                        "RW still high when bus turned to output"
                    );
                    steps.push(Step::Poll {
                        busy: first_read & 0b1000 != 0,
                    });
                    i = end + 1;
                }
                Event::Set(Line::Rs, rs) => {
                    let nibble = match events[i + 1] {
                        Event::BusWrite(nibble) => nibble,
                        other => panic!("expected bus write after RS, got {:?}", other),
                    };
                    assert_eq!(
                        events[i + 2..i + 8],
                        [
                            Event::Set(Line::En, false),
                            Event::DelayUs(crate::sender::SETUP_DELAY_US),
                            Event::Set(Line::En, true),
                            Event::DelayUs(crate::sender::PULSE_WIDTH_US),
                            Event::Set(Line::En, false),
                            Event::DelayMs(crate::sender::SETTLE_DELAY_MS),
                        ],
                        "malformed nibble cycle at event {}",
                        i
                    );
                    let rs = match rs {
                        true => RegisterSelection::Data,
                        false => RegisterSelection::Command,
                    };
                    steps.push(Step::Nibble(rs, nibble));
                    i += 8;
                }
                other => panic!("unexpected {:?} at event {}", other, i),
            }
        }

        steps
    }

    /// Only the bytes written, nibbles paired back up
    pub fn bytes(&self) -> Vec<(RegisterSelection, u8)> {
        let nibbles: Vec<_> = self
            .steps()
            .into_iter()
            .filter_map(|step| match step {
                Step::Nibble(rs, nibble) => Some((rs, nibble)),
                _ => None,
            })
            .collect();
        assert_eq!(nibbles.len() % 2, 0, "odd number of nibbles");
        nibbles
            .chunks(2)
            .map(|pair| {
                assert_eq!(pair[0].0, pair[1].0, "RS changed inside a byte");
                (pair[0].0, (pair[0].1 << 4) | pair[1].1)
            })
            .collect()
    }

    pub fn poll_count(&self) -> usize {
        self.steps()
            .iter()
            .filter(|step| matches!(step, Step::Poll { .. }))
            .count()
    }
}

pub struct SimPin {
    line: Line,
    state: Rc<RefCell<SimState>>,
}

impl ErrorType for SimPin {
    type Error = ErrorKind;
}

impl SimPin {
    fn drive(&mut self, level: bool) {
        let mut state = self.state.borrow_mut();
        match self.line {
            Line::En => state.en = level,
            Line::Rs => state.rs = level,
            Line::Rw => state.rw = level,
        }
        state.push(Event::Set(self.line, level));
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

pub struct SimBus {
    state: Rc<RefCell<SimState>>,
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl DataBus for SimBus {
    fn set_direction(&mut self, direction: BusDirection) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.direction = direction;
        state.strobe = 0;
        state.push(Event::Direction(direction));
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        assert_eq!(
            state.direction,
            BusDirection::Output,
            "bus written while in input direction"
        );
        state.push(Event::BusWrite(nibble));
        Ok(())
    }

    fn read_nibble(&mut self) -> Result<u8, Self::Error> {
        let mut state = self.state.borrow_mut();
        assert_eq!(
            state.direction,
            BusDirection::Input,
            "bus read while in output direction"
        );
        if state.fail_reads {
            return Err(ErrorKind::Other);
        }

        let first_strobe = state.strobe % 2 == 0;
        state.strobe += 1;

        let nibble = if first_strobe && state.busy_reads_left > 0 {
            if state.busy_reads_left != u32::MAX {
                state.busy_reads_left -= 1;
            }
            0b1000
        } else {
            0
        };
        state.push(Event::BusRead(nibble));
        Ok(nibble)
    }
}

pub struct SimDelay {
    state: Rc<RefCell<SimState>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.state.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.state.borrow_mut().push(Event::DelayMs(ms));
    }
}
