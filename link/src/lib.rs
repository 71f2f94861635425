/*
 * Keyboard Link Transport
 *
 * Host-initiated synchronous byte exchange over the PS/2 clock/data
 * line pair. The device owns the clock; the host requests attention by
 * pulling clock low, then clocks data out on device-driven falling
 * edges. Used to push LED indicator state back to the keyboard.
 */

#![cfg_attr(not(test), no_std)]

use core::fmt;

use tracing::trace;

//Interval between line polls, microseconds
const POLL_INTERVAL_US: u32 = 10;

//Hold time for the request-to-send clock pull, microseconds
const ATTENTION_US: u32 = 100;

//Gap the device needs between the indicator command and its argument
const INDICATOR_GAP_US: u32 = 2_000;

//"Set indicators" device command
const CMD_SET_INDICATORS: u8 = 0xED;

//Indicator bitmask bits
pub const INDICATOR_CAPS: u8 = 0x04;
pub const INDICATOR_NUM: u8 = 0x02;

//Default wait budget per line transition: 20_000 polls of 10us each.
//Bit clocks run at 10-16kHz, so 200ms is slack enough to absorb clock
//jitter across keyboard models without masking a dead device.
pub const DEFAULT_WAIT_POLLS: u32 = 20_000;

/*
 * trait Lines - The physical clock/data line pair
 *
 * Both lines are open-collector: driving means pulling the line to a
 * level, releasing returns it to the pulled-up input state so the
 * device can drive it. Pin setup itself belongs to the platform glue.
 */
pub trait Lines {
    fn clock(&mut self) -> bool;
    fn data(&mut self) -> bool;
    fn drive_clock_low(&mut self);
    fn release_clock(&mut self);
    fn drive_data(&mut self, level: bool);
    fn release_data(&mut self);
    fn delay_us(&mut self, us: u32);
}

/*
 * trait Preempt - Scoped preemption control
 *
 * Bit timing cannot tolerate interruption, so a whole frame runs with
 * preemption suspended. Platform-independent stand-in for interrupt
 * masking.
 */
pub trait Preempt {
    fn suspend(&mut self);
    fn resume(&mut self);
}

//Preemption stays off until the guard drops, on every exit path
struct PreemptGuard<'a, P: Preempt> {
    preempt: &'a mut P,
}

impl<'a, P: Preempt> PreemptGuard<'a, P> {
    fn enter(preempt: &'a mut P) -> Self {
        preempt.suspend();
        PreemptGuard { preempt }
    }
}

impl<P: Preempt> Drop for PreemptGuard<'_, P> {
    fn drop(&mut self) {
        self.preempt.resume();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    //A bounded wait for a line transition ran out of budget
    Timeout,
    //Start bit sampled high
    BadStartBit,
    //Stop bit sampled low
    BadStopBit,
    //Odd parity check failed; carries the rejected byte
    Parity(u8),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Timeout => write!(f, "line wait timed out"),
            LinkError::BadStartBit => write!(f, "bad start bit"),
            LinkError::BadStopBit => write!(f, "bad stop bit"),
            LinkError::Parity(byte) => write!(f, "parity error on {byte:#04x}"),
        }
    }
}

/*
 * struct HostPort - Byte-framed host side of the keyboard link
 * @lines: Physical line pair
 * @preempt: Preemption control for timing-critical sections
 * @wait_polls: Budget for every bounded line wait
 */
pub struct HostPort<L: Lines, P: Preempt> {
    lines: L,
    preempt: P,
    wait_polls: u32,
}

impl<L: Lines, P: Preempt> HostPort<L, P> {
    pub fn new(lines: L, preempt: P) -> Self {
        Self::with_wait_budget(lines, preempt, DEFAULT_WAIT_POLLS)
    }

    pub fn with_wait_budget(lines: L, preempt: P, wait_polls: u32) -> Self {
        HostPort {
            lines,
            preempt,
            wait_polls,
        }
    }

    //Underlying line pair, for platform glue that owns other pins on
    //the same port
    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    /*
     * send - Clock one byte out to the device
     *
     * Frame: request-to-send, 8 data bits LSB first, odd parity, stop,
     * then the device acknowledgment (both lines pulled low and
     * released). The whole frame runs under the preemption guard.
     */
    pub fn send(&mut self, byte: u8) -> Result<(), LinkError> {
        trace!(byte, "link send");
        let budget = self.wait_polls;
        let lines = &mut self.lines;
        let _guard = PreemptGuard::enter(&mut self.preempt);
        send_frame(lines, budget, byte)
    }

    /*
     * recv - Read one device-clocked byte off the line pair
     *
     * Polled counterpart of the interrupt-driven capture the upstream
     * collaborator normally performs. Validates start bit, odd parity
     * and stop bit.
     */
    pub fn recv(&mut self) -> Result<u8, LinkError> {
        let budget = self.wait_polls;
        recv_frame(&mut self.lines, budget)
    }

    /*
     * set_indicators - Push lock-LED state to the keyboard
     *
     * Command byte, a short gap the device needs for processing, then
     * the indicator bitmask.
     */
    pub fn set_indicators(&mut self, caps: bool, num: bool) -> Result<(), LinkError> {
        let mut mask = 0;
        if caps {
            mask |= INDICATOR_CAPS;
        }
        if num {
            mask |= INDICATOR_NUM;
        }
        self.send(CMD_SET_INDICATORS)?;
        self.lines.delay_us(INDICATOR_GAP_US);
        self.send(mask)
    }
}

fn wait_clock(lines: &mut impl Lines, budget: u32, level: bool) -> Result<(), LinkError> {
    for _ in 0..budget {
        if lines.clock() == level {
            return Ok(());
        }
        lines.delay_us(POLL_INTERVAL_US);
    }
    Err(LinkError::Timeout)
}

fn wait_data(lines: &mut impl Lines, budget: u32, level: bool) -> Result<(), LinkError> {
    for _ in 0..budget {
        if lines.data() == level {
            return Ok(());
        }
        lines.delay_us(POLL_INTERVAL_US);
    }
    Err(LinkError::Timeout)
}

//One full device clock: high phase, then the falling edge
fn wait_edge(lines: &mut impl Lines, budget: u32) -> Result<(), LinkError> {
    wait_clock(lines, budget, true)?;
    wait_clock(lines, budget, false)
}

fn wait_released(lines: &mut impl Lines, budget: u32) -> Result<(), LinkError> {
    for _ in 0..budget {
        if lines.clock() && lines.data() {
            return Ok(());
        }
        lines.delay_us(POLL_INTERVAL_US);
    }
    Err(LinkError::Timeout)
}

fn send_frame(lines: &mut impl Lines, budget: u32, byte: u8) -> Result<(), LinkError> {
    //Request-to-send: clock low, data low, hand the clock back
    lines.drive_clock_low();
    lines.delay_us(ATTENTION_US);
    lines.drive_data(false);
    lines.release_clock();
    wait_edge(lines, budget)?; //device clocks the start bit

    let mut parity = 1u8;
    let mut data = byte;
    for _ in 0..8 {
        let bit = data & 1 != 0;
        lines.drive_data(bit);
        parity ^= bit as u8;
        data >>= 1;
        wait_edge(lines, budget)?;
    }
    lines.drive_data(parity != 0);
    wait_edge(lines, budget)?; //parity bit
    lines.release_data();
    wait_edge(lines, budget)?; //stop bit

    //Ack: device pulls data low, then clock, then releases both
    wait_data(lines, budget, false)?;
    wait_clock(lines, budget, false)?;
    wait_released(lines, budget)
}

fn recv_frame(lines: &mut impl Lines, budget: u32) -> Result<u8, LinkError> {
    wait_clock(lines, budget, false)?;
    if lines.data() {
        return Err(LinkError::BadStartBit);
    }
    let mut value = 0u8;
    let mut parity = 1u8;
    for i in 0..8 {
        wait_edge(lines, budget)?;
        let bit = lines.data() as u8;
        value |= bit << i;
        parity ^= bit;
    }
    wait_edge(lines, budget)?;
    parity ^= lines.data() as u8;
    wait_edge(lines, budget)?;
    let stop = lines.data();
    if parity != 0 {
        return Err(LinkError::Parity(value));
    }
    if !stop {
        return Err(LinkError::BadStopBit);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;

    use super::*;

    //Line pair with a free-running clock: each read flips the level,
    //so every wait sees an edge immediately. Data reads come from a
    //script; once it runs dry, an ack pattern (one low read after each
    //release_data, high otherwise) takes over.
    struct MockLines {
        clock_level: bool,
        clock_stuck_low: bool,
        data_script: VecDeque<bool>,
        ack_reads: usize,
        drives: Vec<bool>,
        data_releases: usize,
        clock_pulls: usize,
    }

    impl MockLines {
        fn new() -> Self {
            MockLines {
                clock_level: false,
                clock_stuck_low: false,
                data_script: VecDeque::new(),
                ack_reads: 0,
                drives: Vec::new(),
                data_releases: 0,
                clock_pulls: 0,
            }
        }

        fn scripted(bits: &[bool]) -> Self {
            let mut lines = Self::new();
            lines.data_script = bits.iter().copied().collect();
            lines
        }
    }

    impl Lines for MockLines {
        fn clock(&mut self) -> bool {
            if self.clock_stuck_low {
                return false;
            }
            self.clock_level = !self.clock_level;
            self.clock_level
        }

        fn data(&mut self) -> bool {
            if let Some(bit) = self.data_script.pop_front() {
                return bit;
            }
            self.ack_reads += 1;
            self.ack_reads > 1
        }

        fn drive_clock_low(&mut self) {
            self.clock_pulls += 1;
        }

        fn release_clock(&mut self) {}

        fn drive_data(&mut self, level: bool) {
            self.drives.push(level);
        }

        fn release_data(&mut self) {
            self.data_releases += 1;
            self.ack_reads = 0;
        }

        fn delay_us(&mut self, _us: u32) {}
    }

    struct MockPreempt {
        depth: i32,
        suspensions: u32,
    }

    impl MockPreempt {
        fn new() -> Self {
            MockPreempt {
                depth: 0,
                suspensions: 0,
            }
        }
    }

    impl Preempt for MockPreempt {
        fn suspend(&mut self) {
            self.depth += 1;
            self.suspensions += 1;
        }

        fn resume(&mut self) {
            self.depth -= 1;
        }
    }

    //Split the recorded drives into 10-entry frames and rebuild the
    //byte each one carried
    fn sent_bytes(drives: &[bool]) -> Vec<u8> {
        assert_eq!(drives.len() % 10, 0);
        drives
            .chunks(10)
            .map(|frame| {
                assert!(!frame[0], "request-to-send must pull data low");
                let mut byte = 0u8;
                for (i, &bit) in frame[1..9].iter().enumerate() {
                    byte |= (bit as u8) << i;
                }
                let ones = frame[1..10].iter().filter(|&&b| b).count();
                assert_eq!(ones % 2, 1, "odd parity violated");
                byte
            })
            .collect()
    }

    #[test]
    fn send_clocks_bits_lsb_first_with_odd_parity() {
        let mut port = HostPort::new(MockLines::new(), MockPreempt::new());
        port.send(0xED).unwrap();

        assert_eq!(sent_bytes(&port.lines.drives), vec![0xED]);
        assert_eq!(port.lines.data_releases, 1);
        assert_eq!(port.lines.clock_pulls, 1);
    }

    #[test]
    fn send_restores_preemption_on_success_and_timeout() {
        let mut port = HostPort::new(MockLines::new(), MockPreempt::new());
        port.send(0x55).unwrap();
        assert_eq!(port.preempt.depth, 0);
        assert_eq!(port.preempt.suspensions, 1);

        let mut stuck = MockLines::new();
        stuck.clock_stuck_low = true;
        let mut port = HostPort::with_wait_budget(stuck, MockPreempt::new(), 8);
        assert_eq!(port.send(0x55), Err(LinkError::Timeout));
        assert_eq!(port.preempt.depth, 0);
        assert_eq!(port.preempt.suspensions, 1);
    }

    fn frame_bits(byte: u8, parity: bool, stop: bool) -> Vec<bool> {
        let mut bits = vec![false]; //start
        for i in 0..8 {
            bits.push(byte & (1 << i) != 0);
        }
        bits.push(parity);
        bits.push(stop);
        bits
    }

    #[test]
    fn recv_reassembles_byte() {
        //0x5A has four data ones, so odd parity needs a set parity bit
        let lines = MockLines::scripted(&frame_bits(0x5A, true, true));
        let mut port = HostPort::new(lines, MockPreempt::new());
        assert_eq!(port.recv(), Ok(0x5A));
    }

    #[test]
    fn recv_rejects_bad_parity() {
        let lines = MockLines::scripted(&frame_bits(0x5A, false, true));
        let mut port = HostPort::new(lines, MockPreempt::new());
        assert_eq!(port.recv(), Err(LinkError::Parity(0x5A)));
    }

    #[test]
    fn recv_rejects_bad_start_and_stop_bits() {
        let mut bad_start = frame_bits(0x10, false, true);
        bad_start[0] = true;
        let mut port = HostPort::new(MockLines::scripted(&bad_start), MockPreempt::new());
        assert_eq!(port.recv(), Err(LinkError::BadStartBit));

        //0x10 has one data one, so parity clear keeps the frame odd
        let bad_stop = frame_bits(0x10, false, false);
        let mut port = HostPort::new(MockLines::scripted(&bad_stop), MockPreempt::new());
        assert_eq!(port.recv(), Err(LinkError::BadStopBit));
    }

    #[test]
    fn recv_times_out_on_dead_clock() {
        let mut lines = MockLines::new();
        lines.clock_stuck_low = true;
        //Clock parked low never produces the high phase of an edge
        let mut port = HostPort::with_wait_budget(lines, MockPreempt::new(), 4);
        port.lines.data_script.push_back(false);
        assert_eq!(port.recv(), Err(LinkError::Timeout));
    }

    #[test]
    fn set_indicators_sends_command_then_mask() {
        let mut port = HostPort::new(MockLines::new(), MockPreempt::new());
        port.set_indicators(true, false).unwrap();
        assert_eq!(sent_bytes(&port.lines.drives), vec![0xED, INDICATOR_CAPS]);

        let mut port = HostPort::new(MockLines::new(), MockPreempt::new());
        port.set_indicators(false, true).unwrap();
        assert_eq!(sent_bytes(&port.lines.drives), vec![0xED, INDICATOR_NUM]);
    }
}
