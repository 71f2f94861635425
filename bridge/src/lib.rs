/*
 * PS/2 to TeleVideo Bridge
 *
 * Ties the scan decoder, translation pipeline, and keyboard link into
 * one sequential poll loop: raw bytes in, two-byte terminal codes out,
 * with lock-LED state pushed back to the keyboard on idle cycles.
 */

#![cfg_attr(not(test), no_std)]

use keyboard::{Action, Decoder, Modifiers};
use link::{HostPort, LinkError, Lines, Preempt};
use spin::Mutex;
use tracing::trace;
use translate::{OutputCode, translate};

/*
 * trait ScanSource - Upstream scan byte supplier
 *
 * The collaborator that performs the physical capture (edge detection,
 * parity and stop bit checks) hands over one validated byte per call,
 * or None when nothing is pending. Receive-path faults are its
 * concern, not the bridge's.
 */
pub trait ScanSource {
    fn poll_scan(&mut self) -> Option<u8>;
}

//Byte channel to the terminal; exactly two bytes per keystroke, no
//further framing
pub trait TerminalSink {
    fn write_code(&mut self, code: OutputCode);
}

//External reset controller; owns the line timing (low pulse plus
//status indicator for roughly half a second)
pub trait ResetLine {
    fn pulse_reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    //A keystroke was translated and written to the terminal
    Key(OutputCode),
    //The reset request was forwarded
    Reset,
    //An idle cycle refreshed the lock LEDs; failures are non-fatal
    Indicators(Result<(), LinkError>),
    //Nothing resolved this cycle
    Quiet,
}

/*
 * struct IndicatorSync - Lock-LED state mirror
 * @sent: Caps/num pair last pushed to the keyboard, None before the
 *        first transmission so startup always syncs
 */
pub struct IndicatorSync {
    sent: Option<(bool, bool)>,
}

impl IndicatorSync {
    pub fn new() -> Self {
        IndicatorSync { sent: None }
    }

    /*
     * sync - Push the lock LEDs if they drifted from the modifiers
     *
     * Best effort: the state is recorded as sent even when the link
     * reports a failure, so there is no retry storm; the result is
     * surfaced for the caller to observe. Returns None when the LEDs
     * were already in step.
     */
    pub fn sync<L: Lines, P: Preempt>(
        &mut self,
        modifiers: Modifiers,
        port: &Mutex<HostPort<L, P>>,
    ) -> Option<Result<(), LinkError>> {
        let state = (
            modifiers.contains(Modifiers::CAPS_LOCK),
            modifiers.contains(Modifiers::NUM_LOCK),
        );
        if self.sent == Some(state) {
            return None;
        }
        self.sent = Some(state);
        Some(port.lock().set_indicators(state.0, state.1))
    }
}

impl Default for IndicatorSync {
    fn default() -> Self {
        IndicatorSync::new()
    }
}

/*
 * struct Bridge - The whole translation path
 * @source: Upstream scan byte supplier
 * @sink: Terminal output channel
 * @reset: External reset controller
 * @port: Keyboard link, shared so init glue can issue device commands
 * @decoder: Scan stream state machine
 * @indicators: Lock-LED mirror
 */
pub struct Bridge<S, T, R, L, P>
where
    S: ScanSource,
    T: TerminalSink,
    R: ResetLine,
    L: Lines,
    P: Preempt,
{
    source: S,
    sink: T,
    reset: R,
    port: Mutex<HostPort<L, P>>,
    decoder: Decoder,
    indicators: IndicatorSync,
}

impl<S, T, R, L, P> Bridge<S, T, R, L, P>
where
    S: ScanSource,
    T: TerminalSink,
    R: ResetLine,
    L: Lines,
    P: Preempt,
{
    pub fn new(source: S, sink: T, reset: R, port: HostPort<L, P>) -> Self {
        Bridge {
            source,
            sink,
            reset,
            port: Mutex::new(port),
            decoder: Decoder::new(),
            indicators: IndicatorSync::new(),
        }
    }

    pub fn port(&self) -> &Mutex<HostPort<L, P>> {
        &self.port
    }

    /*
     * poll_once - One atomic step of the control flow
     *
     * A pending byte is decoded to completion and, for a resolved key,
     * translated and written out. With nothing pending, the lock LEDs
     * get their chance to catch up. No outcome is fatal; the bridge
     * always returns to awaiting the next byte.
     */
    pub fn poll_once(&mut self) -> PollOutcome {
        let Some(code) = self.source.poll_scan() else {
            return match self.indicators.sync(self.decoder.modifiers(), &self.port) {
                Some(result) => {
                    if let Err(err) = result {
                        trace!(%err, "indicator update failed");
                    }
                    PollOutcome::Indicators(result)
                }
                None => PollOutcome::Quiet,
            };
        };

        trace!(code, "scan byte");
        match self.decoder.feed(code) {
            Action::Key(press) => {
                let out = translate(press.key, press.modifiers);
                self.sink.write_code(out);
                PollOutcome::Key(out)
            }
            Action::ResetRequest => {
                self.reset.pulse_reset();
                PollOutcome::Reset
            }
            Action::None => PollOutcome::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;
    use translate::OutputFlags;

    use super::*;

    //Free-running clock plus an ack pattern, enough for the link's
    //send path to complete every frame
    struct FakeLines {
        clock_level: bool,
        fail_sends: bool,
        ack_reads: usize,
        sends: usize,
    }

    impl FakeLines {
        fn new(fail_sends: bool) -> Self {
            FakeLines {
                clock_level: false,
                fail_sends,
                ack_reads: 0,
                sends: 0,
            }
        }
    }

    impl Lines for FakeLines {
        fn clock(&mut self) -> bool {
            if self.fail_sends {
                return false;
            }
            self.clock_level = !self.clock_level;
            self.clock_level
        }

        fn data(&mut self) -> bool {
            self.ack_reads += 1;
            self.ack_reads > 1
        }

        fn drive_clock_low(&mut self) {
            self.sends += 1;
        }

        fn release_clock(&mut self) {}

        fn drive_data(&mut self, _level: bool) {}

        fn release_data(&mut self) {
            self.ack_reads = 0;
        }

        fn delay_us(&mut self, _us: u32) {}
    }

    struct FakePreempt;

    impl Preempt for FakePreempt {
        fn suspend(&mut self) {}
        fn resume(&mut self) {}
    }

    struct ByteSource(VecDeque<u8>);

    impl ScanSource for ByteSource {
        fn poll_scan(&mut self) -> Option<u8> {
            self.0.pop_front()
        }
    }

    #[derive(Default)]
    struct RecordingSink(Vec<[u8; 2]>);

    impl TerminalSink for RecordingSink {
        fn write_code(&mut self, code: OutputCode) {
            self.0.push(code.to_bytes());
        }
    }

    #[derive(Default)]
    struct ResetCounter(usize);

    impl ResetLine for ResetCounter {
        fn pulse_reset(&mut self) {
            self.0 += 1;
        }
    }

    fn bridge(
        bytes: &[u8],
        fail_sends: bool,
    ) -> Bridge<ByteSource, RecordingSink, ResetCounter, FakeLines, FakePreempt> {
        let port = HostPort::with_wait_budget(FakeLines::new(fail_sends), FakePreempt, 16);
        Bridge::new(
            ByteSource(bytes.iter().copied().collect()),
            RecordingSink::default(),
            ResetCounter::default(),
            port,
        )
    }

    #[test]
    fn shifted_key_reaches_the_sink_as_two_bytes() {
        let mut bridge = bridge(&[0x12, 0x1C], false);
        assert_eq!(bridge.poll_once(), PollOutcome::Quiet); //shift make
        match bridge.poll_once() {
            PollOutcome::Key(code) => {
                assert_eq!(code.flags, OutputFlags::SHIFT);
                assert_eq!(code.data, b'A');
            }
            other => panic!("expected key, got {other:?}"),
        }
        assert_eq!(bridge.sink.0, vec![[0x20, b'A']]);
    }

    #[test]
    fn reset_scan_code_pulses_the_reset_line() {
        let mut bridge = bridge(&[0x84], false);
        assert_eq!(bridge.poll_once(), PollOutcome::Reset);
        assert_eq!(bridge.reset.0, 1);
        assert_eq!(bridge.sink.0, Vec::<[u8; 2]>::new());
    }

    #[test]
    fn first_idle_poll_syncs_indicators_then_stays_quiet() {
        let mut bridge = bridge(&[], false);
        assert_eq!(bridge.poll_once(), PollOutcome::Indicators(Ok(())));
        //Command byte and mask byte, one frame each
        assert_eq!(bridge.port.lock().lines_mut().sends, 2);
        assert_eq!(bridge.poll_once(), PollOutcome::Quiet);
    }

    #[test]
    fn lock_toggle_triggers_a_fresh_indicator_sync() {
        let mut bridge = bridge(&[0x58], false);
        assert_eq!(bridge.poll_once(), PollOutcome::Quiet); //caps toggle
        assert_eq!(bridge.poll_once(), PollOutcome::Indicators(Ok(())));
        assert_eq!(bridge.poll_once(), PollOutcome::Quiet);
    }

    #[test]
    fn indicator_failure_is_surfaced_but_not_retried() {
        let mut bridge = bridge(&[], true);
        assert_eq!(
            bridge.poll_once(),
            PollOutcome::Indicators(Err(LinkError::Timeout))
        );
        //Best effort: no retry storm on the next idle cycle
        assert_eq!(bridge.poll_once(), PollOutcome::Quiet);
    }

    #[test]
    fn num_lock_off_keypad_reaches_the_editing_codes() {
        let mut bridge = bridge(&[0x77, 0x72], false);
        assert_eq!(bridge.poll_once(), PollOutcome::Quiet); //num lock off
        match bridge.poll_once() {
            PollOutcome::Key(code) => {
                assert_eq!(code.flags, OutputFlags::empty());
                assert_eq!(code.data, 0x8A); //terminal DOWN, not '2'
            }
            other => panic!("expected key, got {other:?}"),
        }
    }
}
