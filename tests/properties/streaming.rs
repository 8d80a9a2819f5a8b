//! Property tests for the non-blocking line feeder.

use std::io;

use proptest::prelude::*;

use reflect::application::LineFeeder;
use reflect::domain::ports::StdinChannel;

/// Accepts at most the next scripted number of bytes per write; zero means
/// "would block".
struct ScriptedChannel {
    limits: Vec<usize>,
    call: usize,
    received: Vec<u8>,
    closes: usize,
}

impl ScriptedChannel {
    fn new(limits: Vec<usize>) -> Self {
        Self {
            limits,
            call: 0,
            received: Vec::new(),
            closes: 0,
        }
    }
}

impl StdinChannel for ScriptedChannel {
    fn write_nonblock(&mut self, buf: &[u8]) -> io::Result<usize> {
        assert_eq!(self.closes, 0, "write after close");
        let limit = self.limits[self.call % self.limits.len()];
        self.call += 1;
        if limit == 0 {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let n = limit.min(buf.len());
        self.received.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn close(&mut self) {
        self.closes += 1;
    }

    fn is_closed(&self) -> bool {
        self.closes > 0
    }
}

fn item() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_./ -]{1,40}").unwrap()
}

/// Drive the feeder like a poll loop would, with a generous safety bound.
fn drive<F: FnMut(&str)>(feeder: &mut LineFeeder<F>, channel: &mut ScriptedChannel) {
    for _ in 0..100_000 {
        if feeder.is_finished() {
            return;
        }
        feeder.on_writable(channel);
    }
    panic!("feeder never finished");
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: whatever the channel accepts per call, every line arrives
    /// once, in order, and the channel is closed exactly once.
    #[test]
    fn property_every_line_arrives_once_in_order(
        items in proptest::collection::vec(item(), 0..40),
        mut limits in proptest::collection::vec(0usize..64, 1..8),
    ) {
        // At least one limit must make progress
        limits.push(1);

        let mut seen = Vec::new();
        let mut channel = ScriptedChannel::new(limits);
        let mut feeder = LineFeeder::new(items.clone(), |item: &str| seen.push(item.to_string()));
        drive(&mut feeder, &mut channel);

        prop_assert!(feeder.take_failure().is_none());
        prop_assert_eq!(feeder.remaining_items(), 0);
        drop(feeder);

        let expected: String = items.iter().map(|i| format!("{i}\n")).collect();
        prop_assert_eq!(String::from_utf8(channel.received).unwrap(), expected);
        prop_assert_eq!(channel.closes, 1);
        prop_assert_eq!(seen, items);
    }
}

#[test]
fn one_byte_channel_still_delivers_everything() {
    let items: Vec<String> = (0..200).map(|i| format!("dir/{i}/file.txt")).collect();
    let mut channel = ScriptedChannel::new(vec![1]);
    let mut feeder = LineFeeder::new(items.clone(), |_: &str| {});
    drive(&mut feeder, &mut channel);

    let expected: String = items.iter().map(|i| format!("{i}\n")).collect();
    assert_eq!(channel.received.len(), expected.len());
    assert_eq!(String::from_utf8(channel.received).unwrap(), expected);
    assert_eq!(channel.closes, 1);
}

#[test]
fn empty_queue_closes_on_first_notification() {
    let mut channel = ScriptedChannel::new(vec![8]);
    let mut feeder = LineFeeder::new(Vec::<String>::new(), |_: &str| {});
    feeder.on_writable(&mut channel);

    assert!(feeder.is_finished());
    assert_eq!(channel.call, 0);
    assert_eq!(channel.closes, 1);
}
