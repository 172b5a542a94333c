#![allow(clippy::unwrap_used, clippy::expect_used)]

use rand::Rng;
use rustylog::forwarder::{CancellationSignal, ConsumerState, DropCounter, Forwarder};
use rustylog::log::{LogLevel, LogValue, Record, WriterSink};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

fn producer_and_seq(rec: &Record) -> (u64, u64) {
    match rec.args() {
        [_, LogValue::UInt(p), _, LogValue::UInt(s)] => (*p, *s),
        other => panic!("unexpected args {other:?}"),
    }
}

#[test]
fn concurrent_producers_keep_per_producer_order() {
    const PRODUCERS: u64 = 8;
    const PER_PRODUCER: u64 = 2_000;

    let delivered = Arc::new(Mutex::new(Vec::new()));
    let delivered_sink = delivered.clone();
    let dropped = DropCounter::new();
    let cancel = CancellationSignal::new();

    let fwd = Forwarder::create(
        64,
        move |r: Record| delivered_sink.lock().unwrap().push(r),
        dropped.handler(),
        cancel.clone(),
    );

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let handle = fwd.handle();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for s in 0..PER_PRODUCER {
                    handle.submit(
                        LogLevel::Info,
                        "tick",
                        vec!["producer".into(), p.into(), "seq".into(), s.into()],
                    );
                    if rng.gen_range(0..100) == 0 {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();
    for p in producers {
        p.join().unwrap();
    }

    let total = PRODUCERS * PER_PRODUCER;
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let seen = delivered.lock().unwrap().len() as u64 + dropped.count();
        if seen == total {
            break;
        }
        assert!(Instant::now() < deadline, "only {seen} of {total} accounted for");
        thread::sleep(Duration::from_millis(10));
    }

    cancel.cancel();

    let delivered = delivered.lock().unwrap();
    let mut last: HashMap<u64, u64> = HashMap::new();
    for rec in delivered.iter() {
        let (p, s) = producer_and_seq(rec);
        if let Some(prev) = last.insert(p, s) {
            assert!(s > prev, "producer {p} delivered {s} after {prev}");
        }
    }
}

#[test]
fn writer_sink_behind_forwarder() {
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buf = SharedBuf::default();
    let cancel = CancellationSignal::new();
    let fwd = Forwarder::create(
        10,
        WriterSink::new(buf.clone()),
        rustylog::forwarder::overflow::discard(),
        cancel.clone(),
    );

    rustylog::submit!(fwd, LogLevel::Info, "hello", "test", 0);
    thread::sleep(Duration::from_millis(100));
    cancel.cancel();

    let deadline = Instant::now() + Duration::from_secs(2);
    while fwd.state() != ConsumerState::Stopped {
        assert!(Instant::now() < deadline);
        thread::sleep(Duration::from_millis(5));
    }
    // Stopped is only reported once the sink has been dropped and flushed.

    let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert!(text.contains("hello test=0"), "got {text:?}");
    assert!(text.starts_with("[Info] "));
}
