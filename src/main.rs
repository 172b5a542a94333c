use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use rustylog::{
    config::{Config, ForwarderConfig},
    forwarder::{CancellationSignal, ConsumerState, DropCounter, Forwarder},
    log::{FileSink, LogLevel, NoopLogSink, writer_sink::exe_dir_fallback_cwd},
    submit,
};

const PRODUCERS: usize = 4;
const RECORDS_PER_PRODUCER: usize = 500;
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Floods a forwarder from several threads, then cancels it and reports.
///
/// Usage: `rustylog [config.ini]`. Reads `[Forwarder]` and `[Logging] log_path`.
fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match Config::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => Config::default(),
    };

    let fwd_config = match ForwarderConfig::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let dir = config
        .get_non_empty("Logging", "log_path")
        .map_or_else(|| exe_dir_fallback_cwd().join("logs"), Into::into);
    let sink = FileSink::create_in_dir(dir, Some("rustylog"));
    let file_path = sink.file_path().map(|p| p.display().to_string());

    let dropped = DropCounter::new();
    let cancel = CancellationSignal::new();
    let forwarder = Forwarder::start(
        fwd_config,
        sink,
        dropped.handler(),
        cancel.clone(),
        Arc::new(NoopLogSink),
    );

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|id| {
            let handle = forwarder.handle();
            thread::spawn(move || {
                for seq in 0..RECORDS_PER_PRODUCER {
                    submit!(handle, LogLevel::Info, "demo record", "producer", id, "seq", seq);
                }
                submit!(handle, LogLevel::Info, "producer done", "producer", id);
            })
        })
        .collect();
    for p in producers {
        let _ = p.join();
    }

    thread::sleep(Duration::from_millis(100));
    cancel.cancel();

    // The consumer drops (and flushes) the file sink before reporting Stopped.
    let deadline = Instant::now() + STOP_TIMEOUT;
    while forwarder.state() != ConsumerState::Stopped {
        if Instant::now() >= deadline {
            eprintln!("consumer did not stop within {STOP_TIMEOUT:?}; log file may be incomplete");
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }

    let submitted = PRODUCERS * (RECORDS_PER_PRODUCER + 1);
    let dropped = usize::try_from(dropped.count()).unwrap_or(usize::MAX);
    let abandoned = forwarder.queued();
    let delivered = submitted.saturating_sub(dropped).saturating_sub(abandoned);

    match file_path {
        Some(path) => println!("log file:  {path}"),
        None => println!("log file:  (none, output discarded)"),
    }
    println!("submitted: {submitted}");
    println!("delivered: {delivered}");
    println!("dropped:   {dropped}");
    println!("abandoned: {abandoned}");
}
