use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::log::{
    record::{Record, now_millis},
    record_sink::RecordSink,
};

/// Flush every 100 lines when debugging (to see crashes near real-time).
#[cfg(feature = "log-debug")]
pub const FLUSH_BATCH_SIZE: u32 = 100;

/// Flush every 1000 lines otherwise (to save I/O).
#[cfg(not(feature = "log-debug"))]
pub const FLUSH_BATCH_SIZE: u32 = 1_000;

/// Line-oriented sink over any writer.
///
/// Each record becomes one line: `[Level] ts_ms | target | message k=v ...`.
/// Output is buffered and flushed every [`FLUSH_BATCH_SIZE`] lines and on drop.
/// Write errors are swallowed; a broken writer must not take the consumer down.
pub struct WriterSink<W: Write + Send + 'static> {
    out: BufWriter<W>,
    lines_written: u32,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
            lines_written: 0,
        }
    }

    /// Number of lines written so far (wraps).
    #[must_use]
    pub fn lines_written(&self) -> u32 {
        self.lines_written
    }

    /// Flushes buffered lines and hands back the underlying writer.
    ///
    /// # Errors
    /// Returns the flush error if buffered output could not be written.
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

impl<W: Write + Send + 'static> RecordSink for WriterSink<W> {
    fn accept(&mut self, record: Record) {
        let _ = writeln!(
            &mut self.out,
            "[{:?}] {} | {} | {}",
            record.level(),
            record.ts_ms(),
            record.target(),
            record.render()
        );
        self.lines_written = self.lines_written.wrapping_add(1);

        if self.lines_written.is_multiple_of(FLUSH_BATCH_SIZE) {
            let _ = self.out.flush();
        }
    }
}

/// [`WriterSink`] over a per-process log file.
///
/// Opening never fails: target file, then a temp-dir fallback, then `io::sink()`.
pub struct FileSink {
    inner: WriterSink<Box<dyn Write + Send>>,
    file_path: Option<PathBuf>,
}

impl FileSink {
    /// Creates `dir` if missing and opens `<app>-<ts_ms>-pid<pid>.log` inside it.
    ///
    /// # Example Filename
    /// `logs/rustylog-1762050645000-pid1234.log`
    pub fn create_in_dir<D: AsRef<Path>>(dir: D, app_name: Option<&str>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let ts = now_millis();
        let pid = std::process::id();
        let fname = match app_name {
            Some(name) => format!("{name}-{ts}-pid{pid}.log"),
            None => format!("{ts}-pid{pid}.log"),
        };
        Self::open(dir.join(fname))
    }

    /// Opens (appending) the given file, with the same fallbacks.
    pub fn open(file_path: PathBuf) -> Self {
        let fallback = std::env::temp_dir().join("rustylog-fallback.log");

        let (writer, file_path): (Box<dyn Write + Send>, _) = match append(&file_path) {
            Ok(f) => (Box::new(f), Some(file_path)),
            Err(_) => match append(&fallback) {
                Ok(f) => (Box::new(f), Some(fallback)),
                Err(_) => (Box::new(io::sink()), None),
            },
        };

        Self {
            inner: WriterSink::new(writer),
            file_path,
        }
    }

    /// The file actually being written, or `None` when output is discarded.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

fn append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RecordSink for FileSink {
    #[inline]
    fn accept(&mut self, record: Record) {
        self.inner.accept(record);
    }
}

/// Locates the directory of the running executable, or the current working
/// directory on error.
#[must_use]
pub fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}
