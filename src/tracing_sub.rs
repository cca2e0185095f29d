use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;

use crate::components::debug_log::{LogWriter, global_log};

/// Writes one formatted event to the in-app log (or stderr when none is
/// installed) and, when configured, to the log file as well.
pub struct DelegatingWriter {
    inner: DelegatingInner,
    file: Option<Arc<Mutex<File>>>,
}

enum DelegatingInner {
    Buffer(LogWriter),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new(file: Option<Arc<Mutex<File>>>) -> Self {
        let inner = match global_log() {
            Some(handle) => DelegatingInner::Buffer(handle.writer()),
            None => DelegatingInner::Stderr(io::stderr()),
        };
        Self { inner, file }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(file) = &self.file {
            // A failing log file must not take the screen log down with it.
            let _ = file
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(buf);
        }
        match &mut self.inner {
            DelegatingInner::Buffer(w) => w.write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = &self.file {
            let _ = file.lock().unwrap_or_else(PoisonError::into_inner).flush();
        }
        match &mut self.inner {
            DelegatingInner::Buffer(w) => w.flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    pub fn with_file(file: File) -> Self {
        Self {
            file: Some(Arc::new(Mutex::new(file))),
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new(self.file.clone())
    }
}

/// Map `-v` occurrences to a maximum level.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Opening `log_file` is the only failure;
/// a subscriber that is already installed is left in place.
pub fn init(log_file: Option<&Path>, level: Level) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => {
            SubscriberMakeWriter::with_file(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => SubscriberMakeWriter::default(),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
    Ok(())
}
