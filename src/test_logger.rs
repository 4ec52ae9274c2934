use parking_lot::Mutex;

/// Test-only logger recording everything emitted through the `log` facade so
/// tests can assert on it. Installed at most once per test binary; records
/// accumulate across tests, so assert with [`contains`](RecordingLogger::contains)
/// rather than on exact contents.
pub struct RecordingLogger {
    records: Mutex<Vec<String>>,
}

static LOGGER: RecordingLogger = RecordingLogger {
    records: Mutex::new(Vec::new()),
};

pub fn install() -> &'static RecordingLogger {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
    &LOGGER
}

impl RecordingLogger {
    pub fn contains(&self, needle: &str) -> bool {
        self.records.lock().iter().any(|line| line.contains(needle))
    }
}

impl log::Log for RecordingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.records
            .lock()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}
