use std::sync::{Arc, Mutex, OnceLock};

use log::LevelFilter;

/// Captured log lines, `"<LEVEL> <message>"`, in emission order.
pub type CapturedLines = Arc<Mutex<Vec<String>>>;

/// Installs a capturing logger once per test binary and returns the
/// shared line buffer.
pub fn init_capture_logger() -> CapturedLines {
    static LINES: OnceLock<CapturedLines> = OnceLock::new();
    Arc::clone(LINES.get_or_init(|| {
        let lines = CapturedLines::default();
        let sink = Arc::clone(&lines);

        let logger = env_logger::Builder::new()
            .filter_level(LevelFilter::Warn)
            .format(move |_fmt, record| {
                sink.lock()
                    .unwrap()
                    .push(format!("{} {}", record.level(), record.args()));
                Ok(())
            })
            .build();

        log::set_max_level(LevelFilter::Warn);
        log::set_boxed_logger(Box::new(logger))
            .expect("the capture logger should be installed once per binary");
        lines
    }))
}

/// The first captured line satisfying `pred`. Lines from tests running in
/// parallel share the buffer, so match on something request-specific.
pub fn find_line(lines: &CapturedLines, pred: impl Fn(&str) -> bool) -> Option<String> {
    lines.lock().unwrap().iter().find(|line| pred(line)).cloned()
}
