use std::io;

use tracing::Level;
use wasm_bindgen::JsValue;

/// Console verbosity. Skipped writes and dispatch traces sit at DEBUG and stay out.
const CONSOLE_LEVEL: Level = Level::INFO;

/// Line writer into the service worker's console.
struct ConsoleWriter;

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn init_logging() {
    // No timer: `SystemTime` is unavailable on wasm32-unknown-unknown.
    let _ = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter)
        .with_max_level(CONSOLE_LEVEL)
        .without_time()
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_drops_debug_traces() {
        assert!(Level::DEBUG > CONSOLE_LEVEL);
        assert!(Level::WARN <= CONSOLE_LEVEL);
    }
}
