//! Configuration loading and parsing.
//!
//! Parses `scrawl.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [history]
//! depth = 64
//!
//! [scroll.margin]
//! vertical = 0
//!
//! [view]
//! reserved_rows = 3
//! ```
//!
//! Every field is optional. A missing file yields defaults; a file that fails
//! to parse yields defaults and a warning. Unknown fields are ignored so older
//! binaries tolerate newer files.
//!
//! The vertical margin is clamped at `(h - 2) / 2` where `h` is the text area
//! height at application time (see [`Config::apply_text_rows`]). The raw value
//! is kept so a later resize can re-clamp.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "scrawl.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_depth")]
    pub depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: Self::default_depth(),
        }
    }
}

impl HistoryConfig {
    const fn default_depth() -> usize {
        64
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MarginConfig {
    #[serde(default)]
    pub vertical: usize,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScrollConfig {
    #[serde(default)]
    pub margin: MarginConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// Terminal rows below the text area (status line, command line, spacer).
    #[serde(default = "ViewConfig::default_reserved_rows")]
    pub reserved_rows: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            reserved_rows: Self::default_reserved_rows(),
        }
    }
}

impl ViewConfig {
    const fn default_reserved_rows() -> usize {
        3
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,              // original file string (optional)
    pub file: ConfigFile,                 // parsed (or default) data
    pub effective_vertical_margin: usize, // clamped to viewport semantics
}

/// Local `scrawl.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("scrawl").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                effective_vertical_margin: 0, // computed later
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_error");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Undo/redo stack depth, never below one.
    pub fn history_depth(&self) -> usize {
        self.file.history.depth.max(1)
    }

    pub fn reserved_rows(&self) -> usize {
        self.file.view.reserved_rows
    }

    /// Raw vertical margin as written in the file.
    pub fn vertical_margin(&self) -> usize {
        self.file.scroll.margin.vertical
    }

    /// Clamp the vertical margin against a text area of `text_rows` rows.
    /// Returns the effective value.
    pub fn apply_text_rows(&mut self, text_rows: usize) -> usize {
        let raw = self.file.scroll.margin.vertical;
        let max = text_rows.saturating_sub(2) / 2;
        let clamped = raw.min(max);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                text_rows,
                "scroll_margin_vertical_clamped"
            );
        }
        self.effective_vertical_margin = clamped;
        clamped
    }

    /// Recompute the effective margin after a resize. Returns `Some(new_margin)`
    /// when the effective value changed, else `None`.
    pub fn recompute_after_resize(&mut self, text_rows: usize) -> Option<usize> {
        let prev = self.effective_vertical_margin;
        let current = self.apply_text_rows(text_rows);
        if current != prev { Some(current) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(level: Level, f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        let out = buffer.lock().unwrap().clone();
        String::from_utf8(out).unwrap()
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.history_depth(), 64);
        assert_eq!(cfg.vertical_margin(), 0);
        assert_eq!(cfg.reserved_rows(), 3);
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[history]\ndepth = 16\n[scroll.margin]\nvertical = 3\n[view]\nreserved_rows = 2\n",
        );
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.history_depth(), 16);
        assert_eq!(cfg.reserved_rows(), 2);
        assert_eq!(cfg.vertical_margin(), 3);
        cfg.apply_text_rows(40); // ample height, no clamp
        assert_eq!(cfg.effective_vertical_margin, 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config("[scroll.margin]\nvertical = 2\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.history_depth(), 64);
        assert_eq!(cfg.reserved_rows(), 3);
    }

    #[test]
    fn zero_history_depth_reads_as_one() {
        let tmp = write_config("[history]\ndepth = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.history_depth(), 1);
    }

    #[test]
    fn clamps_when_value_exceeds_half_minus_one() {
        let tmp = write_config("[scroll.margin]\nvertical = 50\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        // height 20 -> max = (20 - 2)/2 = 9
        assert_eq!(cfg.apply_text_rows(20), 9);
        assert_eq!(cfg.effective_vertical_margin, 9);
    }

    #[test]
    fn recompute_changes_when_height_shrinks() {
        let tmp = write_config("[scroll.margin]\nvertical = 10\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        cfg.apply_text_rows(50);
        assert_eq!(cfg.effective_vertical_margin, 10);
        assert_eq!(cfg.recompute_after_resize(10), Some(4));
        assert_eq!(cfg.recompute_after_resize(11), None); // max=(11-2)/2=4
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_config("[scroll.margin]\nvertical = 8\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let log_output = capture(Level::INFO, || {
            cfg.apply_text_rows(6);
        });
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("scroll_margin_vertical_clamped"));
        assert_eq!(cfg.effective_vertical_margin, 2);
    }

    #[test]
    fn parse_error_falls_back_and_warns() {
        let tmp = write_config("[history]\ndepth = \"deep\"\n");
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let log_output = capture(Level::WARN, || {
            cfg = Some(load_from(Some(path)).unwrap());
        });
        let cfg = cfg.unwrap();
        assert_eq!(cfg.history_depth(), 64);
        assert!(cfg.raw.is_none());
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_error"));
    }
}
