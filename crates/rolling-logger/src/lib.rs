//! Rolling Logger
//!
//! File logger with size-based rotation and an in-memory ring of the most
//! recent lines. Installs a `tracing` subscriber; records emitted through the
//! `log` facade are bridged into it.
//!
//! Files are named `<app>.log` (current), `<app>.1.log` (previous), ... up to
//! `max_files` in total.

use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_RING_CAPACITY: usize = 200;

static RECENT: OnceLock<Arc<Mutex<RingBuffer>>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Failed to prepare log file: {0}")]
    Io(#[from] io::Error),
    #[error("Logger already initialized")]
    AlreadyInitialized,
    #[error("Logger not initialized")]
    NotInitialized,
}

/// Rotation and buffer limits
#[derive(Debug, Clone, Copy)]
pub struct LoggerConfig {
    pub max_bytes: u64,
    pub max_files: usize,
    pub ring_capacity: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
            ring_capacity: DEFAULT_RING_CAPACITY,
        }
    }
}

/// Bounded buffer of complete log lines, oldest dropped first
#[derive(Debug)]
pub struct RingBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Size-rotated log file that also feeds a [`RingBuffer`]
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
    partial: Vec<u8>,
    ring: Arc<Mutex<RingBuffer>>,
}

impl RollingFile {
    pub fn open(
        dir: impl AsRef<Path>,
        app_name: &str,
        config: LoggerConfig,
        ring: Arc<Mutex<RingBuffer>>,
    ) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let path = file_path(&dir, app_name, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            dir,
            app_name: app_name.to_string(),
            max_bytes: config.max_bytes.max(1),
            max_files: config.max_files.max(1),
            file,
            written,
            partial: Vec::new(),
            ring,
        })
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        file_path(&self.dir, &self.app_name, 0)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = file_path(&self.dir, &self.app_name, self.max_files - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (0..self.max_files - 1).rev() {
            let from = file_path(&self.dir, &self.app_name, index);
            if from.exists() {
                fs::rename(&from, file_path(&self.dir, &self.app_name, index + 1))?;
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(self.current_path())?;
        self.written = 0;
        Ok(())
    }

    fn capture_lines(&mut self, buf: &[u8]) {
        self.partial.extend_from_slice(buf);
        while let Some(pos) = self.partial.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            if let Ok(mut ring) = self.ring.lock() {
                ring.push(text);
            }
        }
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        self.capture_lines(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn file_path(dir: &Path, app_name: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{}.log", app_name))
    } else {
        dir.join(format!("{}.{}.log", app_name, index))
    }
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger with default limits
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, LoggerConfig::default())
}

/// Initialize the global logger
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    config: LoggerConfig,
) -> Result<(), LoggerError> {
    if RECENT.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let ring = Arc::new(Mutex::new(RingBuffer::new(config.ring_capacity)));
    let file = RollingFile::open(log_dir, app_name, config, ring.clone())?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    RECENT
        .set(ring)
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    log::info!("Logger initialized for {}", app_name);
    Ok(())
}

pub fn is_initialized() -> bool {
    RECENT.get().is_some()
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Most recent formatted lines, oldest first
pub fn recent_lines() -> Vec<String> {
    RECENT
        .get()
        .and_then(|ring| ring.lock().ok().map(|r| r.snapshot()))
        .unwrap_or_default()
}

fn ensure_initialized() -> Result<(), LoggerError> {
    if is_initialized() {
        Ok(())
    } else {
        Err(LoggerError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_config() -> LoggerConfig {
        LoggerConfig {
            max_bytes: 32,
            max_files: 3,
            ring_capacity: 4,
        }
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut ring = RingBuffer::new(2);
        ring.push("a".to_string());
        ring.push("b".to_string());
        ring.push("c".to_string());
        assert_eq!(ring.snapshot(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_rolling_file_captures_complete_lines() {
        let dir = tempdir().unwrap();
        let ring = Arc::new(Mutex::new(RingBuffer::new(10)));
        let mut file = RollingFile::open(dir.path(), "app", LoggerConfig::default(), ring.clone()).unwrap();

        file.write_all(b"first line\nsecond ").unwrap();
        file.write_all(b"half\n").unwrap();

        let lines = ring.lock().unwrap().snapshot();
        assert_eq!(lines, vec!["first line".to_string(), "second half".to_string()]);
    }

    #[test]
    fn test_rolling_file_rotates_by_size() {
        let dir = tempdir().unwrap();
        let ring = Arc::new(Mutex::new(RingBuffer::new(10)));
        let mut file = RollingFile::open(dir.path(), "app", small_config(), ring).unwrap();

        for i in 0..6 {
            file.write_all(format!("entry number {:02}\n", i).as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert!(dir.path().join("app.log").exists());
        assert!(dir.path().join("app.1.log").exists());
        assert!(dir.path().join("app.2.log").exists());
        assert!(!dir.path().join("app.3.log").exists());

        let current = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert!(current.contains("entry number 05"));
    }

    #[test]
    fn test_init_logger_writes_to_file() {
        let dir = tempdir().unwrap();
        init_logger(dir.path(), "ObraTest").unwrap();
        info("bootstrap finished").unwrap();

        let content = fs::read_to_string(dir.path().join("ObraTest.log")).unwrap();
        assert!(content.contains("bootstrap finished"));
        assert!(recent_lines().iter().any(|l| l.contains("bootstrap finished")));
        assert!(matches!(
            init_logger(dir.path(), "ObraTest"),
            Err(LoggerError::AlreadyInitialized)
        ));
    }
}
