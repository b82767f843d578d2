//! Log handlers
//!
//! Destinations for product log entries. Handlers are infallible to build
//! only for the in-process sinks; file and syslog handlers surface their IO
//! failures so that the logger can map them to configuration errors.

use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::net::UdpSocket;
#[cfg(unix)]
use std::os::unix::fs::MetadataExt;
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate};

use crate::config::log_section::{RotationUnit, SyslogTarget};
use crate::logger::entry::LogEntry;

/// A destination for log entries.
pub trait LogHandler {
    /// Human readable handler name, used by the add/remove notifications.
    fn name(&self) -> &str;

    fn emit(&mut self, entry: &LogEntry) -> io::Result<()>;

    /// Release resources; called exactly once when the handler is removed.
    fn close(&mut self) {}
}

/// Prints all entries to standard output. Entries are not persisted.
pub struct StdOutHandler {
    name: String,
}

impl StdOutHandler {
    pub fn new() -> Self {
        StdOutHandler {
            name: "Standard output".to_string(),
        }
    }
}

impl Default for StdOutHandler {
    fn default() -> Self {
        StdOutHandler::new()
    }
}

impl LogHandler for StdOutHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&mut self, entry: &LogEntry) -> io::Result<()> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        writeln!(stdout, "{}", entry.format_line())?;
        stdout.flush()
    }
}

/// Keeps entries in memory. Test sink.
pub struct MemoryHandler {
    name: String,
    buffer: Rc<RefCell<Vec<LogEntry>>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        MemoryHandler {
            name: "Memory".to_string(),
            buffer: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle to the captured entries.
    pub fn buffer(&self) -> Rc<RefCell<Vec<LogEntry>>> {
        self.buffer.clone()
    }
}

impl Default for MemoryHandler {
    fn default() -> Self {
        MemoryHandler::new()
    }
}

impl LogHandler for MemoryHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&mut self, entry: &LogEntry) -> io::Result<()> {
        self.buffer.borrow_mut().push(entry.clone());
        Ok(())
    }
}

/// How a [`FileLogHandler`] rotates its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Plain append, no rotation.
    None,
    /// Rotation is done by an external tool; reopen when the file is
    /// replaced under us.
    External,
    /// Rotate after the file grows past `at_size` bytes, keeping `count`
    /// archives.
    Size { at_size: u64, count: u32 },
    /// Rotate on a time schedule, keeping `count` archives.
    Timed {
        interval: u32,
        unit: RotationUnit,
        count: u32,
    },
}

/// Appends entries to a file, with optional size or time based rotation.
pub struct FileLogHandler {
    name: String,
    path: PathBuf,
    file: File,
    policy: RotationPolicy,
    next_roll: Option<DateTime<Local>>,
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn local_midnight(date: NaiveDate, fallback: DateTime<Local>) -> DateTime<Local> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .map(|moment| moment.and_local_timezone(Local));
    match midnight {
        Some(LocalResult::Single(moment)) => moment,
        Some(LocalResult::Ambiguous(moment, _)) => moment,
        _ => fallback + Duration::days(1),
    }
}

/// Next moment at which a timed rotation fires, counting from `from`.
pub fn next_rollover(from: DateTime<Local>, interval: u32, unit: RotationUnit) -> DateTime<Local> {
    let interval = i64::from(interval.max(1));
    match unit {
        RotationUnit::Seconds => from + Duration::seconds(interval),
        RotationUnit::Minutes => from + Duration::minutes(interval),
        RotationUnit::Hours => from + Duration::hours(interval),
        RotationUnit::Days => from + Duration::days(interval),
        RotationUnit::Midnight => local_midnight(from.date_naive() + Duration::days(1), from),
        RotationUnit::Weekday(day) => {
            let current = i64::from(from.weekday().num_days_from_monday());
            let mut ahead = (i64::from(day) - current).rem_euclid(7);
            if ahead == 0 {
                ahead = 7;
            }
            local_midnight(from.date_naive() + Duration::days(ahead), from)
        }
    }
}

impl FileLogHandler {
    pub fn open(path: impl AsRef<Path>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        let name = match &policy {
            RotationPolicy::None => format!("File {}", path.display()),
            RotationPolicy::External => {
                format!("External rotated file {}", path.display())
            }
            RotationPolicy::Size { at_size, count } => format!(
                "Size based rotated file {} at {} bytes keeping {} rotated archives",
                path.display(),
                at_size,
                count
            ),
            RotationPolicy::Timed {
                interval,
                unit,
                count,
            } => format!(
                "Time based rotated file {} every {} {} keeping {} rotated archives",
                path.display(),
                interval,
                unit.canonical_name(),
                count
            ),
        };
        let next_roll = match &policy {
            RotationPolicy::Timed { interval, unit, .. } => {
                Some(next_rollover(Local::now(), *interval, *unit))
            }
            _ => None,
        };
        #[cfg(unix)]
        let (dev, ino) = {
            let metadata = file.metadata()?;
            (metadata.dev(), metadata.ino())
        };
        Ok(FileLogHandler {
            name,
            path,
            file,
            policy,
            next_roll,
            #[cfg(unix)]
            dev,
            #[cfg(unix)]
            ino,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reopen the file when an external tool moved or removed it.
    #[cfg(unix)]
    fn reopen_if_replaced(&mut self) -> io::Result<()> {
        let replaced = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.dev() != self.dev || metadata.ino() != self.ino,
            Err(_) => true,
        };
        if replaced {
            self.file.flush()?;
            self.file = open_append(&self.path)?;
            let metadata = self.file.metadata()?;
            self.dev = metadata.dev();
            self.ino = metadata.ino();
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn reopen_if_replaced(&mut self) -> io::Result<()> {
        if !self.path.exists() {
            self.file.flush()?;
            self.file = open_append(&self.path)?;
        }
        Ok(())
    }

    fn archive_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rollover_size(&mut self, count: u32) -> io::Result<()> {
        self.file.flush()?;
        if count == 0 {
            // No archives kept, start the file over.
            self.file = File::create(&self.path)?;
            return Ok(());
        }
        let _ = fs::remove_file(self.archive_path(count));
        for index in (1..count).rev() {
            let _ = fs::rename(self.archive_path(index), self.archive_path(index + 1));
        }
        fs::rename(&self.path, self.archive_path(1))?;
        self.file = open_append(&self.path)?;
        Ok(())
    }

    fn rollover_timed(&mut self, count: u32) -> io::Result<()> {
        self.file.flush()?;
        let suffix = Local::now().format("%Y%m%d%H%M%S");
        let mut archive = self.path.as_os_str().to_os_string();
        archive.push(format!(".{}", suffix));
        fs::rename(&self.path, PathBuf::from(archive))?;
        self.file = open_append(&self.path)?;
        if count > 0 {
            self.prune_timed_archives(count)?;
        }
        Ok(())
    }

    /// Keep only the newest `count` timestamp-suffixed archives.
    fn prune_timed_archives(&self, count: u32) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = match self.path.file_name().and_then(|name| name.to_str()) {
            Some(name) => format!("{}.", name),
            None => return Ok(()),
        };
        let mut archives: Vec<PathBuf> = Vec::new();
        for item in fs::read_dir(parent)? {
            let item = item?;
            let file_name = item.file_name();
            let file_name = match file_name.to_str() {
                Some(name) => name,
                None => continue,
            };
            if let Some(suffix) = file_name.strip_prefix(&prefix) {
                if suffix.len() == 14 && suffix.chars().all(|c| c.is_ascii_digit()) {
                    archives.push(item.path());
                }
            }
        }
        archives.sort();
        while archives.len() > count as usize {
            let oldest = archives.remove(0);
            let _ = fs::remove_file(oldest);
        }
        Ok(())
    }
}

impl LogHandler for FileLogHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&mut self, entry: &LogEntry) -> io::Result<()> {
        match self.policy {
            RotationPolicy::External => self.reopen_if_replaced()?,
            RotationPolicy::Size { at_size, count } if at_size > 0 => {
                if self.file.metadata()?.len() >= at_size {
                    self.rollover_size(count)?;
                }
            }
            RotationPolicy::Timed { interval, unit, count } => {
                let now = Local::now();
                if self.next_roll.map(|at| now >= at).unwrap_or(false) {
                    self.rollover_timed(count)?;
                    self.next_roll = Some(next_rollover(now, interval, unit));
                }
            }
            _ => {}
        }
        writeln!(self.file, "{}", entry.format_line())?;
        self.file.flush()
    }

    fn close(&mut self) {
        let _ = self.file.flush();
    }
}

enum SyslogTransport {
    Udp(UdpSocket),
    #[cfg(unix)]
    Unix(UnixDatagram),
}

/// Sends entries to syslog with RFC 3164 framing at daemon.info priority.
pub struct SyslogHandler {
    name: String,
    transport: SyslogTransport,
}

// priority = facility daemon (3) * 8 + severity info (6)
const SYSLOG_PRIORITY: u8 = 30;

impl SyslogHandler {
    pub fn open(target: &SyslogTarget) -> io::Result<Self> {
        let transport = match target {
            SyslogTarget::Host(host, port) => {
                let socket = UdpSocket::bind(("0.0.0.0", 0))?;
                socket.connect((host.as_str(), *port))?;
                SyslogTransport::Udp(socket)
            }
            #[cfg(unix)]
            SyslogTarget::Path(path) => {
                let socket = UnixDatagram::unbound()?;
                socket.connect(path)?;
                SyslogTransport::Unix(socket)
            }
            #[cfg(not(unix))]
            SyslogTarget::Path(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "Syslog over a local path is only available on Unix.",
                ));
            }
        };
        Ok(SyslogHandler {
            name: format!("Syslog at {}", target),
            transport,
        })
    }
}

impl LogHandler for SyslogHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&mut self, entry: &LogEntry) -> io::Result<()> {
        let frame = format!("<{}>{}", SYSLOG_PRIORITY, entry.format_line());
        match &self.transport {
            SyslogTransport::Udp(socket) => socket.send(frame.as_bytes()).map(|_| ()),
            #[cfg(unix)]
            SyslogTransport::Unix(socket) => socket.send(frame.as_bytes()).map(|_| ()),
        }
    }
}
