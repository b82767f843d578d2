//! Log configuration section
//!
//! Typed, validated view over the `[log]` section:
//!
//! ```ini
//! [log]
//! log_file = /path/to/file
//! log_file_rotate_external = Yes | No
//! log_file_rotate_at_size = 0 | Disabled
//! log_file_rotate_each = 1 hour | 2 seconds | 2 midnight | 3 Monday | Disabled
//! log_file_rotate_count = 3 | 0 | Disabled
//! log_syslog = /path/to/syslog/pipe | syslog.host:port
//! log_windows_eventlog = source-name | Disabled
//! log_enabled_groups = all
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::common::{CommonsError, Result};
use crate::config::property::{PropertyDeclaration, PropertyKind, PropertySection};
use crate::config::proxy::FileConfigurationProxy;
use crate::config::section::SectionBinding;
use crate::observer::{Callback, Signal};

/// Name of the log section in the configuration file.
pub const CONFIGURATION_SECTION_LOG: &str = "log";

/// Sentinel group which enables every event group.
pub const CONFIGURATION_ALL_LOG_ENABLED_GROUPS: &str = "all";

/// Default raw values for every `[log]` option.
pub static LOG_SECTION_DEFAULTS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let defaults = [
        ("log_enabled", "true"),
        ("log_file", ""),
        ("log_file_rotate_external", "false"),
        ("log_file_rotate_at_size", "0"),
        ("log_file_rotate_each", "0 seconds"),
        ("log_file_rotate_count", "0"),
        ("log_syslog", ""),
        ("log_windows_eventlog", ""),
        ("log_enabled_groups", CONFIGURATION_ALL_LOG_ENABLED_GROUPS),
    ];
    defaults
        .iter()
        .map(|(option, value)| (option.to_string(), value.to_string()))
        .collect()
});

/// Time unit for interval-based log rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Midnight,
    /// Week day, Monday is 0.
    Weekday(u8),
}

impl RotationUnit {
    /// Short unit code: `s`, `m`, `h`, `d`, `midnight` or `w0`..`w6`.
    pub fn code(&self) -> String {
        match self {
            RotationUnit::Seconds => "s".to_string(),
            RotationUnit::Minutes => "m".to_string(),
            RotationUnit::Hours => "h".to_string(),
            RotationUnit::Days => "d".to_string(),
            RotationUnit::Midnight => "midnight".to_string(),
            RotationUnit::Weekday(day) => format!("w{}", day),
        }
    }

    /// Canonical human name used for storage.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            RotationUnit::Seconds => "seconds",
            RotationUnit::Minutes => "minutes",
            RotationUnit::Hours => "hours",
            RotationUnit::Days => "days",
            RotationUnit::Midnight => "midnight",
            RotationUnit::Weekday(0) => "monday",
            RotationUnit::Weekday(1) => "tuesday",
            RotationUnit::Weekday(2) => "wednesday",
            RotationUnit::Weekday(3) => "thursday",
            RotationUnit::Weekday(4) => "friday",
            RotationUnit::Weekday(5) => "saturday",
            RotationUnit::Weekday(_) => "sunday",
        }
    }
}

impl fmt::Display for RotationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

static ROTATION_UNITS: Lazy<HashMap<&'static str, RotationUnit>> = Lazy::new(|| {
    let mut units = HashMap::new();
    let entries = [
        ("second", RotationUnit::Seconds),
        ("minute", RotationUnit::Minutes),
        ("hour", RotationUnit::Hours),
        ("day", RotationUnit::Days),
        ("midnight", RotationUnit::Midnight),
        ("monday", RotationUnit::Weekday(0)),
        ("tuesday", RotationUnit::Weekday(1)),
        ("wednesday", RotationUnit::Weekday(2)),
        ("thursday", RotationUnit::Weekday(3)),
        ("friday", RotationUnit::Weekday(4)),
        ("saturday", RotationUnit::Weekday(5)),
        ("sunday", RotationUnit::Weekday(6)),
    ];
    for (name, unit) in entries {
        units.insert(name, unit);
    }
    units
});

/// Split on runs of non-alphanumeric characters; boundary separators
/// produce empty tokens so that malformed input keeps its shape.
fn split_tokens(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut token_start = 0;
    let mut in_separator = false;
    for (position, character) in value.char_indices() {
        if character.is_alphanumeric() {
            if in_separator {
                token_start = position;
                in_separator = false;
            }
        } else if !in_separator {
            tokens.push(&value[token_start..position]);
            in_separator = true;
        }
    }
    if in_separator {
        tokens.push("");
    } else {
        tokens.push(&value[token_start..]);
    }
    tokens
}

fn rotate_each_error(details: String) -> CommonsError {
    CommonsError::RotateEachFormat(details)
}

/// Parse a human rotation interval like `2 hours` into an interval count
/// and unit.
pub fn parse_rotate_each(value: &str) -> Result<(u32, RotationUnit)> {
    let tokens = split_tokens(value);
    if tokens.len() != 2 {
        return Err(rotate_each_error(format!("Got: \"{}\"", value)));
    }

    let interval: i64 = tokens[0].parse().map_err(|_| {
        rotate_each_error(format!(
            "Interval is not an integer. Got: \"{}\"",
            tokens[0]
        ))
    })?;
    if interval < 0 {
        return Err(rotate_each_error(format!(
            "Interval must not be negative. Got: \"{}\"",
            tokens[0]
        )));
    }

    let name = tokens[1].to_lowercase();
    let singular = name.strip_suffix('s').unwrap_or(&name);
    let unit = ROTATION_UNITS
        .get(singular)
        .or_else(|| ROTATION_UNITS.get(name.as_str()))
        .copied()
        .ok_or_else(|| {
            rotate_each_error(format!("Unknown interval type. Got: \"{}\"", tokens[1]))
        })?;

    Ok((interval as u32, unit))
}

/// Where syslog entries are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyslogTarget {
    /// Local pipe or socket path.
    Path(String),
    /// Remote `host:port` address.
    Host(String, u16),
}

impl fmt::Display for SyslogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyslogTarget::Path(path) => write!(f, "{}", path),
            SyslogTarget::Host(host, port) => write!(f, "{}:{}", host, port),
        }
    }
}

const DECLARATIONS: &[PropertyDeclaration] = &[
    PropertyDeclaration::new("enabled", PropertyKind::ReadWrite),
    PropertyDeclaration::new("file", PropertyKind::ReadWrite),
    PropertyDeclaration::new("file_rotate_external", PropertyKind::ReadWrite),
    PropertyDeclaration::new("file_rotate_at_size", PropertyKind::ReadWrite),
    PropertyDeclaration::new("file_rotate_each", PropertyKind::ReadWrite),
    PropertyDeclaration::new("file_rotate_count", PropertyKind::ReadWrite),
    PropertyDeclaration::new("syslog", PropertyKind::ReadWrite),
    PropertyDeclaration::new("enabled_groups", PropertyKind::ReadWrite),
    PropertyDeclaration::new("windows_eventlog", PropertyKind::ReadWrite),
];

/// Concrete section over `[log]`.
pub struct LogConfigurationSection {
    binding: SectionBinding,
}

impl LogConfigurationSection {
    pub fn new(proxy: Rc<RefCell<FileConfigurationProxy>>) -> Self {
        LogConfigurationSection {
            binding: SectionBinding::new(
                proxy,
                CONFIGURATION_SECTION_LOG,
                CONFIGURATION_SECTION_LOG,
            ),
        }
    }

    /// Default option values for proxies holding a `[log]` section.
    pub fn defaults() -> HashMap<String, String> {
        LOG_SECTION_DEFAULTS.clone()
    }

    pub fn proxy(&self) -> &Rc<RefCell<FileConfigurationProxy>> {
        self.binding.proxy()
    }

    pub fn subscribe(&self, name: &str, callback: Rc<Callback>) {
        self.binding.subscribe(name, callback);
    }

    pub fn unsubscribe(&self, name: Option<&str>, callback: Option<&Rc<Callback>>) {
        self.binding.unsubscribe(name, callback);
    }

    pub fn enabled(&self) -> Result<bool> {
        self.binding.enabled()
    }

    pub fn set_enabled(&self, value: bool) -> Result<()> {
        self.binding.set_enabled(value)
    }

    fn get_string_or_none(&self, option: &str) -> Result<Option<String>> {
        self.binding.proxy().borrow().get_string_or_none(
            CONFIGURATION_SECTION_LOG,
            &self.binding.option_key(option),
        )
    }

    /// Path of the log file, `None` when file logging is disabled.
    pub fn file(&self) -> Result<Option<String>> {
        self.get_string_or_none("file")
    }

    pub fn set_file(&self, value: Option<&str>) -> Result<()> {
        let initial = self.file()?;
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(value));
        self.binding.update_and_notify("file", signal, |proxy, key| {
            proxy.set_string_or_none(CONFIGURATION_SECTION_LOG, key, value);
            Ok(())
        })
    }

    /// Whether rotation is performed by an external tool.
    pub fn file_rotate_external(&self) -> Result<bool> {
        self.binding.proxy().borrow().get_boolean(
            CONFIGURATION_SECTION_LOG,
            &self.binding.option_key("file_rotate_external"),
        )
    }

    pub fn set_file_rotate_external(&self, value: bool) -> Result<()> {
        let initial = self.file_rotate_external()?;
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(value));
        self.binding
            .update_and_notify("file_rotate_external", signal, |proxy, key| {
                proxy.set_boolean(CONFIGURATION_SECTION_LOG, key, value);
                Ok(())
            })
    }

    /// Size in bytes after which the log file is rotated, 0 when size
    /// rotation is disabled.
    pub fn file_rotate_at_size(&self) -> Result<i64> {
        let value = self.binding.proxy().borrow().get_integer_or_none(
            CONFIGURATION_SECTION_LOG,
            &self.binding.option_key("file_rotate_at_size"),
        )?;
        Ok(value.unwrap_or(0))
    }

    pub fn set_file_rotate_at_size(&self, value: Option<i64>) -> Result<()> {
        let initial = self.file_rotate_at_size()?;
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(value));
        self.binding
            .update_and_notify("file_rotate_at_size", signal, |proxy, key| {
                proxy.set_integer_or_none(CONFIGURATION_SECTION_LOG, key, value);
                Ok(())
            })
    }

    /// Number of rotated archives to keep, 0 when unlimited/disabled.
    pub fn file_rotate_count(&self) -> Result<i64> {
        let value = self.binding.proxy().borrow().get_integer_or_none(
            CONFIGURATION_SECTION_LOG,
            &self.binding.option_key("file_rotate_count"),
        )?;
        Ok(value.unwrap_or(0))
    }

    pub fn set_file_rotate_count(&self, value: Option<i64>) -> Result<()> {
        let initial = self.file_rotate_count()?;
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(value));
        self.binding
            .update_and_notify("file_rotate_count", signal, |proxy, key| {
                proxy.set_integer_or_none(CONFIGURATION_SECTION_LOG, key, value);
                Ok(())
            })
    }

    /// Parsed time-based rotation schedule, `None` when disabled.
    pub fn file_rotate_each(&self) -> Result<Option<(u32, RotationUnit)>> {
        match self.get_string_or_none("file_rotate_each")? {
            None => Ok(None),
            Some(value) => parse_rotate_each(&value).map(Some),
        }
    }

    /// Store a human rotation interval after validating and normalizing
    /// it.
    pub fn set_file_rotate_each(&self, value: Option<&str>) -> Result<()> {
        let normalized = match value {
            None => None,
            Some(value) => {
                let (interval, unit) = parse_rotate_each(value)?;
                Some(format!("{} {}", interval, unit.canonical_name()))
            }
        };
        self.store_rotate_each(normalized)
    }

    /// Pair-based variant of [`LogConfigurationSection::set_file_rotate_each`].
    pub fn set_file_rotate_each_interval(
        &self,
        interval: u32,
        unit: RotationUnit,
    ) -> Result<()> {
        self.store_rotate_each(Some(format!("{} {}", interval, unit.canonical_name())))
    }

    fn store_rotate_each(&self, normalized: Option<String>) -> Result<()> {
        let initial = self.get_string_or_none("file_rotate_each")?;
        let signal = Signal::change(
            CONFIGURATION_SECTION_LOG,
            json!(initial),
            json!(normalized),
        );
        self.binding
            .update_and_notify("file_rotate_each", signal, |proxy, key| {
                proxy.set_string_or_none(CONFIGURATION_SECTION_LOG, key, normalized.as_deref());
                Ok(())
            })
    }

    /// Syslog address used for logging.
    ///
    /// A stored `host:port` value with a digits-only port is returned as
    /// [`SyslogTarget::Host`]; anything else is a local path or pipe.
    pub fn syslog(&self) -> Result<Option<SyslogTarget>> {
        let value = match self.get_string_or_none("syslog")? {
            None => return Ok(None),
            Some(value) => value,
        };
        if let Some((host, port)) = value.rsplit_once(':') {
            if !port.is_empty() && port.chars().all(|character| character.is_ascii_digit()) {
                if let Ok(port) = port.parse::<u16>() {
                    return Ok(Some(SyslogTarget::Host(host.to_string(), port)));
                }
            }
        }
        Ok(Some(SyslogTarget::Path(value)))
    }

    pub fn set_syslog(&self, value: Option<&str>) -> Result<()> {
        let initial = self.get_string_or_none("syslog")?;
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(value));
        self.binding
            .update_and_notify("syslog", signal, |proxy, key| {
                proxy.set_string_or_none(CONFIGURATION_SECTION_LOG, key, value);
                Ok(())
            })
    }

    /// Lower-cased, trimmed list of enabled log groups.
    pub fn enabled_groups(&self) -> Result<Vec<String>> {
        let value = self.binding.proxy().borrow().get_string(
            CONFIGURATION_SECTION_LOG,
            &self.binding.option_key("enabled_groups"),
        )?;
        Ok(value
            .split(',')
            .map(|group| group.trim().to_lowercase())
            .filter(|group| !group.is_empty())
            .collect())
    }

    pub fn set_enabled_groups(&self, groups: &[&str]) -> Result<()> {
        let initial = self.enabled_groups()?;
        let value = groups.join(", ");
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(groups));
        self.binding
            .update_and_notify("enabled_groups", signal, |proxy, key| {
                proxy.set_string(CONFIGURATION_SECTION_LOG, key, &value);
                Ok(())
            })
    }

    /// Windows event log source name, `None` when disabled.
    pub fn windows_eventlog(&self) -> Result<Option<String>> {
        self.get_string_or_none("windows_eventlog")
    }

    pub fn set_windows_eventlog(&self, value: Option<&str>) -> Result<()> {
        let initial = self.windows_eventlog()?;
        let signal = Signal::change(CONFIGURATION_SECTION_LOG, json!(initial), json!(value));
        self.binding
            .update_and_notify("windows_eventlog", signal, |proxy, key| {
                proxy.set_string_or_none(CONFIGURATION_SECTION_LOG, key, value);
                Ok(())
            })
    }

    fn cannot_set(
        &self,
        type_name: &'static str,
        option: &str,
        value: &Value,
        details: String,
    ) -> CommonsError {
        CommonsError::CannotSetOptionValue {
            type_name,
            value: value.to_string(),
            option: self.binding.option_key(option),
            section: CONFIGURATION_SECTION_LOG.to_string(),
            details,
        }
    }

    fn value_as_bool(&self, option: &str, value: &Value) -> Result<bool> {
        match value {
            Value::Bool(value) => Ok(*value),
            Value::String(text) => crate::config::proxy::coerce_boolean(text)
                .map_err(|details| self.cannot_set("boolean", option, value, details)),
            Value::Number(number) if number.as_i64() == Some(0) => Ok(false),
            Value::Number(number) if number.as_i64() == Some(1) => Ok(true),
            _ => Err(self.cannot_set(
                "boolean",
                option,
                value,
                format!("Not a boolean value: {}", value),
            )),
        }
    }

    fn value_as_opt_integer(&self, option: &str, value: &Value) -> Result<Option<i64>> {
        match value {
            Value::Null => Ok(None),
            Value::Number(number) => number.as_i64().map(Some).ok_or_else(|| {
                self.cannot_set(
                    "integer",
                    option,
                    value,
                    format!("Not an integer value: {}", value),
                )
            }),
            Value::String(text) => text.trim().parse::<i64>().map(Some).map_err(|error| {
                self.cannot_set("integer", option, value, error.to_string())
            }),
            _ => Err(self.cannot_set(
                "integer",
                option,
                value,
                format!("Not an integer value: {}", value),
            )),
        }
    }

    fn value_as_opt_string(&self, option: &str, value: &Value) -> Result<Option<String>> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text.clone())),
            _ => Err(self.cannot_set(
                "string",
                option,
                value,
                format!("Not a string value: {}", value),
            )),
        }
    }
}

impl PropertySection for LogConfigurationSection {
    fn declarations(&self) -> &'static [PropertyDeclaration] {
        DECLARATIONS
    }

    fn read_attribute(&self, name: &str) -> Result<Value> {
        match name {
            "enabled" => Ok(json!(self.enabled()?)),
            "file" => Ok(json!(self.file()?)),
            "file_rotate_external" => Ok(json!(self.file_rotate_external()?)),
            "file_rotate_at_size" => Ok(json!(self.file_rotate_at_size()?)),
            "file_rotate_each" => {
                let value = self
                    .file_rotate_each()?
                    .map(|(interval, unit)| format!("{} {}", interval, unit.canonical_name()));
                Ok(json!(value))
            }
            "file_rotate_count" => Ok(json!(self.file_rotate_count()?)),
            "syslog" => Ok(json!(self.get_string_or_none("syslog")?)),
            "enabled_groups" => Ok(json!(self.enabled_groups()?)),
            "windows_eventlog" => Ok(json!(self.windows_eventlog()?)),
            _ => Err(CommonsError::NoSuchAttribute(name.to_string())),
        }
    }

    fn write_attribute(&self, name: &str, value: &Value) -> Result<()> {
        match name {
            "enabled" => self.set_enabled(self.value_as_bool(name, value)?),
            "file" => {
                let text = self.value_as_opt_string(name, value)?;
                self.set_file(text.as_deref())
            }
            "file_rotate_external" => {
                self.set_file_rotate_external(self.value_as_bool(name, value)?)
            }
            "file_rotate_at_size" => {
                self.set_file_rotate_at_size(self.value_as_opt_integer(name, value)?)
            }
            "file_rotate_each" => {
                let text = self.value_as_opt_string(name, value)?;
                self.set_file_rotate_each(text.as_deref())
            }
            "file_rotate_count" => {
                self.set_file_rotate_count(self.value_as_opt_integer(name, value)?)
            }
            "syslog" => {
                let text = self.value_as_opt_string(name, value)?;
                self.set_syslog(text.as_deref())
            }
            "enabled_groups" => match value {
                Value::Array(entries) => {
                    let mut groups = Vec::new();
                    for entry in entries {
                        match entry.as_str() {
                            Some(group) => groups.push(group),
                            None => {
                                return Err(self.cannot_set(
                                    "string list",
                                    name,
                                    value,
                                    format!("Not a group name: {}", entry),
                                ))
                            }
                        }
                    }
                    self.set_enabled_groups(&groups)
                }
                Value::String(text) => {
                    let groups: Vec<&str> = text.split(',').map(str::trim).collect();
                    self.set_enabled_groups(&groups)
                }
                _ => Err(self.cannot_set(
                    "string list",
                    name,
                    value,
                    format!("Not a group list: {}", value),
                )),
            },
            "windows_eventlog" => {
                let text = self.value_as_opt_string(name, value)?;
                self.set_windows_eventlog(text.as_deref())
            }
            _ => Err(CommonsError::NoSuchAttribute(name.to_string())),
        }
    }

    fn child_section(&self, _name: &str) -> Option<Rc<dyn PropertySection>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn section(content: &str) -> LogConfigurationSection {
        let mut proxy = FileConfigurationProxy::from_reader(
            Cursor::new(content.to_string()),
            Some(LogConfigurationSection::defaults()),
        )
        .expect("reader should be consumed");
        proxy.load().expect("content should parse");
        proxy.create_missing_sections(&[CONFIGURATION_SECTION_LOG]);
        LogConfigurationSection::new(Rc::new(RefCell::new(proxy)))
    }

    #[test]
    fn test_rotate_each_all_units() {
        let cases = [
            ("second", "s"),
            ("seconds", "s"),
            ("minute", "m"),
            ("Minutes", "m"),
            ("hour", "h"),
            ("HOURS", "h"),
            ("day", "d"),
            ("days", "d"),
            ("midnight", "midnight"),
            ("midnights", "midnight"),
            ("monday", "w0"),
            ("mondays", "w0"),
            ("tuesday", "w1"),
            ("wednesday", "w2"),
            ("thursday", "w3"),
            ("friday", "w4"),
            ("saturday", "w5"),
            ("sundays", "w6"),
        ];
        for (unit_name, expected_code) in cases {
            let (interval, unit) = parse_rotate_each(&format!("2 {}", unit_name))
                .unwrap_or_else(|_| panic!("\"2 {}\" should parse", unit_name));
            assert_eq!(2, interval);
            assert_eq!(expected_code, unit.code());
        }
    }

    #[test]
    fn test_rotate_each_bad_token_count() {
        for value in ["hours", "1 2 hours", "2  hours!"] {
            let error = parse_rotate_each(value).unwrap_err();
            assert_eq!(1023, error.id(), "\"{}\" should fail", value);
        }
    }

    #[test]
    fn test_rotate_each_bad_interval() {
        let error = parse_rotate_each("two hours").unwrap_err();

        assert_eq!(1023, error.id());
        assert!(format!("{}", error).contains("not an integer"));
    }

    #[test]
    fn test_rotate_each_unknown_unit() {
        let error = parse_rotate_each("2 fortnights").unwrap_err();

        assert_eq!(1023, error.id());
        assert!(format!("{}", error).contains("Unknown interval type"));
    }

    #[test]
    fn test_file_rotate_each_disabled() {
        let section = section("[log]\nlog_file_rotate_each = Disabled\n");

        assert_eq!(None, section.file_rotate_each().unwrap());
    }

    #[test]
    fn test_file_rotate_each_normalized_on_write() {
        let section = section("[log]\n");

        section.set_file_rotate_each(Some("3 Hour")).unwrap();

        assert_eq!(
            Some("3 hours".to_string()),
            section
                .proxy()
                .borrow()
                .raw_value("log", "log_file_rotate_each")
        );
        assert_eq!(
            Some((3, RotationUnit::Hours)),
            section.file_rotate_each().unwrap()
        );
    }

    #[test]
    fn test_file_rotate_each_pair_write() {
        let section = section("[log]\n");

        section
            .set_file_rotate_each_interval(1, RotationUnit::Weekday(0))
            .unwrap();

        assert_eq!(
            Some((1, RotationUnit::Weekday(0))),
            section.file_rotate_each().unwrap()
        );
    }

    #[test]
    fn test_syslog_host_and_port() {
        let section = section("[log]\nlog_syslog = syslog.example.com:514\n");

        assert_eq!(
            Some(SyslogTarget::Host("syslog.example.com".to_string(), 514)),
            section.syslog().unwrap()
        );
    }

    #[test]
    fn test_syslog_path() {
        let section = section("[log]\nlog_syslog = /dev/log\n");

        assert_eq!(
            Some(SyslogTarget::Path("/dev/log".to_string())),
            section.syslog().unwrap()
        );
    }

    #[test]
    fn test_syslog_disabled() {
        let section = section("[log]\nlog_syslog = Disabled\n");

        assert_eq!(None, section.syslog().unwrap());
    }

    #[test]
    fn test_enabled_groups_parsing() {
        let section = section("[log]\nlog_enabled_groups = Auth, , TRANSFER ,\n");

        assert_eq!(
            vec!["auth".to_string(), "transfer".to_string()],
            section.enabled_groups().unwrap()
        );
    }

    #[test]
    fn test_enabled_groups_round_trip() {
        let section = section("[log]\n");

        section.set_enabled_groups(&["auth", "session"]).unwrap();

        assert_eq!(
            Some("auth, session".to_string()),
            section
                .proxy()
                .borrow()
                .raw_value("log", "log_enabled_groups")
        );
        assert_eq!(
            vec!["auth".to_string(), "session".to_string()],
            section.enabled_groups().unwrap()
        );
    }

    #[test]
    fn test_defaults_give_all_groups() {
        let section = section("[log]\n");

        assert_eq!(
            vec![CONFIGURATION_ALL_LOG_ENABLED_GROUPS.to_string()],
            section.enabled_groups().unwrap()
        );
        assert!(section.enabled().unwrap());
        assert_eq!(0, section.file_rotate_at_size().unwrap());
        assert_eq!(0, section.file_rotate_count().unwrap());
        assert_eq!(None, section.file().unwrap());
        assert_eq!(
            Some((0, RotationUnit::Seconds)),
            section.file_rotate_each().unwrap()
        );
    }
}
