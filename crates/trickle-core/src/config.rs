//! trickle.toml configuration parser.
//!
//! Every section and key is optional. Missing values fall back to the
//! defaults below; the daemon's CLI flags override whatever the file says.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PROCESS_TIME: u32 = 5;
pub const DEFAULT_CONTENT_PROCESS_TIME: u32 = 10;
pub const DEFAULT_UNIT: &str = "1s";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrickleConfig {
    pub server: Option<ServerConfig>,
    pub delay: Option<DelayConfig>,
    pub templates: Option<TemplatesConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelayConfig {
    pub process_time: Option<u32>,
    pub content_process_time: Option<u32>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub dir: Option<PathBuf>,
    pub trim_blocks: Option<bool>,
}

/// Resolved delay parameters handed to request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySettings {
    /// Progress lines for the primary pages.
    pub process_time: u32,
    /// Progress lines for the long content stream.
    pub content_process_time: u32,
    /// Wall-clock length of one simulated step.
    pub unit: Duration,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            process_time: DEFAULT_PROCESS_TIME,
            content_process_time: DEFAULT_CONTENT_PROCESS_TIME,
            unit: Duration::from_secs(1),
        }
    }
}

impl TrickleConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn delay_settings(&self) -> ConfigResult<DelaySettings> {
        let defaults = DelaySettings::default();
        let Some(delay) = &self.delay else {
            return Ok(defaults);
        };

        let unit = match &delay.unit {
            Some(raw) => parse_duration(raw).ok_or_else(|| ConfigError::Duration {
                field: "delay.unit",
                value: raw.clone(),
            })?,
            None => defaults.unit,
        };

        Ok(DelaySettings {
            process_time: delay.process_time.unwrap_or(defaults.process_time),
            content_process_time: delay
                .content_process_time
                .unwrap_or(defaults.content_process_time),
            unit,
        })
    }

    pub fn bind_addr(&self) -> ConfigResult<SocketAddr> {
        let server = self.server.clone().unwrap_or_default();
        let bind = server.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let ip: IpAddr = bind.parse().map_err(|e| ConfigError::Invalid {
            field: "server.bind",
            reason: format!("{bind:?}: {e}"),
        })?;
        Ok(SocketAddr::new(ip, server.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Template directory, or `fallback` when the file does not set one.
    pub fn templates_dir(&self, fallback: &Path) -> PathBuf {
        self.templates
            .as_ref()
            .and_then(|t| t.dir.clone())
            .unwrap_or_else(|| fallback.to_path_buf())
    }

    pub fn trim_blocks(&self) -> bool {
        self.templates
            .as_ref()
            .and_then(|t| t.trim_blocks)
            .unwrap_or(true)
    }
}

/// Parse a duration such as `"1s"`, `"250ms"`, `"2m"` or `"3"` (seconds).
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = TrickleConfig::from_toml_str("").unwrap();
        let delay = config.delay_settings().unwrap();
        assert_eq!(delay.process_time, 5);
        assert_eq!(delay.content_process_time, 10);
        assert_eq!(delay.unit, Duration::from_secs(1));
        assert_eq!(
            config.bind_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
        assert!(config.trim_blocks());
    }

    #[test]
    fn parse_full() {
        let toml_str = r#"
[server]
bind = "127.0.0.1"
port = 9000

[delay]
process_time = 3
content_process_time = 6
unit = "250ms"

[templates]
dir = "/srv/trickle/jinja"
trim_blocks = false
"#;
        let config = TrickleConfig::from_toml_str(toml_str).unwrap();
        let delay = config.delay_settings().unwrap();
        assert_eq!(delay.process_time, 3);
        assert_eq!(delay.content_process_time, 6);
        assert_eq!(delay.unit, Duration::from_millis(250));
        assert_eq!(
            config.bind_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            config.templates_dir(Path::new("/unused")),
            PathBuf::from("/srv/trickle/jinja")
        );
        assert!(!config.trim_blocks());
    }

    #[test]
    fn partial_delay_section_keeps_other_defaults() {
        let config = TrickleConfig::from_toml_str("[delay]\nprocess_time = 2\n").unwrap();
        let delay = config.delay_settings().unwrap();
        assert_eq!(delay.process_time, 2);
        assert_eq!(delay.content_process_time, 10);
        assert_eq!(delay.unit, Duration::from_secs(1));
    }

    #[test]
    fn invalid_unit_is_rejected() {
        let config = TrickleConfig::from_toml_str("[delay]\nunit = \"soon\"\n").unwrap();
        let err = config.delay_settings().unwrap_err();
        assert!(matches!(err, ConfigError::Duration { field: "delay.unit", .. }));
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let config = TrickleConfig::from_toml_str("[server]\nbind = \"localhost:80\"\n").unwrap();
        assert!(matches!(
            config.bind_addr(),
            Err(ConfigError::Invalid { field: "server.bind", .. })
        ));
    }

    #[test]
    fn unknown_type_is_parse_error() {
        let err = TrickleConfig::from_toml_str("[server]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn templates_dir_falls_back() {
        let config = TrickleConfig::default();
        assert_eq!(
            config.templates_dir(Path::new("/opt/jinja")),
            PathBuf::from("/opt/jinja")
        );
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trickle.toml");
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();

        let config = TrickleConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 8123);
    }

    #[test]
    fn from_file_missing_is_read_error() {
        let err = TrickleConfig::from_file(Path::new("/nonexistent/trickle.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = TrickleConfig::from_toml_str("[delay]\nunit = \"2s\"\n").unwrap();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("2s"));
    }

    #[test]
    fn parse_duration_forms() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration("999999999999999999m"), None);
    }

    #[test]
    fn overflowing_unit_is_a_duration_error() {
        let toml = r#"
[delay]
unit = "999999999999999999m"
"#;
        let config = TrickleConfig::from_toml_str(toml).unwrap();
        assert!(matches!(
            config.delay_settings(),
            Err(ConfigError::Duration { field: "delay.unit", .. })
        ));
    }
}
