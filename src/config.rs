//! Configuration for the rollup tool.

use crate::core::spec::{WindowSpec, WindowSpecError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from the optional config file.
///
/// Every field may be overridden on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default window size, e.g. `"1d"`
    pub window: Option<String>,

    /// IANA time zone for window alignment; the system zone when unset
    pub timezone: Option<String>,

    /// Order report rows by window start
    pub sorted: bool,
}

impl Config {
    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if !config_path.exists() {
            if required {
                return Err(ConfigError::IoError(format!(
                    "config file not found: {}",
                    config_path.display()
                )));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("log-rollup")
            .join("config.json")
    }

    /// Pick the window spec from the command line, falling back to the file.
    pub fn resolve_window(&self, cli: Option<&str>) -> Result<WindowSpec, ConfigError> {
        let raw = cli
            .or(self.window.as_deref())
            .ok_or(ConfigError::MissingWindow)?;
        WindowSpec::parse(raw).map_err(ConfigError::InvalidWindow)
    }

    /// Pick the time zone from the command line, falling back to the file.
    ///
    /// `None` means the system's local zone.
    pub fn resolve_timezone(&self, cli: Option<&str>) -> Result<Option<chrono_tz::Tz>, ConfigError> {
        match cli.or(self.timezone.as_deref()) {
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidTimezone(name.to_string())),
            None => Ok(None),
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    MissingWindow,
    InvalidWindow(WindowSpecError),
    InvalidTimezone(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::MissingWindow => {
                write!(f, "No window size given (use --window or set \"window\" in the config file)")
            }
            ConfigError::InvalidWindow(e) => write!(f, "{e}"),
            ConfigError::InvalidTimezone(tz) => write!(f, "Unknown time zone: {tz}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidWindow(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::WindowUnit;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.window.is_none());
        assert!(config.timezone.is_none());
        assert!(!config.sorted);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"window": "2h", "timezone": "Europe/Berlin"}}"#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.window.as_deref(), Some("2h"));
        assert_eq!(config.timezone.as_deref(), Some("Europe/Berlin"));
        assert!(!config.sorted);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::IoError(_))
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ window: ").unwrap();
        assert!(matches!(
            Config::load(Some(&bad)),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = Config {
            window: Some("1d".to_string()),
            timezone: Some("Europe/Berlin".to_string()),
            sorted: false,
        };

        assert_eq!(config.resolve_window(None).unwrap().unit(), WindowUnit::Day);
        assert_eq!(config.resolve_window(Some("15m")).unwrap().unit(), WindowUnit::Minute);
        assert_eq!(
            config.resolve_timezone(Some("America/New_York")).unwrap(),
            Some(chrono_tz::America::New_York)
        );
        assert_eq!(
            config.resolve_timezone(None).unwrap(),
            Some(chrono_tz::Europe::Berlin)
        );
    }

    #[test]
    fn test_resolve_errors() {
        let config = Config::default();

        assert!(matches!(
            config.resolve_window(None),
            Err(ConfigError::MissingWindow)
        ));
        assert!(matches!(
            config.resolve_window(Some("5x")),
            Err(ConfigError::InvalidWindow(WindowSpecError::InvalidUnit(_)))
        ));
        assert!(matches!(
            config.resolve_timezone(Some("Mars/Olympus")),
            Err(ConfigError::InvalidTimezone(_))
        ));
        assert_eq!(config.resolve_timezone(None).unwrap(), None);
    }
}
