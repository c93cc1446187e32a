use std::time::Duration;
use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};

use crate::monitoring::EndpointSpec;
use crate::validation::{self, ValidationResult};

pub const DEFAULT_LOGFILE: &str = "epoch_dashboard_log.md";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config {}", .path.display())]
    ReadFailed {
        path: path::PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config {}", .path.display())]
    WriteFailed {
        path: path::PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}", .path.display())]
    ParseFailed {
        path: path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no config directory available, set XDG_CONFIG_HOME or HOME")]
    ConfigPathUnavailable,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Status log strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    /// Rewrite the whole table after every tick
    #[default]
    Snapshot,
    /// Append rows for transitions only (legacy log format)
    Append,
}

impl fmt::Display for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persistence::Snapshot => write!(f, "snapshot"),
            Persistence::Append => write!(f, "append"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: Dashboard,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub interval_seconds: u64,
    pub timeout_ms: u64,
    pub log_file: path::PathBuf,
    pub persistence: Persistence,
    pub notifications: bool,
}

impl Dashboard {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            interval_seconds: 10,
            timeout_ms: 1000,
            log_file: DEFAULT_LOGFILE.into(),
            persistence: Persistence::default(),
            notifications: true,
        }
    }
}

fn default_endpoints() -> Vec<EndpointSpec> {
    vec![
        EndpointSpec::tcp("Website", "198.185.159.145", 80),
        EndpointSpec::tcp("Auth Server", "198.244.165.233", 3724),
        EndpointSpec::tcp("Kezan (PvE)", "198.244.165.233", 8085),
        EndpointSpec::tcp("Gurubashi (PvP)", "198.244.165.233", 8086),
        EndpointSpec::tcp("Cloudflare", "1.1.1.1", 443),
    ]
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/epoch-dashboard/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("epoch-dashboard/config.toml"))
}

impl Default for Config {
    fn default() -> Self {
        Self { dashboard: Dashboard::default(), endpoints: default_endpoints() }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Dashboard")?;
        write_1(f, "Refresh Interval (s)", &self.dashboard.interval_seconds)?;
        write_1(f, "Probe Timeout (ms)", &self.dashboard.timeout_ms)?;
        write_1(f, "Status Log", &self.dashboard.log_file.display())?;
        write_1(f, "Persistence", &self.dashboard.persistence)?;
        write_1(f, "Notifications", &self.dashboard.notifications)?;
        write_title_1(f, "Endpoints")?;
        for endpoint in &self.endpoints {
            write_1(f, &endpoint.name, &endpoint.address())?;
            if let crate::monitoring::ProbeKind::Content { unavailable_marker } = &endpoint.probe {
                write_2(f, "Unavailable Marker", unavailable_marker)?;
            }
        }

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/epoch-dashboard/config.toml
    ///  or the specified path if one does not exist
    ///
    /// ```rust,ignore
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| Error::ReadFailed { path: config_path.clone(), source })?;
            toml::from_str(raw_string.as_str())
                .map_err(|source| Error::ParseFailed { path: config_path, source })
        } else {
            tracing::info!(path = %config_path.display(), "writing default configuration");
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| Error::WriteFailed { path: path.to_path_buf(), source })?;
        }

        fs::write(path, config_str).map_err(|source| Error::WriteFailed { path: path.to_path_buf(), source })
    }

    /// Check everything the dashboard relies on before the first tick
    pub fn validate(&self) -> Result<(), Error> {
        let result = validation::validate_interval(self.dashboard.interval_seconds)
            .and_then(|| validation::validate_timeout_ms(self.dashboard.timeout_ms))
            .and_then(|| validation::validate_endpoints(&self.endpoints));

        match result {
            ValidationResult { is_valid: true, .. } => Ok(()),
            ValidationResult { error, .. } => {
                Err(Error::Invalid(error.unwrap_or_else(|| "Validation failed".to_string())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::ProbeKind;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::from_config(Some(&path)).unwrap();

        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::from_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn extension_is_normalised_to_toml() {
        let dir = tempfile::tempdir().unwrap();

        Config::from_config(Some(dir.path().join("dashboard"))).unwrap();

        assert!(dir.path().join("dashboard.toml").exists());
    }

    #[test]
    fn parses_tcp_and_content_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[dashboard]
interval_seconds = 30
persistence = "append"

[[endpoints]]
name = "Auth Server"
target = "198.244.165.233"
probe = { type = "tcp", port = 3724 }

[[endpoints]]
name = "Realm Status"
target = "https://status.example.com/realms"
probe = { type = "content", unavailable_marker = "Realm is offline" }
"#,
        )
        .unwrap();

        let config = Config::from_config(Some(&path)).unwrap();

        assert_eq!(config.dashboard.interval_seconds, 30);
        assert_eq!(config.dashboard.timeout_ms, 1000);
        assert_eq!(config.dashboard.persistence, Persistence::Append);
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0].probe, ProbeKind::Tcp { port: 3724 });
        assert_eq!(
            config.endpoints[1].probe,
            ProbeKind::Content { unavailable_marker: "Realm is offline".into() }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[[endpoints]]\nname = \"Auth\"\nprobe = { type = \"ping\" }\n").unwrap();

        let err = Config::from_config(Some(&path)).unwrap_err();

        assert!(matches!(err, Error::ParseFailed { .. }));
    }

    #[test]
    fn validate_rejects_duplicate_names_and_bad_interval() {
        let mut config = Config::default();
        config.endpoints.push(EndpointSpec::tcp("Website", "10.0.0.1", 80));
        assert!(matches!(config.validate(), Err(Error::Invalid(msg)) if msg.contains("Duplicate")));

        let mut config = Config::default();
        config.dashboard.interval_seconds = 0;
        assert!(matches!(config.validate(), Err(Error::Invalid(_))));
    }

    #[test]
    fn display_lists_endpoints() {
        let rendered = Config::default().to_string();

        assert!(rendered.contains("Auth Server: 198.244.165.233:3724"));
        assert!(rendered.contains("Persistence: snapshot"));
    }
}
