use anyhow::{Context, Result};
use attendance_payroll::{FinancialTables, WorkRules};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_TITLE: &str = "Monthly Attendance & Salary Report";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfigSource")]
pub struct ConfigSource {
    pub source: Option<LogSource>,
    pub timeout_secs: u64,
    pub device_secret: String,
    pub server_secret: String,
}

impl Default for ConfigSource {
    fn default() -> Self {
        ConfigSource {
            source: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            device_secret: String::new(),
            server_secret: String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigSource {
    url: Option<String>,
    file: Option<PathBuf>,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
    #[serde(default)]
    device_secret: String,
    #[serde(default)]
    server_secret: String,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl TryFrom<RawConfigSource> for ConfigSource {
    type Error = String;

    fn try_from(raw: RawConfigSource) -> Result<Self, Self::Error> {
        let source = match (raw.url, raw.file) {
            (Some(url), None) => Some(LogSource::Url(url)),
            (None, Some(file)) => Some(LogSource::File(file)),
            (None, None) => None,
            (Some(_), Some(_)) => {
                return Err(
                    "source section cannot have both 'url' and 'file' specified".to_string(),
                );
            }
        };
        if raw.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }

        Ok(ConfigSource {
            source,
            timeout_secs: raw.timeout_secs,
            device_secret: raw.device_secret,
            server_secret: raw.server_secret,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigReport {
    pub company_name: String,
    pub title: String,
    pub output: Option<PathBuf>,
}

impl Default for ConfigReport {
    fn default() -> Self {
        ConfigReport {
            company_name: String::new(),
            title: DEFAULT_TITLE.to_owned(),
            output: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: ConfigSource,
    pub rules: WorkRules,
    pub report: ConfigReport,
    pub financials: FinancialTables,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<(PathBuf, Self)> {
        let base_dir = path.parent().map(ToOwned::to_owned).unwrap_or_default();

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok((base_dir, config))
    }

    pub fn find_and_load() -> Result<Option<(PathBuf, Self)>> {
        let config_locations = [
            Path::new("attendance-payroll.toml"),
            Path::new(".attendance-payroll.toml"),
        ];

        for location in &config_locations {
            if location.exists() {
                return Self::load_from_file(location).map(Some);
            }
        }

        Ok(None)
    }

    /// Relative file paths in the config are relative to the config file.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        if let Some(LogSource::File(file)) = &mut self.source.source
            && file.is_relative()
        {
            *file = base_dir.join(&*file);
        }
        if let Some(output) = &mut self.report.output
            && output.is_relative()
        {
            *output = base_dir.join(&*output);
        }
    }
}
