//! Plugin configuration.
//!
//! Each setting is taken from the first source that provides it: the
//! command-line flag, then the listed environment variables in order, then
//! the Vela parameter and secret files mounted into the plugin container.

use crate::cli::Cli;
use crate::logging::LogLevel;
use crate::summary::DEFAULT_MAX_COL_WIDTH;
use crate::{AppError, AppResult};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

pub const PARAMETER_DIR: &str = "/vela/parameters/build-summary";
pub const SECRET_DIR: &str = "/vela/secrets/build-summary";

/// Where one setting may come from, besides its flag.
struct Setting {
    env: &'static [&'static str],
    file: &'static str,
}

const LOG_LEVEL: Setting = Setting {
    env: &["PARAMETER_LOG_LEVEL", "BUILD_SUMMARY_LOG_LEVEL"],
    file: "log_level",
};
const BUILD_NUMBER: Setting = Setting {
    env: &["PARAMETER_NUMBER", "BUILD_SUMMARY_NUMBER", "VELA_BUILD_NUMBER"],
    file: "number",
};
const SERVER: Setting = Setting {
    env: &["PARAMETER_SERVER", "BUILD_SUMMARY_SERVER", "VELA_ADDR"],
    file: "server",
};
const TOKEN: Setting = Setting {
    env: &["PARAMETER_TOKEN", "BUILD_SUMMARY_TOKEN", "VELA_NETRC_PASSWORD"],
    file: "token",
};
const ORG: Setting = Setting {
    env: &["PARAMETER_ORG", "BUILD_SUMMARY_ORG", "VELA_REPO_ORG"],
    file: "org",
};
const REPO: Setting = Setting {
    env: &["PARAMETER_REPO", "BUILD_SUMMARY_REPO", "VELA_REPO_NAME"],
    file: "repo",
};
const MAX_COL_WIDTH: Setting = Setting {
    env: &["PARAMETER_MAX_COL_WIDTH", "BUILD_SUMMARY_MAX_COL_WIDTH"],
    file: "max_col_width",
};

/// Environment variables and file directories consulted after the flags.
pub struct Sources {
    env: HashMap<String, String>,
    dirs: Vec<PathBuf>,
}

impl Sources {
    /// The process environment plus the standard Vela mount points.
    pub fn from_process() -> Self {
        Sources {
            env: std::env::vars().collect(),
            dirs: vec![PathBuf::from(PARAMETER_DIR), PathBuf::from(SECRET_DIR)],
        }
    }

    pub fn new(env: HashMap<String, String>, dirs: Vec<PathBuf>) -> Self {
        Sources { env, dirs }
    }

    /// Resolves only the log level, so logging can start before the
    /// remaining settings are read.
    pub fn log_level(&self, flag: Option<String>) -> AppResult<LogLevel> {
        Ok(self
            .resolve(flag, &LOG_LEVEL)?
            .map(|value| LogLevel::parse(&value))
            .unwrap_or_default())
    }

    fn resolve(&self, flag: Option<String>, setting: &Setting) -> AppResult<Option<String>> {
        if let Some(value) = flag {
            return Ok(Some(value));
        }

        for key in setting.env {
            if let Some(value) = self.env.get(*key).filter(|v| !v.is_empty()) {
                trace!(key, "setting taken from environment");
                return Ok(Some(value.clone()));
            }
        }

        for dir in &self.dirs {
            if let Some(value) = read_value(&dir.join(setting.file))? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }
}

fn read_value(path: &Path) -> AppResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let value = contents.trim();
            if value.is_empty() {
                Ok(None)
            } else {
                trace!(path = %path.display(), "setting taken from file");
                Ok(Some(value.to_string()))
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow::Error::new(err)
            .context(format!("failed to read {}", path.display()))
            .into()),
    }
}

/// The build to summarise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub number: i64,
}

impl BuildConfig {
    pub fn validate(&self) -> AppResult<()> {
        trace!("validating build plugin configuration");

        if self.number == 0 {
            return Err(AppError::Config("no build number provided".to_string()));
        }
        Ok(())
    }
}

/// Connection details for the Vela server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub app_name: String,
    pub app_version: String,
    pub server: String,
    pub token: String,
}

impl ClientConfig {
    pub fn validate(&self) -> AppResult<()> {
        trace!("validating config plugin configuration");

        if self.server.is_empty() {
            return Err(AppError::Config("no config server provided".to_string()));
        }
        if self.token.is_empty() {
            return Err(AppError::Config("no config token provided".to_string()));
        }
        Ok(())
    }
}

/// Repository the build belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoConfig {
    pub org: String,
    pub name: String,
}

impl RepoConfig {
    pub fn validate(&self) -> AppResult<()> {
        trace!("validating repo plugin configuration");

        if self.org.is_empty() {
            return Err(AppError::Config("no repo org provided".to_string()));
        }
        if self.name.is_empty() {
            return Err(AppError::Config("no repo name provided".to_string()));
        }
        Ok(())
    }
}

/// Fully resolved plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub log_level: LogLevel,
    pub max_col_width: usize,
    pub build: BuildConfig,
    pub client: ClientConfig,
    pub repo: RepoConfig,
}

impl PluginConfig {
    /// Resolves every setting. Malformed numbers fail here; missing values
    /// are left empty for [`PluginConfig::validate`] to report.
    pub fn load(cli: Cli, sources: &Sources) -> AppResult<Self> {
        let log_level = sources.log_level(cli.log_level)?;

        let number: i64 = match sources.resolve(cli.build_number, &BUILD_NUMBER)? {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::Config(format!("invalid build number {value:?}")))?,
            None => 0,
        };

        let max_col_width: usize = match sources.resolve(cli.max_col_width, &MAX_COL_WIDTH)? {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::Config(format!("invalid max column width {value:?}")))?,
            None => DEFAULT_MAX_COL_WIDTH,
        };

        Ok(PluginConfig {
            log_level,
            max_col_width,
            build: BuildConfig { number },
            client: ClientConfig {
                app_name: env!("CARGO_PKG_NAME").to_string(),
                app_version: env!("CARGO_PKG_VERSION").to_string(),
                server: sources.resolve(cli.server, &SERVER)?.unwrap_or_default(),
                token: sources.resolve(cli.token, &TOKEN)?.unwrap_or_default(),
            },
            repo: RepoConfig {
                org: sources.resolve(cli.org, &ORG)?.unwrap_or_default(),
                name: sources.resolve(cli.repo, &REPO)?.unwrap_or_default(),
            },
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        trace!("validating plugin configuration");

        self.build.validate()?;
        self.client.validate()?;
        self.repo.validate()
    }
}
