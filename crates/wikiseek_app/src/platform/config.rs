//! Command line flags and the optional RON configuration file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use wikiseek_core::{WikiEndpoint, WikiSites};
use wikiseek_engine::FetchSettings;
use wikiseek_logging::seek_warn;

const DEFAULT_CONFIG_FILE: &str = "wikiseek.ron";
const DEFAULT_LOCAL_STORE: &str = "wikiseek-local.json";
const DEFAULT_LOG_FILE: &str = "wikiseek.log";

#[derive(Debug, Parser)]
#[command(name = "wikiseek", version, about = "Search the Path of Exile wikis with live suggestions")]
pub struct Cli {
    /// RON configuration file (defaults to ./wikiseek.ron when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Text to start with in the search box.
    #[arg(long)]
    pub query: Option<String>,
    /// Wiki to search; remembered for next time.
    #[arg(long, value_enum)]
    pub wiki: Option<WikiArg>,
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WikiArg {
    Poe1,
    Poe2,
}

impl From<WikiArg> for WikiEndpoint {
    fn from(arg: WikiArg) -> Self {
        match arg {
            WikiArg::Poe1 => WikiEndpoint::Poe1,
            WikiArg::Poe2 => WikiEndpoint::Poe2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub poe1_base: Option<String>,
    pub poe2_base: Option<String>,
    pub profile_store: Option<PathBuf>,
    pub local_store: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Reads `explicit`, or the default file if it exists. An explicit path
    /// that cannot be read is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn sites(&self) -> WikiSites {
        let mut sites = WikiSites::default();
        for (endpoint, base) in [
            (WikiEndpoint::Poe1, &self.poe1_base),
            (WikiEndpoint::Poe2, &self.poe2_base),
        ] {
            let Some(base) = base else { continue };
            match sites.clone().with_base(endpoint, base) {
                Ok(updated) => sites = updated,
                Err(err) => {
                    seek_warn!("Ignoring {} base {:?}: {}", endpoint.label(), base, err);
                }
            }
        }
        sites
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..FetchSettings::default()
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }

    pub fn log_file(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.log_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Primary preference file; `None` when no profile directory is known.
    pub fn profile_store_path(&self) -> Option<PathBuf> {
        self.profile_store
            .clone()
            .or_else(|| profile_dir().map(|dir| dir.join("wikiseek").join("prefs.ron")))
    }

    pub fn local_store_path(&self) -> PathBuf {
        self.local_store
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_STORE))
    }
}

fn profile_dir() -> Option<PathBuf> {
    let from_env = |name: &str| std::env::var_os(name).filter(|value| !value.is_empty());
    from_env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| from_env("APPDATA").map(PathBuf::from))
        .or_else(|| from_env("HOME").map(|home| PathBuf::from(home).join(".config")))
}
