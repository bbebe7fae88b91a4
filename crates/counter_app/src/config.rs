//! Optional RON configuration for the service binary.
//!
//! Every field is optional; anything missing falls back to the defaults. The
//! logger is not running yet when this is read, so problems are collected in
//! `warnings` and logged by the caller.

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use counter_logging::LogDestination;
use counter_service::ServiceSettings;
use log::LevelFilter;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PersistedConfig {
    bind_addr: Option<String>,
    max_body_bytes: Option<usize>,
    require_json_content_type: Option<bool>,
    log_level: Option<String>,
    log_destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    File(PathBuf),
    Defaults,
}

#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub service: ServiceSettings,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
    pub source: ConfigSource,
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceSettings::default(),
            log_level: LevelFilter::Info,
            log_destination: LogDestination::Terminal,
            source: ConfigSource::Defaults,
            warnings: Vec::new(),
        }
    }
}

pub(crate) fn load(path: &Path) -> AppConfig {
    let mut config = AppConfig::default();

    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return config,
        Err(err) => {
            config
                .warnings
                .push(format!("Failed to read config from {:?}: {}", path, err));
            return config;
        }
    };

    let persisted: PersistedConfig = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            config
                .warnings
                .push(format!("Failed to parse config from {:?}: {}", path, err));
            return config;
        }
    };

    config.source = ConfigSource::File(path.to_path_buf());
    apply(&mut config, persisted);
    config
}

fn apply(config: &mut AppConfig, persisted: PersistedConfig) {
    if let Some(addr) = persisted.bind_addr {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => config.service.bind_addr = addr,
            Err(err) => config
                .warnings
                .push(format!("Ignoring bind_addr {:?}: {}", addr, err)),
        }
    }
    if let Some(max) = persisted.max_body_bytes {
        config.service.max_body_bytes = max;
    }
    if let Some(require) = persisted.require_json_content_type {
        config.service.require_json_content_type = require;
    }
    if let Some(level) = persisted.log_level {
        match level.parse::<LevelFilter>() {
            Ok(level) => config.log_level = level,
            Err(_) => config
                .warnings
                .push(format!("Ignoring unknown log_level {:?}", level)),
        }
    }
    if let Some(name) = persisted.log_destination {
        match LogDestination::from_name(&name) {
            Some(destination) => config.log_destination = destination,
            None => config
                .warnings
                .push(format!("Ignoring unknown log_destination {:?}", name)),
        }
    }
}
