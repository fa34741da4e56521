//! Lookup configuration stored as TOML (e.g. `jsonupdate.toml`).

use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::lookup::{DEFAULT_NAMESPACES, TagLookup};

/// Lookup configuration (TOML).
///
/// Missing fields default to the built-in namespace order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LookupConfig {
    /// Recognized tag namespaces, highest priority first.
    pub namespaces: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
        }
    }
}

impl LookupConfig {
    pub fn validate(&self) -> Result<()> {
        if self.namespaces.is_empty() {
            return Err(anyhow!("namespaces must be a non-empty array"));
        }
        let mut seen = HashSet::new();
        for namespace in &self.namespaces {
            if namespace.trim().is_empty() {
                return Err(anyhow!("namespaces must not contain blank entries"));
            }
            if !seen.insert(namespace.as_str()) {
                return Err(anyhow!("duplicate namespace '{namespace}'"));
            }
        }
        Ok(())
    }

    /// Lookup honoring this configuration's namespace order.
    pub fn tag_lookup(&self) -> TagLookup {
        TagLookup::new(self.namespaces.iter().cloned())
    }
}

impl FromStr for LookupConfig {
    type Err = anyhow::Error;

    fn from_str(contents: &str) -> Result<Self> {
        let cfg: LookupConfig = toml::from_str(contents).context("parse lookup config")?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Read the lookup configuration at `path`.
///
/// A file that does not exist yields the built-in namespace order.
pub fn load_config(path: &Path) -> Result<LookupConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no lookup config, using default namespaces");
            return Ok(LookupConfig::default());
        }
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let cfg = contents
        .parse::<LookupConfig>()
        .with_context(|| format!("load {}", path.display()))?;
    debug!(path = %path.display(), namespaces = ?cfg.namespaces, "lookup config loaded");
    Ok(cfg)
}

/// Persist `cfg` at `path`, replacing any previous file in one rename.
pub fn write_config(path: &Path, cfg: &LookupConfig) -> Result<()> {
    cfg.validate()?;
    let body = toml::to_string_pretty(cfg).context("serialize lookup config")?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("stage lookup config in {}", dir.display()))?;
    staged
        .write_all(body.as_bytes())
        .context("write staged lookup config")?;
    staged
        .persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
