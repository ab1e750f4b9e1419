//! Configuration handling for the TapeScript tools including loading and defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Configuration file name inside the user's config directory.
const CONFIG_FILE: &str = "tapescript.toml";

/// Configuration model for the tools loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Bytecode path written by `-c` when `-o` is not given.
    pub default_output: PathBuf,
    /// Extension (without the dot) marking source programs.
    pub source_extension: String,
    /// Extension (without the dot) marking compiled bytecode.
    pub bytecode_extension: String,
    /// Emit a trace event for every executed instruction.
    pub trace: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_output: PathBuf::from("out.cf"),
            source_extension: "bf".to_string(),
            bytecode_extension: "cf".to_string(),
            trace: false,
        }
    }
}

impl ToolConfig {
    /// Loads `explicit` when given, otherwise the per-user file if it exists,
    /// otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading configuration from {}", path.display()))?;
        let cfg: Self = toml::from_str(&data)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        Ok(cfg)
    }

    /// Persist the configuration to `path`.
    #[cfg(test)]
    fn save(&self, path: &Path) -> anyhow::Result<()> {
        let serialized = toml::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("writing configuration to {}", path.display()))?;
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("dev", "ZobieLabs", "tapescript")?;
    Some(dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: ToolConfig = toml::from_str("trace = true").unwrap();
        assert!(cfg.trace);
        assert_eq!(cfg.default_output, PathBuf::from("out.cf"));
        assert_eq!(cfg.source_extension, "bf");
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let cfg = ToolConfig {
            default_output: PathBuf::from("build/prog.cf"),
            ..ToolConfig::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(ToolConfig::load(Some(&path)).unwrap(), cfg);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ToolConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
