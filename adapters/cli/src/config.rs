//! Versioned TOML configuration read by the command-line adapter.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use campus_runner_core::CellCoord;
use campus_runner_session::SessionConfig;
use campus_runner_system_tasks::Task;
use campus_runner_world::{CampusLayout, LayoutError};
use serde::Deserialize;
use thiserror::Error;

use crate::campus;

/// Configuration format understood by this binary.
pub(crate) const CONFIG_VERSION: u32 = 1;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("could not read config file {}", path.display())]
    Read {
        /// Location of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this format.
    #[error("could not parse config")]
    Parse(#[from] toml::de::Error),
    /// The file declares a format this binary does not understand.
    #[error("config version {found} is not supported")]
    UnsupportedVersion {
        /// Version declared by the file.
        found: u32,
    },
    /// The custom campus could not be assembled.
    #[error("invalid campus layout")]
    Layout(#[from] LayoutError),
}

/// Parsed configuration file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CliConfig {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    session: SessionSection,
    campus: Option<CampusSection>,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionSection {
    time_limit_secs: Option<u64>,
    seed: Option<u64>,
    map_events: Option<bool>,
    npcs: Option<bool>,
    first_event_delay_secs: Option<u64>,
    event_interval_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CampusSection {
    rows: Vec<String>,
    start: Option<[u32; 2]>,
    #[serde(default)]
    buildings: BTreeMap<String, [u32; 2]>,
}

const fn default_version() -> u32 {
    CONFIG_VERSION
}

impl CliConfig {
    /// Reads and validates the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parses and validates configuration text.
    pub(crate) fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
            });
        }
        Ok(config)
    }

    /// Session settings with `seed` taking precedence over the file.
    pub(crate) fn session_config(&self, seed: Option<u64>) -> SessionConfig {
        let defaults = SessionConfig::default();
        let section = &self.session;
        let time_limit = section
            .time_limit_secs
            .map_or(defaults.time_limit(), Duration::from_secs);
        let seed = seed.or(section.seed).unwrap_or(defaults.rng_seed());

        SessionConfig::new(time_limit, seed)
            .with_map_events(section.map_events.unwrap_or(defaults.map_events()))
            .with_npcs(section.npcs.unwrap_or(defaults.npcs()))
            .with_event_timing(
                section
                    .first_event_delay_secs
                    .map_or(defaults.first_event_delay(), Duration::from_secs),
                section
                    .event_interval_secs
                    .map_or(defaults.event_interval(), Duration::from_secs),
            )
    }

    /// Custom campus from the file, or the built-in one.
    pub(crate) fn layout(&self) -> Result<CampusLayout, ConfigError> {
        let Some(campus) = &self.campus else {
            return Ok(campus::layout()?);
        };

        let mut layout = CampusLayout::from_markers(campus.rows.as_slice())?;
        if let Some([column, row]) = campus.start {
            layout = layout.with_start(CellCoord::new(column, row))?;
        }
        for (name, [column, row]) in &campus.buildings {
            layout = layout.with_building(name.clone(), CellCoord::new(*column, *row))?;
        }
        Ok(layout)
    }

    /// Task catalogue from the file, falling back to the built-in errands
    /// when the file supplies neither tasks nor a campus of its own.
    pub(crate) fn tasks(&self) -> Vec<Task> {
        if self.tasks.is_empty() && self.campus.is_none() {
            campus::tasks()
        } else {
            self.tasks.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_built_in_campus() {
        let config = CliConfig::from_toml("").expect("empty config is valid");
        let layout = config.layout().expect("built-in campus");
        assert_eq!(layout.columns(), 20);
        assert_eq!(config.tasks().len(), 7);
        assert_eq!(
            config.session_config(None).time_limit(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn command_line_seed_overrides_file() {
        let config = CliConfig::from_toml(
            r#"
            version = 1

            [session]
            seed = 11
            time_limit_secs = 90
            npcs = false
            "#,
        )
        .expect("valid config");

        assert_eq!(config.session_config(None).rng_seed(), 11);
        let session = config.session_config(Some(3));
        assert_eq!(session.rng_seed(), 3);
        assert_eq!(session.time_limit(), Duration::from_secs(90));
        assert!(!session.npcs());
        assert!(session.map_events());
    }

    #[test]
    fn custom_campus_and_tasks_are_loaded() {
        let config = CliConfig::from_toml(
            r######"
            [campus]
            rows = ["#####", "#...#", "#####"]
            start = [1, 1]
            buildings = { Lab = [3, 1] }

            [[tasks]]
            id = "lab"
            name = "Lab Session"
            building = "Lab"
            riddle = "Beakers and burners"
            points = 40
            hint = "East end"
            "######,
        )
        .expect("valid config");

        let layout = config.layout().expect("valid campus");
        assert_eq!(layout.buildings().get("Lab"), Some(&CellCoord::new(3, 1)));
        assert_eq!(config.tasks().len(), 1);
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        let error = CliConfig::from_toml("version = 2").expect_err("future version");
        assert!(matches!(error, ConfigError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn buildings_on_walls_are_rejected() {
        let config = CliConfig::from_toml(
            r######"
            [campus]
            rows = ["###", "#.#", "###"]
            buildings = { Vault = [0, 0] }
            "######,
        )
        .expect("syntactically valid config");

        assert!(matches!(
            config.layout(),
            Err(ConfigError::Layout(LayoutError::NotWalkable { .. }))
        ));
    }
}
