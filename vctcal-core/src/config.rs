//! Global vctcal configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Duration;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{VctError, VctResult};
use crate::model::{Stage, StageDef, StageRegistry};
use crate::season::Season;

static DEFAULT_CALENDAR_PATH: &str = "vct-2026.ics";
static DEFAULT_STAGES_DIR: &str = "calendars";

/// Global configuration at ~/.config/vctcal/config.toml
///
/// Every key is optional. `VCTCAL_*` environment variables override the file
/// (`VCTCAL_CALENDAR_PATH`, `VCTCAL_FETCH_CONCURRENCY`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VctConfig {
    /// Main calendar file; `~` is expanded.
    pub calendar_path: PathBuf,
    /// Directory for per-stage calendars written with `--save-stage`.
    pub stages_dir: PathBuf,
    pub series_name: String,
    pub calendar_name: String,
    /// Year assumed for source dates, which omit it.
    pub season_year: i32,
    pub match_duration_hours: i64,
    /// IANA zone the source reports times in.
    pub source_timezone: String,
    pub base_url: String,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub fetch_concurrency: usize,
    /// Region tokens the fetcher drops (e.g. `["china"]`).
    pub excluded_regions: Vec<String>,
    /// Replaces the built-in stage table when present.
    pub stages: BTreeMap<String, StageDef>,
}

impl Default for VctConfig {
    fn default() -> Self {
        VctConfig {
            calendar_path: PathBuf::from(DEFAULT_CALENDAR_PATH),
            stages_dir: PathBuf::from(DEFAULT_STAGES_DIR),
            series_name: "VCT 2026".to_string(),
            calendar_name: "Valorant Champions Tour".to_string(),
            season_year: 2026,
            match_duration_hours: crate::constants::DEFAULT_MATCH_DURATION_HOURS,
            source_timezone: "Asia/Jakarta".to_string(),
            base_url: "https://www.vlr.gg".to_string(),
            request_delay_ms: 1000,
            request_timeout_secs: 20,
            fetch_concurrency: 2,
            excluded_regions: Vec::new(),
            stages: StageRegistry::default().definitions().clone(),
        }
    }
}

impl VctConfig {
    pub fn config_path() -> VctResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VctError::Config("Could not determine config directory".into()))?
            .join("vctcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> VctResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> VctResult<Self> {
        let config: VctConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("VCTCAL").separator("__"))
            .build()
            .map_err(|e| VctError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| VctError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> VctResult<()> {
        if self.match_duration_hours <= 0 {
            return Err(VctError::Config(format!(
                "match_duration_hours must be positive, got {}",
                self.match_duration_hours
            )));
        }
        if self.fetch_concurrency == 0 {
            return Err(VctError::Config("fetch_concurrency must be at least 1".into()));
        }
        self.source_timezone()?;
        self.registry()?;
        Ok(())
    }

    pub fn calendar_path(&self) -> PathBuf {
        expand(&self.calendar_path)
    }

    /// Where `--save-stage` writes a stage-only calendar.
    pub fn stage_path(&self, stage: &Stage) -> PathBuf {
        expand(&self.stages_dir).join(format!("{}.ics", stage.token()))
    }

    pub fn registry(&self) -> VctResult<StageRegistry> {
        StageRegistry::new(self.stages.clone())
    }

    pub fn source_timezone(&self) -> VctResult<chrono_tz::Tz> {
        self.source_timezone.parse().map_err(|_| {
            VctError::Config(format!("unknown source_timezone '{}'", self.source_timezone))
        })
    }

    /// The immutable per-run settings handed to the core.
    pub fn to_season(&self) -> VctResult<Season> {
        Ok(Season {
            series_name: self.series_name.clone(),
            calendar_name: self.calendar_name.clone(),
            registry: self.registry()?,
            match_duration: Duration::hours(self.match_duration_hours),
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> VctResult<()> {
        let contents = format!(
            "\
# vctcal configuration

# Main calendar file:
# calendar_path = \"{DEFAULT_CALENDAR_PATH}\"

# Where --save-stage writes per-stage calendars:
# stages_dir = \"{DEFAULT_STAGES_DIR}\"

# Event titles and calendar name:
# series_name = \"VCT 2026\"
# calendar_name = \"Valorant Champions Tour\"
# match_duration_hours = 2

# Source settings:
# season_year = 2026
# source_timezone = \"Asia/Jakarta\"
# base_url = \"https://www.vlr.gg\"
# request_delay_ms = 1000
# request_timeout_secs = 20
# fetch_concurrency = 2
# excluded_regions = [\"china\"]

# Stage table (replaces the built-in one when set):
# [stages.kickoff]
# name = \"Kickoff\"
# vlr_id = 45
# active = true
# round_labels = {{ ur2 = \"Upper Semifinal\" }}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VctError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| VctError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        VctConfig::create_default_config(&path).unwrap();

        let config = VctConfig::load_from(&path).unwrap();
        assert_eq!(config.calendar_path, PathBuf::from("vct-2026.ics"));
        assert_eq!(config.stages, VctConfig::default().stages);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
match_duration_hours = 3
excluded_regions = ["china"]

[stages.kickoff]
name = "Kickoff"
vlr_id = 45
active = true

[stages.kickoff.round_labels]
ur2 = "Upper Semifinal"
"#,
        )
        .unwrap();

        let config = VctConfig::load_from(&path).unwrap();
        let season = config.to_season().unwrap();

        assert_eq!(season.match_duration, Duration::hours(3));
        assert_eq!(config.excluded_regions, vec!["china".to_string()]);
        assert_eq!(season.registry.tokens().collect::<Vec<_>>(), vec!["kickoff"]);
        assert_eq!(season.series_name, "VCT 2026");
    }

    #[test]
    fn rejects_bad_timezone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "source_timezone = \"Mars/Olympus\"\n").unwrap();

        assert!(matches!(
            VctConfig::load_from(&path),
            Err(VctError::Config(_))
        ));
    }

    #[test]
    fn stage_path_uses_token() {
        let config = VctConfig::default();
        let stage = config.registry().unwrap().resolve("Masters").unwrap();
        assert_eq!(
            config.stage_path(&stage),
            PathBuf::from("calendars/masters.ics")
        );
    }
}
