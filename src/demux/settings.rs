//! Run configuration: defaults, then an optional file, then `DEMUX_*`
//! environment variables. Command-line flags are applied on top by the caller.

use std::path::Path;
use std::str::FromStr;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use dotenvy::dotenv;

use crate::demux::constants::{DEFAULT_MAX_MISMATCHES, DEFAULT_QUALITY_PREFIX_LEN, ENV_PREFIX};
use crate::demux::error::DemuxError;
use crate::demux::scorer::ScorerKind;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub trim: bool,
    pub max_mismatches: usize,
    pub overwrite: bool,
    pub output_name_prefix: String,
    pub scorer: ScorerKind,
    pub quality_prefix_len: usize,
    pub max_score: Option<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trim: true,
            max_mismatches: DEFAULT_MAX_MISMATCHES,
            overwrite: false,
            output_name_prefix: String::new(),
            scorer: ScorerKind::Hamming,
            quality_prefix_len: DEFAULT_QUALITY_PREFIX_LEN,
            max_score: None,
        }
    }
}

impl RunConfig {
    /// Inclusive distance limit for the selected scorer.
    pub fn threshold(&self) -> Option<f64> {
        match self.scorer {
            ScorerKind::Hamming => Some(self.max_mismatches as f64),
            ScorerKind::QualityWeighted => self.max_score,
        }
    }

    pub fn from_settings(settings: &Config) -> Result<Self, DemuxError> {
        let scorer_name = settings.get_string("scorer")?;
        let scorer = ScorerKind::from_str(&scorer_name).map_err(|_| {
            ConfigError::Message(format!("unknown scorer `{}`", scorer_name))
        })?;

        let max_score = match settings.get_float("max_score") {
            Ok(value) => Some(value),
            Err(ConfigError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            trim: settings.get_bool("trim")?,
            max_mismatches: non_negative(settings, "max_mismatches")?,
            overwrite: settings.get_bool("overwrite")?,
            output_name_prefix: settings.get_string("output_name_prefix")?,
            scorer,
            quality_prefix_len: non_negative(settings, "quality_prefix_len")?,
            max_score,
        })
    }
}

fn non_negative(settings: &Config, key: &str) -> Result<usize, DemuxError> {
    let value = settings.get_int(key)?;
    usize::try_from(value).map_err(|_| {
        DemuxError::Config(ConfigError::Message(format!(
            "{} must be a non-negative integer, got {}",
            key, value
        )))
    })
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = RunConfig::default();
    ConfigBuilder::<DefaultState>::default()
        .set_default("trim", defaults.trim)?
        .set_default("max_mismatches", defaults.max_mismatches as i64)?
        .set_default("overwrite", defaults.overwrite)?
        .set_default("output_name_prefix", defaults.output_name_prefix)?
        .set_default("scorer", defaults.scorer.to_string())?
        .set_default("quality_prefix_len", defaults.quality_prefix_len as i64)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn layered_settings(
    config_file: Option<&Path>,
    environment: Environment,
) -> Result<RunConfig, DemuxError> {
    let mut builder = builder_with_defaults()?;
    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }
    let settings = builder.add_source(environment).build()?;

    RunConfig::from_settings(&settings)
}

pub fn load_settings(config_file: Option<&Path>) -> Result<RunConfig, DemuxError> {
    dotenv().ok();
    layered_settings(config_file, environment())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = builder_with_defaults().unwrap().build().unwrap();
        let config = RunConfig::from_settings(&settings).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.threshold(), Some(1.0));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "trim = false\nmax_mismatches = 2\noutput_name_prefix = \"run1_\"\n\
             scorer = \"quality-weighted\"\nmax_score = 150.5"
        )
        .unwrap();
        file.flush().unwrap();

        let config = load_settings(Some(file.path())).unwrap();
        assert!(!config.trim);
        assert_eq!(config.max_mismatches, 2);
        assert_eq!(config.output_name_prefix, "run1_");
        assert_eq!(config.scorer, ScorerKind::QualityWeighted);
        assert_eq!(config.threshold(), Some(150.5));
        assert!(!config.overwrite);
    }

    fn fake_env(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "max_mismatches = 2\noutput_name_prefix = \"run1_\"").unwrap();
        file.flush().unwrap();

        let env = fake_env(&[
            ("DEMUX_MAX_MISMATCHES", "0"),
            ("DEMUX_OVERWRITE", "true"),
            ("DEMUX_SCORER", "quality-weighted"),
            ("DEMUX_MAX_SCORE", "50"),
        ]);
        let config = layered_settings(Some(file.path()), env).unwrap();

        assert_eq!(config.max_mismatches, 0);
        assert!(config.overwrite);
        assert_eq!(config.output_name_prefix, "run1_");
        assert_eq!(config.scorer, ScorerKind::QualityWeighted);
        assert_eq!(config.threshold(), Some(50.0));
    }

    #[test]
    fn test_unprefixed_env_ignored() {
        let env = fake_env(&[("MAX_MISMATCHES", "4"), ("OTHER_TRIM", "false")]);
        let config = layered_settings(None, env).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_negative_mismatches_rejected() {
        let settings = builder_with_defaults()
            .unwrap()
            .set_override("max_mismatches", -1i64)
            .unwrap()
            .build()
            .unwrap();
        assert!(RunConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_unknown_scorer_rejected() {
        let settings = builder_with_defaults()
            .unwrap()
            .set_override("scorer", "levenshtein")
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(
            RunConfig::from_settings(&settings),
            Err(DemuxError::Config(_))
        ));
    }

    #[test]
    fn test_quality_weighted_without_max_score_has_no_threshold() {
        let config = RunConfig {
            scorer: ScorerKind::QualityWeighted,
            ..RunConfig::default()
        };
        assert_eq!(config.threshold(), None);
    }
}
