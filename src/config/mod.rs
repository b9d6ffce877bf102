//! Configuration system with YAML schema and validation.
//!
//! Mistake-proofing happens in three layers:
//! - Type-safe configuration structs
//! - Schema validation via serde (`deny_unknown_fields`) and `validator`
//! - Runtime semantic validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{KinError, KinResult};

/// Top-level solver configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct KinConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Equation engine settings.
    #[validate(nested)]
    #[serde(default)]
    pub solver: SolverConfig,

    /// Number formatting.
    #[validate(nested)]
    #[serde(default)]
    pub display: DisplayConfig,

    /// Motion playback sampling.
    #[validate(nested)]
    #[serde(default)]
    pub playback: PlaybackConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl KinConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> KinResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> KinResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> KinConfigBuilder {
        KinConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> KinResult<()> {
        let solver = &self.solver;
        for (name, value) in [
            ("division_epsilon", solver.division_epsilon),
            ("consistency_tolerance", solver.consistency_tolerance),
            ("positive_time_epsilon", solver.positive_time_epsilon),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(KinError::config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        self.playback.validate_semantic()?;

        Ok(())
    }
}

impl Default for KinConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            solver: SolverConfig::default(),
            display: DisplayConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct KinConfigBuilder {
    knowns_policy: Option<KnownsPolicy>,
    sign_policy: Option<SignPolicy>,
    enumerate_variants: Option<bool>,
    decimals: Option<u32>,
    dt: Option<f64>,
    max_duration: Option<f64>,
}

impl KinConfigBuilder {
    /// Set how many known inputs are accepted.
    #[must_use]
    pub const fn knowns_policy(mut self, policy: KnownsPolicy) -> Self {
        self.knowns_policy = Some(policy);
        self
    }

    /// Set the sign rule for square-root inversions.
    #[must_use]
    pub const fn sign_policy(mut self, policy: SignPolicy) -> Self {
        self.sign_policy = Some(policy);
        self
    }

    /// Return both roots of the two-root case instead of one signed root.
    #[must_use]
    pub const fn enumerate_variants(mut self, enabled: bool) -> Self {
        self.enumerate_variants = Some(enabled);
        self
    }

    /// Set the number of displayed decimals.
    #[must_use]
    pub const fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Set the playback timestep in seconds.
    #[must_use]
    pub const fn timestep(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Set the playback cap used when no time is known.
    #[must_use]
    pub const fn max_duration(mut self, secs: f64) -> Self {
        self.max_duration = Some(secs);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> KinConfig {
        let mut config = KinConfig::default();

        if let Some(policy) = self.knowns_policy {
            config.solver.knowns_policy = policy;
        }
        if let Some(policy) = self.sign_policy {
            config.solver.sign_policy = policy;
        }
        if let Some(enabled) = self.enumerate_variants {
            config.solver.enumerate_variants = enabled;
        }
        if let Some(decimals) = self.decimals {
            config.display.decimals = decimals;
        }
        if let Some(dt) = self.dt {
            config.playback.dt = dt;
        }
        if let Some(secs) = self.max_duration {
            config.playback.max_duration = secs;
        }

        config
    }
}

/// How many known inputs the validator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownsPolicy {
    /// Three or more knowns; extras are cross-checked for consistency.
    #[default]
    AtLeast,
    /// Exactly three knowns (form-entry mode).
    Exactly,
}

/// Sign of the root chosen when inverting `V² = v² + 2·a·d` for a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Same sign as the known companion velocity (non-negative if it is zero).
    #[default]
    MatchCompanion,
    /// Always the non-negative root.
    NonNegative,
}

/// Equation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SolverConfig {
    /// Known-count policy.
    #[serde(default)]
    pub knowns_policy: KnownsPolicy,
    /// Root sign policy for square-root inversions.
    #[serde(default)]
    pub sign_policy: SignPolicy,
    /// Return both roots when `a`, `d` and one velocity are known. When off,
    /// propagation picks one root by `sign_policy`.
    #[serde(default = "default_enumerate_variants")]
    pub enumerate_variants: bool,
    /// Denominators at or below this magnitude count as zero.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_division_epsilon")]
    pub division_epsilon: f64,
    /// Relative tolerance for identity residuals on a solved state.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_consistency_tolerance")]
    pub consistency_tolerance: f64,
    /// Times above this count as positive when auto-picking a variant.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_positive_time_epsilon")]
    pub positive_time_epsilon: f64,
}

const fn default_enumerate_variants() -> bool {
    true
}

const fn default_division_epsilon() -> f64 {
    1e-12
}

const fn default_consistency_tolerance() -> f64 {
    1e-6
}

const fn default_positive_time_epsilon() -> f64 {
    1e-9
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            knowns_policy: KnownsPolicy::default(),
            sign_policy: SignPolicy::default(),
            enumerate_variants: default_enumerate_variants(),
            division_epsilon: default_division_epsilon(),
            consistency_tolerance: default_consistency_tolerance(),
            positive_time_epsilon: default_positive_time_epsilon(),
        }
    }
}

/// Number formatting for derivation text and result listings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DisplayConfig {
    /// Decimals kept when rounding for display.
    #[validate(range(max = 12))]
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

const fn default_decimals() -> u32 {
    3
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
        }
    }
}

/// Integrator used to replay a solved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// Semi-implicit Euler, first order.
    #[default]
    Euler,
    /// Störmer-Verlet, exact for constant acceleration.
    Verlet,
}

impl IntegratorKind {
    /// Name used in YAML and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::Verlet => "verlet",
        }
    }
}

impl std::fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IntegratorKind {
    type Err = KinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "verlet" => Ok(Self::Verlet),
            _ => Err(KinError::config(format!(
                "invalid integrator '{s}': expected 'euler' or 'verlet'"
            ))),
        }
    }
}

/// Motion playback sampling.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaybackConfig {
    /// Integration timestep in seconds.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Stop after this many seconds when no positive time is known.
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,
    /// Upper bound on integration steps for one playback.
    #[validate(range(min = 1))]
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
    /// Integration scheme.
    #[serde(default)]
    pub integrator: IntegratorKind,
}

impl PlaybackConfig {
    /// Check timestep, duration and step budget.
    ///
    /// Runs on every loaded configuration and again after command-line
    /// overrides are merged in.
    ///
    /// # Errors
    ///
    /// Returns [`KinError::Config`] naming the first bad setting.
    pub fn validate_semantic(&self) -> KinResult<()> {
        if self.dt.is_nan() || self.dt <= 0.0 {
            return Err(KinError::config("Playback timestep must be positive"));
        }
        if self.dt > 1.0 {
            return Err(KinError::config(
                "Playback timestep should not exceed 1 second",
            ));
        }
        if !(self.max_duration.is_finite() && self.max_duration > 0.0) {
            return Err(KinError::config("Playback max_duration must be positive"));
        }
        if self.max_steps == 0 {
            return Err(KinError::config("Playback max_steps must be at least 1"));
        }
        Ok(())
    }
}

const fn default_dt() -> f64 {
    0.016
}

const fn default_max_duration() -> f64 {
    60.0
}

const fn default_max_steps() -> u64 {
    10_000_000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            max_duration: default_max_duration(),
            max_steps: default_max_steps(),
            integrator: IntegratorKind::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = KinConfig::default();
        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.solver.knowns_policy, KnownsPolicy::AtLeast);
        assert_eq!(config.solver.sign_policy, SignPolicy::MatchCompanion);
        assert!(config.solver.enumerate_variants);
        assert!((config.solver.division_epsilon - 1e-12).abs() < f64::EPSILON);
        assert_eq!(config.display.decimals, 3);
        assert!((config.playback.dt - 0.016).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_builder() {
        let config = KinConfig::builder()
            .knowns_policy(KnownsPolicy::Exactly)
            .sign_policy(SignPolicy::NonNegative)
            .enumerate_variants(false)
            .decimals(5)
            .timestep(0.01)
            .max_duration(10.0)
            .build();
        assert_eq!(config.solver.knowns_policy, KnownsPolicy::Exactly);
        assert_eq!(config.solver.sign_policy, SignPolicy::NonNegative);
        assert!(!config.solver.enumerate_variants);
        assert_eq!(config.display.decimals, 5);
        assert!((config.playback.dt - 0.01).abs() < f64::EPSILON);
        assert!((config.playback.max_duration - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r#"
schema_version: "1.0"
solver:
  knowns_policy: exactly
  sign_policy: non_negative
  consistency_tolerance: 1.0e-8
display:
  decimals: 4
playback:
  dt: 0.02
"#;
        let config = KinConfig::from_yaml(yaml).expect("valid config");
        assert_eq!(config.solver.knowns_policy, KnownsPolicy::Exactly);
        assert_eq!(config.solver.sign_policy, SignPolicy::NonNegative);
        assert!((config.solver.consistency_tolerance - 1e-8).abs() < f64::EPSILON);
        assert!((config.solver.division_epsilon - 1e-12).abs() < f64::EPSILON);
        assert_eq!(config.display.decimals, 4);
        assert!((config.playback.max_duration - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_empty_yaml_uses_defaults() {
        let config = KinConfig::from_yaml("{}").expect("defaults");
        assert_eq!(config.display.decimals, 3);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result = KinConfig::from_yaml("unknown_section: 1\n");
        assert!(matches!(result, Err(KinError::YamlParse(_))));
    }

    #[test]
    fn test_config_validation_fails_too_many_decimals() {
        let result = KinConfig::from_yaml("display:\n  decimals: 20\n");
        assert!(matches!(result, Err(KinError::Validation(_))));
    }

    #[test]
    fn test_config_validation_fails_zero_epsilon() {
        let result = KinConfig::from_yaml("solver:\n  division_epsilon: 0.0\n");
        assert!(matches!(result, Err(KinError::Config { .. })));
    }

    #[test]
    fn test_config_validation_fails_negative_timestep() {
        let result = KinConfig::from_yaml("playback:\n  dt: -0.1\n");
        let err = result.expect_err("negative dt");
        assert!(err.to_string().contains("timestep"));
    }

    #[test]
    fn test_config_validation_fails_large_timestep() {
        let result = KinConfig::from_yaml("playback:\n  dt: 2.0\n");
        assert!(matches!(result, Err(KinError::Config { .. })));
    }

    #[test]
    fn test_config_playback_integrator_and_step_budget() {
        let config =
            KinConfig::from_yaml("playback:\n  integrator: verlet\n  max_steps: 5000\n")
                .expect("valid config");
        assert_eq!(config.playback.integrator, IntegratorKind::Verlet);
        assert_eq!(config.playback.max_steps, 5000);
        assert_eq!(KinConfig::default().playback.integrator, IntegratorKind::Euler);

        let result = KinConfig::from_yaml("playback:\n  max_steps: 0\n");
        assert!(matches!(result, Err(KinError::Validation(_))));
    }

    #[test]
    fn test_integrator_kind_from_str() {
        assert_eq!("verlet".parse::<IntegratorKind>().unwrap(), IntegratorKind::Verlet);
        assert_eq!("Euler".parse::<IntegratorKind>().unwrap(), IntegratorKind::Euler);
        assert!("rk4".parse::<IntegratorKind>().is_err());
        assert_eq!(IntegratorKind::Verlet.to_string(), "verlet");
    }

    #[test]
    fn test_playback_overrides_checked_like_loaded_config() {
        let mut playback = KinConfig::default().playback;
        assert!(playback.validate_semantic().is_ok());

        playback.dt = 5.0;
        let err = playback.validate_semantic().expect_err("dt above 1 s");
        assert!(err.to_string().contains("exceed 1 second"));

        playback.dt = 0.0;
        assert!(matches!(
            playback.validate_semantic(),
            Err(KinError::Config { .. })
        ));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "display:\n  decimals: 2").expect("write");
        let config = KinConfig::load(file.path()).expect("load");
        assert_eq!(config.display.decimals, 2);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = KinConfig::load("/nonexistent/kinesolve.yaml");
        assert!(matches!(result, Err(KinError::Io(_))));
    }
}
