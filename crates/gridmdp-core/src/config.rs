//! Configuration loading and typed config structures for gridmdp.
//!
//! The configuration lives in `gridmdp-config.yaml` at the project root.
//! Every constant of the MDP (grid size, rewards, slip probabilities,
//! discount factor, convergence parameters) is read from here and passed to
//! the solvers as an immutable value, so several configurations can be
//! solved in one process.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use gridmdp_types::{RewardTable, SlipProbabilities, SolverKind};
use gridmdp_world::{ASSIGNMENT_EXTENT, GridDimensions};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed correctly but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `gridmdp-config.yaml`. All fields have defaults
/// matching the classic 6x6 grid experiment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MdpConfig {
    /// Grid size and preset source.
    #[serde(default)]
    pub grid: GridConfig,

    /// Immediate reward per cell kind.
    #[serde(default)]
    pub rewards: RewardTable,

    /// Action outcome probabilities.
    #[serde(default)]
    pub transition: SlipProbabilities,

    /// Solver selection and convergence parameters.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Where and what to write after a run.
    #[serde(default)]
    pub output: OutputConfig,
}

impl MdpConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `GRIDMDP_PRESET` overrides `grid.preset`
    /// - `GRIDMDP_OUTPUT_DIR` overrides `output.directory`
    /// - `GRIDMDP_SOLVER` overrides `solver.algorithm`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GRIDMDP_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `GRIDMDP_SOLVER` names no known
    /// algorithm.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("GRIDMDP_PRESET") {
            self.grid.preset = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("GRIDMDP_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("GRIDMDP_SOLVER") {
            self.solver.algorithm = val.parse()?;
        }
        Ok(())
    }

    /// Check that every value is usable by the solvers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        if self.grid.columns == 0 || self.grid.rows == 0 {
            return invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid.columns, self.grid.rows
            ));
        }
        let builtin = (ASSIGNMENT_EXTENT, ASSIGNMENT_EXTENT);
        if self.grid.preset.is_none() && (self.grid.columns, self.grid.rows) != builtin {
            return invalid(format!(
                "a {}x{} grid needs a preset file; the built-in world is {}x{}",
                self.grid.columns, self.grid.rows, ASSIGNMENT_EXTENT, ASSIGNMENT_EXTENT
            ));
        }
        let discount = self.solver.discount;
        if !(discount > 0.0 && discount < 1.0) {
            return invalid(format!("discount must be in (0, 1), got {discount}"));
        }
        if !(self.solver.r_max.is_finite() && self.solver.r_max > 0.0) {
            return invalid(format!("r_max must be positive, got {}", self.solver.r_max));
        }
        if !(self.solver.c.is_finite() && self.solver.c > 0.0) {
            return invalid(format!("c must be positive, got {}", self.solver.c));
        }
        if self.solver.evaluation_sweeps == 0 {
            return invalid("evaluation_sweeps must be at least 1".to_owned());
        }
        if !self.transition.is_valid() {
            return invalid(format!(
                "transition probabilities must be non-negative and sum to 1, got {:?}",
                self.transition.as_array()
            ));
        }
        let rewards = [
            self.rewards.empty,
            self.rewards.positive_terminal,
            self.rewards.negative_terminal,
            self.rewards.wall,
        ];
        if rewards.iter().any(|r| !r.is_finite()) {
            return invalid(format!("rewards must be finite, got {rewards:?}"));
        }
        Ok(())
    }

    /// Grid extent as validated dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either extent is zero.
    pub fn dimensions(&self) -> Result<GridDimensions, ConfigError> {
        GridDimensions::new(self.grid.columns, self.grid.rows).map_err(|e| {
            ConfigError::Invalid {
                reason: e.to_string(),
            }
        })
    }
}

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    #[serde(default = "default_extent")]
    pub columns: usize,

    /// Number of rows.
    #[serde(default = "default_extent")]
    pub rows: usize,

    /// Preset file to load. The built-in 6x6 world is used when unset.
    #[serde(default)]
    pub preset: Option<PathBuf>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_extent(),
            rows: default_extent(),
            preset: None,
        }
    }
}

/// Which solver(s) to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Value iteration only.
    ValueIteration,
    /// Policy iteration only.
    PolicyIteration,
    /// Value iteration, then policy iteration on a fresh grid.
    #[default]
    Both,
}

impl Algorithm {
    /// The solvers to run, in order.
    pub fn solvers(self) -> Vec<SolverKind> {
        match self {
            Self::ValueIteration => vec![SolverKind::ValueIteration],
            Self::PolicyIteration => vec![SolverKind::PolicyIteration],
            Self::Both => vec![SolverKind::ValueIteration, SolverKind::PolicyIteration],
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "value_iteration" | "value" | "vi" => Ok(Self::ValueIteration),
            "policy_iteration" | "policy" | "pi" => Ok(Self::PolicyIteration),
            "both" | "all" => Ok(Self::Both),
            other => Err(ConfigError::Invalid {
                reason: format!("unknown solver algorithm: {other}"),
            }),
        }
    }
}

/// Solver parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolverConfig {
    /// Solver(s) to run.
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Discount factor `γ`, strictly between 0 and 1.
    #[serde(default = "default_discount")]
    pub discount: f64,

    /// Largest reward magnitude `R_max` used in the error bound.
    #[serde(default = "default_r_max")]
    pub r_max: f64,

    /// Error scale `c`; the tolerated policy loss is `ε = c * R_max`.
    #[serde(default = "default_c")]
    pub c: f64,

    /// Number of fixed-policy backups per policy-evaluation step (`k`).
    #[serde(default = "default_evaluation_sweeps")]
    pub evaluation_sweeps: u32,
}

impl SolverConfig {
    /// `ε = c * R_max`.
    pub fn epsilon(&self) -> f64 {
        self.c * self.r_max
    }

    /// Value-iteration stopping threshold `ε (1 - γ) / γ`.
    ///
    /// Stopping once the largest utility change is at most this value keeps
    /// the greedy policy within `2ε` of optimal.
    pub fn threshold(&self) -> f64 {
        self.epsilon() * ((1.0 - self.discount) / self.discount)
    }

    /// Largest attainable utility `R_max / (1 - γ)`.
    pub fn utility_upper_bound(&self) -> f64 {
        self.r_max / (1.0 - self.discount)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            discount: default_discount(),
            r_max: default_r_max(),
            c: default_c(),
            evaluation_sweeps: default_evaluation_sweeps(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Directory for history CSV files and JSON reports.
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Write the per-iteration utility history as CSV.
    #[serde(default = "default_true")]
    pub write_history: bool,

    /// Write the final per-cell result as JSON.
    #[serde(default = "default_true")]
    pub write_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            write_history: true,
            write_report: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_extent() -> usize {
    6
}

const fn default_discount() -> f64 {
    0.99
}

const fn default_r_max() -> f64 {
    1.0
}

const fn default_c() -> f64 {
    0.01
}

const fn default_evaluation_sweeps() -> u32 {
    40
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("logs")
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MdpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.columns, 6);
        assert_eq!(config.grid.rows, 6);
        assert_eq!(config.solver.discount, 0.99);
        assert_eq!(config.solver.evaluation_sweeps, 40);
        assert_eq!(config.solver.algorithm, Algorithm::Both);
        assert_eq!(config.rewards.empty, -0.04);
        assert_eq!(config.transition.forward, 0.8);
    }

    #[test]
    fn threshold_follows_error_bound() {
        let solver = SolverConfig::default();
        assert!((solver.epsilon() - 0.01).abs() < 1e-15);
        let expected = 0.01 * (0.01 / 0.99);
        assert!((solver.threshold() - expected).abs() < 1e-15);
        assert!((solver.utility_upper_bound() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
grid:
  columns: 4
  rows: 3
  preset: presets/small.txt

rewards:
  empty: -0.1
  positive_terminal: 2.0
  negative_terminal: -2.0
  wall: 0.0

transition:
  forward: 0.7
  left: 0.15
  right: 0.15

solver:
  algorithm: policy_iteration
  discount: 0.9
  r_max: 2.0
  c: 0.05
  evaluation_sweeps: 10

output:
  directory: out
  write_history: false
  write_report: true
";
        let config = MdpConfig::parse(yaml).unwrap();
        assert_eq!(config.grid.columns, 4);
        assert_eq!(config.grid.rows, 3);
        assert_eq!(config.grid.preset, Some(PathBuf::from("presets/small.txt")));
        assert_eq!(config.rewards.positive_terminal, 2.0);
        assert_eq!(config.transition.left, 0.15);
        assert_eq!(config.solver.algorithm, Algorithm::PolicyIteration);
        assert_eq!(config.solver.evaluation_sweeps, 10);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(!config.output.write_history);
        assert_eq!(config.dimensions().unwrap().columns(), 4);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = MdpConfig::parse("solver:\n  discount: 0.95\n").unwrap();
        assert_eq!(config.solver.discount, 0.95);
        // Everything else uses defaults
        assert_eq!(config.solver.c, 0.01);
        assert_eq!(config.grid.columns, 6);
        assert_eq!(config.rewards, RewardTable::default());
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(MdpConfig::parse("").is_ok());
    }

    #[test]
    fn discount_must_be_below_one() {
        for yaml in [
            "solver:\n  discount: 1.0\n",
            "solver:\n  discount: 0.0\n",
            "solver:\n  discount: 1.5\n",
        ] {
            assert!(matches!(
                MdpConfig::parse(yaml),
                Err(ConfigError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn slip_probabilities_must_sum_to_one() {
        let yaml = "transition:\n  forward: 0.9\n";
        assert!(matches!(
            MdpConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn zero_evaluation_sweeps_rejected() {
        let yaml = "solver:\n  evaluation_sweeps: 0\n";
        assert!(MdpConfig::parse(yaml).is_err());
    }

    #[test]
    fn zero_sized_grid_rejected() {
        let yaml = "grid:\n  columns: 0\n";
        assert!(MdpConfig::parse(yaml).is_err());
    }

    #[test]
    fn resized_grid_requires_preset() {
        let yaml = "grid:\n  columns: 12\n  rows: 12\n";
        assert!(matches!(
            MdpConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));

        let yaml = "grid:\n  columns: 12\n  rows: 12\n  preset: worlds/large.txt\n";
        let config = MdpConfig::parse(yaml).unwrap();
        assert_eq!(config.dimensions().unwrap().columns(), 12);
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = MdpConfig::parse("solver: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn algorithm_parses_aliases() {
        assert_eq!("value-iteration".parse::<Algorithm>().unwrap(), Algorithm::ValueIteration);
        assert_eq!("PI".parse::<Algorithm>().unwrap(), Algorithm::PolicyIteration);
        assert_eq!(" both ".parse::<Algorithm>().unwrap(), Algorithm::Both);
        assert!("q_learning".parse::<Algorithm>().is_err());
        assert_eq!(
            Algorithm::Both.solvers(),
            vec![SolverKind::ValueIteration, SolverKind::PolicyIteration]
        );
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("gridmdp-config.yaml");
        if path.exists() {
            let config = MdpConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
