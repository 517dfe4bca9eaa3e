use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Tuning parameters for the [`Sketcher`](super::sketcher::Sketcher) layout engine.
///
/// Lengths are in depiction units; `repulsion_cutoff`, `max_step` and
/// `fragment_spacing` are multiples of `bond_length`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub bond_length: f64,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
    pub spring_constant: f64,
    pub repulsion_constant: f64,
    pub repulsion_cutoff: f64,
    pub max_step: f64,
    pub fragment_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bond_length: 50.0,
            max_iterations: 500,
            convergence_threshold: 1e-3,
            spring_constant: 0.2,
            repulsion_constant: 0.5,
            repulsion_cutoff: 1.6,
            max_step: 0.2,
            fragment_spacing: 1.5,
        }
    }
}

impl LayoutConfig {
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is finite and inside its usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("bond_length", self.bond_length)?;
        non_negative("convergence_threshold", self.convergence_threshold)?;
        positive("spring_constant", self.spring_constant)?;
        if self.spring_constant > 1.0 {
            return Err(invalid(
                "spring_constant",
                format!("must not exceed 1.0, got {}", self.spring_constant),
            ));
        }
        non_negative("repulsion_constant", self.repulsion_constant)?;
        positive("repulsion_cutoff", self.repulsion_cutoff)?;
        positive("max_step", self.max_step)?;
        non_negative("fragment_spacing", self.fragment_spacing)?;
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be finite and positive, got {}", value)))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(
            name,
            format!("must be finite and non-negative, got {}", value),
        ))
    }
}

#[derive(Default)]
pub struct LayoutConfigBuilder {
    bond_length: Option<f64>,
    max_iterations: Option<usize>,
    convergence_threshold: Option<f64>,
    spring_constant: Option<f64>,
    repulsion_constant: Option<f64>,
    repulsion_cutoff: Option<f64>,
    max_step: Option<f64>,
    fragment_spacing: Option<f64>,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_length(mut self, length: f64) -> Self {
        self.bond_length = Some(length);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = Some(threshold);
        self
    }
    pub fn spring_constant(mut self, constant: f64) -> Self {
        self.spring_constant = Some(constant);
        self
    }
    pub fn repulsion_constant(mut self, constant: f64) -> Self {
        self.repulsion_constant = Some(constant);
        self
    }
    pub fn repulsion_cutoff(mut self, cutoff: f64) -> Self {
        self.repulsion_cutoff = Some(cutoff);
        self
    }
    pub fn max_step(mut self, step: f64) -> Self {
        self.max_step = Some(step);
        self
    }
    pub fn fragment_spacing(mut self, spacing: f64) -> Self {
        self.fragment_spacing = Some(spacing);
        self
    }

    /// Fills unset parameters from [`LayoutConfig::default`] and validates the result.
    pub fn build(self) -> Result<LayoutConfig, ConfigError> {
        let defaults = LayoutConfig::default();
        let config = LayoutConfig {
            bond_length: self.bond_length.unwrap_or(defaults.bond_length),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            convergence_threshold: self
                .convergence_threshold
                .unwrap_or(defaults.convergence_threshold),
            spring_constant: self.spring_constant.unwrap_or(defaults.spring_constant),
            repulsion_constant: self
                .repulsion_constant
                .unwrap_or(defaults.repulsion_constant),
            repulsion_cutoff: self.repulsion_cutoff.unwrap_or(defaults.repulsion_cutoff),
            max_step: self.max_step.unwrap_or(defaults.max_step),
            fragment_spacing: self.fragment_spacing.unwrap_or(defaults.fragment_spacing),
        };
        config.validate()?;
        Ok(config)
    }
}
