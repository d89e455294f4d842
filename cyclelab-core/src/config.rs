//! Strategy parameters: immutable for the duration of a run.
//!
//! Parameters load from TOML. Every field is optional in the file and falls back
//! to the classic cycle-bottom defaults (40-bar cycle, 2% envelope, one bar of
//! cross-up confirmation, 2% risk per trade).
//!
//! ```toml
//! cycle_length = 40
//! envelope_pct = 2.0
//! confirm_bars = 1
//! min_space_frac = 0.33
//! risk_pct = 0.02
//! max_risk_pct = 0.05
//! min_size_policy = "clamp_to_one"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid parameter `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What the sizer does when the risk budget buys less than one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinSizePolicy {
    /// Trade one unit anyway. Realized risk can exceed the budget on small accounts.
    #[default]
    ClampToOne,
    /// Keep the size at zero; no order is sent.
    Skip,
}

/// Risk parameters of the cycle-bottom strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleBottomParams {
    /// Cycle length P: moving-average lookback and minimum history.
    pub cycle_length: usize,
    /// Depth of the lower envelope below the moving average, in percent.
    pub envelope_pct: f64,
    /// How many bars back the cross-up must have happened (0 = this bar).
    pub confirm_bars: usize,
    /// Minimum bar gap between entry signals as a fraction of P.
    pub min_space_frac: f64,
    /// Fraction of cash risked per trade.
    pub risk_pct: f64,
    /// Cap on the entry-to-stop distance as a fraction of entry price.
    pub max_risk_pct: f64,
    pub min_size_policy: MinSizePolicy,
}

impl Default for CycleBottomParams {
    fn default() -> Self {
        Self {
            cycle_length: 40,
            envelope_pct: 2.0,
            confirm_bars: 1,
            min_space_frac: 0.33,
            risk_pct: 0.02,
            max_risk_pct: 0.05,
            min_size_policy: MinSizePolicy::ClampToOne,
        }
    }
}

impl CycleBottomParams {
    /// Parse and validate parameters from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a TOML parameter file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_length < 1 {
            return Err(invalid("cycle_length", "must be >= 1"));
        }
        if !self.envelope_pct.is_finite() || !(0.0..100.0).contains(&self.envelope_pct) {
            return Err(invalid("envelope_pct", "must be in [0, 100)"));
        }
        if !self.min_space_frac.is_finite() || self.min_space_frac < 0.0 {
            return Err(invalid("min_space_frac", "must be finite and >= 0"));
        }
        if !self.risk_pct.is_finite() || self.risk_pct <= 0.0 || self.risk_pct > 1.0 {
            return Err(invalid("risk_pct", "must be in (0, 1]"));
        }
        if !self.max_risk_pct.is_finite() || self.max_risk_pct <= 0.0 || self.max_risk_pct > 1.0 {
            return Err(invalid("max_risk_pct", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// Bars that must exist before the detector evaluates: `max(P, confirm_bars + 1)`.
    pub fn required_history(&self) -> usize {
        self.cycle_length.max(self.confirm_bars + 1)
    }

    /// Minimum gap between entry signals: `max(1, round(P * min_space_frac))`.
    ///
    /// Halves round to even (13.5 -> 14, 12.5 -> 12).
    pub fn min_bars_between(&self) -> u64 {
        let raw = (self.cycle_length as f64 * self.min_space_frac).round_ties_even();
        (raw as u64).max(1)
    }

    /// Multiplier that turns the moving average into the lower envelope.
    pub fn envelope_factor(&self) -> f64 {
        1.0 - self.envelope_pct / 100.0
    }

    /// Deterministic BLAKE3 fingerprint of every parameter value.
    ///
    /// Floats are rendered with `{:?}` so the text round-trips exactly.
    pub fn fingerprint(&self) -> String {
        let canonical = format!(
            "cycle_length={};envelope_pct={:?};confirm_bars={};min_space_frac={:?};\
             risk_pct={:?};max_risk_pct={:?};min_size_policy={:?}",
            self.cycle_length,
            self.envelope_pct,
            self.confirm_bars,
            self.min_space_frac,
            self.risk_pct,
            self.max_risk_pct,
            self.min_size_policy,
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
