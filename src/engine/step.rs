//! Derivation steps and number formatting.
//!
//! Every value the engine derives is recorded as a [`DerivationStep`]. Its
//! `Display` implementation renders the preformatted text block shown to the
//! user:
//!
//! ```text
//! To find final velocity you can use this formula based on given values:
//!     V = v + a·t
//! Reformat the formula:
//!     V = v + a·t
//! Substitute in:
//!     V = 0 + 9.8·2
//! Result:
//!     V = 19.6 m/s
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::Symbol;

/// Placeholder printed for unknown values.
pub const UNKNOWN: &str = "—";

/// Rounding used for all user-facing numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimals: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(3)
    }
}

impl NumberFormat {
    /// Create a format keeping `decimals` digits after the point.
    #[must_use]
    pub const fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Round and print in shortest form: `19.6`, `4`, never `-0`.
    #[must_use]
    pub fn value(&self, x: f64) -> String {
        if !x.is_finite() {
            return x.to_string();
        }
        let factor = 10f64.powi(self.decimals as i32);
        let scaled = x * factor;
        // Past 2^53 there are no fractional digits left to round.
        if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
            return format!("{x}");
        }
        let rounded = scaled.round() / factor;
        // Collapses -0.0 to 0.0.
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{rounded}")
    }

    /// Like [`Self::value`], with [`UNKNOWN`] for absent values.
    #[must_use]
    pub fn optional(&self, x: Option<f64>) -> String {
        x.map_or_else(|| UNKNOWN.to_string(), |v| self.value(v))
    }

    /// Value with an explicit leading sign (`+8.544`, `-8.544`).
    #[must_use]
    pub fn signed(&self, x: f64) -> String {
        let text = self.value(x);
        if text.starts_with('-') {
            text
        } else {
            format!("+{text}")
        }
    }

    /// `"<symbol> = <value> <unit>"`, the result line of a step.
    #[must_use]
    pub fn assignment(&self, symbol: Symbol, x: f64) -> String {
        format!("{} = {} {}", symbol.glyph(), self.value(x), symbol.unit())
    }
}

/// One recorded derivation, in causal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationStep {
    /// Symbol solved for.
    pub symbol: Symbol,
    /// Identity used, in symbolic form.
    pub equation: String,
    /// Identity rearranged to isolate the target.
    pub rearranged: String,
    /// Rearranged identity with numbers substituted.
    pub substituted: String,
    /// Derived value (unrounded).
    pub value: f64,
    /// Result line with units, e.g. `t = 4 s`.
    pub result: String,
}

impl fmt::Display for DerivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "To find {} you can use this formula based on given values:",
            self.symbol.name()
        )?;
        writeln!(f, "    {}", self.equation)?;
        writeln!(f, "Reformat the formula:")?;
        writeln!(f, "    {}", self.rearranged)?;
        writeln!(f, "Substitute in:")?;
        writeln!(f, "    {}", self.substituted)?;
        writeln!(f, "Result:")?;
        write!(f, "    {}", self.result)
    }
}
