//! Kinematic state management.
//!
//! A [`KinematicState`] maps the fixed five-symbol alphabet {V, v, d, a, t}
//! to optional values. Filling is monotonic: once a symbol holds a value the
//! solver never revises it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five constant-acceleration quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// Final velocity `V`.
    #[serde(rename = "V")]
    FinalVelocity,
    /// Initial velocity `v`.
    #[serde(rename = "v")]
    InitialVelocity,
    /// Displacement `d`.
    #[serde(rename = "d")]
    Displacement,
    /// Acceleration `a`.
    #[serde(rename = "a")]
    Acceleration,
    /// Elapsed time `t`.
    #[serde(rename = "t")]
    Time,
}

impl Symbol {
    /// All symbols in display order (V, v, d, a, t).
    pub const ALL: [Self; 5] = [
        Self::FinalVelocity,
        Self::InitialVelocity,
        Self::Displacement,
        Self::Acceleration,
        Self::Time,
    ];

    /// Order in which unknowns are scanned during propagation.
    pub const PRIORITY: [Self; 5] = [
        Self::InitialVelocity,
        Self::FinalVelocity,
        Self::Displacement,
        Self::Acceleration,
        Self::Time,
    ];

    /// Short ASCII code used for input and error messages.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FinalVelocity => "V",
            Self::InitialVelocity => "v",
            Self::Displacement => "d",
            Self::Acceleration => "a",
            Self::Time => "t",
        }
    }

    /// Symbol as written in derivation text.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Displacement => "Δd",
            other => other.code(),
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FinalVelocity => "final velocity",
            Self::InitialVelocity => "initial velocity",
            Self::Displacement => "distance",
            Self::Acceleration => "acceleration",
            Self::Time => "time",
        }
    }

    /// SI unit label used for display.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::FinalVelocity | Self::InitialVelocity => "m/s",
            Self::Displacement => "m",
            Self::Acceleration => "m/s²",
            Self::Time => "s",
        }
    }

    /// Parse an input code (`V`, `v`, `d`, `a`, `t`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Partially known kinematic state.
///
/// Serializes as `{"V": .., "v": .., "d": .., "a": .., "t": ..}` with
/// unknown entries omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    #[serde(rename = "V", default, skip_serializing_if = "Option::is_none")]
    final_velocity: Option<f64>,
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    initial_velocity: Option<f64>,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    displacement: Option<f64>,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    acceleration: Option<f64>,
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    time: Option<f64>,
}

impl KinematicState {
    /// Create an empty state (everything unknown).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            final_velocity: None,
            initial_velocity: None,
            displacement: None,
            acceleration: None,
            time: None,
        }
    }

    /// Set a known input value.
    #[must_use]
    pub fn with(mut self, symbol: Symbol, value: f64) -> Self {
        *self.slot_mut(symbol) = Some(value);
        self
    }

    /// Set a known input value if present.
    #[must_use]
    pub fn with_opt(mut self, symbol: Symbol, value: Option<f64>) -> Self {
        *self.slot_mut(symbol) = value;
        self
    }

    /// Get the value of a symbol, if known.
    #[must_use]
    pub const fn get(&self, symbol: Symbol) -> Option<f64> {
        match symbol {
            Symbol::FinalVelocity => self.final_velocity,
            Symbol::InitialVelocity => self.initial_velocity,
            Symbol::Displacement => self.displacement,
            Symbol::Acceleration => self.acceleration,
            Symbol::Time => self.time,
        }
    }

    /// Gather several known values at once; `None` if any is unknown.
    #[must_use]
    pub fn operands<const N: usize>(&self, symbols: [Symbol; N]) -> Option<[f64; N]> {
        let mut out = [0.0; N];
        for (slot, symbol) in out.iter_mut().zip(symbols) {
            *slot = self.get(symbol)?;
        }
        Some(out)
    }

    /// Assign a derived value. Returns `false` (and leaves the state
    /// untouched) if the symbol was already known.
    pub fn fill(&mut self, symbol: Symbol, value: f64) -> bool {
        let slot = self.slot_mut(symbol);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Whether a symbol has a value.
    #[must_use]
    pub const fn is_known(&self, symbol: Symbol) -> bool {
        self.get(symbol).is_some()
    }

    /// Number of known symbols.
    #[must_use]
    pub fn known_count(&self) -> usize {
        Symbol::ALL.iter().filter(|s| self.is_known(**s)).count()
    }

    /// Unknown symbols in display order.
    #[must_use]
    pub fn unknowns(&self) -> Vec<Symbol> {
        Symbol::ALL
            .into_iter()
            .filter(|s| !self.is_known(*s))
            .collect()
    }

    /// Whether all five symbols are known.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.known_count() == Symbol::ALL.len()
    }

    /// Iterate over `(symbol, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Option<f64>)> + '_ {
        Symbol::ALL.into_iter().map(|s| (s, self.get(s)))
    }

    /// Convert to a fully-populated record, if solved.
    #[must_use]
    pub fn to_values(&self) -> Option<KinematicValues> {
        let [final_velocity, initial_velocity, displacement, acceleration, time] =
            self.operands(Symbol::ALL)?;
        Some(KinematicValues {
            final_velocity,
            initial_velocity,
            displacement,
            acceleration,
            time,
        })
    }

    fn slot_mut(&mut self, symbol: Symbol) -> &mut Option<f64> {
        match symbol {
            Symbol::FinalVelocity => &mut self.final_velocity,
            Symbol::InitialVelocity => &mut self.initial_velocity,
            Symbol::Displacement => &mut self.displacement,
            Symbol::Acceleration => &mut self.acceleration,
            Symbol::Time => &mut self.time,
        }
    }
}

/// Fully solved kinematic values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicValues {
    /// Final velocity `V` (m/s).
    #[serde(rename = "V")]
    pub final_velocity: f64,
    /// Initial velocity `v` (m/s).
    #[serde(rename = "v")]
    pub initial_velocity: f64,
    /// Displacement `d` (m).
    #[serde(rename = "d")]
    pub displacement: f64,
    /// Acceleration `a` (m/s²).
    #[serde(rename = "a")]
    pub acceleration: f64,
    /// Elapsed time `t` (s).
    #[serde(rename = "t")]
    pub time: f64,
}

impl KinematicValues {
    /// Get the value of a symbol.
    #[must_use]
    pub const fn get(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::FinalVelocity => self.final_velocity,
            Symbol::InitialVelocity => self.initial_velocity,
            Symbol::Displacement => self.displacement,
            Symbol::Acceleration => self.acceleration,
            Symbol::Time => self.time,
        }
    }
}

impl From<KinematicValues> for KinematicState {
    fn from(values: KinematicValues) -> Self {
        Symbol::ALL
            .into_iter()
            .fold(Self::new(), |state, s| state.with(s, values.get(s)))
    }
}
