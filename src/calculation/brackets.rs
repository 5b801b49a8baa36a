//! Bracket tables for statutory contributions and withholding tax.
//!
//! A [`BracketTable`] is an ascending list of brackets, each starting at an
//! inclusive lower bound and running up to the next bracket's lower bound.
//! The last bracket is open-ended.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// How a bracket turns the looked-up value into an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    /// `amount`, regardless of the value.
    #[default]
    Fixed,
    /// `value × rate`.
    Rate,
    /// `amount + (value − lower_bound) × rate`.
    Progressive,
}

/// A single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Inclusive lower bound of the bracket.
    pub lower_bound: Decimal,
    /// How the amount is computed.
    #[serde(default)]
    pub kind: BracketKind,
    /// Fixed amount, or the base of a progressive bracket.
    #[serde(default)]
    pub amount: Decimal,
    /// Rate for `rate` and `progressive` brackets.
    #[serde(default)]
    pub rate: Decimal,
}

impl Bracket {
    /// A bracket paying a fixed `amount`.
    pub fn fixed(lower_bound: Decimal, amount: Decimal) -> Self {
        Self {
            lower_bound,
            kind: BracketKind::Fixed,
            amount,
            rate: Decimal::ZERO,
        }
    }

    /// A bracket paying `rate` of the whole value.
    pub fn rate(lower_bound: Decimal, rate: Decimal) -> Self {
        Self {
            lower_bound,
            kind: BracketKind::Rate,
            amount: Decimal::ZERO,
            rate,
        }
    }

    /// A bracket paying `base` plus `rate` of the excess over `lower_bound`.
    pub fn progressive(lower_bound: Decimal, base: Decimal, rate: Decimal) -> Self {
        Self {
            lower_bound,
            kind: BracketKind::Progressive,
            amount: base,
            rate,
        }
    }

    /// Computes this bracket's amount for `value`. Not rounded.
    pub fn evaluate(&self, value: Decimal) -> Decimal {
        match self.kind {
            BracketKind::Fixed => self.amount,
            BracketKind::Rate => value * self.rate,
            BracketKind::Progressive => self.amount + (value - self.lower_bound) * self.rate,
        }
    }
}

/// An ascending, gap-free list of brackets.
///
/// # Example
///
/// ```
/// use motorph_payroll::calculation::{Bracket, BracketTable};
/// use rust_decimal::Decimal;
///
/// let table = BracketTable::new(
///     "example",
///     vec![
///         Bracket::fixed(Decimal::ZERO, Decimal::new(10, 0)),
///         Bracket::fixed(Decimal::new(100, 0), Decimal::new(20, 0)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(table.evaluate(Decimal::new(99, 0)), Decimal::new(10, 0));
/// assert_eq!(table.evaluate(Decimal::new(100, 0)), Decimal::new(20, 0)); // lower-inclusive
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Creates a table, validating it.
    ///
    /// `name` is only used in the error message.
    pub fn new(name: &str, brackets: Vec<Bracket>) -> EngineResult<Self> {
        let table = Self { brackets };
        table.validate(name)?;
        Ok(table)
    }

    /// Builds a table the caller knows to be valid.
    pub(crate) fn from_sorted(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    /// Checks that the table is non-empty, strictly ascending and free of
    /// negative amounts or rates.
    pub fn validate(&self, name: &str) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidBracketTable {
            table: name.to_string(),
            message,
        };

        if self.brackets.is_empty() {
            return Err(invalid("table has no brackets".to_string()));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].lower_bound <= pair[0].lower_bound {
                return Err(invalid(format!(
                    "lower bounds must be strictly ascending ({} then {})",
                    pair[0].lower_bound, pair[1].lower_bound
                )));
            }
        }
        if let Some(b) = self
            .brackets
            .iter()
            .find(|b| b.amount < Decimal::ZERO || b.rate < Decimal::ZERO)
        {
            return Err(invalid(format!(
                "bracket at {} has a negative amount or rate",
                b.lower_bound
            )));
        }
        Ok(())
    }

    /// Returns a copy of the table with `bracket` appended as the new top bracket.
    pub fn with_top_bracket(&self, name: &str, bracket: Bracket) -> EngineResult<Self> {
        let mut brackets = self.brackets.clone();
        brackets.push(bracket);
        Self::new(name, brackets)
    }

    /// The brackets, lowest first.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Finds the bracket containing `value`.
    ///
    /// A value equal to a lower bound belongs to the bracket starting there.
    /// Returns `None` for values below the first lower bound.
    pub fn lookup(&self, value: Decimal) -> Option<&Bracket> {
        let index = self.brackets.partition_point(|b| b.lower_bound <= value);
        index.checked_sub(1).map(|i| &self.brackets[i])
    }

    /// Computes the amount for `value`, zero below the first bracket. Not rounded.
    pub fn evaluate(&self, value: Decimal) -> Decimal {
        self.lookup(value)
            .map(|b| b.evaluate(value))
            .unwrap_or(Decimal::ZERO)
    }
}
