//! Stake amounts entered by voters.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ArenaError;

/// A validated stake, in whole units of the staking token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StakeAmount(Decimal);

impl StakeAmount {
    /// Parses user input into a stake of at least `minimum`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidStake`] if the input is empty, not a
    /// number, not positive, or below `minimum`.
    pub fn parse(input: &str, minimum: Decimal) -> Result<Self, ArenaError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ArenaError::InvalidStake("enter an amount".to_string()));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| ArenaError::InvalidStake(format!("not a number: {trimmed}")))?;
        if amount <= Decimal::ZERO {
            return Err(ArenaError::InvalidStake(format!(
                "amount must be positive: {trimmed}"
            )));
        }
        if amount < minimum {
            return Err(ArenaError::InvalidStake(format!(
                "minimum stake is {minimum}"
            )));
        }
        Ok(Self(amount.normalize()))
    }

    /// Returns the amount.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for StakeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whole_and_fractional_amounts() {
        let ten = StakeAmount::parse("10", Decimal::ONE).map(|s| s.to_string());
        assert_eq!(ten.ok().as_deref(), Some("10"));
        let frac = StakeAmount::parse(" 1.50 ", Decimal::ONE).map(|s| s.to_string());
        assert_eq!(frac.ok().as_deref(), Some("1.5"));
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for input in ["0", "-5", "abc", "", "   ", "1e"] {
            let result = StakeAmount::parse(input, Decimal::ONE);
            assert!(
                matches!(result, Err(ArenaError::InvalidStake(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn enforces_minimum() {
        assert!(StakeAmount::parse("0.5", Decimal::ONE).is_err());
        assert!(StakeAmount::parse("1", Decimal::ONE).is_ok());
    }
}
