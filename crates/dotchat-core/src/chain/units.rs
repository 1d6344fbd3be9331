// ABOUTME: Fixed-point token amounts for the chain kits
// ABOUTME: Parses "1.5" into planck and formats planck back as "1.5 WND"

use crate::error::ToolError;

/// Native token metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    pub decimals: u32,
}

impl Token {
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Westend's native token
    pub fn westend() -> Self {
        Self::new("WND", 12)
    }

    /// Parse a decimal amount in whole tokens into planck.
    pub fn parse(&self, amount: &str) -> Result<u128, ToolError> {
        let invalid = |reason: &str| ToolError::InvalidArguments {
            tool: "transfer_token",
            reason: format!("amount '{amount}' {reason}"),
        };

        let amount = amount.trim();
        let (whole, frac) = amount.split_once('.').unwrap_or((amount, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("is empty"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("is not a positive decimal number"));
        }
        if frac.len() > self.decimals as usize {
            return Err(invalid("has too many decimal places"));
        }

        let scale = 10u128.pow(self.decimals);
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("is too large"))?
        };
        let frac_padded = format!("{frac:0<width$}", width = self.decimals as usize);
        let frac: u128 = if frac_padded.is_empty() {
            0
        } else {
            frac_padded.parse().map_err(|_| invalid("is too large"))?
        };

        let planck = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| invalid("is too large"))?;
        if planck == 0 {
            return Err(invalid("must be greater than zero"));
        }
        Ok(planck)
    }

    /// Format planck as whole tokens with the symbol, trimming trailing zeros.
    pub fn format(&self, planck: u128) -> String {
        let scale = 10u128.pow(self.decimals);
        let whole = planck / scale;
        let frac = planck % scale;
        if frac == 0 {
            return format!("{whole} {}", self.symbol);
        }
        let frac = format!("{frac:0>width$}", width = self.decimals as usize);
        format!("{whole}.{} {}", frac.trim_end_matches('0'), self.symbol)
    }
}
