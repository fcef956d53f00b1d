// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const LAKH: f64 = 100_000.0;
pub const CRORE: f64 = 10_000_000.0;

/// Display currencies. Prices are always estimated in INR and converted at fixed
/// rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown currency '{0}', expected one of INR, USD, EUR")]
pub struct UnknownCurrency(pub String);

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Inr, Currency::Usd, Currency::Eur];

    /// Units of this currency per INR.
    pub fn rate(self) -> f64 {
        match self {
            Currency::Inr => 1.0,
            Currency::Usd => 0.012,
            Currency::Eur => 0.011,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn convert(self, price_inr: f64) -> f64 {
        price_inr * self.rate()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.symbol())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted) || c.symbol() == wanted)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

fn group_digits(digits: &str, first: usize, rest: usize) -> String {
    if digits.len() <= first {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - first);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(rest);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Integer part of `amount` in lakh/crore grouping: the last three digits, then
/// pairs (`12345678.9` becomes `1,23,45,678`).
pub fn format_indian(amount: f64) -> String {
    let whole = amount.trunc();
    let digits = format!("{:.0}", whole.abs());
    let sign = if whole < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_digits(&digits, 3, 2))
}

/// Two-decimal amount with thousands separators (`1500` becomes `1,500.00`).
pub fn format_western(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{fraction}", group_digits(digits, 3, 3))
}

/// Approximate size in crore at or above one crore, lakh otherwise.
pub fn indian_units(price_inr: f64) -> String {
    if price_inr >= CRORE {
        format!("{:.2} Crore", price_inr / CRORE)
    } else {
        format!("{:.2} Lakh", price_inr / LAKH)
    }
}

/// Formats an INR estimate for display in `currency`.
pub fn format_price(price_inr: f64, currency: Currency) -> String {
    let amount = currency.convert(price_inr);
    match currency {
        Currency::Inr => format!("{} {}", currency.symbol(), format_indian(amount)),
        _ => format!("{} {}", currency.symbol(), format_western(amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_indian_grouping() {
        assert_eq!(format_indian(0.0), "0");
        assert_eq!(format_indian(999.0), "999");
        assert_eq!(format_indian(1000.0), "1,000");
        assert_eq!(format_indian(125_000.0), "1,25,000");
        assert_eq!(format_indian(12_345_678.9), "1,23,45,678");
        assert_eq!(format_indian(1_000_000_000.0), "1,00,00,00,000");
    }

    #[test]
    fn test_format_indian_negative() {
        assert_eq!(format_indian(-125_000.4), "-1,25,000");
        assert_eq!(format_indian(-0.5), "0");
    }

    #[test]
    fn test_format_western() {
        assert_eq!(format_western(1500.0), "1,500.00");
        assert_eq!(format_western(999.999), "1,000.00");
        assert_eq!(format_western(1_234_567.891), "1,234,567.89");
        assert_eq!(format_western(-42.5), "-42.50");
    }

    #[test]
    fn test_indian_units() {
        assert_eq!(indian_units(9_500_000.0), "95.00 Lakh");
        assert_eq!(indian_units(10_000_000.0), "1.00 Crore");
        assert_eq!(indian_units(25_400_000.0), "2.54 Crore");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(125_000.0, Currency::Inr), "₹ 1,25,000");
        assert_eq!(format_price(125_000.0, Currency::Usd), "$ 1,500.00");
        assert_eq!(format_price(1_000_000.0, Currency::Eur), "€ 11,000.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!(" EUR ".parse::<Currency>(), Ok(Currency::Eur));
        assert_eq!("₹".parse::<Currency>(), Ok(Currency::Inr));
        assert_eq!("gbp".parse::<Currency>(), Err(UnknownCurrency("gbp".into())));
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Inr.to_string(), "INR (₹)");
        assert_eq!(Currency::default(), Currency::Inr);
    }
}
