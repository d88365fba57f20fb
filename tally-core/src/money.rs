//! Money parser: signed currency amounts inside free-form cell text.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::{FxState, to_usd};

static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-]?)\s*([£$€])\s*([0-9]+(?:[.,][0-9]{1,2})?)").expect("valid money regex")
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    Gbp,
    Usd,
    Eur,
}

impl Currency {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "£" => Some(Currency::Gbp),
            "$" => Some(Currency::Usd),
            "€" => Some(Currency::Eur),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Gbp => "£",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// One amount found in a cell, e.g. the `-£0.50` of `£5.00 -£0.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMoney {
    /// Magnitude as written.
    pub amount: Decimal,
    pub currency: Currency,
    pub sign: Sign,
}

impl ParsedMoney {
    pub fn signed(&self) -> Decimal {
        match self.sign {
            Sign::Plus => self.amount,
            Sign::Minus => -self.amount,
        }
    }
}

/// All amounts in `text`, left to right. Empty when nothing looks like money.
pub fn parse_money(text: &str) -> Vec<ParsedMoney> {
    let text = text.replace('\u{a0}', " ");
    MONEY_RE
        .captures_iter(&text)
        .filter_map(|caps| {
            let sign = if &caps[1] == "-" { Sign::Minus } else { Sign::Plus };
            let currency = Currency::from_symbol(&caps[2])?;
            let amount: Decimal = caps[3].replace(',', ".").parse().ok()?;
            Some(ParsedMoney {
                amount,
                currency,
                sign,
            })
        })
        .collect()
}

/// Sum of every amount in `text`, converted to USD.
///
/// `None` means the text carried no money at all, which is not the same as zero.
/// Amounts too large to represent make the whole text unreadable (`None`).
pub fn sum_usd(text: &str, fx: &FxState) -> Option<Decimal> {
    let found = parse_money(text);
    if found.is_empty() {
        return None;
    }
    found.iter().try_fold(Decimal::ZERO, |acc, m| {
        acc.checked_add(to_usd(m.signed(), Some(m.currency), fx)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reward_plus_adjustment() {
        let found = parse_money("£10.00 +£2.00");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].signed(), dec!(10.00));
        assert_eq!(found[1].signed(), dec!(2.00));
        let gbp: Decimal = found.iter().map(ParsedMoney::signed).sum();
        assert_eq!(gbp, dec!(12.00));
    }

    #[test]
    fn test_signs_and_symbols() {
        let found = parse_money("Reward: $3.5 Adjustment: - €1,25 bonus +£0.40");
        assert_eq!(
            found,
            vec![
                ParsedMoney { amount: dec!(3.5), currency: Currency::Usd, sign: Sign::Plus },
                ParsedMoney { amount: dec!(1.25), currency: Currency::Eur, sign: Sign::Minus },
                ParsedMoney { amount: dec!(0.40), currency: Currency::Gbp, sign: Sign::Plus },
            ]
        );
    }

    #[test]
    fn test_non_breaking_space_between_symbol_and_digits() {
        let found = parse_money("£\u{a0}7.25");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, dec!(7.25));
    }

    #[test]
    fn test_no_money_is_none_not_zero() {
        assert!(parse_money("Returned").is_empty());
        assert_eq!(sum_usd("Returned", &FxState::default()), None);
        assert_eq!(sum_usd("£0.00", &FxState::default()), Some(dec!(0)));
    }

    #[test]
    fn test_sum_usd_converts_each_token() {
        let fx = FxState::manual(1.3).unwrap();
        assert_eq!(sum_usd("£10.00 +£2.00", &fx), Some(dec!(15.6)));
        assert_eq!(sum_usd("$1.00 -£1.00", &fx), Some(dec!(-0.3)));
    }

    #[test]
    fn test_overflowing_amounts_are_unreadable() {
        let fx = FxState::manual(1.3).unwrap();
        assert_eq!(sum_usd("£70000000000000000000000000000", &fx), None);
        assert_eq!(sum_usd("$79228162514264337593543950335 +$1", &fx), None);
        assert_eq!(sum_usd("$79228162514264337593543950335", &fx), Some(Decimal::MAX));
    }

    proptest! {
        #[test]
        fn prop_k_tokens_yield_k_amounts(
            tokens in prop::collection::vec((any::<bool>(), 0usize..3, 0u32..10_000, 0u32..100), 0..8)
        ) {
            let symbols = ["£", "$", "€"];
            let text = tokens
                .iter()
                .map(|(neg, sym, whole, cents)| {
                    format!("{}{}{}.{:02}", if *neg { "-" } else { "+" }, symbols[*sym], whole, cents)
                })
                .collect::<Vec<_>>()
                .join(" and ");

            let found = parse_money(&text);
            prop_assert_eq!(found.len(), tokens.len());
            for (m, (neg, sym, _, _)) in found.iter().zip(&tokens) {
                prop_assert_eq!(m.currency.symbol(), symbols[*sym]);
                prop_assert_eq!(m.sign == Sign::Minus, *neg);
            }
        }
    }
}
