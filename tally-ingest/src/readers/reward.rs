//! Row reward, including any adjustment shown in the same cell.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};
use tally_core::{FxState, sum_usd};

use super::{element_text, first_match};

static REWARD_CELL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".cell.study-reward-cell").expect("valid reward cell selector")
});
static REWARD_TESTID: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid*="reward"], [data-testid*="payment"]"#)
        .expect("valid reward testid selector")
});

/// USD value of every amount in the reward cell; `None` if the cell has no money.
pub fn read_reward_usd(row: ElementRef<'_>, fx: &FxState) -> Option<Decimal> {
    let cell = first_match(row, &[&*REWARD_CELL, &*REWARD_TESTID]).unwrap_or(row);
    sum_usd(&element_text(cell), fx)
}
