//! Daily and weekly earnings goals and progress against them.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Optional USD targets. `None` means the goal is not set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goals {
    #[serde(default)]
    pub daily: Option<Decimal>,
    #[serde(default)]
    pub weekly: Option<Decimal>,
}

/// Progress of one total against one (possibly unset) goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalProgress {
    pub total: Decimal,
    pub goal: Option<Decimal>,
    /// 0..=100, floored.
    pub percent: u8,
}

impl GoalProgress {
    pub fn new(total: Decimal, goal: Option<Decimal>) -> Self {
        let percent = match goal {
            Some(g) if g > Decimal::ZERO => {
                // A quotient too large to represent is far past the goal.
                let pct = total
                    .checked_div(g)
                    .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
                    .map(|p| p.floor().clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
                    .unwrap_or(if total.is_sign_negative() {
                        Decimal::ZERO
                    } else {
                        Decimal::ONE_HUNDRED
                    });
                pct.to_u8().unwrap_or(0)
            }
            _ => 0,
        };
        Self {
            total,
            goal,
            percent,
        }
    }

    /// e.g. `$12.00 / $25.00 (48%)`, `$12.00 / $0.00`, or `—` when unset.
    pub fn label(&self) -> String {
        match self.goal {
            None => "—".to_string(),
            Some(g) if g > Decimal::ZERO => {
                format!("${:.2} / ${:.2} ({}%)", self.total, g, self.percent)
            }
            Some(_) => format!("${:.2} / $0.00", self.total),
        }
    }
}

impl Goals {
    /// Progress for (daily, weekly).
    pub fn progress(&self, today_total: Decimal, week_total: Decimal) -> (GoalProgress, GoalProgress) {
        (
            GoalProgress::new(today_total, self.daily),
            GoalProgress::new(week_total, self.weekly),
        )
    }
}

/// Read a goal typed by the user: blank or non-numeric clears it.
pub fn parse_goal(input: &str) -> Option<Decimal> {
    let t = input.trim().trim_start_matches('$');
    if t.is_empty() {
        return None;
    }
    t.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_progress_percent_is_floored_and_capped() {
        let (daily, weekly) = Goals {
            daily: Some(dec!(25)),
            weekly: Some(dec!(100)),
        }
        .progress(dec!(12.00), dec!(250));
        assert_eq!(daily.percent, 48);
        assert_eq!(daily.label(), "$12.00 / $25.00 (48%)");
        assert_eq!(weekly.percent, 100);

        let odd = GoalProgress::new(dec!(9.99), Some(dec!(10)));
        assert_eq!(odd.percent, 99);
    }

    #[test]
    fn test_unset_and_zero_goals() {
        let unset = GoalProgress::new(dec!(5), None);
        assert_eq!(unset.percent, 0);
        assert_eq!(unset.label(), "—");

        let zero = GoalProgress::new(dec!(5), Some(dec!(0)));
        assert_eq!(zero.percent, 0);
        assert_eq!(zero.label(), "$5.00 / $0.00");
    }

    #[test]
    fn test_negative_total_clamps_to_zero() {
        assert_eq!(GoalProgress::new(dec!(-3), Some(dec!(10))).percent, 0);
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(parse_goal("25"), Some(dec!(25)));
        assert_eq!(parse_goal(" $150.50 "), Some(dec!(150.50)));
        assert_eq!(parse_goal(""), None);
        assert_eq!(parse_goal("lots"), None);
    }

    #[test]
    fn test_tiny_goal_saturates_instead_of_overflowing() {
        let tiny = parse_goal("0.0000000000000000000000000001");
        assert!(tiny.is_some());
        let p = GoalProgress::new(dec!(1000), tiny);
        assert_eq!(p.percent, 100);
        assert_eq!(p.label(), "$1000.00 / $0.00 (100%)");
        assert_eq!(GoalProgress::new(dec!(-1000), tiny).percent, 0);
        assert_eq!(GoalProgress::new(Decimal::MAX, Some(dec!(0.5))).percent, 100);
    }
}
