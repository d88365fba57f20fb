//! Plain-text output for `sum`, `show` and `week`.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tally_core::{FxState, GoalProgress, LogEntry, WeekWindow};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Bar glyph for `total` relative to the week's `max`.
pub fn bar(total: Decimal, max: Decimal) -> char {
    if max <= Decimal::ZERO || total <= Decimal::ZERO {
        return BARS[0];
    }
    let level = (total / max * Decimal::from(7)).ceil().to_usize().unwrap_or(0);
    BARS[level.min(7)]
}

/// One-line sparkline of the week, Sunday first.
pub fn sparkline(totals: &[Decimal; 7]) -> String {
    let max = totals.iter().copied().max().unwrap_or(Decimal::ZERO);
    totals.iter().map(|t| bar(*t, max)).collect()
}

/// Per-day breakdown with the sparkline on top.
pub fn week_chart(week: &WeekWindow, totals: &[Decimal; 7], zone: Tz) -> String {
    let max = totals.iter().copied().max().unwrap_or(Decimal::ZERO);
    let mut out = format!("Week of {} ({})\n", week.dates[0], zone);
    out.push_str(&format!("  {}\n", sparkline(totals)));
    for (i, (name, date)) in week.labelled().enumerate() {
        let marker = if i == week.today_index { "  ← today" } else { "" };
        out.push_str(&format!(
            "  {name} {} {} ${:.2}{marker}\n",
            date.format("%m-%d"),
            bar(totals[i], max),
            totals[i]
        ));
    }
    let sum: Decimal = totals.iter().sum();
    out.push_str(&format!("  Total ${sum:.2}"));
    out
}

pub fn entry_summary(entry: &LogEntry, fx: &FxState, zone: Tz) -> String {
    format!(
        "Today ({date}, {zone}): ${total:.2}\n  Approved: {a}  Awaiting review: {w}  Rows: {r}  Pages: {p}\n  GBP→USD: {fx}",
        date = entry.date,
        total = entry.total_usd,
        a = entry.approved_count,
        w = entry.awaiting_count,
        r = entry.counted_rows,
        p = entry.pages,
        fx = fx.label(),
    )
}

pub fn goals_summary(daily: &GoalProgress, weekly: &GoalProgress) -> String {
    format!("  Daily goal:  {}\n  Weekly goal: {}", daily.label(), weekly.label())
}
