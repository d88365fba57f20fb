//! tally-core: pure building blocks for summing today's earnings
//! (money, statuses, zoned dates, FX, totals, weekly rollups).

pub mod aggregate;
pub mod dates;
pub mod fx;
pub mod goals;
pub mod history;
pub mod money;
pub mod status;
pub mod week;
pub mod zone;

pub use aggregate::{AggregateResult, PageResult, StatusCounts};
pub use dates::{ResolvedDate, is_today, resolve};
pub use fx::{DEFAULT_GBP_USD, FxError, FxMode, FxQuote, FxStamp, FxState, to_usd};
pub use goals::{GoalProgress, Goals, parse_goal};
pub use history::{DailyLog, LogEntry, round_cents};
pub use money::{Currency, ParsedMoney, Sign, parse_money, sum_usd};
pub use status::{Status, classify, classify_first, normalize};
pub use week::{WEEKDAY_NAMES, WeekWindow, week_window};
pub use zone::{DEFAULT_ZONE, ZoneError, date_key, parse_zone, zoned_date, zones_matching};
