//! Submission status classification.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_ ]+").expect("valid non-word regex"));

static APPROVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAPPROVED\b").expect("valid approved regex"));
static AWAITING_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\bAWAIT\w*\s+(REVIEW|APPROV\w*)\b").expect("valid await regex"),
        Regex::new(r"\b(PENDING|UNDER|IN)\s+REVIEW\b").expect("valid review regex"),
        Regex::new(r"\bSUBMITTED\b").expect("valid submitted regex"),
    ]
});

/// Statuses that count towards today's earnings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "AWAITING REVIEW")]
    AwaitingReview,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Approved => "APPROVED",
            Status::AwaitingReview => "AWAITING REVIEW",
        }
    }
}

/// Uppercase, keep only ASCII word characters and single spaces.
pub fn normalize(text: &str) -> String {
    let upper = text.to_uppercase();
    let collapsed = WHITESPACE_RE.replace_all(&upper, " ");
    let stripped = NON_WORD_RE.replace_all(&collapsed, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify one label. Anything that is neither approved nor awaiting review
/// (returned, rejected, timed out...) gives `None`.
pub fn classify(text: &str) -> Option<Status> {
    let u = normalize(text);
    if u.is_empty() {
        return None;
    }
    if APPROVED_RE.is_match(&u) {
        return Some(Status::Approved);
    }
    if AWAITING_RES.iter().any(|re| re.is_match(&u)) {
        return Some(Status::AwaitingReview);
    }
    None
}

/// First classifiable label wins, in the order given
/// (aria-label, title, then visible text).
pub fn classify_first<'a, I>(candidates: I) -> Option<Status>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().find_map(classify)
}
