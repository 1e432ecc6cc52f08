//! Post-processing of completion text into displayable HTML.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```html\n?|```\n?").expect("code fence pattern is valid"));

static TRAILING_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)This HTML document provides.*$").expect("summary pattern is valid")
});

static LEADING_PREAMBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[^\n]*This is a[^\n]*\n").expect("preamble pattern is valid"));

/// Which artifact rules to apply to a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupProfile {
    /// Strip markdown code fences only (JSON API).
    FenceOnly,
    /// Strip fences, the trailing "This HTML document provides..." summary
    /// and a leading "This is a..." line (form action).
    Full,
}

impl CleanupProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupProfile::FenceOnly => "fence_only",
            CleanupProfile::Full => "full",
        }
    }
}

/// Remove known model artifacts from `raw`, in rule order.
pub fn clean(raw: &str, profile: CleanupProfile) -> String {
    let text = CODE_FENCE.replace_all(raw, "");

    match profile {
        CleanupProfile::FenceOnly => text.into_owned(),
        CleanupProfile::Full => {
            let text = TRAILING_SUMMARY.replace(&text, "");
            LEADING_PREAMBLE.replace(&text, "").into_owned()
        }
    }
}
