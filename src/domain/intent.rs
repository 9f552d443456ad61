//! Intents and the keyword rule table that assigns them.
//!
//! Rules are evaluated in table order; the first rule with any keyword contained in the
//! lowercased text wins. Nothing is scored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of categories a chat message is routed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Admissions,
    Courses,
    Fees,
    Events,
    ContactSupport,
    GeneralInquiry,
}

impl Intent {
    /// Every intent, in taxonomy order.
    pub const ALL: [Intent; 6] = [
        Intent::Admissions,
        Intent::Courses,
        Intent::Fees,
        Intent::Events,
        Intent::ContactSupport,
        Intent::GeneralInquiry,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Intent::Admissions => "Admissions",
            Intent::Courses => "Courses",
            Intent::Fees => "Fees",
            Intent::Events => "Events",
            Intent::ContactSupport => "ContactSupport",
            Intent::GeneralInquiry => "GeneralInquiry",
        }
    }

    /// Case-insensitive label lookup. Surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Intent> {
        let wanted = label.trim();
        Intent::ALL
            .into_iter()
            .find(|i| i.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    /// `text` must already be lowercased.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|kw| text.contains(kw))
    }
}

/// Priority-ordered classification rules. Unmatched text is `GeneralInquiry`.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Admissions,
        keywords: &["admission", "apply", "application"],
    },
    IntentRule {
        intent: Intent::Courses,
        keywords: &["course", "class", "registration"],
    },
    IntentRule {
        intent: Intent::Fees,
        keywords: &["fee", "cost", "tuition", "financial aid"],
    },
    IntentRule {
        intent: Intent::Events,
        keywords: &["event", "activity", "festival"],
    },
    IntentRule {
        intent: Intent::ContactSupport,
        keywords: &["contact", "support", "help"],
    },
];

/// Keyword classification. Pure and total.
pub fn classify(text: &str) -> Intent {
    let text = text.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::GeneralInquiry)
}
