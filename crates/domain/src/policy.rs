//! Membership policy for model answers
//!
//! The model is asked to answer with one of the supplied categories but
//! nothing forces it to. The policy decides what happens to answers that do
//! not match a category exactly.

use serde::{Deserialize, Serialize};

use crate::model::CategoryList;

/// How a model answer is checked against the category list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipPolicy {
    /// Return the trimmed answer as-is
    #[default]
    Accept,
    /// Map near-matches to the canonical category, pass others through
    Normalize,
    /// Map near-matches to the canonical category, reject others
    Reject,
}

/// Result of applying a policy to an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Use this value as the prediction
    Category(String),
    /// The answer matched no category and the policy forbids that
    Unknown(String),
}

impl MembershipPolicy {
    /// Apply the policy to an already trimmed answer
    pub fn resolve(self, answer: &str, categories: &CategoryList) -> Resolution {
        if self == MembershipPolicy::Accept {
            return Resolution::Category(answer.to_string());
        }

        match find_category(answer, categories) {
            Some(category) => Resolution::Category(category.to_string()),
            None if self == MembershipPolicy::Reject => Resolution::Unknown(answer.to_string()),
            None => Resolution::Category(answer.to_string()),
        }
    }
}

impl std::str::FromStr for MembershipPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "normalize" => Ok(Self::Normalize),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "Unknown membership policy '{}': expected accept, normalize or reject",
                other
            )),
        }
    }
}

/// Find the category an answer refers to, ignoring case, wrapping quotes
/// and a trailing period
fn find_category<'a>(answer: &str, categories: &'a CategoryList) -> Option<&'a str> {
    let cleaned = clean_answer(answer);

    categories
        .iter()
        .find(|c| *c == answer)
        .or_else(|| {
            categories
                .iter()
                .find(|c| c.trim().eq_ignore_ascii_case(cleaned))
        })
}

fn clean_answer(answer: &str) -> &str {
    let is_wrapper = |c: char| matches!(c, '"' | '\'' | '`' | '*');
    answer
        .trim()
        .trim_matches(is_wrapper)
        .trim_end_matches('.')
        .trim_matches(is_wrapper)
        .trim()
}
