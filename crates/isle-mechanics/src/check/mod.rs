//! d20 checks: requests, results, modifiers, and resolution.
//!
//! A check rolls one d20 (the resolver's die can be swapped), adds a modifier looked up in a [`ModifierTable`],
//! and succeeds when the total meets the difficulty. Checks never mutate the
//! world; callers decide what follows from the outcome.

pub mod modifier;
pub mod resolver;

pub use modifier::{ModifierRule, ModifierTable};
pub use resolver::CheckResolver;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use isle_core::ActorRef;
use serde::{Deserialize, Serialize};

/// The kind of check being made.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckType {
    /// Noticing something.
    Perception,
    /// Scaring or cowing someone.
    Intimidation,
    /// Scaling a cliff or tree.
    Climb,
    /// Struggling out of quicksand.
    Quicksand,
    /// Hearing something, easier in the dark.
    Hearing,
    /// Any other check type, stored upper-cased.
    Other(String),
}

impl CheckType {
    /// Parse a check type (case-insensitive). Unknown names become [`CheckType::Other`].
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "PERCEPTION" => Self::Perception,
            "INTIMIDATION" => Self::Intimidation,
            "CLIMB" => Self::Climb,
            "QUICKSAND" => Self::Quicksand,
            "HEARING" => Self::Hearing,
            _ => Self::Other(upper),
        }
    }

    /// The canonical upper-case name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Perception => "PERCEPTION",
            Self::Intimidation => "INTIMIDATION",
            Self::Climb => "CLIMB",
            Self::Quicksand => "QUICKSAND",
            Self::Hearing => "HEARING",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for CheckType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for CheckType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<CheckType> for String {
    fn from(t: CheckType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NEXT_CHECK_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a check evaluation.
///
/// Ids increase monotonically for the lifetime of the process and are not
/// preserved across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(u64);

impl CheckId {
    /// Allocate the next id.
    pub fn next() -> Self {
        Self(NEXT_CHECK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "check#{}", self.0)
    }
}

/// A request to perform a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Which check.
    pub check_type: CheckType,
    /// Who is making it.
    pub subject: ActorRef,
    /// Total needed to succeed.
    pub difficulty: i32,
}

impl CheckRequest {
    /// Create a request.
    pub fn new(check_type: impl Into<CheckType>, subject: ActorRef, difficulty: i32) -> Self {
        Self {
            check_type: check_type.into(),
            subject,
            difficulty,
        }
    }
}

/// The outcome of a check, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Unique id for traceability.
    pub id: CheckId,
    /// Which check.
    pub check_type: CheckType,
    /// Who made it.
    pub subject: ActorRef,
    /// Total that was needed.
    pub difficulty: i32,
    /// The raw die roll.
    pub roll: u32,
    /// Modifier from the table.
    pub modifier: i32,
    /// `roll + modifier`.
    pub total: i32,
    /// Whether `total >= difficulty`.
    pub success: bool,
}

impl CheckResult {
    /// One-line narration of the result, without the id.
    pub fn narrate(&self) -> String {
        let verdict = if self.success { "success" } else { "failure" };
        let sign = if self.modifier < 0 { '-' } else { '+' };
        format!(
            "{} check for {}: rolled {} {} {} = {} against {} ({}).",
            self.check_type,
            self.subject,
            self.roll,
            sign,
            self.modifier.unsigned_abs(),
            self.total,
            self.difficulty,
            verdict,
        )
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.narrate())
    }
}
