use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use cpt_srs::RevisionState;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Identifier assigned to a problem by the authoritative store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(
    /// Opaque id text
    pub String,
);

/// Identifier assigned to a quick link by the authoritative store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuickLinkId(
    /// Opaque id text
    pub String,
);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Wrap an identifier issued by the store
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as sent over the wire
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

impl_id!(ProblemId);
impl_id!(QuickLinkId);

/// Error returned when parsing a [`Source`] or [`Difficulty`] from text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Site a problem comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// leetcode.com
    LeetCode,
    /// codeforces.com
    Codeforces,
    /// atcoder.jp
    AtCoder,
    /// hackerrank.com
    HackerRank,
    /// Any other judge or book
    Other,
}

impl Source {
    /// Every source, in menu order
    pub const ALL: [Self; 5] = [
        Self::LeetCode,
        Self::Codeforces,
        Self::AtCoder,
        Self::HackerRank,
        Self::Other,
    ];

    /// Canonical label, identical to the serde name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LeetCode => "LeetCode",
            Self::Codeforces => "Codeforces",
            Self::AtCoder => "AtCoder",
            Self::HackerRank => "HackerRank",
            Self::Other => "Other",
        }
    }
}

/// Difficulty label of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Solved without much thought
    Easy,
    /// Needed a known technique
    Medium,
    /// Needed an idea worth revisiting
    Hard,
}

impl Difficulty {
    /// Every difficulty, easiest first
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Canonical label, identical to the serde name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

macro_rules! impl_label {
    ($name:ident, $kind:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            /// Case-insensitive match against the canonical labels
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_label!(Source, "source");
impl_label!(Difficulty, "difficulty");

/// Problem model - a practice problem tracked for spaced revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Unique problem identifier, assigned by the store
    #[serde(alias = "_id")]
    pub id: ProblemId,
    /// Problem title
    pub name: String,
    /// Link to the problem statement
    pub url: String,
    /// Site the problem comes from
    pub source: Source,
    /// Difficulty label
    pub difficulty: Difficulty,
    /// Numeric rating (Codeforces style), if known
    #[serde(default)]
    pub rating: Option<u32>,
    /// Link to the accepted submission
    #[serde(default)]
    pub submission_link: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub remarks: Option<String>,
    /// When the problem was added, set by the store
    pub added_at: DateTime<Utc>,
    /// Number of completed reviews
    #[serde(default, deserialize_with = "level_or_zero")]
    pub revision_level: u32,
    /// When the problem is due again, `None` once the cycle is complete
    #[serde(default, deserialize_with = "optional_revision_date")]
    pub next_revision_date: Option<NaiveDate>,
}

impl Problem {
    /// Current revision progress
    pub const fn revision_state(&self) -> RevisionState {
        RevisionState {
            level: self.revision_level,
            next_revision_date: self.next_revision_date,
        }
    }

    /// Record a review performed at `now`.
    ///
    /// Returns the updated record; `self` is left untouched. This is the only
    /// transition that changes the revision fields after creation.
    pub fn mark_revised<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Self {
        let state = self.revision_state().advance(now);
        Self {
            revision_level: state.level,
            next_revision_date: state.next_revision_date,
            ..self.clone()
        }
    }

    /// Replace the user-editable fields with those of `draft`.
    ///
    /// Identity, creation time and revision progress are preserved.
    pub fn apply_edit(&self, draft: ProblemDraft) -> Self {
        Self {
            name: draft.name,
            url: draft.url,
            source: draft.source,
            difficulty: draft.difficulty,
            rating: draft.rating,
            submission_link: draft.submission_link,
            remarks: draft.remarks,
            ..self.clone()
        }
    }

    /// The user-editable fields of this problem.
    pub fn to_draft(&self) -> ProblemDraft {
        ProblemDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            source: self.source,
            difficulty: self.difficulty,
            rating: self.rating,
            submission_link: self.submission_link.clone(),
            remarks: self.remarks.clone(),
        }
    }
}

/// User-entered problem fields, as collected by an add or edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDraft {
    /// Problem title, required
    #[validate(custom(function = "not_blank", message = "name must not be blank"))]
    pub name: String,
    /// Link to the statement, required
    #[validate(custom(function = "not_blank", message = "url must not be blank"))]
    pub url: String,
    /// Site the problem comes from
    pub source: Source,
    /// Difficulty label
    pub difficulty: Difficulty,
    /// Rating above 100, if given
    #[serde(default)]
    #[validate(range(min = 101, message = "rating must be at least 101"))]
    pub rating: Option<u32>,
    /// Link to the accepted submission
    #[serde(default)]
    pub submission_link: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ProblemDraft {
    /// Trim text fields and drop optional fields that are blank.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            submission_link: non_blank(self.submission_link),
            remarks: non_blank(self.remarks),
            ..self
        }
    }
}

/// Create payload: a draft plus its initial revision schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProblem {
    /// User-entered fields
    #[serde(flatten)]
    pub draft: ProblemDraft,
    /// Starting revision level
    #[serde(default, deserialize_with = "level_or_zero")]
    pub revision_level: u32,
    /// First due date
    #[serde(default, deserialize_with = "optional_revision_date")]
    pub next_revision_date: Option<NaiveDate>,
}

impl NewProblem {
    /// Schedule a draft created at `now`, see [`RevisionState::initial`].
    pub fn scheduled<Tz: TimeZone>(draft: ProblemDraft, now: &DateTime<Tz>) -> Self {
        let state = RevisionState::initial(now);
        Self {
            draft,
            revision_level: state.level,
            next_revision_date: state.next_revision_date,
        }
    }

    /// Materialize the record once the store has assigned identity.
    pub fn into_problem(self, id: ProblemId, added_at: DateTime<Utc>) -> Problem {
        let ProblemDraft {
            name,
            url,
            source,
            difficulty,
            rating,
            submission_link,
            remarks,
        } = self.draft;

        Problem {
            id,
            name,
            url,
            source,
            difficulty,
            rating,
            submission_link,
            remarks,
            added_at,
            revision_level: self.revision_level,
            next_revision_date: self.next_revision_date,
        }
    }
}

/// Quick link model - a bookmarked site shown next to the problem list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLink {
    /// Identifier assigned by the store
    #[serde(alias = "_id")]
    pub id: QuickLinkId,
    /// Label shown on the link
    pub name: String,
    /// Target address
    pub url: String,
    /// Inline SVG markup or an image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_svg: Option<String>,
}

/// User-entered quick link, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuickLinkDraft {
    /// Label, required
    #[validate(custom(function = "not_blank", message = "name must not be blank"))]
    pub name: String,
    /// Target address, required
    #[validate(custom(function = "not_blank", message = "url must not be blank"))]
    pub url: String,
    /// Optional logo markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_svg: Option<String>,
}

impl QuickLinkDraft {
    /// Trim text fields and drop a blank logo.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            logo_svg: non_blank(self.logo_svg),
        }
    }

    /// Materialize the link once the store has assigned its id.
    pub fn into_link(self, id: QuickLinkId) -> QuickLink {
        QuickLink {
            id,
            name: self.name,
            url: self.url,
            logo_svg: self.logo_svg,
        }
    }
}

/// Parse a stored revision date.
///
/// Accepts a bare `YYYY-MM-DD` date or an RFC 3339 timestamp, which is
/// truncated to its UTC calendar date.
pub fn parse_revision_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
    })
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn level_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

fn optional_revision_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_revision_date(raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid revision date `{raw}`"))),
    }
}
