//! Derivation of the visible problem list.
//!
//! [`compute_visible`] is a pure function of the collection and the criteria:
//! search, then source filter, then difficulty filter, then a stable sort.

use std::{cmp::Ordering, fmt, str::FromStr};

use cpt_store::{Difficulty, Problem, Source};
use serde::{Deserialize, Serialize};

/// A filter that either accepts everything or one exact value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    AddedAt,
    Name,
    Rating,
    NextRevisionDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Sort order of the visible list, newest first by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header-click behavior: same key flips direction, a new key starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.reversed())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }
}

/// Everything the user chose to narrow and order the list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewCriteria {
    pub search_term: String,
    pub source: Selection<Source>,
    pub difficulty: Selection<Difficulty>,
    pub sort: SortConfig,
}

/// Compute the ordered list of problems to display.
///
/// The input is never modified; an empty result is a normal outcome.
pub fn compute_visible<'a>(problems: &'a [Problem], criteria: &ViewCriteria) -> Vec<&'a Problem> {
    let needle = criteria.search_term.to_lowercase();

    let mut visible: Vec<&Problem> = problems
        .iter()
        .filter(|problem| matches_search(problem, &needle))
        .filter(|problem| criteria.source.accepts(&problem.source))
        .filter(|problem| criteria.difficulty.accepts(&problem.difficulty))
        .collect();

    // `sort_by` is stable, so ties keep their input order
    visible.sort_by(|a, b| compare(a, b, criteria.sort));
    visible
}

/// Case-insensitive substring match over name, source, difficulty and remarks.
///
/// `needle` must already be lowercase.
fn matches_search(problem: &Problem, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    [
        problem.name.as_str(),
        problem.source.as_str(),
        problem.difficulty.as_str(),
        problem.remarks.as_deref().unwrap_or_default(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &Problem, b: &Problem, sort: SortConfig) -> Ordering {
    match sort.key {
        SortKey::AddedAt => sort.direction.apply(a.added_at.cmp(&b.added_at)),
        SortKey::Name => sort.direction.apply(cmp_ignore_case(&a.name, &b.name)),
        SortKey::Rating => nulls_last(a.rating, b.rating, sort.direction),
        SortKey::NextRevisionDate => {
            nulls_last(a.next_revision_date, b.next_revision_date, sort.direction)
        }
    }
}

/// Order present values by `direction`; absent values always go last.
fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use cpt_store::ProblemId;

    fn epoch() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    fn problem(id: &str, name: &str, added: i64) -> Problem {
        Problem {
            id: ProblemId::new(id),
            name: name.to_string(),
            url: format!("https://example.com/{id}"),
            source: Source::LeetCode,
            difficulty: Difficulty::Medium,
            rating: None,
            submission_link: None,
            remarks: None,
            added_at: epoch() + Duration::seconds(added),
            revision_level: 0,
            next_revision_date: None,
        }
    }

    fn names(visible: &[&Problem]) -> Vec<String> {
        visible.iter().map(|p| p.name.clone()).collect()
    }

    fn sorted_by(key: SortKey, direction: SortDirection) -> ViewCriteria {
        ViewCriteria {
            sort: SortConfig::new(key, direction),
            ..ViewCriteria::default()
        }
    }

    fn catalog() -> Vec<Problem> {
        let mut two_sum = problem("1", "Two Sum", 1);
        two_sum.difficulty = Difficulty::Easy;
        two_sum.remarks = Some("Hash map warmup".to_string());

        let mut watermelon = problem("2", "Watermelon", 2);
        watermelon.source = Source::Codeforces;
        watermelon.difficulty = Difficulty::Easy;
        watermelon.rating = Some(800);

        let mut abc = problem("3", "ABC 300 F", 3);
        abc.source = Source::AtCoder;
        abc.difficulty = Difficulty::Hard;
        abc.rating = Some(1900);

        let mut median = problem("4", "Median of Two Sorted Arrays", 4);
        median.difficulty = Difficulty::Hard;
        median.remarks = Some("binary search on partitions".to_string());

        vec![two_sum, watermelon, abc, median]
    }

    #[test]
    fn test_spec_name_and_added_at_scenario() {
        let problems = vec![problem("b", "B", 1), problem("a", "A", 2)];

        let by_name = compute_visible(&problems, &sorted_by(SortKey::Name, SortDirection::Asc));
        assert_eq!(names(&by_name), ["A", "B"]);

        let newest = compute_visible(&problems, &sorted_by(SortKey::AddedAt, SortDirection::Desc));
        assert_eq!(names(&newest), ["A", "B"]);
    }

    #[test]
    fn test_default_criteria_keeps_everything() {
        let problems = catalog();
        let visible = compute_visible(&problems, &ViewCriteria::default());

        assert_eq!(visible.len(), problems.len());
        // Default sort is newest first
        assert_eq!(
            names(&visible),
            ["Median of Two Sorted Arrays", "ABC 300 F", "Watermelon", "Two Sum"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let problems = catalog();
        let search = |term: &str| {
            let criteria = ViewCriteria {
                search_term: term.to_string(),
                sort: SortConfig::new(SortKey::AddedAt, SortDirection::Asc),
                ..ViewCriteria::default()
            };
            names(&compute_visible(&problems, &criteria))
        };

        // name
        assert_eq!(search("two"), ["Two Sum", "Median of Two Sorted Arrays"]);
        // source
        assert_eq!(search("CODEFORCES"), ["Watermelon"]);
        // difficulty
        assert_eq!(search("hard"), ["ABC 300 F", "Median of Two Sorted Arrays"]);
        // remarks
        assert_eq!(search("binary"), ["Median of Two Sorted Arrays"]);
        assert!(search("dijkstra").is_empty());
    }

    #[test]
    fn test_filters_combine_with_search() {
        let problems = catalog();
        let criteria = ViewCriteria {
            search_term: "s".to_string(),
            source: Selection::Only(Source::LeetCode),
            difficulty: Selection::Only(Difficulty::Hard),
            sort: SortConfig::default(),
        };

        assert_eq!(
            names(&compute_visible(&problems, &criteria)),
            ["Median of Two Sorted Arrays"]
        );

        let none = ViewCriteria {
            source: Selection::Only(Source::HackerRank),
            ..ViewCriteria::default()
        };
        assert!(compute_visible(&problems, &none).is_empty());
    }

    #[test]
    fn test_missing_values_sort_last_in_both_directions() {
        let problems = catalog();

        let asc = compute_visible(&problems, &sorted_by(SortKey::Rating, SortDirection::Asc));
        assert_eq!(
            names(&asc),
            ["Watermelon", "ABC 300 F", "Two Sum", "Median of Two Sorted Arrays"]
        );

        let desc = compute_visible(&problems, &sorted_by(SortKey::Rating, SortDirection::Desc));
        assert_eq!(
            names(&desc),
            ["ABC 300 F", "Watermelon", "Two Sum", "Median of Two Sorted Arrays"]
        );
    }

    #[test]
    fn test_next_revision_date_sort() {
        let date = |s: &str| Some(s.parse::<NaiveDate>().unwrap());
        let mut problems = catalog();
        problems[0].next_revision_date = date("2024-03-10");
        problems[2].next_revision_date = date("2024-03-01");
        problems[3].next_revision_date = date("2024-03-10");

        let asc = compute_visible(
            &problems,
            &sorted_by(SortKey::NextRevisionDate, SortDirection::Asc),
        );
        // Ties keep input order; the unscheduled problem is last
        assert_eq!(
            names(&asc),
            ["ABC 300 F", "Two Sum", "Median of Two Sorted Arrays", "Watermelon"]
        );

        let desc = compute_visible(
            &problems,
            &sorted_by(SortKey::NextRevisionDate, SortDirection::Desc),
        );
        assert_eq!(
            names(&desc),
            ["Two Sum", "Median of Two Sorted Arrays", "ABC 300 F", "Watermelon"]
        );
    }

    #[test]
    fn test_name_sort_ignores_case_and_is_stable() {
        let problems = vec![
            problem("1", "beta", 1),
            problem("2", "Alpha", 2),
            problem("3", "BETA", 3),
            problem("4", "alpha", 4),
        ];

        let visible = compute_visible(&problems, &sorted_by(SortKey::Name, SortDirection::Asc));
        assert_eq!(names(&visible), ["Alpha", "alpha", "beta", "BETA"]);

        let visible = compute_visible(&problems, &sorted_by(SortKey::Name, SortDirection::Desc));
        assert_eq!(names(&visible), ["beta", "BETA", "Alpha", "alpha"]);
    }

    #[test]
    fn test_pure_and_idempotent() {
        let problems = catalog();
        let snapshot = problems.clone();
        let criteria = ViewCriteria {
            search_term: "a".to_string(),
            sort: SortConfig::new(SortKey::Rating, SortDirection::Desc),
            ..ViewCriteria::default()
        };

        let first = compute_visible(&problems, &criteria);
        let second = compute_visible(&problems, &criteria);

        assert_eq!(first, second);
        assert_eq!(problems, snapshot);
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!("All".parse::<Selection<Source>>(), Ok(Selection::All));
        assert_eq!("all".parse::<Selection<Difficulty>>(), Ok(Selection::All));
        assert_eq!(
            "atcoder".parse::<Selection<Source>>(),
            Ok(Selection::Only(Source::AtCoder))
        );
        assert!("Nightmare".parse::<Selection<Difficulty>>().is_err());
        assert_eq!(Selection::Only(Difficulty::Hard).to_string(), "Hard");
    }

    #[test]
    fn test_sort_toggle() {
        let sort = SortConfig::default();
        assert_eq!(sort, SortConfig::new(SortKey::AddedAt, SortDirection::Desc));
        assert_eq!(
            sort.toggle(SortKey::AddedAt),
            SortConfig::new(SortKey::AddedAt, SortDirection::Asc)
        );
        assert_eq!(
            sort.toggle(SortKey::Name),
            SortConfig::new(SortKey::Name, SortDirection::Asc)
        );
    }
}
