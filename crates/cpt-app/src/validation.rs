use cpt_store::{ProblemDraft, QuickLinkDraft};
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Normalize and validate a problem draft before it is sent to the store.
///
/// # Examples
/// ```
/// use cpt_app::validation::validate_problem_draft;
/// use cpt_store::{Difficulty, ProblemDraft, Source};
///
/// let draft = ProblemDraft {
///     name: "  Two Sum ".to_string(),
///     url: "https://leetcode.com/problems/two-sum".to_string(),
///     source: Source::LeetCode,
///     difficulty: Difficulty::Easy,
///     rating: None,
///     submission_link: None,
///     remarks: None,
/// };
/// assert_eq!(validate_problem_draft(draft).unwrap().name, "Two Sum");
/// ```
pub fn validate_problem_draft(draft: ProblemDraft) -> Result<ProblemDraft, AppError> {
    let draft = draft.normalized();
    draft.validate()?;
    Ok(draft)
}

/// Normalize and validate a quick link draft before it is sent to the store.
pub fn validate_link_draft(draft: QuickLinkDraft) -> Result<QuickLinkDraft, AppError> {
    let draft = draft.normalized();
    draft.validate()?;
    Ok(draft)
}

/// Flatten validation errors into one line, ordered by field name
pub(crate) fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                (field.clone(), message)
            })
        })
        .collect();
    messages.sort();

    messages
        .into_iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
