use chrono::NaiveDate;
use cpt_store::Problem;

/// Problems due for revision on `today`, earliest due date first.
///
/// A problem is due when its next revision date is on or before `today`;
/// problems without a scheduled date are never due. Ties keep input order.
pub fn compute_due_today(problems: &[Problem], today: NaiveDate) -> Vec<&Problem> {
    let mut due: Vec<&Problem> = problems
        .iter()
        .filter(|problem| cpt_srs::is_due(problem.next_revision_date, today))
        .collect();
    due.sort_by_key(|problem| problem.next_revision_date);
    due
}
