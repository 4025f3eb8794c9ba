//! Pure views over a task collection snapshot.
//!
//! Nothing here touches the network, the clock or shared state: `now` and the
//! identity are always passed in, so every function is deterministic.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::tasks::{FilterCriteria, Task, UserId};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until the start (00:00 UTC) of `due_date`, rounded up.
///
/// Positive means due in the future, `0` means due today, negative means overdue.
pub fn days_until_due(due_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due_start = Utc.from_utc_datetime(&due_date.and_time(NaiveTime::MIN));
    let millis = (due_start - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Whether `task` passes all three filters.
pub fn matches(task: &Task, criteria: &FilterCriteria) -> bool {
    let title_matches = criteria.search_term.is_empty()
        || task.title.to_lowercase().contains(&criteria.search_term.to_lowercase());
    title_matches && criteria.priority.admits(&task.priority) && criteria.status.admits(&task.status)
}

/// The tasks that pass `criteria`, in collection order.
pub fn filtered_view(collection: &[Task], criteria: &FilterCriteria) -> Vec<Task> {
    collection.iter().filter(|task| matches(task, criteria)).cloned().collect()
}

/// A filtered task together with its remaining days, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub days_until_due: i64,
}

impl TaskRow {
    pub fn is_overdue(&self) -> bool {
        self.days_until_due < 0
    }
}

pub fn task_rows(collection: &[Task], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<TaskRow> {
    collection
        .iter()
        .filter(|task| matches(task, criteria))
        .map(|task| TaskRow { task: task.clone(), days_until_due: days_until_due(task.due_date, now) })
        .collect()
}

/// Non-completed tasks owned by `identity`, over the whole collection.
///
/// Filters are deliberately not applied. With no identity the count is `0`.
pub fn outstanding_count_for(collection: &[Task], identity: Option<&UserId>) -> usize {
    match identity {
        Some(identity) => collection
            .iter()
            .filter(|task| &task.owner_id == identity && task.status.is_outstanding())
            .count(),
        None => 0,
    }
}

/// Outstanding counts for every owner present in the collection, including owners
/// whose tasks are all completed (count `0`).
pub fn outstanding_counts_by_owner(collection: &[Task]) -> BTreeMap<UserId, usize> {
    let mut counts = BTreeMap::new();
    for task in collection {
        let count = counts.entry(task.owner_id.clone()).or_insert(0);
        if task.status.is_outstanding() {
            *count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{Priority, Selection, TaskId, TaskStatus};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn task(id: i64, title: &str, priority: Priority, status: TaskStatus, owner: i64) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: String::new(),
            due_date: date(2024, 3, 10),
            priority,
            status,
            owner_id: UserId::from(owner),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Write report", Priority::High, TaskStatus::Pending, 7),
            task(2, "Buy milk", Priority::Low, TaskStatus::Completed, 7),
            task(3, "Review PR", Priority::Medium, TaskStatus::InProgress, 8),
        ]
    }

    #[rstest]
    #[case(at(2024, 3, 10, 0, 0), 0)]
    #[case(at(2024, 3, 9, 12, 0), 1)]
    #[case(at(2024, 3, 10, 12, 0), 0)]
    #[case(at(2024, 3, 11, 12, 0), -1)]
    #[case(at(2024, 3, 11, 0, 0), -1)]
    #[case(at(2024, 3, 1, 0, 0), 9)]
    #[case(at(2024, 3, 12, 6, 0), -2)]
    fn test_days_until_due(#[case] now: DateTime<Utc>, #[case] expected: i64) {
        assert_eq!(days_until_due(date(2024, 3, 10), now), expected);
    }

    #[test]
    fn test_days_until_due_is_non_increasing_in_now() {
        let due = date(2024, 3, 10);
        let mut now = at(2024, 3, 5, 0, 0);
        let mut previous = days_until_due(due, now);
        for _ in 0..200 {
            now += Duration::minutes(97);
            let current = days_until_due(due, now);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let criteria = FilterCriteria::new().with_search_term("REP");
        let titles: Vec<String> = filtered_view(&sample(), &criteria).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Write report".to_string()]);
    }

    #[test]
    fn test_unfiltered_view_is_the_collection() {
        assert_eq!(filtered_view(&sample(), &FilterCriteria::default()), sample());
    }

    #[test]
    fn test_filters_combine() {
        let criteria = FilterCriteria::new()
            .with_priority(Selection::Only(Priority::Medium))
            .with_status(Selection::Only(TaskStatus::InProgress));
        let view = filtered_view(&sample(), &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, TaskId(3));

        let none = FilterCriteria::new().with_priority(Selection::Only(Priority::High)).with_search_term("milk");
        assert!(filtered_view(&sample(), &none).is_empty());
    }

    #[test]
    fn test_filtered_view_is_idempotent_and_ordered() {
        let criteria = FilterCriteria::new().with_status(Selection::Only(TaskStatus::Pending));
        let mut collection = sample();
        collection.push(task(4, "Another pending", Priority::Low, TaskStatus::Pending, 9));

        let once = filtered_view(&collection, &criteria);
        let twice = filtered_view(&once, &criteria);
        assert_eq!(once, twice);
        let ids: Vec<TaskId> = once.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(1), TaskId(4)]);
    }

    #[test]
    fn test_task_rows_carry_days_until_due() {
        let rows = task_rows(&sample(), &FilterCriteria::default(), at(2024, 3, 9, 12, 0));
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.days_until_due == 1 && !row.is_overdue()));

        let overdue = task_rows(&sample(), &FilterCriteria::default(), at(2024, 3, 12, 0, 0));
        assert!(overdue.iter().all(TaskRow::is_overdue));
    }

    #[test]
    fn test_outstanding_count_ignores_filters_and_completed() {
        let collection = sample();
        assert_eq!(outstanding_count_for(&collection, Some(&UserId::from(7))), 1);
        assert_eq!(outstanding_count_for(&collection, Some(&UserId::from(8))), 1);
        assert_eq!(outstanding_count_for(&collection, Some(&UserId::from(99))), 0);
        assert_eq!(outstanding_count_for(&collection, None), 0);
    }

    #[test]
    fn test_outstanding_counts_by_owner() {
        let mut collection = sample();
        collection.push(task(4, "Done", Priority::Low, TaskStatus::Completed, 9));
        let counts = outstanding_counts_by_owner(&collection);

        let expected: BTreeMap<UserId, usize> =
            [(UserId::from(7), 1), (UserId::from(8), 1), (UserId::from(9), 0)].into_iter().collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_report_and_milk_walkthrough() {
        let now = at(2024, 3, 10, 9, 0);
        let mut report = task(1, "Write report", Priority::High, TaskStatus::Pending, 7);
        report.due_date = date(2024, 3, 12);
        let mut milk = task(2, "Buy milk", Priority::Low, TaskStatus::Completed, 7);
        milk.due_date = date(2024, 3, 9);
        let collection = vec![report.clone(), milk.clone()];

        assert_eq!(outstanding_count_for(&collection, Some(&UserId::from(7))), 1);
        assert_eq!(
            filtered_view(&collection, &FilterCriteria::new().with_search_term("report")),
            vec![report.clone()]
        );
        assert_eq!(days_until_due(report.due_date, now), 2);
        assert_eq!(days_until_due(milk.due_date, now), -1);
    }

    #[test]
    fn test_empty_collection() {
        assert!(filtered_view(&[], &FilterCriteria::default()).is_empty());
        assert!(outstanding_counts_by_owner(&[]).is_empty());
        assert_eq!(outstanding_count_for(&[], Some(&UserId::from(7))), 0);
    }
}
