//! Plain-text rendering of task rows and summaries.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use taskview_domain::{Task, TaskRow, UserId};

pub fn due_label(days_until_due: i64) -> String {
    match days_until_due {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        d if d > 1 => format!("due in {} days", d),
        -1 => "1 day overdue".to_string(),
        d => format!("{} days overdue", -d),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

pub fn rows_table(rows: &[TaskRow]) -> String {
    if rows.is_empty() {
        return "No tasks match the current filters.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<32}  {:<8}  {:<11}  {:<10}  {}", "ID", "TITLE", "PRIORITY", "STATUS", "DUE", "WHEN");
    for row in rows {
        let task = &row.task;
        let _ = writeln!(
            out,
            "{:>5}  {:<32}  {:<8}  {:<11}  {:<10}  {}",
            task.id.to_string(),
            truncate(&task.title, 32),
            task.priority.as_str(),
            task.status.as_str(),
            task.due_date.format("%Y-%m-%d").to_string(),
            due_label(row.days_until_due)
        );
    }
    out
}

pub fn task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task #{}: {}", task.id, task.title);
    if !task.description.is_empty() {
        let _ = writeln!(out, "  {}", task.description);
    }
    let _ = writeln!(
        out,
        "  priority {}, status {}, due {}, owner {}",
        task.priority,
        task.status,
        task.due_date.format("%Y-%m-%d"),
        task.owner_id
    );
    out
}

pub fn outstanding_summary(identity: Option<&UserId>, count: usize) -> String {
    match identity {
        Some(identity) => format!("Outstanding tasks for user {}: {}", identity, count),
        None => "Not signed in; no outstanding count.".to_string(),
    }
}

pub fn owners_table(counts: &BTreeMap<UserId, usize>) -> String {
    let mut out = String::new();
    for (owner, count) in counts {
        let _ = writeln!(out, "{:>10}  {}", owner.to_string(), count);
    }
    out
}
