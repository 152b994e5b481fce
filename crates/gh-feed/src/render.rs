//! Plain text output

use chrono::{DateTime, Utc};
use gh_feed_client::{
    ActivityEvent, EventKind, Issue, Label, PaginationState, PullRequest, Repository,
    ThreadItem, ThreadState, TimelineEntry, TimelinePayload, SYSTEM_ACTOR,
};

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn quoted_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) => format!("\"{}\"", v),
        None => fallback.to_string(),
    }
}

/// One-line English description of an event
pub fn describe_event(event: &ActivityEvent) -> String {
    let actor = event.actor_login().unwrap_or(SYSTEM_ACTOR);
    let label = event.label.as_ref().map(|l| l.name.as_str());
    let milestone = event.milestone.as_ref().map(|m| m.title.as_str());
    let assignee = event.assignee.as_ref().map(|a| a.login.as_str());

    match &event.kind {
        EventKind::Closed => format!("{} closed this", actor),
        EventKind::Reopened => format!("{} reopened this", actor),
        EventKind::Labeled => format!("{} added label {}", actor, quoted_or(label, "a label")),
        EventKind::Unlabeled => {
            format!("{} removed label {}", actor, quoted_or(label, "a label"))
        }
        EventKind::Assigned if assignee == Some(actor) => format!("{} self-assigned this", actor),
        EventKind::Assigned => format!("{} assigned {}", actor, assignee.unwrap_or("someone")),
        EventKind::Unassigned => {
            format!("{} unassigned {}", actor, assignee.unwrap_or("someone"))
        }
        EventKind::Milestoned => format!(
            "{} added this to milestone {}",
            actor,
            quoted_or(milestone, "a milestone")
        ),
        EventKind::Demilestoned => format!(
            "{} removed this from milestone {}",
            actor,
            quoted_or(milestone, "a milestone")
        ),
        EventKind::Renamed => match &event.rename {
            Some(rename) => format!(
                "{} changed the title from \"{}\" to \"{}\"",
                actor, rename.from, rename.to
            ),
            None => format!("{} changed the title", actor),
        },
        EventKind::Locked => format!("{} locked the conversation", actor),
        EventKind::Unlocked => format!("{} unlocked the conversation", actor),
        EventKind::Merged => match event.commit_id.as_deref() {
            Some(sha) => format!(
                "{} merged commit {}",
                actor,
                sha.chars().take(7).collect::<String>()
            ),
            None => format!("{} merged this", actor),
        },
        EventKind::Other(kind) => format!("{} performed {}", actor, kind.replace('_', " ")),
    }
}

/// First non-empty line of a text body, shortened to `max` characters
fn first_line(body: &str, max: usize) -> String {
    let line = body.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

fn label_list(labels: &[Label]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    format!(" [{}]", names.join(", "))
}

fn describe_thread(thread: &ThreadItem) -> String {
    let author = thread.author().map_or(SYSTEM_ACTOR, |u| u.login.as_str());
    let kind = if thread.is_pull_request() {
        "pull request"
    } else {
        "issue"
    };
    format!(
        "{} opened {} #{}: {} ({}){}",
        author,
        kind,
        thread.number(),
        thread.title(),
        thread.state().label(),
        label_list(thread.labels())
    )
}

/// One line per timeline entry
pub fn format_entry(entry: &TimelineEntry) -> String {
    let text = match &entry.payload {
        TimelinePayload::Thread(thread) => describe_thread(thread),
        TimelinePayload::Comment(comment) => format!(
            "{} commented: {}",
            comment.user.as_ref().map_or(SYSTEM_ACTOR, |u| u.login.as_str()),
            first_line(&comment.body, 80)
        ),
        TimelinePayload::Event(event) => describe_event(event),
    };
    format!("{}  {}", timestamp(entry.timestamp), text)
}

pub fn format_issue(issue: &Issue) -> String {
    format!(
        "#{:<6} {:<7} {}{}",
        issue.number,
        issue.state.label(),
        issue.title,
        label_list(&issue.labels)
    )
}

pub fn format_pull(pull: &PullRequest) -> String {
    let state = if pull.merged_at.is_some() {
        ThreadState::Merged
    } else {
        pull.state
    };
    format!(
        "#{:<6} {:<7} {} ({} -> {})",
        pull.number,
        state.label(),
        pull.title,
        pull.head.ref_name,
        pull.base.ref_name
    )
}

pub fn format_repository(repo: &Repository) -> String {
    match &repo.description {
        Some(description) if !description.is_empty() => {
            format!("{:<40} {}", repo.full_name, first_line(description, 60))
        }
        _ => repo.full_name.clone(),
    }
}

pub fn format_label(label: &Label) -> String {
    match &label.description {
        Some(description) if !description.is_empty() => {
            format!("#{} {}  {}", label.color, label.name, description)
        }
        _ => format!("#{} {}", label.color, label.name),
    }
}

/// Footer line describing where a page sits in its listing
pub fn format_pagination(state: &PaginationState) -> String {
    let mut parts = Vec::new();

    match (state.item_range(), state.total_count(), state.total_pages()) {
        (Some(range), Some(total), Some(pages)) => {
            parts.push(format!("{}-{} of {}", range.start(), range.end(), total));
            parts.push(format!("page {}/{}", state.current_page(), pages));
        }
        (None, Some(0), _) => parts.push("no results".to_string()),
        _ => parts.push(format!("page {}", state.current_page())),
    }

    if state.has_prev() {
        parts.push(format!("--page {} for previous", state.current_page() - 1));
    }
    if state.has_next() {
        parts.push(format!("--page {} for more", state.current_page() + 1));
    }

    parts.join(", ")
}
