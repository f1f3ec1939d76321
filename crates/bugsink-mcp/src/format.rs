//! Text rendering for tool results.
//!
//! Every function here is pure: it takes API data and returns the text an
//! agent reads. Optional fields that are absent or empty produce no line at
//! all, and empty list pages render a single "No ... found." message.

use bugsink::ConnectionReport;
use bugsink::domain::{Event, Exception, Frame, Issue, Page, Project, Release, Team};
use serde_json::Value;

/// Frames shown per exception by the compact stacktrace renderer.
pub const COMPACT_FRAME_LIMIT: usize = 10;

/// Frames shown per exception by the detailed stacktrace renderer.
pub const DETAILED_FRAME_LIMIT: usize = 15;

const MORE_RESULTS: &str = "More results are available; narrow the query or raise the limit.";

/// How much of each stack frame to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StacktraceStyle {
    /// One line per frame, up to [`COMPACT_FRAME_LIMIT`] frames.
    Compact,
    /// Frame line plus source context, up to [`DETAILED_FRAME_LIMIT`] frames.
    Detailed,
}

impl StacktraceStyle {
    /// Maximum frames rendered per exception.
    #[must_use]
    pub fn frame_limit(self) -> usize {
        match self {
            Self::Compact => COMPACT_FRAME_LIMIT,
            Self::Detailed => DETAILED_FRAME_LIMIT,
        }
    }
}

// ============================================================================
// Line Helpers
// ============================================================================

fn push_field(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.trim().is_empty() {
        lines.push(format!("{label}: {value}"));
    }
}

fn push_opt(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        push_field(lines, label, value);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Pretty-printed JSON with every line indented by two spaces.
#[must_use]
pub fn indented_json(value: &Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_default()
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a page: empty message, or header, items and a paging note.
fn render_page<T>(
    page: &Page<T>,
    noun: &str,
    separator: &str,
    render: impl Fn(&T) -> String,
) -> String {
    if page.results.is_empty() {
        return format!("No {noun}s found.");
    }

    let items: Vec<String> = page.results.iter().map(render).collect();
    let mut out = format!(
        "Found {} {noun}(s):\n\n{}",
        page.results.len(),
        items.join(separator)
    );
    if page.has_more() {
        out.push_str("\n\n");
        out.push_str(MORE_RESULTS);
    }
    out
}

// ============================================================================
// Connection
// ============================================================================

/// Render a connectivity check.
#[must_use]
pub fn format_connection(report: &ConnectionReport) -> String {
    if report.ok {
        report.message.clone()
    } else {
        format!("{}\nCheck the server URL and API token.", report.message)
    }
}

// ============================================================================
// Projects
// ============================================================================

/// One summary line per project.
#[must_use]
pub fn format_projects(page: &Page<Project>) -> String {
    render_page(page, "project", "\n", |p| {
        format!("- {} (ID: {}, slug: {})", p.name, p.id, p.slug)
    })
}

/// Every field of a project.
#[must_use]
pub fn format_project(project: &Project) -> String {
    let mut lines = vec![
        format!("Project: {}", project.name),
        format!("ID: {}", project.id),
    ];
    push_field(&mut lines, "Slug", &project.slug);
    push_opt(&mut lines, "Team", project.team.as_deref());
    push_field(&mut lines, "DSN", &project.dsn);
    push_field(&mut lines, "Visibility", &project.visibility);
    lines.push(format!(
        "Events: {} digested, {} stored",
        project.digested_event_count, project.stored_event_count
    ));
    if let Some(limit) = project.retention_max_event_count {
        lines.push(format!("Retention limit: {limit} events"));
    }
    lines.push(format!(
        "Alert on new issue: {}",
        yes_no(project.alert_on_new_issue)
    ));
    lines.push(format!(
        "Alert on regression: {}",
        yes_no(project.alert_on_regression)
    ));
    lines.push(format!("Alert on unmute: {}", yes_no(project.alert_on_unmute)));
    lines.join("\n")
}

/// Short confirmation after creating a project.
#[must_use]
pub fn format_created_project(project: &Project) -> String {
    let mut lines = vec![
        "Project created.".to_string(),
        format!("ID: {}", project.id),
        format!("Name: {}", project.name),
    ];
    push_field(&mut lines, "DSN", &project.dsn);
    lines.join("\n")
}

// ============================================================================
// Teams
// ============================================================================

/// One summary line per team.
#[must_use]
pub fn format_teams(page: &Page<Team>) -> String {
    render_page(page, "team", "\n", |t| {
        format!("- {} (ID: {}, visibility: {})", t.name, t.id, t.visibility)
    })
}

/// Team detail, under an optional heading line.
#[must_use]
pub fn format_team(team: &Team, heading: Option<&str>) -> String {
    let mut lines: Vec<String> = heading.map(str::to_string).into_iter().collect();
    lines.push(format!("Team: {}", team.name));
    lines.push(format!("ID: {}", team.id));
    push_field(&mut lines, "Visibility", &team.visibility);
    lines.join("\n")
}

// ============================================================================
// Issues
// ============================================================================

/// Issue blocks separated by blank lines.
#[must_use]
pub fn format_issues(page: &Page<Issue>) -> String {
    render_page(page, "issue", "\n\n", format_issue)
}

/// One issue block.
#[must_use]
pub fn format_issue(issue: &Issue) -> String {
    let mut lines = vec![
        format!("Issue: {}", issue.title()),
        format!("ID: {}", issue.id),
        format!("Project: {}", issue.project),
        format!("Status: {}", issue.status()),
    ];
    if issue.is_resolved_by_next_release && !issue.is_resolved {
        lines.push("Resolves with next release: yes".to_string());
    }
    push_field(&mut lines, "Transaction", &issue.transaction);
    lines.push(format!(
        "Events: {} digested, {} stored",
        issue.digested_event_count, issue.stored_event_count
    ));
    push_field(&mut lines, "First seen", &issue.first_seen);
    push_field(&mut lines, "Last seen", &issue.last_seen);
    lines.push(format!("Digest order: {}", issue.digest_order));
    lines.join("\n")
}

// ============================================================================
// Events
// ============================================================================

/// Event summaries, optionally each followed by a compact stacktrace.
#[must_use]
pub fn format_events(page: &Page<Event>, include_stacktrace: bool) -> String {
    render_page(page, "event", "\n\n", |event| {
        let mut block = format_event_summary(event);
        if include_stacktrace {
            if let Some(trace) = event_stacktrace(event, StacktraceStyle::Compact) {
                block.push_str("\nStacktrace:\n");
                block.push_str(&trace);
            }
        }
        block
    })
}

fn event_stacktrace(event: &Event, style: StacktraceStyle) -> Option<String> {
    event
        .data
        .as_ref()
        .and_then(|data| format_stacktrace(&data.exception, style))
}

/// Event header lines shared by the list and detail views.
#[must_use]
pub fn format_event_summary(event: &Event) -> String {
    let mut lines = Vec::new();
    if event.event_id.is_empty() {
        lines.push(format!("Event: {}", event.id));
    } else {
        lines.push(format!("Event: {}", event.event_id));
    }
    lines.push(format!("ID: {}", event.id));
    push_field(&mut lines, "Issue", &event.issue);
    push_field(&mut lines, "Timestamp", &event.timestamp);
    push_field(&mut lines, "Ingested at", &event.ingested_at);
    push_field(&mut lines, "Digested at", &event.digested_at);
    lines.push(format!("Digest order: {}", event.digest_order));

    if let Some(data) = &event.data {
        push_opt(&mut lines, "Level", data.level.as_deref());
        push_opt(&mut lines, "Platform", data.platform.as_deref());
        push_opt(&mut lines, "Message", data.message_text().as_deref());
        if let Some(exception) = data.exception.last() {
            lines.push(format!("Exception: {}", exception.headline()));
        }
    }
    lines.join("\n")
}

/// Full event: summary, environment, request, stacktrace, tags and contexts.
#[must_use]
pub fn format_event_detail(event: &Event) -> String {
    let mut out = format_event_summary(event);
    let Some(data) = &event.data else {
        return out;
    };

    let mut lines = Vec::new();
    push_opt(&mut lines, "Release", data.release.as_deref());
    push_opt(&mut lines, "Environment", data.environment.as_deref());
    push_opt(&mut lines, "Server", data.server_name.as_deref());
    push_opt(&mut lines, "Browser", data.context_summary("browser").as_deref());
    push_opt(&mut lines, "OS", data.context_summary("os").as_deref());
    if let Some(request) = &data.request {
        match (request.method.as_deref(), request.url.as_deref()) {
            (Some(method), Some(url)) => lines.push(format!("Request: {method} {url}")),
            (None, Some(url)) => lines.push(format!("Request: {url}")),
            _ => {}
        }
    }
    for line in lines {
        out.push('\n');
        out.push_str(&line);
    }

    if let Some(trace) = format_stacktrace(&data.exception, StacktraceStyle::Detailed) {
        out.push_str("\n\nStacktrace (most recent call first):\n");
        out.push_str(&trace);
    }
    if let Some(tags) = data.tags.as_ref().filter(|v| has_content(v)) {
        out.push_str("\n\nTags:\n");
        out.push_str(&indented_json(tags));
    }
    if let Some(contexts) = data.contexts.as_ref().filter(|v| has_content(v)) {
        out.push_str("\n\nContexts:\n");
        out.push_str(&indented_json(contexts));
    }
    out
}

// ============================================================================
// Stacktraces
// ============================================================================

/// Frames most recent first, capped at `limit`.
#[must_use]
pub fn recent_frames(frames: &[Frame], limit: usize) -> Vec<&Frame> {
    frames.iter().rev().take(limit).collect()
}

/// Render an exception chain, most recent exception and frame first.
///
/// Returns `None` when no exception is present.
#[must_use]
pub fn format_stacktrace(exceptions: &[Exception], style: StacktraceStyle) -> Option<String> {
    if exceptions.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    for exception in exceptions.iter().rev() {
        lines.push(exception.headline());
        let frames = exception
            .stacktrace
            .as_ref()
            .map(|s| s.frames.as_slice())
            .unwrap_or_default();

        for frame in recent_frames(frames, style.frame_limit()) {
            let function = frame.function.as_deref().unwrap_or("<unknown>");
            lines.push(format!("  at {function} ({})", frame.location()));
            if style == StacktraceStyle::Detailed {
                if let Some(context) = frame.context_line.as_deref().map(str::trim) {
                    if !context.is_empty() {
                        lines.push(format!("      > {context}"));
                    }
                }
            }
        }

        let hidden = frames.len().saturating_sub(style.frame_limit());
        if hidden > 0 {
            lines.push(format!("  ... {hidden} older frame(s) omitted"));
        }
    }
    Some(lines.join("\n"))
}

// ============================================================================
// Releases
// ============================================================================

/// Heading text for a release. The placeholder never appears in list lines.
fn version_label(release: &Release) -> &str {
    if release.version.is_empty() {
        "(no version)"
    } else {
        &release.version
    }
}

fn release_line(release: &Release) -> String {
    let mut parts = vec!["-".to_string()];
    if !release.version.is_empty() {
        parts.push(release.version.clone());
    }
    if let Some(date) = release.date_released.as_deref().filter(|d| !d.is_empty()) {
        parts.push(format!("({date})"));
    }
    parts.push(format!("[ID: {}]", release.id));
    parts.join(" ")
}

/// One version/date line per release.
#[must_use]
pub fn format_releases(page: &Page<Release>) -> String {
    render_page(page, "release", "\n", release_line)
}

/// Release detail, under an optional heading line.
#[must_use]
pub fn format_release(release: &Release, heading: Option<&str>) -> String {
    let mut lines: Vec<String> = heading.map(str::to_string).into_iter().collect();
    lines.push(format!("Release: {}", version_label(release)));
    lines.push(format!("ID: {}", release.id));
    lines.push(format!("Project: {}", release.project));
    push_opt(&mut lines, "Released", release.date_released.as_deref());
    push_opt(&mut lines, "Semver", release.semver.as_deref());
    if let Some(is_semver) = release.is_semver {
        lines.push(format!("Is semver: {}", yes_no(is_semver)));
    }
    if let Some(epoch) = release.sort_epoch {
        lines.push(format!("Sort epoch: {epoch}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugsink::domain::Stacktrace;
    use proptest::prelude::*;
    use serde_json::json;

    fn project() -> Project {
        serde_json::from_value(json!({
            "id": 1, "name": "A", "slug": "a",
            "stored_event_count": 5, "digested_event_count": 5
        }))
        .unwrap()
    }

    fn issue() -> Issue {
        serde_json::from_value(json!({
            "id": "5e1b7a62-3f0e-4a59-9c52-0a4f7c1d2e3f",
            "project": 1,
            "digest_order": 4,
            "first_seen": "2024-05-01T10:00:00Z",
            "last_seen": "2024-05-02T10:00:00Z",
            "digested_event_count": 3,
            "stored_event_count": 3,
            "calculated_type": "KeyError",
            "calculated_value": "'user'",
            "transaction": "/api/users",
            "is_resolved": false,
            "is_muted": false
        }))
        .unwrap()
    }

    fn frame(name: &str) -> Frame {
        Frame {
            filename: Some(format!("{name}.py")),
            function: Some(name.to_string()),
            lineno: Some(1),
            ..Default::default()
        }
    }

    fn exception_with_frames(count: usize) -> Exception {
        Exception {
            exception_type: Some("ValueError".to_string()),
            value: Some("bad".to_string()),
            stacktrace: Some(Stacktrace {
                frames: (0..count).map(|i| frame(&format!("f{i}"))).collect(),
            }),
            ..Default::default()
        }
    }

    // ========== Lists ==========

    #[test]
    fn test_empty_pages_render_no_found_message() {
        assert_eq!(format_projects(&Page::of(vec![])), "No projects found.");
        assert_eq!(format_teams(&Page::of(vec![])), "No teams found.");
        assert_eq!(format_issues(&Page::of(vec![])), "No issues found.");
        assert_eq!(format_events(&Page::of(vec![]), true), "No events found.");
        assert_eq!(format_releases(&Page::of(vec![])), "No releases found.");
    }

    #[test]
    fn test_projects_summary_line() {
        let out = format_projects(&Page::of(vec![project()]));
        assert!(out.starts_with("Found 1 project(s)"));
        assert!(out.lines().any(|l| l == "- A (ID: 1, slug: a)"));
        assert!(!out.contains(MORE_RESULTS));
    }

    #[test]
    fn test_page_with_next_mentions_more_results() {
        let mut page = Page::of(vec![project()]);
        page.next = Some("https://bugsink.example.com/api/canonical/0/projects/?cursor=x".into());
        assert!(format_projects(&page).ends_with(MORE_RESULTS));
    }

    #[test]
    fn test_releases_lines() {
        let page: Page<Release> = serde_json::from_value(json!({"results": [
            {"id": "r1", "project": 1, "version": "1.0.0", "date_released": "2024-05-01T10:00:00Z"},
            {"id": "r2", "project": 1, "version": ""}
        ]}))
        .unwrap();
        let out = format_releases(&page);
        assert!(out.contains("- 1.0.0 (2024-05-01T10:00:00Z) [ID: r1]"));
        assert!(out.contains("- [ID: r2]"));
        assert!(!out.contains("(no version)"));
    }

    #[test]
    fn test_missing_version_placeholder_only_in_heading() {
        let release: Release =
            serde_json::from_value(json!({"id": "r2", "project": 1, "version": ""})).unwrap();

        let out = format_release(&release, None);

        assert_eq!(out.lines().next(), Some("Release: (no version)"));
        assert_eq!(out.matches("(no version)").count(), 1);
    }

    // ========== Optional Lines ==========

    #[test]
    fn test_issue_block_contains_every_line() {
        let out = format_issue(&issue());
        assert_eq!(
            out,
            "Issue: KeyError: 'user'\n\
             ID: 5e1b7a62-3f0e-4a59-9c52-0a4f7c1d2e3f\n\
             Project: 1\n\
             Status: unresolved\n\
             Transaction: /api/users\n\
             Events: 3 digested, 3 stored\n\
             First seen: 2024-05-01T10:00:00Z\n\
             Last seen: 2024-05-02T10:00:00Z\n\
             Digest order: 4"
        );
    }

    #[test]
    fn test_missing_transaction_removes_exactly_that_line() {
        let with = format_issue(&issue());
        let mut without_transaction = issue();
        without_transaction.transaction = String::new();
        let without = format_issue(&without_transaction);

        let removed: Vec<&str> = with.lines().filter(|l| !without.contains(l)).collect();
        assert_eq!(removed, vec!["Transaction: /api/users"]);
        assert_eq!(without.lines().count(), with.lines().count() - 1);
        assert!(!without.contains("\n\n"));
    }

    #[test]
    fn test_muted_issue_status() {
        let mut muted = issue();
        muted.is_muted = true;
        assert!(format_issue(&muted).contains("Status: muted"));
    }

    #[test]
    fn test_untitled_issue_placeholder_only_in_heading() {
        let mut untitled = issue();
        untitled.calculated_type = String::new();
        untitled.calculated_value = String::new();

        let out = format_issue(&untitled);

        assert_eq!(out.lines().next(), Some("Issue: (untitled issue)"));
        assert_eq!(out.matches("(untitled issue)").count(), 1);
    }

    #[test]
    fn test_project_detail_optional_lines() {
        let out = format_project(&project());
        assert!(!out.contains("Team:"));
        assert!(!out.contains("DSN:"));
        assert!(!out.contains("Retention limit"));
        assert!(out.contains("Events: 5 digested, 5 stored"));
    }

    #[test]
    fn test_release_semver_only_when_present() {
        let mut release: Release = serde_json::from_value(json!({
            "id": "r1", "project": 1, "version": "2.0.0"
        }))
        .unwrap();
        assert!(!format_release(&release, None).contains("Semver"));

        release.semver = Some("2.0.0".to_string());
        release.is_semver = Some(true);
        let out = format_release(&release, Some("Release created."));
        assert!(out.starts_with("Release created.\nRelease: 2.0.0"));
        assert!(out.contains("Semver: 2.0.0"));
        assert!(out.contains("Is semver: yes"));
    }

    // ========== Events ==========

    fn detailed_event() -> Event {
        serde_json::from_value(json!({
            "id": "0f7e7c9a-8c1d-4b0a-9d58-2f1f0a3b4c5d",
            "event_id": "a1b2c3",
            "issue": "5e1b7a62-3f0e-4a59-9c52-0a4f7c1d2e3f",
            "timestamp": "2024-05-01T10:00:00Z",
            "digest_order": 2,
            "data": {
                "level": "error",
                "platform": "python",
                "exception": {"values": [{
                    "type": "KeyError",
                    "value": "'user'",
                    "stacktrace": {"frames": [
                        {"filename": "main.py", "function": "main", "lineno": 3},
                        {"filename": "views.py", "function": "get_user", "lineno": 10,
                         "context_line": "    return users['user']"}
                    ]}
                }]},
                "tags": {"release": "1.0.0"},
                "contexts": {"browser": {"name": "Firefox", "version": "126.0"}},
                "request": {"method": "GET", "url": "https://example.com/users"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_event_detail_sections() {
        let out = format_event_detail(&detailed_event());

        assert!(out.starts_with("Event: a1b2c3\nID: 0f7e7c9a-8c1d-4b0a-9d58-2f1f0a3b4c5d"));
        assert!(out.contains("Level: error"));
        assert!(out.contains("Exception: KeyError: 'user'"));
        assert!(out.contains("Browser: Firefox 126.0"));
        assert!(out.contains("Request: GET https://example.com/users"));
        assert!(out.contains(
            "Stacktrace (most recent call first):\nKeyError: 'user'\n  at get_user (views.py:10)\n      > return users['user']\n  at main (main.py:3)"
        ));
        assert!(out.contains("Tags:\n  {\n    \"release\": \"1.0.0\"\n  }"));
        assert!(out.contains("Contexts:\n  {"));
    }

    #[test]
    fn test_event_without_payload_has_no_detail_sections() {
        let mut event = detailed_event();
        event.data = None;
        let out = format_event_detail(&event);
        assert!(!out.contains("Stacktrace"));
        assert!(!out.contains("Tags"));
        assert!(!out.contains("Level"));
    }

    #[test]
    fn test_empty_tags_are_omitted() {
        let mut event = detailed_event();
        if let Some(data) = event.data.as_mut() {
            data.tags = Some(json!({}));
            data.contexts = Some(json!([]));
        }
        let out = format_event_detail(&event);
        assert!(!out.contains("Tags:"));
        assert!(!out.contains("Contexts:"));
    }

    #[test]
    fn test_event_list_hides_stacktrace_unless_requested() {
        let page = Page::of(vec![detailed_event()]);
        assert!(!format_events(&page, false).contains("  at "));

        let with_trace = format_events(&page, true);
        assert!(with_trace.contains("Stacktrace:\nKeyError: 'user'\n  at get_user (views.py:10)"));
        assert!(!with_trace.contains("      > "));
    }

    // ========== Stacktraces ==========

    #[test]
    fn test_frames_are_reversed() {
        let frames = vec![frame("a"), frame("b"), frame("c")];
        let names: Vec<_> = recent_frames(&frames, 10)
            .iter()
            .map(|f| f.function.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_no_exception_renders_nothing() {
        assert_eq!(format_stacktrace(&[], StacktraceStyle::Detailed), None);
    }

    #[test]
    fn test_truncation_notes_hidden_frames() {
        let out =
            format_stacktrace(&[exception_with_frames(20)], StacktraceStyle::Compact).unwrap();
        assert_eq!(out.lines().filter(|l| l.starts_with("  at ")).count(), 10);
        assert!(out.lines().nth(1).unwrap().contains("f19"));
        assert!(out.ends_with("... 10 older frame(s) omitted"));
    }

    proptest! {
        #[test]
        fn prop_frame_count_is_capped(count in 0usize..40) {
            for style in [StacktraceStyle::Compact, StacktraceStyle::Detailed] {
                let out = format_stacktrace(&[exception_with_frames(count)], style).unwrap();
                let shown = out.lines().filter(|l| l.starts_with("  at ")).count();
                prop_assert_eq!(shown, count.min(style.frame_limit()));
            }
        }

        #[test]
        fn prop_first_rendered_frame_is_last_source_frame(count in 1usize..40) {
            let out =
                format_stacktrace(&[exception_with_frames(count)], StacktraceStyle::Detailed)
                    .unwrap();
            let expected = format!("  at f{} (", count - 1);
            prop_assert!(out.lines().nth(1).unwrap().starts_with(&expected));
        }
    }
}
