//! Shell output formatting.
//!
//! Human-readable lines with colored symbols by default, or one JSON object
//! per line (`{"type": ..., "payload": ...}`) when `--json` is given so the
//! shell can be driven from scripts.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::application::job::{JobDrain, JobItem, JobSnapshot};
use crate::domain::{Entity, JobId, JobState, KindFilter, ListingRequest};

/// Runtime output configuration shared by shell handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    *config_cell().read()
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

fn emit_serialized(kind: &str, value: &impl Serialize) {
    match serde_json::to_value(value) {
        Ok(payload) => emit_json_line(kind, payload),
        Err(e) => error(&format!("cannot serialize {kind}: {e}")),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *config_cell().write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("header", json!({ "app": "modsh", "version": version }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("{} {}", "modsh".bold(), version.dimmed());
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {:<12} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    if read_config().json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if read_config().json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!("  {} {}", "×".red(), message);
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.bold());
}

/// Print a hint with "hint:" prefix.
pub fn hint(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("hint", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
}

/// Print preformatted text (clap help) as-is.
pub fn text(content: &str) {
    if read_config().json {
        emit_json_line("text", json!({ "content": content }));
        return;
    }
    print!("{content}");
}

/// Print one entity.
///
/// Entities are the shell's primary output, so quiet mode does not hide them.
pub fn entity(entity: &Entity) {
    if read_config().json {
        emit_serialized("entity", entity);
        return;
    }
    println!("  {}", entity.summary());
}

/// Print a list of entities followed by a count.
pub fn entities(items: &[Entity]) {
    for item in items {
        entity(item);
    }
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }
    println!("  {}", format!("{} item(s)", items.len()).dimmed());
}

/// Print one job output entry.
pub fn job_item(item: &JobItem) {
    match item {
        JobItem::Entity(e) => entity(e),
        JobItem::Error(failure) => {
            if read_config().json {
                emit_serialized("item_error", failure);
                return;
            }
            println!("  {} {}", "×".red(), failure);
        }
    }
}

/// Acknowledge a submitted job.
pub fn job_submitted(id: JobId, name: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("job_submitted", json!({ "id": id, "name": name }));
        return;
    }
    println!("  {} job {} ({})", "→".cyan(), id.bold(), name);
}

fn state_label(state: JobState) -> String {
    match state {
        JobState::NotStarted | JobState::Running => state.cyan().to_string(),
        JobState::Completed => state.green().to_string(),
        JobState::Failed => state.red().to_string(),
        JobState::Stopped => state.yellow().to_string(),
    }
}

/// Print a job's status line, and its buffers when `with_output` is set.
pub fn job(snapshot: &JobSnapshot, with_output: bool) {
    let config = read_config();
    if config.json {
        if with_output {
            emit_serialized("job", snapshot);
        } else {
            emit_json_line(
                "job",
                json!({
                    "id": snapshot.id,
                    "name": snapshot.name,
                    "command": snapshot.command,
                    "parameters": snapshot.parameters,
                    "state": snapshot.state,
                    "output": snapshot.output.len(),
                    "errors": snapshot.errors.len(),
                    "has_more_data": snapshot.has_more_data,
                }),
            );
        }
        return;
    }

    println!(
        "  {:>4} {:<10} {:<24} {} out / {} err{}",
        snapshot.id,
        state_label(snapshot.state),
        snapshot.command,
        snapshot.output.len(),
        snapshot.errors.len(),
        if snapshot.has_more_data { " *" } else { "" },
    );
    if !with_output {
        return;
    }
    if let Some(request) = &snapshot.parameters {
        for (label, value) in parameter_fields(request) {
            field(label, value);
        }
    }
    if config.verbose > 0 {
        field("instance", snapshot.instance);
        field("created", snapshot.created_at.format("%H:%M:%S"));
        if let Some(finished) = snapshot.finished_at {
            field("finished", finished.format("%H:%M:%S"));
        }
    }
    for item in &snapshot.output {
        job_item(item);
    }
    for failure in &snapshot.errors {
        error(&failure.to_string());
    }
}

fn joined(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Label/value pairs describing a listing job's target, filter and limit.
/// Unset filter dimensions are left out.
#[must_use]
pub fn parameter_fields(request: &ListingRequest) -> Vec<(&'static str, String)> {
    let filter = &request.filter;
    let mut fields = vec![("listing", request.listing.to_string())];
    if let Some(sub) = &request.subreddit {
        fields.push(("subreddit", format!("r/{sub}")));
    }
    fields.push(("limit", request.limit.to_string()));
    if let Some(authors) = &filter.authors {
        fields.push(("author", joined(authors)));
    }
    if let Some(subreddits) = &filter.subreddits {
        fields.push(("from", joined(subreddits)));
    }
    if let Some(domain) = &filter.domain {
        fields.push(("domain", domain.clone()));
    }
    if let Some(moderators) = &filter.moderators {
        fields.push(("moderator", joined(moderators)));
    }
    if let Some(action) = filter.action {
        fields.push(("action", action.as_str().to_string()));
    }
    if filter.kind != KindFilter::All {
        fields.push(("kind", format!("{:?}", filter.kind).to_lowercase()));
    }
    if filter.unread_only {
        fields.push(("unread", "yes".to_string()));
    }
    fields
}

/// Print every registered job, one line each.
pub fn jobs(snapshots: &[JobSnapshot]) {
    if snapshots.is_empty() && !read_config().json {
        hint("no jobs");
        return;
    }
    for snapshot in snapshots {
        job(snapshot, false);
    }
}

/// Print what a receive drained.
pub fn drain(id: JobId, drained: &JobDrain) {
    if read_config().json {
        emit_json_line(
            "drain",
            json!({
                "id": id,
                "output": drained.output,
                "errors": drained.errors,
                "has_more_data": drained.has_more_data,
            }),
        );
        return;
    }
    for item in &drained.output {
        job_item(item);
    }
    for failure in &drained.errors {
        error(&failure.to_string());
    }
    if drained.has_more_data {
        hint(&format!("job {id} has more data"));
    }
}
