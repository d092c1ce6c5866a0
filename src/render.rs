//! TUI rendering traits for vctcal types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to vctcal-core types using owo_colors.

use owo_colors::OwoColorize;
use vctcal_core::merge::{ChangeKind, EventChange, MergeReport};
use vctcal_core::model::{Score, StageRegistry};
use vctcal_core::sync::{RunSummary, StageFailure, StageRun};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ChangeKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            ChangeKind::Create => symbol.green().to_string(),
            ChangeKind::Update => symbol.yellow().to_string(),
        }
    }
}

/// Colorize text according to the change kind
fn colorize_change(kind: ChangeKind, text: &str) -> String {
    match kind {
        ChangeKind::Create => text.green().to_string(),
        ChangeKind::Update => text.yellow().to_string(),
    }
}

impl Render for EventChange {
    fn render(&self) -> String {
        let event = self.event();
        let summary = colorize_change(self.kind, &event.to_string());
        let time = event.render_event_time();

        format!("{} {} {}", self.kind.render(), summary, time.dimmed())
    }
}

impl Render for StageFailure {
    fn render(&self) -> String {
        format!("{} {}: {}", "✗".red(), self.stage, self.error.to_string().red())
    }
}

/// Threshold for compact view (show counts instead of individual events)
const COMPACT_THRESHOLD: usize = 5;

/// Render a list of changes, using compact view if there are many events and verbose is false
fn render_change_list(changes: &[EventChange], verbose: bool, lines: &mut Vec<String>) {
    if verbose || changes.len() <= COMPACT_THRESHOLD {
        for change in changes {
            lines.push(format!("   {}", change.render()));
            if change.kind == ChangeKind::Update {
                lines.extend(render_field_diffs(change).into_iter().map(|l| format!("      {}", l)));
            }
        }
    } else {
        let creates = changes.iter().filter(|c| c.kind == ChangeKind::Create).count();
        let updates = changes.iter().filter(|c| c.kind == ChangeKind::Update).count();

        if creates > 0 {
            let label = format!("({} new {})", creates, pluralize("event", creates));
            lines.push(format!("   {} {}", "+".green(), label.green()));
        }
        if updates > 0 {
            let label = format!("({} changed {})", updates, pluralize("event", updates));
            lines.push(format!("   {} {}", "~".yellow(), label.yellow()));
        }
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        match word {
            "match" => "matches".to_string(),
            _ => format!("{word}s"),
        }
    }
}

/// Field-by-field differences of an updated event
fn render_field_diffs(change: &EventChange) -> Vec<String> {
    let mut lines = Vec::new();

    let Some(old) = &change.old else {
        return lines;
    };
    let new = &change.new;

    if old.team_a != new.team_a {
        lines.push(field_diff("team_a", &old.team_a.to_string(), &new.team_a.to_string()));
    }
    if old.team_b != new.team_b {
        lines.push(field_diff("team_b", &old.team_b.to_string(), &new.team_b.to_string()));
    }
    if old.start != new.start {
        lines.push(field_diff("start", &old.render_event_time(), &new.render_event_time()));
    }
    if old.status != new.status {
        lines.push(field_diff("status", old.status.label(), new.status.label()));
    }
    if old.score != new.score {
        let show = |score: Option<Score>| score.map_or("(none)".to_string(), |s| s.to_string());
        lines.push(field_diff("score", &show(old.score), &show(new.score)));
    }

    lines
}

fn field_diff(field: &str, old: &str, new: &str) -> String {
    format!("{}: {} → {}", field.dimmed(), old.red(), new.green())
}

/// One line of counts for a merge report.
pub fn render_counts(report: &MergeReport) -> String {
    let mut parts = Vec::new();

    if report.mode.creates_events() {
        parts.push(format!("{} added", report.added));
    }
    parts.push(format!("{} updated", report.updated));
    parts.push(format!("{} unchanged", report.unchanged));
    if report.skipped_new > 0 {
        parts.push(format!("{} skipped (new)", report.skipped_new));
    }
    if report.skipped_no_time > 0 {
        parts.push(format!("{} skipped (no time)", report.skipped_no_time));
    }
    if report.regressions_ignored > 0 {
        parts.push(format!(
            "{} status {} ignored",
            report.regressions_ignored,
            pluralize("regression", report.regressions_ignored)
        ));
    }
    if report.duplicates > 0 {
        parts.push(format!(
            "{} {} dropped",
            report.duplicates,
            pluralize("duplicate", report.duplicates)
        ));
    }

    parts.join(", ")
}

/// Rendering of a stage run, which needs the registry for display names
pub trait StageRender {
    fn render(&self, registry: &StageRegistry, verbose: bool) -> String;
}

impl StageRender for StageRun {
    fn render(&self, registry: &StageRegistry, verbose: bool) -> String {
        let mut lines = vec![format!("📅 {}", registry.display_name(&self.stage))];

        if self.report.has_changes() {
            render_change_list(&self.report.changes, verbose, &mut lines);
        } else {
            lines.push("   No changes".dimmed().to_string());
        }
        lines.push(format!("   {}", render_counts(&self.report).dimmed()));

        lines.join("\n")
    }
}

impl StageRender for RunSummary {
    fn render(&self, registry: &StageRegistry, verbose: bool) -> String {
        let mut blocks: Vec<String> = self
            .stages
            .iter()
            .map(|run| run.render(registry, verbose))
            .collect();

        if !self.failures.is_empty() {
            let mut lines = vec![format!("{}", "Failed stages:".red())];
            lines.extend(self.failures.iter().map(|f| format!("   {}", f.render())));
            blocks.push(lines.join("\n"));
        }

        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralizes_counts() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 2), "events");
        assert_eq!(pluralize("match", 0), "matches");
    }

    #[test]
    fn counts_hide_empty_skips() {
        use vctcal_core::merge::MergeMode;

        let mut report = MergeReport::new(MergeMode::Update);
        report.updated = 2;
        report.unchanged = 7;
        report.skipped_new = 1;

        assert_eq!(render_counts(&report), "2 updated, 7 unchanged, 1 skipped (new)");

        let mut report = MergeReport::new(MergeMode::Generate);
        report.added = 4;
        assert_eq!(render_counts(&report), "4 added, 0 updated, 0 unchanged");
    }
}
