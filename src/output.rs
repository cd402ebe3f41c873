//! CLI output formatting for batch runs and checks.
//!
//! # Entity Display Contract
//!
//! Every item follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + base name
//! 2. **Context lines**: indented outcome and warnings (run) or layers (check)
//!
//! The positional index is the item's place in sorted base-name order, so the
//! same item carries the same number in `check` and `run` output.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Compositing 3 items → output
//! 001 alpha
//!     Written: output/alpha.png
//!     Warning: no screenshot source
//! 002 beta
//!     Skipped: output/beta.png exists
//! 003 gamma
//!     Failed: failed to decode logo source: ...
//!
//! Done: 1 written, 1 skipped, 1 failed, 1 warning
//! ```
//!
//! ## Check
//!
//! ```text
//! Items
//! 001 alpha
//!     Layers: screenshot, thumb
//!     Missing: logo
//!
//! Template
//!     frame → assets/template/frame.png
//!
//! 1 item
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! Items finish out of order under the worker pool. [`OrderedEvents`] holds
//! finished items back until every earlier index has been released, so the
//! progress listing always reads in sorted order.

use crate::config::MixConfig;
use crate::process::{BatchReport, ItemOutcome, ProcessEvent};
use crate::scan::{ItemSources, role_enabled};
use crate::types::LayerRole;
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn role_list(roles: &[LayerRole]) -> String {
    roles
        .iter()
        .map(|r| r.dir_name())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Run output
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            item_count,
            output_folder,
            skip_existing,
        } => {
            let mut lines = vec![format!(
                "Compositing {} \u{2192} {}",
                plural(*item_count, "item"),
                output_folder.display()
            )];
            if *skip_existing {
                lines.push(format!("{}Skipping items whose output exists", indent(1)));
            }
            lines
        }
        ProcessEvent::ItemFinished { index, report } => {
            let mut lines = vec![format!("{} {}", format_index(*index), report.base_name)];
            match &report.outcome {
                ItemOutcome::Written { path } => {
                    lines.push(format!("{}Written: {}", indent(1), path.display()));
                }
                ItemOutcome::Skipped { path } => {
                    lines.push(format!("{}Skipped: {} exists", indent(1), path.display()));
                }
                ItemOutcome::Failed { error } => {
                    lines.push(format!("{}Failed: {}", indent(1), error));
                }
            }
            for warning in &report.warnings {
                lines.push(format!("{}Warning: {}", indent(1), warning));
            }
            lines
        }
    }
}

/// Format the end-of-run summary: counts, then one line per failed item.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let summary = &report.summary;
    let mut lines = vec![format!(
        "Done: {} written, {} skipped, {} failed, {}",
        summary.written,
        summary.skipped,
        summary.failed,
        plural(summary.warnings, "warning")
    )];

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        lines.push("Failed items".to_string());
        for (base_name, error) in failures {
            lines.push(format!("{}{}: {}", indent(1), base_name, error));
        }
    }
    lines
}

/// Print the end-of-run summary to stdout.
pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

/// Reorders `ItemFinished` events by index.
///
/// Other events pass straight through.
#[derive(Debug)]
pub struct OrderedEvents {
    next: usize,
    pending: BTreeMap<usize, ProcessEvent>,
}

impl OrderedEvents {
    pub fn new() -> Self {
        Self {
            next: 1,
            pending: BTreeMap::new(),
        }
    }

    /// Accept one event and return every event now ready, in order.
    pub fn push(&mut self, event: ProcessEvent) -> Vec<ProcessEvent> {
        let ProcessEvent::ItemFinished { index, .. } = event else {
            return vec![event];
        };
        self.pending.insert(index, event);

        let mut ready = Vec::new();
        while let Some(event) = self.pending.remove(&self.next) {
            ready.push(event);
            self.next += 1;
        }
        ready
    }

    /// Release whatever is still held back, lowest index first.
    pub fn drain(&mut self) -> Vec<ProcessEvent> {
        std::mem::take(&mut self.pending).into_values().collect()
    }
}

impl Default for OrderedEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Print events to stdout in index order as they become ready.
pub fn print_process_events(events: impl IntoIterator<Item = ProcessEvent>) {
    let mut ordered = OrderedEvents::new();
    for event in events {
        for ready in ordered.push(event) {
            print_lines(format_process_event(&ready));
        }
    }
    for ready in ordered.drain() {
        print_lines(format_process_event(&ready));
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the `check` listing: items with their layers, then the template.
///
/// `template` is the resolved template path, `None` when it was not found.
pub fn format_check_output(
    items: &[ItemSources],
    template: Option<&Path>,
    config: &MixConfig,
) -> Vec<String> {
    let enabled: Vec<LayerRole> = LayerRole::ITEM_SOURCES
        .into_iter()
        .filter(|&role| role_enabled(config, role))
        .collect();

    let mut lines = vec!["Items".to_string()];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item.base_name));
        lines.push(format!("{}Layers: {}", indent(1), role_list(&item.roles)));

        let mut missing: Vec<LayerRole> = enabled
            .iter()
            .copied()
            .filter(|role| !item.roles.contains(role))
            .collect();
        missing.sort();
        if !missing.is_empty() {
            lines.push(format!("{}Missing: {}", indent(1), role_list(&missing)));
        }
    }

    lines.push(String::new());
    lines.push("Template".to_string());
    let name = &config.template.image;
    match (config.template.enabled, template) {
        (false, _) => lines.push(format!("{}disabled", indent(1))),
        (true, Some(path)) => {
            lines.push(format!("{}{} \u{2192} {}", indent(1), name, path.display()));
        }
        (true, None) => lines.push(format!("{}{} (not found)", indent(1), name)),
    }

    lines.push(String::new());
    lines.push(plural(items.len(), "item"));
    lines
}

/// Print the `check` listing to stdout.
pub fn print_check_output(items: &[ItemSources], template: Option<&Path>, config: &MixConfig) {
    print_lines(format_check_output(items, template, config));
}
