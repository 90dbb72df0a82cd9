//! Terminal rendering for cards, dialogs and notifications.
//!
//! Colours are only used when stdout is a terminal.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::card::{CardActions, CardView, DetailsView};
use crate::models::{SearchOutcome, SpeciesRecord};
use crate::notify::{Notification, Notifier, Variant};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
    Search,
}

/// Format a status line, coloured when writing to a terminal.
pub fn status_line(status: Status, message: &str) -> String {
    let icon = status_icon(status);
    if !is_terminal() {
        return format!("{} {}", icon, message);
    }

    match status {
        Status::Success => format!("{} {}", icon.green().bold(), message),
        Status::Error => format!("{} {}", icon.red().bold(), message),
        Status::Info => format!("{} {}", icon.cyan().bold(), message),
        Status::Search => format!("{} {}", icon.yellow(), message),
    }
}

/// Notifier that prints to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let status = match notification.variant {
            Variant::Normal => Status::Success,
            Variant::Destructive => Status::Error,
        };
        eprintln!("{}", format_notification(status, &notification));
    }
}

fn format_notification(status: Status, notification: &Notification) -> String {
    match &notification.description {
        Some(description) => format!(
            "{}\n  {}",
            status_line(status, &notification.title),
            description
        ),
        None => status_line(status, &notification.title),
    }
}

/// Render one card as a short text block
pub fn render_card(id: i64, card: &CardView) -> String {
    let mut out = String::new();

    let heading = format!("#{} {}", id, card.scientific_name);
    if is_terminal() {
        out.push_str(&heading.bold().to_string());
    } else {
        out.push_str(&heading);
    }

    if !card.common_name.is_empty() {
        out.push_str(&format!("  ({})", card.common_name));
    }
    out.push('\n');

    if let Some(image) = &card.image {
        out.push_str(&format!("  image: {}\n", image));
    }
    if !card.preview.is_empty() {
        out.push_str(&format!("  {}\n", card.preview));
    }
    out.push_str(&format!("  actions: {}\n", action_labels(card.actions)));
    out
}

/// Render the details dialog as a two-column table
pub fn render_details(details: &DetailsView) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (label, value) in &details.rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    format!(
        "{}\n{}\nactions: {}",
        details.title,
        table,
        action_labels(details.actions)
    )
}

/// Render records as a table, one row per record
pub fn render_record_table(records: &[SpeciesRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Scientific Name", "Common Name", "Kingdom", "Population"]);

    for record in records {
        table.add_row(vec![
            record.id.to_string(),
            record.scientific_name.clone(),
            record.common_name.clone().unwrap_or_default(),
            record.kingdom.to_string(),
            record
                .total_population
                .map(|p| p.to_string())
                .unwrap_or_default(),
        ]);
    }

    table.to_string()
}

/// Render what a search found
pub fn render_search_outcome(outcome: &SearchOutcome) -> String {
    let mut out = format!("{} hits for '{}'\n", outcome.total_hits, outcome.query);
    out.push_str(&format!(
        "  image: {}\n",
        outcome.image_url.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "  description: {}\n",
        outcome.description.as_deref().unwrap_or("-")
    ));
    out
}

fn action_labels(actions: CardActions) -> String {
    let mut labels = Vec::new();
    if actions.contains(CardActions::DETAILS) {
        labels.push("details");
    }
    if actions.contains(CardActions::EDIT) {
        labels.push("edit");
    }
    if actions.contains(CardActions::DELETE) {
        labels.push("delete");
    }
    labels.join(", ")
}
