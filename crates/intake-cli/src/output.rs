//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use intake_core::catalog::Catalog;
use intake_core::portal::model::{PortalAccess, PortalStatus};
use intake_core::questionnaire::summary::FormattedSection;
use intake_core::questionnaire::validator;
use intake_core::questionnaire::{Progress, QuestionnaireStatus, ResponseAggregate};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn status_colored(status: QuestionnaireStatus) -> ColoredString {
    paint_status(status, status.as_str())
}

/// Color `text` by questionnaire status. Table columns pass text that is
/// already padded, since escape codes would throw off width formatting.
fn paint_status(status: QuestionnaireStatus, text: &str) -> ColoredString {
    match status {
        QuestionnaireStatus::NotStarted => text.dimmed(),
        QuestionnaireStatus::InProgress => text.yellow(),
        QuestionnaireStatus::Completed => text.green(),
    }
}

fn portal_status_colored(status: PortalStatus) -> ColoredString {
    paint_portal_status(status, status.as_str())
}

fn paint_portal_status(status: PortalStatus, text: &str) -> ColoredString {
    match status {
        PortalStatus::Pending => text.dimmed(),
        PortalStatus::Active => text.cyan(),
        PortalStatus::Completed => text.green(),
    }
}

/// Print portal access records as a table.
pub fn print_portals_table(records: &[PortalAccess]) {
    if records.is_empty() {
        println!("{}", "No portal access records found.".dimmed());
        return;
    }

    println!(
        "{:<10} {:<26} {:<28} {:<10} {:<12}",
        "ID", "Client", "Email", "Portal", "Questionnaire"
    );
    println!("{}", "─".repeat(90));

    for access in records {
        println!(
            "{:<10} {} {} {} {}",
            short_id(&access.id),
            pad_right(&truncate_visual(&access.full_name(), 26), 26),
            pad_right(&truncate_visual(&access.client_info.email, 28), 28),
            paint_portal_status(access.status, &pad_right(access.status.as_str(), 10)),
            status_colored(access.questionnaire_status)
        );
    }

    println!();
    println!("{} client(s) total", records.len());
}

/// Print saved questionnaires with how many sections each completes.
pub fn print_responses_table(aggregates: &[ResponseAggregate], catalog: &Catalog) {
    if aggregates.is_empty() {
        println!("{}", "No saved questionnaires.".dimmed());
        return;
    }

    println!("{:<38} {:<12} {:<10} {:<16}", "Client", "Status", "Sections", "Updated");
    println!("{}", "─".repeat(80));

    for aggregate in aggregates {
        let complete = catalog
            .sections()
            .iter()
            .filter(|section| {
                aggregate
                    .section(&section.id)
                    .is_some_and(|response| validator::is_section_complete(section, response))
            })
            .count();

        println!(
            "{:<38} {} {:<10} {}",
            aggregate.client_id,
            paint_status(aggregate.status, &pad_right(aggregate.status.as_str(), 12)),
            format!("{}/{}", complete, catalog.len()),
            aggregate.last_updated.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
}

/// Print a single portal access record.
pub fn print_portal(access: &PortalAccess) {
    println!("{} {}", access.full_name().cyan().bold(), format!("({})", access.id).dimmed());
    println!();

    println!("{}: {}", "Portal".bold(), portal_status_colored(access.status));
    println!("{}: {}", "Questionnaire".bold(), status_colored(access.questionnaire_status));
    println!("{}: {}", "Case type".bold(), access.case_type);
    if let Some(lead_id) = &access.lead_id {
        println!("{}: {}", "Lead".bold(), lead_id.dimmed());
    }

    println!();
    println!("{}", "Contact".bold());
    print_field("Email", &access.client_info.email);
    print_field("Phone", &access.client_info.phone);

    if let Some(birth) = &access.birth_info {
        println!();
        println!("{}", "Birth".bold());
        print_field("Date of birth", birth.date_of_birth.as_deref().unwrap_or_default());
        print_field("Country", birth.country_of_birth.as_deref().unwrap_or_default());
        print_field("Citizenship", birth.citizenship.as_deref().unwrap_or_default());
        print_field("Language", birth.preferred_language.as_deref().unwrap_or_default());
    }

    println!();
    println!("{}: {}", "Created".dimmed(), access.created_at.dimmed());
}

fn print_field(label: &str, value: &str) {
    if value.is_empty() {
        println!("  {:<14} {}", label, "-".dimmed());
    } else {
        println!("  {:<14} {}", label, value);
    }
}

/// Print every section and question of a catalog. Required questions are
/// starred; conditional ones name the answer that reveals them.
pub fn print_catalog(catalog: &Catalog) {
    println!("{}", "Intake Questionnaire".bold());

    for (i, section) in catalog.sections().iter().enumerate() {
        println!();
        println!(
            "{} {} {}",
            format!("{}.", i + 1).dimmed(),
            section.title.cyan().bold(),
            format!("({})", section.id).dimmed()
        );

        for question in &section.questions {
            let marker = if question.required { "*".red() } else { " ".normal() };
            let text = truncate_visual(&question.text, term_width().saturating_sub(30).max(20));
            println!(
                "  {} {} {}",
                marker,
                text,
                format!("[{}]", question.kind.as_str()).dimmed()
            );
            if let Some(rule) = &question.conditional {
                println!(
                    "      {} {} = {}",
                    "shown when".dimmed(),
                    rule.depends_on.yellow(),
                    rule.required_value
                );
            }
        }
    }
}

/// Print a formatted response summary.
pub fn print_summary(aggregate: &ResponseAggregate, sections: &[FormattedSection]) {
    println!(
        "{} {} {}",
        "Responses".bold(),
        status_colored(aggregate.status),
        format!("(updated {})", aggregate.last_updated.format("%Y-%m-%d %H:%M")).dimmed()
    );

    if sections.is_empty() {
        println!("{}", "No answers recorded.".dimmed());
        return;
    }

    for section in sections {
        println!();
        println!("{}", section.title.cyan().bold());
        if section.answers.is_empty() {
            println!("  {}", "No answers.".dimmed());
            continue;
        }
        let width = term_width().saturating_sub(4);
        for answer in &section.answers {
            let value = answer.value.display();
            println!("  {}", truncate_visual(&answer.question, width).bold());
            if value.is_empty() {
                println!("    {}", "-".dimmed());
            } else {
                println!("    {}", value);
            }
        }
    }
}

/// Print the section heading with a progress bar sized to the terminal.
pub fn print_progress(progress: &Progress) {
    let title = progress
        .titles
        .get(progress.current)
        .map(String::as_str)
        .unwrap_or_default();
    let label = format!("Section {} of {}", progress.current + 1, progress.total);

    let bar_width = term_width().saturating_sub(UnicodeWidthStr::width(label.as_str()) + 8).clamp(10, 40);
    let filled = bar_width * usize::from(progress.percent) / 100;

    println!("{}", title.cyan().bold());
    println!(
        "{} {}{} {}%",
        label.dimmed(),
        "█".repeat(filled).green(),
        "░".repeat(bar_width - filled).dimmed(),
        progress.percent
    );
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual_keeps_short_strings() {
        assert_eq!(truncate_visual("Ana", 10), "Ana");
    }

    #[test]
    fn test_truncate_visual_counts_wide_chars() {
        let truncated = truncate_visual("日本語の質問です", 8);
        assert!(UnicodeWidthStr::width(truncated.as_str()) <= 8);
        assert!(truncated.ends_with(".."));
    }

    #[test]
    fn test_pad_right() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_status_column_pads_before_coloring() {
        colored::control::set_override(true);
        let cell = paint_status(QuestionnaireStatus::InProgress, &pad_right("in_progress", 12)).to_string();
        colored::control::unset_override();
        assert!(cell.contains("in_progress "));
        assert!(cell.starts_with('\u{1b}'));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
