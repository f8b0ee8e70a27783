//! Intake questionnaire commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};
use intake_core::catalog::model::{Question, QuestionKind, Section};
use intake_core::catalog::Catalog;
use intake_core::events::{create_event_channel, EventReceiver, QuestionnaireEvent};
use intake_core::portal::model::PortalStatus;
use intake_core::questionnaire::summary;
use intake_core::questionnaire::validator;
use intake_core::questionnaire::{AnswerValue, QuestionnaireController, SubmitOutcome};
use intake_core::store::ResponseStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::output;

#[derive(Subcommand)]
pub enum QuestionnaireCommands {
    /// Fill in a client's questionnaire interactively
    Fill {
        /// Portal access ID of the client
        client_id: String,
    },

    /// Show a client's saved answers
    Show {
        /// Portal access ID of the client
        client_id: String,

        /// Print the raw response document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a client's questionnaire status
    Status {
        /// Portal access ID of the client
        client_id: String,
    },

    /// List every saved questionnaire
    List,

    /// Discard a client's saved answers
    Reset {
        /// Portal access ID of the client
        client_id: String,

        /// Confirm destructive operation
        #[arg(long)]
        confirm: bool,
    },
}

pub async fn execute(cmd: QuestionnaireCommands, project_dir: &Path) -> Result<()> {
    let (config, store) = super::connect_store(project_dir).await?;

    match cmd {
        QuestionnaireCommands::Fill { client_id } => {
            let pool = store.pool().clone();
            let access = intake_core::portal::get_portal_access(&pool, &client_id).await?;
            debug!(client_id = %access.id, status = %access.questionnaire_status, "Opening questionnaire");
            if access.status == PortalStatus::Pending {
                intake_core::portal::update_portal_status(&pool, &access.id, PortalStatus::Active).await?;
            }
            let events = create_event_channel();
            let completions = events.subscribe();

            let controller = QuestionnaireController::builder(
                Arc::new(Catalog::intake().clone()),
                Arc::new(store),
            )
            .reopen_policy(config.reopen_policy)
            .events(events)
            .open(&access.id, access.client_reference())
            .await;

            println!(
                "{} Intake questionnaire for {}",
                "→".blue().bold(),
                access.full_name().cyan()
            );
            if run(&controller, completions).await? {
                intake_core::portal::update_portal_status(&pool, &access.id, PortalStatus::Completed).await?;
            }
        }

        QuestionnaireCommands::Show { client_id, json } => {
            let Some(aggregate) = store.load(&client_id).await? else {
                println!("{}", "No responses saved for this client.".dimmed());
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&aggregate)?);
            } else {
                if !summary::validate_response(&aggregate) {
                    println!("{}", "⚠ Saved response has an unexpected shape.".yellow());
                }
                output::print_summary(&aggregate, &summary::summarize(Catalog::intake(), &aggregate));
            }
        }

        QuestionnaireCommands::Status { client_id } => {
            let access = intake_core::portal::get_portal_access(store.pool(), &client_id).await?;
            let catalog = Catalog::intake();
            let aggregate = store.load(&client_id).await?;

            println!("{} {}", access.full_name().cyan().bold(), format!("({})", access.id).dimmed());
            println!(
                "{}: {}",
                "Questionnaire".bold(),
                output::status_colored(aggregate.as_ref().map_or(access.questionnaire_status, |a| a.status))
            );

            if let Some(aggregate) = aggregate {
                println!("{}: {}", "Last updated".bold(), aggregate.last_updated.to_rfc3339());
                match validator::first_incomplete_section(catalog, &aggregate) {
                    Some(index) => println!(
                        "{}: {}",
                        "Next incomplete section".bold(),
                        catalog.sections()[index].title.yellow()
                    ),
                    None => println!("{}", "All required questions answered.".green()),
                }
            }
        }

        QuestionnaireCommands::List => {
            let aggregates = store.list().await?;
            output::print_responses_table(&aggregates, Catalog::intake());
        }

        QuestionnaireCommands::Reset { client_id, confirm } => {
            if !confirm {
                println!(
                    "{} This discards every saved answer for {}. Re-run with {} to proceed.",
                    "⚠".yellow().bold(),
                    client_id.cyan(),
                    "--confirm".bold()
                );
                return Ok(());
            }
            if store.reset(&client_id).await? {
                println!("{} Discarded saved answers for {}", "✓".green().bold(), client_id.cyan());
            } else {
                println!("{}", "No responses saved for this client.".dimmed());
            }
        }
    }

    Ok(())
}

enum Action {
    Next,
    Back,
    Submit,
    Review,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Self::Next => "Next section",
            Self::Back => "Previous section",
            Self::Submit => "Submit questionnaire",
            Self::Review => "Review this section again",
            Self::Quit => "Save and quit",
        }
    }
}

/// Section-by-section loop. Returns `true` once the questionnaire is
/// submitted, `false` when the user quits.
async fn run(controller: &QuestionnaireController, mut completions: EventReceiver) -> Result<bool> {
    let theme = ColorfulTheme::default();

    loop {
        println!();
        output::print_progress(&controller.progress());
        let section = controller.current_section();
        if let Some(description) = &section.description {
            println!("{}", description.dimmed());
        }
        println!();

        fill_section(controller, &theme)?;

        let mut actions = Vec::new();
        if controller.is_last() {
            actions.push(Action::Submit);
        } else {
            actions.push(Action::Next);
        }
        if !controller.is_first() {
            actions.push(Action::Back);
        }
        actions.push(Action::Review);
        actions.push(Action::Quit);

        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&labels[..])
            .default(0)
            .interact()?;

        match actions[choice] {
            Action::Next => {
                if !controller.advance() {
                    print_missing(controller.current_section(), &controller.missing_required());
                }
            }
            Action::Back => {
                controller.retreat();
            }
            Action::Review => {}
            Action::Quit => {
                controller.flush().await;
                println!("{} Progress saved. Run the same command to continue.", "✓".green().bold());
                return Ok(false);
            }
            Action::Submit => match controller.submit().await {
                Ok(SubmitOutcome::Submitted) => {
                    let client_id = match completions.try_recv() {
                        Ok(QuestionnaireEvent::Submitted { client_id }) => client_id,
                        Err(_) => controller.client_id().to_string(),
                    };
                    println!(
                        "{} Questionnaire submitted. Thank you! {}",
                        "✓".green().bold(),
                        format!("({})", client_id).dimmed()
                    );
                    return Ok(true);
                }
                Ok(SubmitOutcome::Incomplete {
                    section_index,
                    missing,
                    ..
                }) => {
                    let section = &controller.catalog().sections()[section_index];
                    print_missing(section, &missing);
                    controller.go_to(section_index);
                }
                Ok(SubmitOutcome::AlreadySubmitting) => {
                    println!("{}", "Submission already in progress.".dimmed());
                }
                Err(_) => {
                    let message = controller
                        .last_error()
                        .unwrap_or_else(|| "Failed to submit questionnaire.".to_string());
                    println!("{} {}", "✗".red().bold(), message.red());
                }
            },
        }
    }
}

/// Prompt every visible question of the current section. Visibility is
/// re-evaluated after each answer so a conditional question appears as soon
/// as its dependency matches.
fn fill_section(controller: &QuestionnaireController, theme: &ColorfulTheme) -> Result<()> {
    let mut asked = 0;
    loop {
        let visible = controller.visible_questions();
        let Some(question) = visible.get(asked) else {
            return Ok(());
        };
        let current = controller
            .display_value(&question.id)
            .unwrap_or_else(|| AnswerValue::empty_for(question.kind));

        if let Some(help) = &question.help_text {
            println!("  {}", help.dimmed());
        }
        let value = prompt(question, &current, theme)?;
        if value != current {
            controller.answer(&question.id, value)?;
        }
        asked += 1;
    }
}

fn prompt(question: &Question, current: &AnswerValue, theme: &ColorfulTheme) -> Result<AnswerValue> {
    let label = if question.required {
        format!("{} *", question.text)
    } else {
        question.text.clone()
    };

    let value = match question.kind {
        QuestionKind::Select | QuestionKind::Radio => {
            let choices = choice_items(question, current.as_text().unwrap_or_default());
            let labels: Vec<&str> = choices.items.iter().map(|(label, _)| label.as_str()).collect();
            let index = Select::with_theme(theme)
                .with_prompt(label)
                .items(&labels[..])
                .default(choices.default)
                .interact()?;
            AnswerValue::Text(choices.items[index].1.clone())
        }
        QuestionKind::Checkbox => {
            let selected = current.as_choices().unwrap_or_default();
            let defaults: Vec<bool> = question.options.iter().map(|o| selected.contains(o)).collect();
            let picked = MultiSelect::with_theme(theme)
                .with_prompt(label)
                .items(&question.options[..])
                .defaults(&defaults)
                .interact()?;
            AnswerValue::Choices(picked.into_iter().map(|i| question.options[i].clone()).collect())
        }
        _ => {
            let text: String = Input::with_theme(theme)
                .with_prompt(label)
                .with_initial_text(current.as_text().unwrap_or_default())
                .allow_empty(true)
                .interact_text()?;
            AnswerValue::Text(text.trim().to_string())
        }
    };
    Ok(value)
}

/// Items of a single-choice prompt as (label, value) pairs.
struct ChoiceItems {
    items: Vec<(String, String)>,
    default: usize,
}

/// Build the items of a single-choice prompt. A current value outside the
/// options, such as a pre-filled country, is offered first and selected so
/// confirming the prompt keeps it.
fn choice_items(question: &Question, current: &str) -> ChoiceItems {
    let mut items: Vec<(String, String)> = Vec::new();
    if !current.is_empty() && !question.options.iter().any(|o| o == current) {
        items.push((format!("{} (current)", current), current.to_string()));
    }
    items.extend(question.options.iter().map(|o| (o.clone(), o.clone())));
    if !question.required {
        items.push(("(no answer)".to_string(), String::new()));
    }

    let default = items.iter().position(|(_, value)| value == current).unwrap_or(0);
    ChoiceItems { items, default }
}

fn print_missing(section: &Section, missing: &[String]) {
    println!(
        "{} Please answer the required questions in {}:",
        "✗".red().bold(),
        section.title.cyan()
    );
    for id in missing {
        let text = section.question(id).map_or(id.as_str(), |q| q.text.as_str());
        println!("  {} {}", "•".red(), text);
    }
}
