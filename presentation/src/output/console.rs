//! Console output formatter for chat sessions

use crate::chat::command::COMMAND_HELP;
use colored::Colorize;
use studio_application::{ChatError, Severity};
use studio_domain::{AssistantRegistry, ConversationSession, Model, ModelCatalog, Role, TokenBudget};

/// Formats chat state and errors for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Welcome banner for the interactive session
    pub fn welcome(model: Model, assistant: Option<&str>) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str("╭─────────────────────────────────────────────╮\n");
        output.push_str("│           CustomAI Studio - Chat            │\n");
        output.push_str("╰─────────────────────────────────────────────╯\n\n");
        output.push_str(&Self::status_line(model, assistant, None));
        output.push_str(&format!(
            "\n{}\n",
            "Type /help for commands, /quit to exit.".dimmed()
        ));
        output
    }

    /// `Model: … | Assistant: … | Max tokens: …`
    pub fn status_line(model: Model, assistant: Option<&str>, budget: Option<TokenBudget>) -> String {
        let mut line = format!(
            "{} {} ({})",
            "Model:".cyan().bold(),
            model.display_name(),
            model.developer()
        );
        line.push_str(&format!(
            "  {} {}",
            "Assistant:".cyan().bold(),
            assistant.unwrap_or("(none)")
        ));
        if let Some(budget) = budget {
            line.push_str(&format!("  {} {}", "Max tokens:".cyan().bold(), budget));
        }
        line.push('\n');
        line
    }

    pub fn help() -> String {
        let mut output = format!("\n{}\n", "Commands:".cyan().bold());
        for (usage, description) in COMMAND_HELP {
            output.push_str(&format!("  {:<28} {}\n", usage, description.dimmed()));
        }
        output
    }

    /// Model catalog with the current selection marked
    pub fn models(current: Model) -> String {
        let mut output = format!("\n{}\n", "Models:".cyan().bold());
        for model in ModelCatalog::all() {
            let marker = if *model == current { "*" } else { " " };
            let line = format!(
                "{} {:<22} {:<28} {:<8} max {} tokens",
                marker,
                model.as_str(),
                model.display_name(),
                model.developer(),
                model.max_tokens()
            );
            if *model == current {
                output.push_str(&format!("{}\n", line.green()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        output
    }

    /// Assistant names with the current selection marked
    pub fn assistants(registry: &AssistantRegistry, selected: Option<&str>) -> String {
        let mut output = format!("\n{}\n", "Assistants:".cyan().bold());
        for assistant in registry.iter() {
            if Some(assistant.name.as_str()) == selected {
                output.push_str(&format!("* {}\n", assistant.name.green().bold()));
            } else {
                output.push_str(&format!("  {}\n", assistant.name));
            }
        }
        output
    }

    /// User and assistant turns; system messages are not shown.
    pub fn transcript(conversation: &ConversationSession) -> String {
        let mut output = String::new();
        for message in conversation.transcript() {
            let label = match message.role {
                Role::User => "You".blue().bold(),
                Role::Assistant => "Assistant".green().bold(),
                Role::System => continue,
            };
            output.push_str(&format!("\n{}\n{}\n", label, Self::indent(&message.content, "  ")));
        }
        if output.is_empty() {
            output.push_str(&format!("{}\n", "(no messages yet)".dimmed()));
        }
        output
    }

    /// Chat error with severity styling and optional guidance
    pub fn chat_error(error: &ChatError) -> String {
        let message = error.user_message();
        let mut output = match error.severity() {
            Severity::Fatal => format!("{} {}", "Error:".red().bold(), message.red()),
            Severity::Error => format!("{} {}", "Error:".red().bold(), message),
            Severity::Warning => format!("{} {}", "Warning:".yellow().bold(), message),
            Severity::Notice => format!("{} {}", "Note:".cyan().bold(), message),
        };
        if let Some(guidance) = error.guidance() {
            output.push_str(&format!("\n{}", guidance.dimmed()));
        }
        output
    }

    pub fn notice(message: &str) -> String {
        format!("{} {}", "Note:".cyan().bold(), message)
    }

    pub fn success(message: &str) -> String {
        format!("{} {}", "✓".green().bold(), message)
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    /// Generated prompt in a labelled block
    pub fn generated_prompt(prompt: &str) -> String {
        format!(
            "\n{}\n{}\n\n{}\n",
            "Generated prompt:".cyan().bold(),
            Self::indent(prompt, "  "),
            "Use /create-generated <name> to save it as an assistant.".dimmed()
        )
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
