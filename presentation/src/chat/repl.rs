//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::command::ReplCommand;
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use crate::progress::stream::ConsoleStreamSink;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use studio_application::{
    ApiKey, AssistantService, ChatOrchestrator, PromptGenerator, PromptSource, SessionContext,
};
use studio_domain::{DeleteOutcome, ModelCatalog, TokenBudget};

/// Interactive chat REPL
pub struct ChatRepl {
    chat: ChatOrchestrator,
    assistants: AssistantService,
    generator: PromptGenerator,
    ctx: SessionContext,
    config: ReplConfig,
}

impl ChatRepl {
    /// Create a new ChatRepl over an existing session
    pub fn new(
        chat: ChatOrchestrator,
        assistants: AssistantService,
        generator: PromptGenerator,
        ctx: SessionContext,
    ) -> Self {
        Self {
            chat,
            assistants,
            generator,
            ctx,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.assistants.ensure_initialized(&mut self.ctx);
        print!(
            "{}",
            ConsoleFormatter::welcome(self.ctx.model(), self.ctx.selected_assistant())
        );
        println!();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        // Keys stay out of the history file
                        if !line.starts_with("/key") {
                            let _ = rl.add_history_entry(line);
                        }
                        match ReplCommand::parse(line) {
                            Ok(command) => {
                                if self.execute(command).await {
                                    break;
                                }
                            }
                            Err(message) => {
                                println!("{}", ConsoleFormatter::notice(&message));
                                println!("Type /help for available commands");
                            }
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.send(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Run one chat turn, streaming the reply to the terminal.
    ///
    /// Ctrl-C cancels the reply; nothing is committed for it.
    async fn send(&mut self, prompt: &str) {
        self.assistants.ensure_initialized(&mut self.ctx);
        println!();

        let sink = ConsoleStreamSink::new().with_header();
        let result = tokio::select! {
            result = self.chat.submit(&mut self.ctx, prompt, &sink) => result,
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{}", ConsoleFormatter::notice("Response cancelled."));
                return;
            }
        };

        if let Err(e) = result {
            eprintln!("{}", ConsoleFormatter::chat_error(&e));
        }
        println!();
    }

    /// Execute a slash command. Returns true if the REPL should exit.
    async fn execute(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => println!("{}", ConsoleFormatter::help()),
            ReplCommand::Assistants => {
                self.assistants.ensure_initialized(&mut self.ctx);
                if let Some(registry) = self.ctx.assistants() {
                    println!(
                        "{}",
                        ConsoleFormatter::assistants(registry, self.ctx.selected_assistant())
                    );
                }
            }
            ReplCommand::Use(name) => match self.assistants.select(&mut self.ctx, &name) {
                Ok(()) => println!("{}", ConsoleFormatter::success(&format!("Using assistant '{}'", name))),
                Err(e) => println!("{}", ConsoleFormatter::notice(&e.to_string())),
            },
            ReplCommand::Delete(name) => self.delete(name),
            ReplCommand::Create { name, prompt } => self.create(&name, PromptSource::Custom(prompt)),
            ReplCommand::CreateGenerated(name) => self.create(&name, PromptSource::Generated),
            ReplCommand::Generate(input) => self.generate(&input).await,
            ReplCommand::Models => println!("{}", ConsoleFormatter::models(self.ctx.model())),
            ReplCommand::Model(id) => match ModelCatalog::get(&id) {
                Ok(model) => {
                    self.ctx.select_model(model);
                    print!(
                        "{}",
                        ConsoleFormatter::status_line(
                            model,
                            self.ctx.selected_assistant(),
                            Some(self.ctx.budget())
                        )
                    );
                }
                Err(e) => println!("{}", ConsoleFormatter::notice(&format!("{}. See /models.", e))),
            },
            ReplCommand::Tokens(requested) => {
                let budget = self.ctx.set_budget(requested);
                let message = if budget.get() == requested {
                    format!("Max tokens set to {}", budget)
                } else {
                    format!(
                        "Max tokens set to {} ({} allows {}-{} in steps of {})",
                        budget,
                        self.ctx.model(),
                        TokenBudget::MIN,
                        self.ctx.model().max_tokens(),
                        TokenBudget::STEP
                    )
                };
                println!("{}", ConsoleFormatter::success(&message));
            }
            ReplCommand::Key(key) => match ApiKey::new(key) {
                Some(key) => {
                    self.ctx.set_api_key(key);
                    println!("{}", ConsoleFormatter::success("API key set for this session"));
                }
                None => println!("{}", ConsoleFormatter::notice("API key cannot be empty")),
            },
            ReplCommand::History => print!("{}", ConsoleFormatter::transcript(self.ctx.conversation())),
            ReplCommand::Clear => {
                self.chat.clear_chat(&mut self.ctx);
                println!("{}", ConsoleFormatter::success("Chat cleared"));
            }
        }
        false
    }

    fn delete(&mut self, name: Option<String>) {
        let Some(name) = name.or_else(|| self.ctx.selected_assistant().map(str::to_string)) else {
            println!("{}", ConsoleFormatter::notice("No assistant selected to delete"));
            return;
        };

        let report = self.assistants.delete(&mut self.ctx, &name);
        match report.outcome {
            DeleteOutcome::Removed => {
                println!(
                    "{}",
                    ConsoleFormatter::success(&format!("Assistant '{}' deleted", report.name))
                );
                match report.reselected {
                    Some(next) => println!("{}", ConsoleFormatter::notice(&format!("Now using '{}'", next))),
                    None if self.ctx.selected_assistant().is_none() => println!(
                        "{}",
                        ConsoleFormatter::notice("No assistant selected. Use /use <name> to pick one.")
                    ),
                    None => {}
                }
            }
            DeleteOutcome::NotFound => println!(
                "{}",
                ConsoleFormatter::notice(&format!("Assistant '{}' not found", report.name))
            ),
        }
    }

    fn create(&mut self, name: &str, source: PromptSource) {
        match self.assistants.create(&mut self.ctx, name, source) {
            Ok(report) => {
                let verb = if report.replaced { "updated" } else { "created" };
                println!(
                    "{}",
                    ConsoleFormatter::success(&format!("Assistant '{}' {}", report.name, verb))
                );
            }
            Err(e) => println!("{}", ConsoleFormatter::notice(&e.to_string())),
        }
    }

    async fn generate(&mut self, input: &str) {
        let progress = ProgressReporter::new(self.config.show_progress, "Generating prompt...");
        let result = self.generator.generate(&mut self.ctx, input).await;
        progress.finish();

        match result {
            Ok(prompt) => println!("{}", ConsoleFormatter::generated_prompt(&prompt)),
            Err(e) => eprintln!("{}", ConsoleFormatter::error(&e.to_string())),
        }
    }
}
