//! Slash command parsing for the chat REPL

/// A parsed REPL slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Assistants,
    Use(String),
    /// Delete the named assistant, or the selected one when `None`
    Delete(Option<String>),
    Create { name: String, prompt: String },
    CreateGenerated(String),
    Generate(String),
    Models,
    Model(String),
    Tokens(u32),
    Key(String),
    History,
    Clear,
    Quit,
}

/// One line of help per command, in display order
pub const COMMAND_HELP: &[(&str, &str)] = &[
    ("/help", "Show this help"),
    ("/assistants", "List assistants (* marks the selected one)"),
    ("/use <name>", "Select an assistant"),
    ("/delete [name]", "Delete an assistant (default: the selected one)"),
    ("/create <name> <prompt>", "Create or overwrite an assistant"),
    ("/generate <description>", "Generate a system prompt from a description"),
    ("/create-generated <name>", "Create an assistant from the last generated prompt"),
    ("/models", "List models"),
    ("/model <id>", "Switch model"),
    ("/tokens <n>", "Set the response token budget"),
    ("/key <api-key>", "Use an API key for this session"),
    ("/history", "Show the conversation"),
    ("/clear", "Clear the conversation"),
    ("/quit", "Exit"),
];

impl ReplCommand {
    /// Parse a line starting with `/`.
    ///
    /// Assistant names may contain spaces; in `/create` a multi-word name
    /// must be quoted: `/create "Code Reviewer" You review code.`
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let required = |usage: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("Usage: {}", usage))
            } else {
                Ok(rest.to_string())
            }
        };

        match cmd {
            "/help" | "/h" | "/?" => Ok(ReplCommand::Help),
            "/assistants" | "/a" => Ok(ReplCommand::Assistants),
            "/use" => required("/use <name>").map(ReplCommand::Use),
            "/delete" => Ok(ReplCommand::Delete(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "/create" => {
                let (name, prompt) = split_name(rest)
                    .ok_or_else(|| "Usage: /create <name> <prompt>".to_string())?;
                Ok(ReplCommand::Create { name, prompt })
            }
            "/create-generated" => {
                required("/create-generated <name>").map(ReplCommand::CreateGenerated)
            }
            "/generate" | "/gen" => required("/generate <description>").map(ReplCommand::Generate),
            "/models" => Ok(ReplCommand::Models),
            "/model" => required("/model <id>").map(ReplCommand::Model),
            "/tokens" => {
                let value = required("/tokens <n>")?;
                value
                    .parse()
                    .map(ReplCommand::Tokens)
                    .map_err(|_| format!("Not a token count: {}", value))
            }
            "/key" => required("/key <api-key>").map(ReplCommand::Key),
            "/history" => Ok(ReplCommand::History),
            "/clear" => Ok(ReplCommand::Clear),
            "/quit" | "/exit" | "/q" => Ok(ReplCommand::Quit),
            _ => Err(format!("Unknown command: {}", cmd)),
        }
    }
}

/// Split `name prompt` or `"multi word name" prompt`.
fn split_name(rest: &str) -> Option<(String, String)> {
    let (name, prompt) = if let Some(quoted) = rest.strip_prefix('"') {
        let (name, prompt) = quoted.split_once('"')?;
        (name.trim(), prompt.trim())
    } else {
        let (name, prompt) = rest.split_once(char::is_whitespace)?;
        (name, prompt.trim())
    };
    if name.is_empty() || prompt.is_empty() {
        return None;
    }
    Some((name.to_string(), prompt.to_string()))
}
