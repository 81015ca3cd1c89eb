use std::io::{self, Write};

use polychat::ChatSession;

/// Classified REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Personas,
    Switch(String),
    Clear,
    Stats,
    Quit,
    Chat(String),
}

impl Command {
    /// Classifies a trimmed, non-empty input line. A switch is exactly
    /// `persona <id>`; anything else that is not a recognised command is a
    /// chat turn, passed through verbatim.
    pub fn parse(input: &str) -> Self {
        match input.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "personas" | "persona" => Self::Personas,
            "clear" => Self::Clear,
            "stats" => Self::Stats,
            "quit" | "exit" => Self::Quit,
            lowered => {
                if let Some(id) = lowered.strip_prefix("persona ") {
                    let id = id.trim();
                    if !id.is_empty() && !id.contains(char::is_whitespace) {
                        return Self::Switch(id.to_string());
                    }
                }
                Self::Chat(input.to_string())
            }
        }
    }
}

pub async fn run(mut session: ChatSession) -> anyhow::Result<()> {
    print_welcome(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("You > ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match Command::parse(input) {
            Command::Quit => {
                println!("Goodbye!");
                break;
            }
            Command::Help => print_help(),
            Command::Personas => print_personas(&session),
            Command::Switch(id) => match session.switch_persona(&id) {
                Ok(()) => {
                    let persona = session.current_persona();
                    println!("Now chatting with {} ({})", persona.name, persona.description);
                }
                Err(e) => eprintln!("[Error] {e}"),
            },
            Command::Clear => {
                session.clear_history();
                println!("Chat history cleared.");
            }
            Command::Stats => print_stats(&session),
            Command::Chat(text) => match session.submit(&text).await {
                Ok(appended) => {
                    let speaker = session.current_persona().speaker.clone();
                    for message in appended.iter().filter(|m| m.role.is_assistant()) {
                        println!("\n{speaker}: {}\n", message.content);
                    }
                }
                Err(e) => eprintln!("\n[Error] {e}\n"),
            },
        }
    }

    Ok(())
}

fn print_welcome(session: &ChatSession) {
    println!("=== Multi-Persona Chat ===");
    println!();
    let persona = session.current_persona();
    println!("Persona: {}", persona.name);
    println!("  {}", persona.description);
    println!();
    println!("Type 'help' for commands, 'quit' to exit.");
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  help, ?        Show this help message");
    println!("  personas       List available personas");
    println!("  persona <id>   Switch to another persona (clears memory)");
    println!("  clear          Clear chat history and memory");
    println!("  stats          Show session statistics");
    println!("  quit, exit     Exit");
    println!();
    println!("Anything else is sent to the active persona.");
    println!();
}

fn print_personas(session: &ChatSession) {
    let current = session.current_persona().id.clone();
    println!("Personas:");
    for persona in session.personas() {
        let marker = if persona.id == current { "*" } else { " " };
        println!(
            "{} {:<12} {:<24} {}",
            marker, persona.id, persona.name, persona.description
        );
    }
    println!();
}

fn print_stats(session: &ChatSession) {
    println!("Messages: {}", session.transcript().len());
    println!(
        "Memory: {}/{} exchanges",
        session.memory_depth(),
        session.memory_window()
    );
    println!();
}
