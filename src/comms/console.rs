//! Console channel — reads lines from stdin, prints replies to stdout.
//!
//! Plain lines are chat messages. Lines starting with `/` are account and
//! site commands (see [`HELP`]). Runs until `/quit`, stdin EOF, or the
//! `shutdown` token is cancelled; leaving the console cancels `shutdown` so
//! the rest of the app stops with it.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::assistant::quiz::QuizQuestion;
use crate::error::AppError;
use crate::site::signup::SignupForm;

use super::AppState;
use super::runtime::{Component, ComponentFuture};

pub const HELP: &str = "\
commands:
  /login <email> <password>
  /signup <name> <email> <password> <confirm>   (accepts the terms)
  /logout
  /whoami
  /dashboard
  /quiz
  /reset        start a new conversation
  /help
  /quit
anything else is sent to EcoBot";

/// A parsed console line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Chat(&'a str),
    Login { email: &'a str, password: &'a str },
    Signup { name: &'a str, email: &'a str, password: &'a str, confirm: &'a str },
    Logout,
    WhoAmI,
    Dashboard,
    Quiz,
    Reset,
    Help,
    Quit,
    /// A slash command that is unknown or has the wrong arguments.
    Usage(&'a str),
}

/// Parse one trimmed, non-empty input line.
pub fn parse_command(line: &str) -> Command<'_> {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Chat(line);
    };
    let args: Vec<&str> = rest.split_whitespace().collect();
    match args[..] {
        ["login", email, password] => Command::Login { email, password },
        ["signup", name, email, password, confirm] => Command::Signup { name, email, password, confirm },
        ["logout"] => Command::Logout,
        ["whoami"] => Command::WhoAmI,
        ["dashboard"] => Command::Dashboard,
        ["quiz"] => Command::Quiz,
        ["reset"] => Command::Reset,
        ["help"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        _ => Command::Usage(line),
    }
}

pub struct ConsoleChannel {
    channel_id: String,
    state: Arc<AppState>,
}

impl ConsoleChannel {
    pub fn new(channel_id: impl Into<String>, state: Arc<AppState>) -> Self {
        Self { channel_id: channel_id.into(), state }
    }
}

impl Component for ConsoleChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_console(self.channel_id, self.state, shutdown))
    }
}

async fn run_console(
    channel_id: String,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!(%channel_id, "console channel started");
    println!("─────────────────────────────────");
    println!(" EcoBot console  (/help, Ctrl-C to quit)");
    println!("─────────────────────────────────");
    if let Some(user) = state.current_user().await {
        println!("signed in as {} <{}>", user.name, user.email);
    }

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!("\n[console] shutdown signal received");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("console read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("console stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        let input = input.trim();
                        if input.is_empty() { continue; }
                        debug!(input_len = input.len(), "console received line");

                        match parse_command(input) {
                            Command::Quit => break,
                            command => println!("{}", execute(&state, command).await),
                        }
                    }
                }
            }
        }
    }

    info!(%channel_id, "console channel shutting down");
    shutdown.cancel();
    Ok(())
}

/// Run one command and return the text to print.
pub async fn execute(state: &AppState, command: Command<'_>) -> String {
    match command {
        Command::Chat(text) => state.chat(text).await,
        Command::Login { email, password } => match state.login(email, password).await {
            Ok(user) => format!("Welcome back, {}!", user.name),
            Err(e) => e.to_string(),
        },
        Command::Signup { name, email, password, confirm } => {
            let form = SignupForm {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm.to_string(),
                agree_terms: true,
            };
            match state.signup(&form).await {
                Ok(user) => format!("Account created. Welcome, {}! (/dashboard)", user.name),
                Err(e) => e.to_string(),
            }
        }
        Command::Logout => match state.logout().await {
            Ok(()) => "Signed out.".to_string(),
            Err(e) => e.to_string(),
        },
        Command::WhoAmI => match state.current_user().await {
            Some(user) => format!("{} <{}> (id {})", user.name, user.email, user.id),
            None => "Not signed in.".to_string(),
        },
        Command::Dashboard => match state.dashboard().await {
            Ok(dashboard) => dashboard.render_text(),
            Err(e) => e.to_string(),
        },
        Command::Quiz => match state.quiz().await {
            Ok(questions) => render_quiz(&questions),
            Err(e) => {
                warn!(error = %e, "quiz unavailable");
                crate::assistant::APOLOGY.to_string()
            }
        },
        Command::Reset => {
            state.reset_chat().await;
            "Started a new conversation.".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
        Command::Usage(line) => format!("unknown command: {line}\n{HELP}"),
    }
}

fn render_quiz(questions: &[QuizQuestion]) -> String {
    let mut out = String::new();
    for (n, q) in questions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", n + 1, q.question));
        for (letter, option) in ('a'..).zip(&q.options) {
            out.push_str(&format!("   {letter}) {option}\n"));
        }
        out.push_str(&format!("   answer: {}\n   {}\n", q.correct_answer, q.explanation));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::assistant::resolver;
    use crate::config::Config;

    fn state(tmp: &TempDir) -> AppState {
        AppState::from_config(&Config::test_default(tmp.path())).unwrap()
    }

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse_command("where can I drop off?"), Command::Chat("where can I drop off?"));
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(
            parse_command("/login demo@example.com password123"),
            Command::Login { email: "demo@example.com", password: "password123" }
        );
        assert_eq!(
            parse_command("/signup Jane jane@x.com abcdef abcdef"),
            Command::Signup { name: "Jane", email: "jane@x.com", password: "abcdef", confirm: "abcdef" }
        );
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/login onlyemail"), Command::Usage("/login onlyemail"));
        assert_eq!(parse_command("/dance"), Command::Usage("/dance"));
    }

    #[tokio::test]
    async fn login_then_dashboard() {
        let tmp = TempDir::new().unwrap();
        let s = state(&tmp);
        assert_eq!(execute(&s, Command::Dashboard).await, "Please log in to continue");
        let out = execute(&s, parse_command("/login demo@example.com password123")).await;
        assert_eq!(out, "Welcome back, Demo User!");
        assert!(execute(&s, Command::Dashboard).await.starts_with("Welcome back, Demo User!"));
    }

    #[tokio::test]
    async fn bad_login_message() {
        let tmp = TempDir::new().unwrap();
        let s = state(&tmp);
        let out = execute(&s, parse_command("/login demo@example.com nope")).await;
        assert_eq!(out, "Invalid email or password");
    }

    #[tokio::test]
    async fn signup_validation_surfaces() {
        let tmp = TempDir::new().unwrap();
        let s = state(&tmp);
        let out = execute(&s, parse_command("/signup Jane jane@x.com abcdef abcxyz")).await;
        assert_eq!(out, "Passwords do not match");
    }

    #[tokio::test]
    async fn chat_and_quiz_offline() {
        let tmp = TempDir::new().unwrap();
        let s = state(&tmp);
        assert_eq!(execute(&s, Command::Chat("hello")).await, resolver::GREETING_REPLY);
        let quiz = execute(&s, Command::Quiz).await;
        assert!(quiz.starts_with("1. "));
        assert!(quiz.contains("5. "));
        assert!(quiz.contains("d) "));
    }
}
