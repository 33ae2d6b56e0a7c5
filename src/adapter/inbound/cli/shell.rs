//! The read-eval-print loop.
//!
//! Each input line is split with POSIX shell quoting rules, parsed as a
//! [`ShellLine`] and handed to the [`Handler`]. A failing command prints an
//! error and the loop carries on. Ctrl-C interrupts a running foreground
//! command; at the prompt it leaves the shell.

use std::io::Write;

use clap::error::ErrorKind;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use super::command::{ShellCommand, ShellLine};
use super::handler::{Flow, Handler};
use super::output;
use crate::error::Result;

const PROMPT: &str = "modsh> ";

/// Outcome of parsing one input line.
#[derive(Debug)]
pub enum Parsed {
    /// Blank line or comment.
    Empty,
    Command(Box<ShellCommand>),
    /// `help` or `--help` output to print.
    Help(String),
    /// Parse failure, rendered for the user.
    Invalid(String),
}

/// Split and parse one line of input.
#[must_use]
pub fn parse_line(line: &str) -> Parsed {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Parsed::Empty;
    }
    let Some(words) = shlex::split(trimmed) else {
        return Parsed::Invalid("unbalanced quotes".to_string());
    };
    match ShellLine::try_parse_from(words) {
        Ok(parsed) => Parsed::Command(Box::new(parsed.command)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => Parsed::Help(e.render().to_string()),
            _ => Parsed::Invalid(e.render().to_string().trim_end().to_string()),
        },
    }
}

fn prompt() {
    print!("{PROMPT}");
    // A failed flush only loses the prompt.
    let _ = std::io::stdout().flush();
}

/// Read commands from `input` until EOF, `exit` or Ctrl-C at the prompt.
///
/// Stops every live job and clears the cache on the way out.
///
/// # Errors
///
/// Returns an error only if reading `input` fails.
pub async fn run<R>(handler: &Handler, input: R, show_prompt: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        if show_prompt {
            prompt();
        }
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut ctrl_c => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_line(&line) {
            Parsed::Empty => continue,
            Parsed::Help(text) => {
                output::text(&text);
                continue;
            }
            Parsed::Invalid(message) => {
                output::error(&message);
                continue;
            }
            Parsed::Command(command) => *command,
        };

        let outcome = tokio::select! {
            outcome = handler.execute(command) => outcome,
            _ = &mut ctrl_c => {
                output::warning("interrupted");
                ctrl_c.set(tokio::signal::ctrl_c());
                continue;
            }
        };
        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => output::error(&e.to_string()),
        }
    }

    let stopped = handler.session().stop();
    info!(stopped, "Shell closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::Session;
    use crate::domain::{JobId, JobState, ListingKind};
    use crate::infrastructure::config::SessionConfig;
    use crate::testkit::client::ScriptedClient;
    use crate::testkit::domain::posts;

    #[test]
    fn blank_and_comment_lines_are_empty() {
        assert!(matches!(parse_line("   "), Parsed::Empty));
        assert!(matches!(parse_line("# note"), Parsed::Empty));
    }

    #[test]
    fn quoted_arguments_stay_together() {
        match parse_line(r#"flair t3_a "needs review" --css warn"#) {
            Parsed::Command(command) => match *command {
                ShellCommand::Flair { text, css, .. } => {
                    assert_eq!(text, "needs review");
                    assert_eq!(css.as_deref(), Some("warn"));
                }
                other => panic!("expected flair, got {other:?}"),
            },
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn unbalanced_quotes_are_invalid() {
        assert!(matches!(parse_line(r#"reply t1_a "oops"#), Parsed::Invalid(_)));
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(matches!(parse_line("help"), Parsed::Help(_)));
        assert!(matches!(parse_line("modqueue --help"), Parsed::Help(_)));
    }

    #[test]
    fn unknown_verb_is_invalid() {
        assert!(matches!(parse_line("frobnicate"), Parsed::Invalid(_)));
    }

    #[tokio::test]
    async fn failing_command_keeps_shell_alive() {
        let client = Arc::new(
            ScriptedClient::new().with_listing(ListingKind::Unmoderated, posts(2, "alice")),
        );
        let session = Session::start(client, 100).await.unwrap();
        let handler = Handler::new(session, SessionConfig::default());

        let script: &[u8] = b"user ghost\nunmoderated rust --as-job\nwait 1\nexit\njobs\n";
        run(&handler, script, false).await.unwrap();

        let jobs = handler.session().jobs();
        assert_eq!(jobs.len(), 1);
        let job = handler.session().poll(JobId::new(1)).unwrap();
        assert_eq!(job.state, JobState::Completed);
    }
}
