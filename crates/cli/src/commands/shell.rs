//! Interactive dashboard shell.
//!
//! Owns the session handle and the navigator for one run. The `login` and
//! `logout` commands are the only places that mutate the session; everything
//! else reads it.
//!
//! # Usage
//!
//! ```text
//! $ stockdash shell
//! > go /dashboard/database
//! /dashboard/database -> /auth/login?redirect=/dashboard/database (login required)
//! mounted auth > login at /auth/login?redirect=/dashboard/database
//! > login root --admin
//! mounted dashboard > database at /dashboard/database
//! ```

use std::io::{self, Write};

use stockdash_core::{
    GuardConfig, Navigation, NavigationError, Navigator, RouteTable, SessionObserver, SessionStore,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::{CommandError, mount_line, redirect_lines, routes};

const HELP: &str = "\
commands:
  go <path>              navigate to a route
  login <name> [--admin] log in and continue to the requested page
  logout                 log out and return to the login page
  whoami                 show the current session
  where                  show the current location
  routes                 list the route table
  help                   show this help
  quit                   leave the shell";

/// Errors parsing a shell line. Reported to the user, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go(String),
    Login { name: String, admin: bool },
    Logout,
    WhoAmI,
    Where,
    Routes,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `ShellError` for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };

        let parsed = match command {
            "go" | "cd" => Self::Go(
                words
                    .next()
                    .ok_or(ShellError::MissingArgument {
                        command: "go",
                        argument: "a path",
                    })?
                    .to_owned(),
            ),
            "login" => {
                let name = words.next().ok_or(ShellError::MissingArgument {
                    command: "login",
                    argument: "a user name",
                })?;
                let admin = match words.next() {
                    None => false,
                    Some("--admin") => true,
                    Some(other) => return Err(ShellError::UnexpectedArgument(other.to_owned())),
                };
                Self::Login {
                    name: name.to_owned(),
                    admin,
                }
            }
            "logout" => Self::Logout,
            "whoami" => Self::WhoAmI,
            "where" | "pwd" => Self::Where,
            "routes" => Self::Routes,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_owned())),
        };

        if let Some(extra) = words.next() {
            return Err(ShellError::UnexpectedArgument(extra.to_owned()));
        }
        Ok(Some(parsed))
    }
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Session handle plus navigator for one shell run.
#[derive(Debug)]
pub struct Shell {
    store: SessionStore,
    navigator: Navigator,
}

impl Shell {
    #[must_use]
    pub fn new(table: RouteTable, guard: GuardConfig) -> Self {
        let store = SessionStore::new();
        let navigator = Navigator::new(table, store.observer(), guard);
        Self { store, navigator }
    }

    /// Read-only session handle for UI consumers.
    #[must_use]
    pub fn observer(&self) -> SessionObserver {
        self.store.observer()
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails. Navigation failures
    /// are reported on `out`.
    pub fn execute(&mut self, command: ShellCommand, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            ShellCommand::Go(path) => show(self.navigator.navigate(&path), out)?,
            ShellCommand::Login { name, admin } => {
                self.store.set_session(name, admin);
                show(self.navigator.resume_after_login(), out)?;
            }
            ShellCommand::Logout => {
                self.store.reset_session();
                let login_path = self.navigator.config().login_path.clone();
                show(self.navigator.navigate(&login_path), out)?;
            }
            ShellCommand::WhoAmI => {
                let session = self.store.snapshot();
                writeln!(
                    out,
                    "{}: {} (logged_in: {}, admin: {})",
                    session.user_name().unwrap_or("(anonymous)"),
                    session.state(),
                    session.is_logged_in(),
                    session.is_admin()
                )?;
            }
            ShellCommand::Where => match self.navigator.current() {
                Some(location) => writeln!(out, "{}", mount_line(location))?,
                None => writeln!(out, "nowhere yet")?,
            },
            ShellCommand::Routes => routes::render(self.navigator.table(), out)?,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

fn show(result: Result<Navigation, NavigationError>, out: &mut impl Write) -> io::Result<()> {
    match result {
        Ok(navigation) => {
            for line in redirect_lines(&navigation) {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "{}", mount_line(&navigation.location))
        }
        Err(e) => writeln!(out, "error: {e}"),
    }
}

/// Logs every session change, as a header badge would re-render.
async fn session_badge(mut observer: SessionObserver) {
    while let Ok(session) = observer.changed().await {
        tracing::info!(
            state = %session.state(),
            user = session.user_name().unwrap_or("-"),
            "Session badge updated"
        );
    }
}

/// Run the shell until `quit` or end of input.
///
/// Starts by navigating to `/`, as the application does when first mounted.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<R>(
    table: RouteTable,
    guard: GuardConfig,
    input: R,
    out: &mut impl Write,
) -> Result<(), CommandError>
where
    R: AsyncBufRead + Unpin,
{
    let mut shell = Shell::new(table, guard);
    let badge = tokio::spawn(session_badge(shell.observer()));

    writeln!(out, "stockdash shell - type `help` for commands")?;
    shell.execute(ShellCommand::Go("/".to_owned()), out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if shell.execute(command, out)? == Flow::Quit {
                    break;
                }
            }
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }

    badge.abort();
    Ok(())
}
