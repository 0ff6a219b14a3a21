use std::io::Write;

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::app::VotingApp;
use crate::cli::{AddIssueArgs, Command};
use crate::error::{ServiceError, ServiceResult};
use crate::interactive;
use crate::metadata::{PKG_NAME, PKG_VERSION};
use crate::storage::BlobStore;
use crate::store::StoreError;
use crate::types::IssueId;
use crate::view;

/// Applies `--user` and runs one command (the interactive session when none
/// is given).
pub fn run<B: BlobStore>(
    app: &mut VotingApp<B>,
    user: Option<&str>,
    command: Option<Command>,
    out: &mut dyn Write,
) -> ServiceResult<()> {
    if let Some(name) = user {
        app.set_username(name)?;
    }
    match command {
        None | Some(Command::Interactive) => interactive::run(app),
        Some(Command::Reset { yes: false }) => {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Reset every vote on every issue?")
                .default(false)
                .interact()?;
            if confirmed {
                execute(app, Command::Reset { yes: true }, out)
            } else {
                writeln!(out, "Nothing was reset.")?;
                Ok(())
            }
        }
        Some(command) => execute(app, command, out),
    }
}

/// Runs a non-interactive command and writes its output to `out`.
pub fn execute<B: BlobStore>(
    app: &mut VotingApp<B>,
    command: Command,
    out: &mut dyn Write,
) -> ServiceResult<()> {
    match command {
        Command::List => {
            let store = app.store();
            for issue in store.issues() {
                let mine = app
                    .username()
                    .and_then(|name| store.vote_of(issue.id, name))
                    .map(|_| " (voted)")
                    .unwrap_or("");
                writeln!(
                    out,
                    "{:>3}  {}  {}{}",
                    issue.id,
                    issue.title,
                    view::vote_count_label(issue.total_votes()).dimmed(),
                    mine.green(),
                )?;
            }
        }
        Command::Show { issue } => {
            if let Some(id) = issue {
                app.select_issue(id)?;
            }
            write!(out, "{}", view::render_dashboard(app.store(), app.username()))?;
        }
        Command::Vote { issue, option } => {
            let voter = app.username().map(str::to_string).ok_or_else(|| {
                ServiceError::FromString(format!(
                    "{} (pass --user or set VOTING_USER)",
                    StoreError::MissingVoterName
                ))
            })?;
            let chosen = app.cast_vote(issue, option, &voter)?;
            writeln!(
                out,
                "{} {} now has {}.",
                "Thank you for voting!".green(),
                chosen.label.bold(),
                view::vote_count_label(u64::from(chosen.votes))
            )?;
            let theme = app.store().theme();
            if let Some(chart) = app.store().issue(issue).and_then(|i| view::render_results(i, theme)) {
                write!(out, "{chart}")?;
            }
        }
        Command::Add(AddIssueArgs {
            title,
            description,
            options,
        }) => {
            let issue = app.add_issue(&title, &description, &options)?;
            writeln!(out, "Added issue {}: {}", issue.id, issue.title.bold())?;
        }
        Command::Delete { issue } => {
            let removed = app.delete_issue(issue)?;
            writeln!(out, "Deleted issue {}: {}", removed.id, removed.title)?;
        }
        Command::Reset { .. } => {
            app.reset_all_votes();
            writeln!(out, "All votes have been reset.")?;
        }
        Command::Comment { issue, text } => {
            let author = require_username(app)?;
            app.add_comment_as(issue, &author, &text)?;
            print_comments(app, issue, out)?;
        }
        Command::Comments { issue } => {
            print_comments(app, issue, out)?;
        }
        Command::Theme { theme } => {
            if let Some(theme) = theme {
                app.set_theme(theme);
            }
            writeln!(out, "Theme: {}", app.store().theme())?;
        }
        Command::Whoami { name } => {
            if let Some(name) = name {
                app.set_username(&name)?;
            }
            match app.username() {
                Some(name) => writeln!(out, "{name}")?,
                None => writeln!(out, "No display name set.")?,
            }
        }
        Command::Interactive => interactive::run(app)?,
        Command::Version => writeln!(out, "{PKG_NAME} {PKG_VERSION}")?,
    }
    Ok(())
}

fn require_username<B: BlobStore>(app: &VotingApp<B>) -> ServiceResult<String> {
    app.username().map(str::to_string).ok_or_else(|| {
        ServiceError::FromString("Set a display name first (pass --user or set VOTING_USER)".to_string())
    })
}

fn print_comments<B: BlobStore>(
    app: &VotingApp<B>,
    issue: IssueId,
    out: &mut dyn Write,
) -> ServiceResult<()> {
    let store = app.store();
    let found = store
        .issue(issue)
        .ok_or(StoreError::IssueNotFound(issue))?;
    writeln!(out, "{}", found.title.bold())?;
    write!(out, "{}", view::render_comments(store.comments(issue), store.theme()))?;
    Ok(())
}
