//! Menu-driven session: the terminal counterpart of the voting page, with
//! prompts standing in for the display-name and add-issue dialogs.

use colored::Colorize;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::app::VotingApp;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::BlobStore;
use crate::store::{MIN_OPTIONS, StoreError};
use crate::view;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuItem {
    Vote,
    SwitchIssue,
    AddIssue,
    DeleteIssue,
    Comment,
    ResetVotes,
    ToggleTheme,
    ChangeName,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 9] = [
        MenuItem::Vote,
        MenuItem::SwitchIssue,
        MenuItem::AddIssue,
        MenuItem::DeleteIssue,
        MenuItem::Comment,
        MenuItem::ResetVotes,
        MenuItem::ToggleTheme,
        MenuItem::ChangeName,
        MenuItem::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MenuItem::Vote => "Vote",
            MenuItem::SwitchIssue => "Switch issue",
            MenuItem::AddIssue => "Add issue",
            MenuItem::DeleteIssue => "Delete issue",
            MenuItem::Comment => "Comment",
            MenuItem::ResetVotes => "Reset all votes",
            MenuItem::ToggleTheme => "Toggle theme",
            MenuItem::ChangeName => "Change display name",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Option fields of the add-issue dialog. Never holds fewer than
/// [`MIN_OPTIONS`] fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionDraft {
    labels: Vec<String>,
}

impl OptionDraft {
    pub fn new() -> Self {
        Self {
            labels: vec![String::new(); MIN_OPTIONS],
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn set(&mut self, index: usize, label: &str) {
        if let Some(slot) = self.labels.get_mut(index) {
            *slot = label.to_string();
        }
    }

    pub fn add_field(&mut self) {
        self.labels.push(String::new());
    }

    pub fn can_remove(&self) -> bool {
        self.labels.len() > MIN_OPTIONS
    }

    pub fn remove_field(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.labels.len() {
            return false;
        }
        self.labels.remove(index);
        true
    }

    /// Ready when every field has text.
    pub fn is_complete(&self) -> bool {
        self.labels.iter().all(|label| !label.trim().is_empty())
    }
}

impl Default for OptionDraft {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run<B: BlobStore>(app: &mut VotingApp<B>) -> ServiceResult<()> {
    let theme = ColorfulTheme::default();
    if app.username().is_none() {
        prompt_username(app, &theme)?;
    }

    loop {
        println!();
        print!("{}", view::render_dashboard(app.store(), app.username()));
        println!();

        let labels: Vec<&str> = MenuItem::ALL.iter().map(MenuItem::label).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt(format!(
                "Signed in as {}",
                app.username().unwrap_or_default().bold()
            ))
            .items(&labels)
            .default(0)
            .interact()?;

        let outcome = match MenuItem::ALL[choice] {
            MenuItem::Vote => vote(app, &theme),
            MenuItem::SwitchIssue => switch_issue(app, &theme),
            MenuItem::AddIssue => add_issue(app, &theme),
            MenuItem::DeleteIssue => delete_issue(app, &theme),
            MenuItem::Comment => comment(app, &theme),
            MenuItem::ResetVotes => reset_votes(app, &theme),
            MenuItem::ToggleTheme => {
                app.toggle_theme();
                Ok(())
            }
            MenuItem::ChangeName => prompt_username(app, &theme),
            MenuItem::Quit => return Ok(()),
        };

        // validation failures are shown and the session carries on
        if let Err(e) = outcome {
            match e {
                ServiceError::Store(err) => {
                    println!("{} {err}", "!".yellow().bold());
                }
                other => return Err(other),
            }
        }
    }
}

fn prompt_username<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    let name: String = Input::with_theme(theme)
        .with_prompt("Your display name")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("Please enter a name")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    app.set_username(&name)?;
    Ok(())
}

fn vote<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    let issue = app.store().selected_issue().clone();
    let voter = app.username().unwrap_or_default();
    if app.store().vote_of(issue.id, voter).is_some() {
        return Err(StoreError::AlreadyVoted {
            issue_id: issue.id,
            voter: voter.to_string(),
        }
        .into());
    }

    let labels: Vec<String> = issue
        .options
        .iter()
        .map(|o| format!("{} ({})", o.label, view::vote_count_label(u64::from(o.votes))))
        .collect();
    let choice = Select::with_theme(theme)
        .with_prompt(issue.title.as_str())
        .items(&labels)
        .default(0)
        .interact()?;
    let option = app.vote(issue.id, issue.options[choice].id)?;
    println!("{} {}", "Thank you for voting!".green(), option.label.bold());
    Ok(())
}

fn switch_issue<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    let store = app.store();
    let titles: Vec<&str> = store.issues().iter().map(|i| i.title.as_str()).collect();
    let current = store
        .issues()
        .iter()
        .position(|i| i.id == store.selected_issue_id())
        .unwrap_or(0);
    let choice = Select::with_theme(theme)
        .with_prompt("Select issue")
        .items(&titles)
        .default(current)
        .interact()?;
    let id = store.issues()[choice].id;
    app.select_issue(id)?;
    Ok(())
}

fn add_issue<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    let title: String = Input::with_theme(theme)
        .with_prompt("Title")
        .interact_text()?;
    let description: String = Input::with_theme(theme)
        .with_prompt("Description")
        .interact_text()?;

    let mut draft = OptionDraft::new();
    for index in 0..draft.labels().len() {
        let label = prompt_option(theme, index)?;
        draft.set(index, &label);
    }

    loop {
        let mut actions = vec!["Add option", "Submit", "Cancel"];
        if draft.can_remove() {
            actions.insert(1, "Remove option");
        }
        let summary = draft.labels().join(", ");
        let action = Select::with_theme(theme)
            .with_prompt(format!("Options: {summary}"))
            .items(&actions)
            .default(0)
            .interact()?;
        match actions[action] {
            "Add option" => {
                draft.add_field();
                let index = draft.labels().len() - 1;
                let label = prompt_option(theme, index)?;
                draft.set(index, &label);
            }
            "Remove option" => {
                let index = Select::with_theme(theme)
                    .with_prompt("Remove which option?")
                    .items(draft.labels())
                    .interact()?;
                draft.remove_field(index);
            }
            "Submit" if draft.is_complete() => break,
            "Submit" => println!("{}", "Every option needs a label.".yellow()),
            _ => return Ok(()),
        }
    }

    let issue = app.add_issue(&title, &description, draft.labels())?;
    println!("Added issue {}: {}", issue.id, issue.title.bold());
    Ok(())
}

fn prompt_option(theme: &ColorfulTheme, index: usize) -> ServiceResult<String> {
    let label = Input::with_theme(theme)
        .with_prompt(format!("Option {}", index + 1))
        .interact_text()?;
    Ok(label)
}

fn delete_issue<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    if app.store().issues().len() <= 1 {
        return Err(StoreError::LastIssue.into());
    }
    let issue = app.store().selected_issue().clone();
    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!("Delete \"{}\"?", issue.title))
        .default(false)
        .interact()?;
    if confirmed {
        app.delete_issue(issue.id)?;
    }
    Ok(())
}

fn comment<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    let text: String = Input::with_theme(theme)
        .with_prompt("Comment")
        .allow_empty(true)
        .interact_text()?;
    let issue_id = app.store().selected_issue_id();
    app.add_comment(issue_id, &text)?;
    Ok(())
}

fn reset_votes<B: BlobStore>(app: &mut VotingApp<B>, theme: &ColorfulTheme) -> ServiceResult<()> {
    let confirmed = Confirm::with_theme(theme)
        .with_prompt("Reset every vote on every issue?")
        .default(false)
        .interact()?;
    if confirmed {
        app.reset_all_votes();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_keeps_at_least_two_fields() {
        let mut draft = OptionDraft::new();
        assert_eq!(draft.labels().len(), 2);
        assert!(!draft.can_remove());
        assert!(!draft.remove_field(0));

        draft.add_field();
        assert!(draft.can_remove());
        assert!(draft.remove_field(2));
        assert_eq!(draft.labels().len(), 2);
    }

    #[test]
    fn draft_is_complete_once_every_field_has_text() {
        let mut draft = OptionDraft::new();
        draft.set(0, "Yes");
        assert!(!draft.is_complete());
        draft.set(1, "  ");
        assert!(!draft.is_complete());
        draft.set(1, "No");
        assert!(draft.is_complete());
        draft.set(5, "ignored");
        assert_eq!(draft.labels(), ["Yes".to_string(), "No".to_string()]);
    }

    #[test]
    fn menu_labels_are_unique() {
        let mut labels: Vec<_> = MenuItem::ALL.iter().map(MenuItem::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MenuItem::ALL.len());
    }
}
