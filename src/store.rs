//! In-memory voting state: issues, vote records, comments and preferences.
//!
//! Every mutation either applies completely or returns a [`StoreError`] and
//! leaves the store untouched. Persistence is layered on top by
//! [`crate::app::VotingApp`].

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::types::{
    Comment, CommentLog, Issue, IssueId, OptionId, PersistedState, Theme, VoteEntry, VoteOption,
    default_issues,
};

pub const MIN_OPTIONS: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Please enter a display name before voting")]
    MissingVoterName,
    #[error("{voter} has already voted on issue {issue_id}")]
    AlreadyVoted { issue_id: IssueId, voter: String },
    #[error("Issue not found: {0}")]
    IssueNotFound(IssueId),
    #[error("Option {option_id} not found on issue {issue_id}")]
    OptionNotFound {
        issue_id: IssueId,
        option_id: OptionId,
    },
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("An issue needs at least two options")]
    TooFewOptions,
    #[error("Cannot delete the last remaining issue")]
    LastIssue,
    #[error("No issue ids left to assign")]
    IssueIdsExhausted,
}

#[derive(Clone, Debug)]
pub struct VotingStore {
    state: PersistedState,
    comments: CommentLog,
    selected: IssueId,
}

impl VotingStore {
    pub fn new() -> Self {
        Self::from_parts(PersistedState::default(), CommentLog::new())
    }

    /// Builds a store from loaded entries. An empty issue list is replaced
    /// with the default issues so the collection is never empty.
    pub fn from_parts(mut state: PersistedState, comments: CommentLog) -> Self {
        if state.issues.is_empty() {
            tracing::warn!("no issues in loaded state, using defaults");
            state.issues = default_issues();
        }
        let selected = state.issues[0].id;
        Self {
            state,
            comments,
            selected,
        }
    }

    pub fn snapshot(&self) -> &PersistedState {
        &self.state
    }

    pub fn comment_log(&self) -> &CommentLog {
        &self.comments
    }

    pub fn issues(&self) -> &[Issue] {
        &self.state.issues
    }

    pub fn issue(&self, issue_id: IssueId) -> Option<&Issue> {
        self.state.issues.iter().find(|i| i.id == issue_id)
    }

    pub fn selected_issue_id(&self) -> IssueId {
        self.selected
    }

    pub fn selected_issue(&self) -> &Issue {
        // selection always points at an existing issue; fall back to the first
        self.issue(self.selected).unwrap_or(&self.state.issues[0])
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn comments(&self, issue_id: IssueId) -> &[Comment] {
        self.comments
            .get(&issue_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn votes_on(&self, issue_id: IssueId) -> &[VoteEntry] {
        self.state
            .voted
            .get(&issue_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The option `voter_name` chose on `issue_id`, if any.
    pub fn vote_of(&self, issue_id: IssueId, voter_name: &str) -> Option<OptionId> {
        let voter = voter_name.trim();
        self.votes_on(issue_id)
            .iter()
            .find(|entry| entry.voter_name == voter)
            .map(|entry| entry.chosen_option_id)
    }

    pub fn select_issue(&mut self, issue_id: IssueId) -> Result<&Issue, StoreError> {
        let index = self.index_of(issue_id)?;
        self.selected = issue_id;
        Ok(&self.state.issues[index])
    }

    pub fn cast_vote(
        &mut self,
        issue_id: IssueId,
        option_id: OptionId,
        voter_name: &str,
    ) -> Result<&VoteOption, StoreError> {
        let voter = voter_name.trim();
        if voter.is_empty() {
            return Err(StoreError::MissingVoterName);
        }
        let index = self.index_of(issue_id)?;
        if self.vote_of(issue_id, voter).is_some() {
            return Err(StoreError::AlreadyVoted {
                issue_id,
                voter: voter.to_string(),
            });
        }
        let position = self.state.issues[index]
            .options
            .iter()
            .position(|o| o.id == option_id)
            .ok_or(StoreError::OptionNotFound {
                issue_id,
                option_id,
            })?;

        self.state.voted.entry(issue_id).or_default().push(VoteEntry {
            voter_name: voter.to_string(),
            chosen_option_id: option_id,
        });
        let option = &mut self.state.issues[index].options[position];
        option.votes = option.votes.saturating_add(1);
        tracing::debug!(issue_id, option_id, voter, votes = option.votes, "vote cast");
        Ok(&*option)
    }

    pub fn add_issue<S: AsRef<str>>(
        &mut self,
        title: &str,
        description: &str,
        option_labels: &[S],
    ) -> Result<&Issue, StoreError> {
        let title = non_empty(title, "Title")?;
        let description = non_empty(description, "Description")?;
        if option_labels.len() < MIN_OPTIONS {
            return Err(StoreError::TooFewOptions);
        }
        let labels = option_labels
            .iter()
            .map(|label| non_empty(label.as_ref(), "Option"))
            .collect::<Result<Vec<_>, _>>()?;

        let issue = Issue::new(self.next_issue_id()?, title, description, &labels);
        tracing::debug!(issue_id = issue.id, options = labels.len(), "issue added");
        self.selected = issue.id;
        self.state.issues.push(issue);
        Ok(&self.state.issues[self.state.issues.len() - 1])
    }

    /// Removes an issue and its vote records. The last issue cannot be
    /// deleted; selection moves to the first remaining issue when needed.
    pub fn delete_issue(&mut self, issue_id: IssueId) -> Result<Issue, StoreError> {
        let index = self.index_of(issue_id)?;
        if self.state.issues.len() <= 1 {
            return Err(StoreError::LastIssue);
        }
        let removed = self.state.issues.remove(index);
        self.state.voted.remove(&issue_id);
        if self.selected == issue_id {
            self.selected = self.state.issues[0].id;
        }
        tracing::debug!(issue_id, "issue deleted");
        Ok(removed)
    }

    pub fn reset_all_votes(&mut self) {
        for option in self
            .state
            .issues
            .iter_mut()
            .flat_map(|issue| issue.options.iter_mut())
        {
            option.votes = 0;
        }
        self.state.voted.clear();
        tracing::debug!("all votes reset");
    }

    pub fn add_comment(
        &mut self,
        issue_id: IssueId,
        author: &str,
        text: &str,
    ) -> Result<&Comment, StoreError> {
        self.add_comment_at(issue_id, author, text, Utc::now())
    }

    pub fn add_comment_at(
        &mut self,
        issue_id: IssueId,
        author: &str,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<&Comment, StoreError> {
        let author = non_empty(author, "Name")?;
        let text = non_empty(text, "Comment")?;
        self.index_of(issue_id)?;

        let thread = self.comments.entry(issue_id).or_default();
        thread.push(Comment {
            author: author.to_string(),
            text: text.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        tracing::debug!(issue_id, author, "comment added");
        Ok(&thread[thread.len() - 1])
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.state.theme = self.state.theme.toggled();
        self.state.theme
    }

    fn index_of(&self, issue_id: IssueId) -> Result<usize, StoreError> {
        self.state
            .issues
            .iter()
            .position(|i| i.id == issue_id)
            .ok_or(StoreError::IssueNotFound(issue_id))
    }

    // Comment threads outlive their issue, so their ids count as taken.
    fn next_issue_id(&self) -> Result<IssueId, StoreError> {
        let max_issue = self.state.issues.iter().map(|i| i.id).max().unwrap_or(0);
        let max_thread = self.comments.keys().copied().max().unwrap_or(0);
        max_issue
            .max(max_thread)
            .checked_add(1)
            .ok_or(StoreError::IssueIdsExhausted)
    }
}

impl Default for VotingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StoreError::EmptyField(field))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn counts(store: &VotingStore, issue_id: IssueId) -> Vec<u32> {
        store
            .issue(issue_id)
            .unwrap()
            .options
            .iter()
            .map(|o| o.votes)
            .collect()
    }

    fn assert_tallies_match_records(store: &VotingStore) {
        for issue in store.issues() {
            let mut voters: Vec<_> = store
                .votes_on(issue.id)
                .iter()
                .map(|e| e.voter_name.as_str())
                .collect();
            voters.sort_unstable();
            voters.dedup();
            assert_eq!(issue.total_votes() as usize, voters.len(), "issue {}", issue.id);
        }
    }

    #[test]
    fn second_vote_from_same_name_is_rejected() {
        let mut store = VotingStore::new();
        store.cast_vote(1, 1, "alice").unwrap();
        let err = store.cast_vote(1, 2, "alice").unwrap_err();
        assert_eq!(
            err,
            StoreError::AlreadyVoted {
                issue_id: 1,
                voter: "alice".to_string()
            }
        );
        assert_eq!(counts(&store, 1), vec![1, 0, 0]);
        assert_eq!(store.vote_of(1, "alice"), Some(1));
    }

    #[test]
    fn different_names_vote_independently() {
        let mut store = VotingStore::new();
        store.cast_vote(1, 1, "alice").unwrap();
        store.cast_vote(1, 2, "bob").unwrap();
        store.cast_vote(1, 2, " carol ").unwrap();
        store.cast_vote(2, 3, "alice").unwrap();
        assert!(store.cast_vote(1, 3, "carol").is_err());

        assert_eq!(counts(&store, 1), vec![1, 2, 0]);
        assert_eq!(counts(&store, 2), vec![0, 0, 1]);
        assert_eq!(store.vote_of(1, "carol"), Some(2));
        assert_tallies_match_records(&store);
    }

    #[test]
    fn vote_requires_a_name_and_known_targets() {
        let mut store = VotingStore::new();
        assert_eq!(store.cast_vote(1, 1, "   "), Err(StoreError::MissingVoterName));
        assert_eq!(store.cast_vote(9, 1, "alice"), Err(StoreError::IssueNotFound(9)));
        assert_eq!(
            store.cast_vote(1, 7, "alice"),
            Err(StoreError::OptionNotFound {
                issue_id: 1,
                option_id: 7
            })
        );
        assert!(store.votes_on(1).is_empty());
        assert_eq!(counts(&store, 1), vec![0, 0, 0]);
    }

    #[test]
    fn add_issue_assigns_next_id_and_selects_it() {
        let mut store = VotingStore::new();
        let issue = store.add_issue("T", "D", &["A", "B"]).unwrap();
        assert_eq!(issue.id, 3);
        assert_eq!(issue.options[0].id, 1);
        assert_eq!(issue.options[1].id, 2);
        assert_eq!(issue.options[1].label, "B");
        assert_eq!(store.selected_issue_id(), 3);
        assert_eq!(store.issues().len(), 3);
    }

    #[test]
    fn add_issue_validates_input() {
        let mut store = VotingStore::new();
        assert_eq!(
            store.add_issue(" ", "D", &["A", "B"]).unwrap_err(),
            StoreError::EmptyField("Title")
        );
        assert_eq!(
            store.add_issue("T", "", &["A", "B"]).unwrap_err(),
            StoreError::EmptyField("Description")
        );
        assert_eq!(
            store.add_issue("T", "D", &["A"]).unwrap_err(),
            StoreError::TooFewOptions
        );
        assert_eq!(
            store.add_issue("T", "D", &["A", "\t"]).unwrap_err(),
            StoreError::EmptyField("Option")
        );
        assert_eq!(store.issues().len(), 2);
        assert_eq!(store.selected_issue_id(), 1);
    }

    #[test]
    fn add_issue_trims_fields() {
        let mut store = VotingStore::new();
        let issue = store
            .add_issue("  Lunch  ", " Where? ", &[" Pizza", "Tacos "])
            .unwrap();
        assert_eq!(issue.title, "Lunch");
        assert_eq!(issue.description, "Where?");
        assert_eq!(issue.options[0].label, "Pizza");
        assert_eq!(issue.options[1].label, "Tacos");
    }

    #[test]
    fn deleted_issue_id_with_comments_is_not_reused() {
        let mut store = VotingStore::new();
        store.add_issue("T", "D", &["A", "B"]).unwrap();
        store.add_comment(3, "alice", "first").unwrap();
        store.delete_issue(3).unwrap();
        let issue = store.add_issue("T2", "D2", &["A", "B"]).unwrap();
        assert_eq!(issue.id, 4);
        assert!(store.comments(4).is_empty());
    }

    #[test]
    fn add_issue_fails_cleanly_when_ids_run_out() {
        let mut state = PersistedState::default();
        state.issues[1].id = IssueId::MAX;
        let mut store = VotingStore::from_parts(state, CommentLog::new());
        assert_eq!(
            store.add_issue("T", "D", &["A", "B"]).unwrap_err(),
            StoreError::IssueIdsExhausted
        );
        assert_eq!(store.issues().len(), 2);
        assert_eq!(store.selected_issue_id(), 1);
    }

    #[test]
    fn deleting_the_only_issue_is_rejected() {
        let mut store = VotingStore::new();
        store.delete_issue(1).unwrap();
        let before = store.issues().to_vec();
        assert_eq!(store.delete_issue(2), Err(StoreError::LastIssue));
        assert_eq!(store.issues(), before.as_slice());
    }

    #[test]
    fn delete_moves_selection_and_drops_votes() {
        let mut store = VotingStore::new();
        store.cast_vote(2, 1, "alice").unwrap();
        store.select_issue(2).unwrap();
        store.add_issue("T", "D", &["A", "B"]).unwrap();
        store.select_issue(2).unwrap();

        let removed = store.delete_issue(2).unwrap();
        assert_eq!(removed.id, 2);
        assert!(store.votes_on(2).is_empty());
        assert_eq!(store.selected_issue_id(), 1);

        store.select_issue(3).unwrap();
        store.delete_issue(1).unwrap();
        assert_eq!(store.selected_issue_id(), 3);
        assert_eq!(store.delete_issue(42), Err(StoreError::IssueNotFound(42)));
    }

    #[test]
    fn reset_clears_votes_but_keeps_comments() {
        let mut store = VotingStore::new();
        store.cast_vote(1, 1, "alice").unwrap();
        store.cast_vote(2, 2, "bob").unwrap();
        store.add_comment(1, "alice", "hello").unwrap();

        store.reset_all_votes();
        assert!(store.snapshot().voted.is_empty());
        for issue in store.issues() {
            assert_eq!(issue.total_votes(), 0);
        }
        assert_eq!(store.comments(1).len(), 1);
        store.cast_vote(1, 2, "alice").unwrap();
        assert_eq!(counts(&store, 1), vec![0, 1, 0]);
    }

    #[test]
    fn comments_append_in_order_with_timestamps() {
        let mut store = VotingStore::new();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        store.add_comment_at(1, "alice", "first", at).unwrap();
        store.add_comment(1, " bob ", " second ").unwrap();

        let thread = store.comments(1);
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].timestamp, "2024-05-01T12:30:00.000Z");
        assert_eq!(thread[1].author, "bob");
        assert_eq!(thread[1].text, "second");
        assert!(DateTime::parse_from_rfc3339(&thread[1].timestamp).is_ok());
    }

    #[test]
    fn blank_comments_are_rejected() {
        let mut store = VotingStore::new();
        assert_eq!(
            store.add_comment(1, "", "text").unwrap_err(),
            StoreError::EmptyField("Name")
        );
        assert_eq!(
            store.add_comment(1, "alice", "  ").unwrap_err(),
            StoreError::EmptyField("Comment")
        );
        assert_eq!(
            store.add_comment(5, "alice", "text").unwrap_err(),
            StoreError::IssueNotFound(5)
        );
        assert!(store.comment_log().is_empty());
    }

    #[test]
    fn theme_toggles() {
        let mut store = VotingStore::new();
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.toggle_theme(), Theme::Light);
        store.set_theme(Theme::Dark);
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn empty_loaded_state_falls_back_to_defaults() {
        let state = PersistedState {
            issues: Vec::new(),
            ..PersistedState::default()
        };
        let store = VotingStore::from_parts(state, CommentLog::new());
        assert_eq!(store.issues().len(), 2);
        assert_eq!(store.selected_issue().id, 1);
    }
}
