use crate::storage::{BlobStore, Persistence};
use crate::store::{StoreError, VotingStore};
use crate::types::{Comment, Issue, IssueId, OptionId, Theme, VoteOption};

/// A [`VotingStore`] wired to its persistence: every successful mutation is
/// followed by a write of the entry it touched.
pub struct VotingApp<B: BlobStore> {
    store: VotingStore,
    persistence: Persistence<B>,
    username: Option<String>,
}

impl<B: BlobStore> VotingApp<B> {
    /// Loads both entries (falling back to defaults) and the remembered
    /// display name.
    pub fn load(blobs: B) -> Self {
        let persistence = Persistence::new(blobs);
        let store = VotingStore::from_parts(persistence.load_state(), persistence.load_comments());
        let username = persistence.load_username();
        tracing::debug!(
            issues = store.issues().len(),
            user = username.as_deref().unwrap_or(""),
            "voting state loaded"
        );
        Self {
            store,
            persistence,
            username,
        }
    }

    pub fn store(&self) -> &VotingStore {
        &self.store
    }

    pub fn persistence(&self) -> &Persistence<B> {
        &self.persistence
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::MissingVoterName);
        }
        self.persistence.save_username(name);
        self.username = Some(name.to_string());
        Ok(())
    }

    /// Votes on behalf of the current display name.
    pub fn vote(&mut self, issue_id: IssueId, option_id: OptionId) -> Result<VoteOption, StoreError> {
        let voter = self.username.clone().ok_or(StoreError::MissingVoterName)?;
        self.cast_vote(issue_id, option_id, &voter)
    }

    pub fn cast_vote(
        &mut self,
        issue_id: IssueId,
        option_id: OptionId,
        voter_name: &str,
    ) -> Result<VoteOption, StoreError> {
        let option = self.store.cast_vote(issue_id, option_id, voter_name)?.clone();
        self.persist_state();
        Ok(option)
    }

    pub fn add_issue<S: AsRef<str>>(
        &mut self,
        title: &str,
        description: &str,
        option_labels: &[S],
    ) -> Result<Issue, StoreError> {
        let issue = self.store.add_issue(title, description, option_labels)?.clone();
        self.persist_state();
        Ok(issue)
    }

    pub fn delete_issue(&mut self, issue_id: IssueId) -> Result<Issue, StoreError> {
        let removed = self.store.delete_issue(issue_id)?;
        self.persist_state();
        Ok(removed)
    }

    /// Selection is view state and is not persisted.
    pub fn select_issue(&mut self, issue_id: IssueId) -> Result<(), StoreError> {
        self.store.select_issue(issue_id).map(|_| ())
    }

    pub fn reset_all_votes(&mut self) {
        self.store.reset_all_votes();
        self.persist_state();
    }

    pub fn add_comment(&mut self, issue_id: IssueId, text: &str) -> Result<Comment, StoreError> {
        let author = self.username.clone().unwrap_or_default();
        self.add_comment_as(issue_id, &author, text)
    }

    pub fn add_comment_as(
        &mut self,
        issue_id: IssueId,
        author: &str,
        text: &str,
    ) -> Result<Comment, StoreError> {
        let comment = self.store.add_comment(issue_id, author, text)?.clone();
        self.persistence.save_comments(self.store.comment_log());
        Ok(comment)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.store.set_theme(theme);
        self.persist_state();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.store.toggle_theme();
        self.persist_state();
        theme
    }

    fn persist_state(&mut self) {
        self.persistence.save_state(self.store.snapshot());
    }
}
