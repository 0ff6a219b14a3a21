use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type IssueId = u32;
pub type OptionId = u32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: OptionId,
    pub label: String,
    pub votes: u32,
}

impl VoteOption {
    pub fn new(id: OptionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            votes: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub description: String,
    pub options: Vec<VoteOption>,
}

impl Issue {
    /// Builds an issue with zeroed counters and 1-based option ids.
    pub fn new<S: AsRef<str>>(
        id: IssueId,
        title: impl Into<String>,
        description: impl Into<String>,
        labels: &[S],
    ) -> Self {
        let options = labels
            .iter()
            .zip(1..)
            .map(|(label, option_id)| VoteOption::new(option_id, label.as_ref()))
            .collect();
        Self {
            id,
            title: title.into(),
            description: description.into(),
            options,
        }
    }

    pub fn option(&self, option_id: OptionId) -> Option<&VoteOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| u64::from(o.votes)).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEntry {
    pub voter_name: String,
    pub chosen_option_id: OptionId,
}

/// Vote entries keyed by issue id, one entry per claimed voter name.
pub type VoteRecord = BTreeMap<IssueId, Vec<VoteEntry>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub timestamp: String,
}

/// Comment threads keyed by issue id, in insertion order.
pub type CommentLog = BTreeMap<IssueId, Vec<Comment>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Unknown theme: {s}")),
        }
    }
}

/// The issues/votes/theme entry, persisted as one blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub issues: Vec<Issue>,
    pub voted: VoteRecord,
    pub theme: Theme,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            issues: default_issues(),
            voted: VoteRecord::new(),
            theme: Theme::default(),
        }
    }
}

pub fn default_issues() -> Vec<Issue> {
    vec![
        Issue::new(
            1,
            "Should we adopt a 4-day workweek?",
            "Vote on whether to move to a 4-day workweek for all employees.",
            &["Yes", "No", "Undecided"],
        ),
        Issue::new(
            2,
            "Preferred Frontend Framework",
            "Which frontend framework should we use for our next project?",
            &["React", "Vue", "Svelte"],
        ),
    ]
}
