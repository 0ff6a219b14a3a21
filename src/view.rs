//! Terminal rendering of the voting state.
//!
//! Everything here renders to a `String` so the binary decides where output
//! goes; colors follow the stored [`Theme`].

use std::fmt::Write;

use chrono::{DateTime, Local};
use colored::{Color, ColoredString, Colorize};

use crate::results::percentages;
use crate::store::VotingStore;
use crate::types::{Comment, Issue, Theme};

const BAR_WIDTH: usize = 30;

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    accent: Color,
    muted: Color,
    success: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::BrightCyan,
                muted: Color::BrightBlack,
                success: Color::BrightGreen,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                muted: Color::Black,
                success: Color::Green,
            },
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        text.color(self.accent)
    }

    fn muted(&self, text: &str) -> ColoredString {
        text.color(self.muted)
    }

    fn success(&self, text: &str) -> ColoredString {
        text.color(self.success)
    }
}

pub fn vote_count_label(votes: u64) -> String {
    if votes == 1 {
        "1 vote".to_string()
    } else {
        format!("{votes} votes")
    }
}

/// One tab per issue; the selected issue is highlighted.
pub fn render_tabs(store: &VotingStore) -> String {
    let palette = Palette::for_theme(store.theme());
    let selected = store.selected_issue_id();
    let mut out = String::new();
    for issue in store.issues() {
        let tab = format!("[{}] {}", issue.id, issue.title);
        if issue.id == selected {
            let _ = writeln!(out, "{} {}", palette.accent(">"), palette.accent(&tab).bold());
        } else {
            let _ = writeln!(out, "  {tab}");
        }
    }
    out
}

/// The voting panel for one issue as seen by `voter`.
pub fn render_issue(store: &VotingStore, issue: &Issue, voter: Option<&str>) -> String {
    let palette = Palette::for_theme(store.theme());
    let chosen = voter.and_then(|name| store.vote_of(issue.id, name));
    let mut out = String::new();

    let _ = writeln!(out, "{}", issue.title.bold());
    let _ = writeln!(out, "{}", palette.muted(&issue.description));
    let _ = writeln!(out);
    let legend = if chosen.is_some() {
        "Your vote is locked in:"
    } else {
        "Choose your option:"
    };
    let _ = writeln!(out, "{legend}");
    for option in &issue.options {
        let count = vote_count_label(u64::from(option.votes));
        let line = format!("{:>3}. {:<24} {count}", option.id, option.label);
        match chosen {
            Some(id) if id == option.id => {
                let _ = writeln!(out, "{} {}", palette.success("*"), line.bold());
            }
            Some(_) => {
                let _ = writeln!(out, "  {}", palette.muted(&line));
            }
            None => {
                let _ = writeln!(out, "  {line}");
            }
        }
    }
    if chosen.is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", palette.success("Thank you for voting!"));
    }
    out
}

/// Horizontal bar chart, or `None` while the issue has no votes.
pub fn render_results(issue: &Issue, theme: Theme) -> Option<String> {
    let palette = Palette::for_theme(theme);
    let shares = percentages(issue)?;
    let width = shares.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for share in shares {
        let filled = (share.percent as usize * BAR_WIDTH + 50) / 100;
        let bar = "█".repeat(filled);
        let rest = "░".repeat(BAR_WIDTH - filled);
        let _ = writeln!(
            out,
            "{:<width$} {}{} {:>3}%",
            share.label,
            palette.accent(&bar),
            palette.muted(&rest),
            share.percent,
        );
    }
    Some(out)
}

pub fn render_comments(comments: &[Comment], theme: Theme) -> String {
    let palette = Palette::for_theme(theme);
    if comments.is_empty() {
        return format!("{}\n", palette.muted("No comments yet."));
    }
    let mut out = String::new();
    for comment in comments {
        let _ = writeln!(
            out,
            "{} {}",
            palette.accent(&comment.author).bold(),
            palette.muted(&display_timestamp(&comment.timestamp)),
        );
        let _ = writeln!(out, "  {}", comment.text);
    }
    out
}

/// Full screen: tabs, the selected issue, results and its comments.
pub fn render_dashboard(store: &VotingStore, voter: Option<&str>) -> String {
    let theme = store.theme();
    let issue = store.selected_issue();
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Public Voting".bold());
    out.push_str(&render_tabs(store));
    let _ = writeln!(out);
    out.push_str(&render_issue(store, issue, voter));
    if let Some(results) = render_results(issue, theme) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Results".bold());
        out.push_str(&results);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Comments".bold());
    out.push_str(&render_comments(store.comments(issue.id), theme));
    out
}

fn display_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
