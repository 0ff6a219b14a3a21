use crate::types::{Issue, OptionId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionShare {
    pub option_id: OptionId,
    pub label: String,
    pub votes: u32,
    pub percent: u32,
}

/// Rounded share of the vote for each option, or `None` when nobody has
/// voted yet.
pub fn percentages(issue: &Issue) -> Option<Vec<OptionShare>> {
    let total = issue.total_votes();
    if total == 0 {
        return None;
    }
    let shares = issue
        .options
        .iter()
        .map(|option| OptionShare {
            option_id: option.id,
            label: option.label.clone(),
            votes: option.votes,
            percent: percent_of(option.votes, total),
        })
        .collect();
    Some(shares)
}

fn percent_of(votes: u32, total: u64) -> u32 {
    (f64::from(votes) / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_with(votes: &[u32]) -> Issue {
        let labels: Vec<String> = (1..=votes.len()).map(|n| format!("Option {n}")).collect();
        let mut issue = Issue::new(1, "T", "D", &labels);
        for (option, count) in issue.options.iter_mut().zip(votes) {
            option.votes = *count;
        }
        issue
    }

    fn percents(votes: &[u32]) -> Option<Vec<u32>> {
        percentages(&issue_with(votes)).map(|shares| shares.iter().map(|s| s.percent).collect())
    }

    #[test]
    fn splits_three_to_one() {
        assert_eq!(percents(&[3, 1]), Some(vec![75, 25]));
    }

    #[test]
    fn no_votes_means_no_results() {
        assert_eq!(percents(&[0, 0]), None);
    }

    #[test]
    fn counters_near_the_limit_do_not_overflow() {
        assert_eq!(percents(&[u32::MAX, 1]), Some(vec![100, 0]));
        assert_eq!(percents(&[u32::MAX, u32::MAX]), Some(vec![50, 50]));
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5%, 7/8 = 87.5%
        assert_eq!(percents(&[1, 7]), Some(vec![13, 88]));
        assert_eq!(percents(&[1, 1, 1]), Some(vec![33, 33, 33]));
        assert_eq!(percents(&[2, 0, 1]), Some(vec![67, 0, 33]));
    }
}
