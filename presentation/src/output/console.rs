//! Console output formatter for ledger results

use crate::dto::{AcceptResponse, ReconcileResponse, TallyResponse, VoteResponse, VoteStatusResponse};
use colored::Colorize;
use ledger_domain::{ConfigIssue, ItemRef, Severity};
use serde::Serialize;

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format any result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_vote(item: &ItemRef, response: &VoteResponse) -> String {
        let action = match response.user_vote {
            0 => "Vote retracted".yellow().bold(),
            v if v > 0 => "Upvoted".green().bold(),
            _ => "Downvoted".red().bold(),
        };
        format!(
            "{} {}\n{} {}",
            action,
            item,
            "Total:".cyan().bold(),
            Self::signed(response.total_votes)
        )
    }

    pub fn format_status(item: &ItemRef, response: &VoteStatusResponse) -> String {
        let vote = match response.user_vote {
            0 => "none".dimmed().to_string(),
            v => Self::signed(v),
        };
        format!(
            "{} {}\n{} {}\n{} {}",
            "Item:".cyan().bold(),
            item,
            "Your vote:".cyan().bold(),
            vote,
            "Total:".cyan().bold(),
            Self::signed(response.total_votes)
        )
    }

    pub fn format_accept(response: &AcceptResponse) -> String {
        format!("{} answer {}", "Accepted".green().bold(), response.answer_id)
    }

    pub fn format_tally(response: &TallyResponse) -> String {
        let mut output = format!(
            "{} {}:{}\n  {} {}\n  {} {}\n  {} {}",
            "Tally".cyan().bold(),
            response.item_kind,
            response.item_id,
            "total:    ".bold(),
            Self::signed(response.total_votes),
            "upvotes:  ".bold(),
            response.upvotes.to_string().green(),
            "downvotes:".bold(),
            response.downvotes.to_string().red()
        );
        if response.stored_total != response.total_votes {
            output.push_str(&format!(
                "\n  {} {}",
                "stored:   ".bold(),
                Self::signed(response.stored_total).as_str().yellow()
            ));
        }
        output
    }

    pub fn format_reconcile(response: &ReconcileResponse) -> String {
        let mut output = format!(
            "{} {} items checked\n",
            "Reconciliation:".cyan().bold(),
            response.items_checked
        );

        if response.healed.is_empty()
            && response.corrected.is_empty()
            && response.failed.is_empty()
            && response.acceptance_violations.is_empty()
        {
            output.push_str(&format!("  {}\n", "All totals consistent".green()));
            return output;
        }

        Self::push_list(&mut output, "Healed duplicate votes:", &response.healed, |s| s.yellow());
        Self::push_list(&mut output, "Corrected totals:", &response.corrected, |s| s.yellow());
        Self::push_list(&mut output, "Failed:", &response.failed, |s| s.red());
        Self::push_list(
            &mut output,
            "Acceptance violations:",
            &response.acceptance_violations,
            |s| s.red().bold(),
        );
        output
    }

    pub fn format_import(questions: usize, answers: usize, votes: usize) -> String {
        format!(
            "{} {} questions, {} answers, {} votes",
            "Imported".green().bold(),
            questions,
            answers,
            votes
        )
    }

    pub fn format_config_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                let label = match issue.severity {
                    Severity::Error => "error:".red().bold(),
                    Severity::Warning => "warning:".yellow().bold(),
                };
                format!("{} {}", label, issue.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push_list(
        output: &mut String,
        title: &str,
        entries: &[String],
        paint: impl Fn(&str) -> colored::ColoredString,
    ) {
        if entries.is_empty() {
            return;
        }
        output.push_str(&format!("  {}\n", title.bold()));
        for entry in entries {
            output.push_str(&format!("    * {}\n", paint(entry.as_str())));
        }
    }

    fn signed(value: i64) -> String {
        if value > 0 {
            format!("+{}", value)
        } else {
            value.to_string()
        }
    }
}
