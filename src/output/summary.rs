use std::fmt::Write;

use crate::report::TrackingReport;
use crate::tracker::{Outcome, RateLimitNotice};

use super::styling::{failure, heading, muted, success, value, warning};
use super::tables::stage_table;

const PROMPT_TIPS: [&str; 4] = [
    "Be specific about which file(s) to modify",
    "Clearly describe what changes you want",
    "Include examples if helpful",
    "Avoid vague terms like \"improve\" or \"make better\"",
];

const EXAMPLE_PROMPTS: [&str; 3] = [
    "Add a 'Hello World' comment to the README.md file",
    "Update the package.json version to 2.0.0",
    "Add error handling to the main.go file",
];

/// Prints the final result of a tracked job to stdout.
pub fn print_summary(report: &TrackingReport) {
    println!("{}", render_summary(report));
}

/// Prints guidance for a rate-limited submission to stderr.
pub fn print_rate_limit(notice: &RateLimitNotice, repository: &str) {
    eprintln!("{}", render_rate_limit(notice, repository));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", heading(emoji), heading(title).underlined());
}

fn add_correlation(output: &mut String, repository: &str, request_id: &str) {
    let _ = writeln!(output, "  {} {}", muted("Repository:"), value(repository));
    let _ = writeln!(output, "  {} {}", muted("Request ID:"), value(request_id));
}

fn render_summary(report: &TrackingReport) -> String {
    let mut output = String::new();

    match &report.outcome {
        Outcome::Success(url) => {
            add_section_header(&mut output, "✅", "Pull Request Created Successfully!");
            let _ = writeln!(
                output,
                "  {}",
                success("Your pull request has been created and is ready for review.")
            );
            let _ = writeln!(output, "  {} {}", muted("View Pull Request:"), value(url));
        }
        Outcome::Rejected(details) => {
            add_section_header(&mut output, "⚠️", "Prompt Needs Improvement");
            let _ = writeln!(
                output,
                "  {}",
                warning("Your modification request is too vague or unclear.")
            );
            if let Some(details) = details {
                let _ = writeln!(output, "  {details}");
            }
            let _ = writeln!(output, "\n  {}", heading("Tips for writing clear prompts:"));
            for tip in PROMPT_TIPS {
                let _ = writeln!(output, "    • {tip}");
            }
            let _ = writeln!(output, "\n  {}", heading("Example good prompts:"));
            for example in EXAMPLE_PROMPTS {
                let _ = writeln!(output, "    {} \"{example}\"", success("✓"));
            }
            let _ = writeln!(
                output,
                "\n  {}",
                muted("Run `autopr submit` again with a more specific prompt.")
            );
        }
        Outcome::Error(details) => {
            add_section_header(&mut output, "❌", "Processing Failed");
            let message = report.message.as_deref().unwrap_or("The job failed.");
            let _ = writeln!(output, "  {}", failure(message));
            if let Some(details) = details {
                let _ = writeln!(output, "  {}", muted(details));
            }
        }
        Outcome::TransportError(message) => {
            add_section_header(&mut output, "❌", "Error Fetching Status");
            let _ = writeln!(output, "  {}", failure(message));
            let _ = writeln!(
                output,
                "  {} {}",
                muted("Retry with:"),
                value(format!("autopr track {}", report.request_id))
            );
        }
        Outcome::InProgress => {
            add_section_header(&mut output, "⏳", "Processing Your Request");
            if let Some(message) = &report.message {
                let _ = writeln!(output, "  {}", warning(message));
            }
        }
    }

    output.push('\n');
    add_correlation(&mut output, &report.repository, &report.request_id);

    if !matches!(report.outcome, Outcome::TransportError(_)) {
        let _ = writeln!(output, "\n{}", stage_table(&report.stages));
    }

    output
}

fn render_rate_limit(notice: &RateLimitNotice, repository: &str) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "⏱️", "Rate Limit Reached");
    let _ = writeln!(output, "  {}", warning(&notice.message));

    if let Some(info) = &notice.info {
        let _ = writeln!(
            output,
            "  {} {}/{}",
            muted("Requests used:"),
            info.used,
            info.limit
        );
    }

    match (&notice.reset_time_relative, &notice.reset_time) {
        (Some(relative), Some(absolute)) => {
            let _ = writeln!(
                output,
                "  {} {} {}",
                muted("Limit resets:"),
                value(relative),
                muted(format!("({absolute})"))
            );
        }
        (Some(relative), None) => {
            let _ = writeln!(output, "  {} {}", muted("Limit resets:"), value(relative));
        }
        _ => {}
    }

    let _ = writeln!(output, "  {} {}", muted("Repository:"), value(repository));
    let _ = writeln!(
        output,
        "\n  {}",
        muted("Submit again once the limit has reset.")
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::StageReport;
    use crate::tracker::{
        resolve, Completion, JobId, RateLimitInfo, StageRegistry, StageState, StatusSnapshot,
    };
    use chrono::Utc;

    fn report(outcome: Outcome) -> TrackingReport {
        TrackingReport {
            request_id: "req-7".to_string(),
            repository: "https://github.com/x/y".to_string(),
            outcome,
            status: Some("forking".to_string()),
            message: Some("Forking repository".to_string()),
            stages: vec![StageReport {
                id: "forking".to_string(),
                label: "Forking Repository".to_string(),
                state: StageState::Current,
            }],
            finished_at: Utc::now(),
        }
    }

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).to_string()
    }

    #[test]
    fn test_success_summary_links_pull_request() {
        let output = plain(&render_summary(&report(Outcome::Success(
            "https://github.com/x/y/pull/1".to_string(),
        ))));

        assert!(output.contains("Pull Request Created Successfully!"));
        assert!(output.contains("https://github.com/x/y/pull/1"));
        assert!(output.contains("Forking Repository"));
    }

    #[test]
    fn test_success_summary_table_shows_every_stage_done() {
        let registry = StageRegistry::default();
        let completion = Completion {
            job_id: JobId::from("req-8"),
            outcome: Outcome::Success("https://github.com/x/y/pull/8".to_string()),
            snapshot: Some(
                StatusSnapshot::new(JobId::from("req-8"), "completed")
                    .with_artifact_url("https://github.com/x/y/pull/8"),
            ),
            stages: resolve(&registry, "creating_pr"),
        };

        let output = plain(&render_summary(&TrackingReport::new(
            &completion,
            &registry,
            "https://github.com/x/y",
        )));

        assert_eq!(output.matches("done").count(), registry.len());
        assert!(!output.contains("pending"));
        assert!(!output.contains("current"));
    }

    #[test]
    fn test_rejection_summary_lists_guidance() {
        let output = plain(&render_summary(&report(Outcome::Rejected(Some(
            "too vague".to_string(),
        )))));

        assert!(output.contains("Prompt Needs Improvement"));
        assert!(output.contains("too vague"));
        for tip in PROMPT_TIPS {
            assert!(output.contains(tip));
        }
        for example in EXAMPLE_PROMPTS {
            assert!(output.contains(example));
        }
    }

    #[test]
    fn test_failures_include_repository_and_request_id() {
        for outcome in [
            Outcome::Rejected(None),
            Outcome::Error(Some("clone failed".to_string())),
            Outcome::TransportError("connection refused".to_string()),
        ] {
            let output = plain(&render_summary(&report(outcome)));
            assert!(output.contains("https://github.com/x/y"));
            assert!(output.contains("req-7"));
        }
    }

    #[test]
    fn test_transport_error_offers_retry() {
        let output = plain(&render_summary(&report(Outcome::TransportError(
            "connection refused".to_string(),
        ))));

        assert!(output.contains("Error Fetching Status"));
        assert!(output.contains("autopr track req-7"));
    }

    #[test]
    fn test_error_summary_shows_message_and_details() {
        let output = plain(&render_summary(&report(Outcome::Error(Some(
            "permission denied".to_string(),
        )))));

        assert!(output.contains("Processing Failed"));
        assert!(output.contains("Forking repository"));
        assert!(output.contains("permission denied"));
    }

    #[test]
    fn test_rate_limit_rendering() {
        let notice = RateLimitNotice {
            info: Some(RateLimitInfo {
                limit: 10,
                used: 10,
                reset_at_epoch_seconds: 1_700_005_400,
            }),
            message: "Rate limit reached: 10 of 10 requests used.".to_string(),
            reset_time: Some("2023-11-14 23:43:20 UTC".to_string()),
            reset_time_relative: Some("in 1h 30m".to_string()),
        };

        let output = plain(&render_rate_limit(&notice, "https://github.com/x/y"));

        assert!(output.contains("Rate Limit Reached"));
        assert!(output.contains("10/10"));
        assert!(output.contains("in 1h 30m"));
        assert!(output.contains("2023-11-14 23:43:20 UTC"));
        assert!(output.contains("https://github.com/x/y"));
    }

    #[test]
    fn test_legacy_rate_limit_rendering() {
        let notice = RateLimitNotice {
            info: None,
            message: "Slow down".to_string(),
            reset_time: None,
            reset_time_relative: None,
        };

        let output = plain(&render_rate_limit(&notice, "repo"));

        assert!(output.contains("Slow down"));
        assert!(!output.contains("Limit resets"));
    }
}
