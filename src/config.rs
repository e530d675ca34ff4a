//! Input resolution: reads the notification values from the environment

use std::fmt;

use tracing::debug;

use crate::error::{NotifyError, Result};

// Slack notification bits
pub const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_SLACK_STATUS: &str = "SLACK_STATUS";
pub const ENV_SLACK_AUTHOR: &str = "SLACK_AUTHOR";
pub const ENV_SLACK_EMAIL: &str = "SLACK_EMAIL";
pub const ENV_SLACK_COMMIT_ID: &str = "SLACK_COMMIT_ID";
pub const ENV_SLACK_COMMIT_MSG: &str = "SLACK_COMMIT_MSG";
pub const ENV_SLACK_COMMIT_URL: &str = "SLACK_COMMIT_URL";
pub const ENV_SLACK_AVATAR_URL: &str = "SLACK_AVATAR_URL";
pub const ENV_SLACK_COMPARE_URL: &str = "SLACK_COMPARE_URL";
pub const ENV_SLACK_DRY_RUN: &str = "SLACK_DRY_RUN";

// GitHub Actions bits
pub const ENV_GITHUB_EVENT_NAME: &str = "GITHUB_EVENT_NAME";
pub const ENV_GITHUB_REF: &str = "GITHUB_REF";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_GITHUB_REPOSITORY_OWNER: &str = "GITHUB_REPOSITORY_OWNER";
pub const ENV_GITHUB_RUN_ID: &str = "GITHUB_RUN_ID";
pub const ENV_GITHUB_RUN_NUMBER: &str = "GITHUB_RUN_NUMBER";
pub const ENV_GITHUB_WORKFLOW: &str = "GITHUB_WORKFLOW";
pub const ENV_GITHUB_SERVER_URL: &str = "GITHUB_SERVER_URL";

pub const DEFAULT_AUTHOR: &str = "unknown";
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Outcome of the workflow run being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failure,
    Cancelled,
}

impl OutcomeStatus {
    /// Parses a status case-insensitively. Returns None for anything outside the three outcomes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "success" => Some(OutcomeStatus::Success),
            "failure" => Some(OutcomeStatus::Failure),
            "cancelled" => Some(OutcomeStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::Failure => "failure",
            OutcomeStatus::Cancelled => "cancelled",
        }
    }

    /// Attachment color for this outcome
    pub fn color(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "#2eb886",
            OutcomeStatus::Failure => "#951e13",
            OutcomeStatus::Cancelled => "#dddddd",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to render one notification.
/// Optional values are already defaulted, so an absent value is an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContext {
    pub webhook_url: String,
    pub status: OutcomeStatus,
    pub author: String,
    pub email: String,
    pub commit_id: String,
    /// First line of the commit message only
    pub commit_msg: String,
    pub commit_url: String,
    pub avatar_url: String,
    /// Explicit compare URL, or the commit URL, or the repository home page
    pub compare_url: String,
    pub event: String,
    pub git_ref: String,
    pub repo: String,
    pub owner: String,
    pub run_id: String,
    pub run_number: String,
    pub workflow: String,
    /// Base URL of the GitHub host, without a trailing slash
    pub server_url: String,
    pub dry_run: bool,
}

impl NotificationContext {
    /// Resolve the context through `lookup`. Empty values count as absent.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(NotifyError::MissingInput(key));
        let optional =
            |key: &str, fallback: &str| get(key).unwrap_or_else(|| fallback.to_string());

        let webhook_url = required(ENV_SLACK_WEBHOOK_URL)?;
        let raw_status = required(ENV_SLACK_STATUS)?;
        let status =
            OutcomeStatus::parse(&raw_status).ok_or_else(|| NotifyError::InvalidStatus {
                key: ENV_SLACK_STATUS,
                value: raw_status.clone(),
            })?;

        let commit_msg = first_line(&optional(ENV_SLACK_COMMIT_MSG, "")).to_string();
        let commit_url = optional(ENV_SLACK_COMMIT_URL, "");
        let repo = optional(ENV_GITHUB_REPOSITORY, "");
        let server_url = optional(ENV_GITHUB_SERVER_URL, DEFAULT_SERVER_URL)
            .trim_end_matches('/')
            .to_string();
        let compare_url = resolve_compare_url(
            &optional(ENV_SLACK_COMPARE_URL, ""),
            &commit_url,
            &repo,
            &server_url,
        );

        let context = Self {
            webhook_url,
            status,
            author: optional(ENV_SLACK_AUTHOR, DEFAULT_AUTHOR),
            email: optional(ENV_SLACK_EMAIL, ""),
            commit_id: optional(ENV_SLACK_COMMIT_ID, ""),
            commit_msg,
            commit_url,
            avatar_url: optional(ENV_SLACK_AVATAR_URL, ""),
            compare_url,
            event: optional(ENV_GITHUB_EVENT_NAME, ""),
            git_ref: optional(ENV_GITHUB_REF, ""),
            repo,
            owner: optional(ENV_GITHUB_REPOSITORY_OWNER, ""),
            run_id: optional(ENV_GITHUB_RUN_ID, ""),
            run_number: optional(ENV_GITHUB_RUN_NUMBER, ""),
            workflow: optional(ENV_GITHUB_WORKFLOW, ""),
            server_url,
            dry_run: get(ENV_SLACK_DRY_RUN).is_some_and(|v| is_truthy(&v)),
        };

        debug!(
            status = %context.status,
            repo = %context.repo,
            workflow = %context.workflow,
            dry_run = context.dry_run,
            "Resolved notification context"
        );
        Ok(context)
    }
}

/// Keeps everything before the first newline.
pub fn first_line(message: &str) -> &str {
    message.split('\n').next().unwrap_or_default()
}

/// Compare URL fallback chain: explicit value, then commit URL, then repository home page.
pub fn resolve_compare_url(
    compare_url: &str,
    commit_url: &str,
    repo: &str,
    server_url: &str,
) -> String {
    if !compare_url.is_empty() {
        compare_url.to_string()
    } else if !commit_url.is_empty() {
        commit_url.to_string()
    } else if !repo.is_empty() {
        format!("{}/{}", server_url, repo)
    } else {
        String::new()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
