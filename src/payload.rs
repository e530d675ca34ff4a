//! Builds the notification message from a resolved context

use tracing::debug;

use crate::config::NotificationContext;
use crate::error::Result;
use crate::message::{Attachment, Block, Element, Image, Message, TextObject};

/// Length of the abbreviated commit id
pub const SHORT_COMMIT_LEN: usize = 8;

/// First 8 characters of the commit id, or the whole id when shorter.
pub fn short_commit_id(commit_id: &str) -> &str {
    match commit_id.char_indices().nth(SHORT_COMMIT_LEN) {
        Some((idx, _)) => &commit_id[..idx],
        None => commit_id,
    }
}

/// Author name, linked to `mailto:` when an email is known.
pub fn author_field(author: &str, email: &str) -> String {
    if email.is_empty() {
        format!("*Author:*\n{}", author)
    } else {
        format!("*Author:*\n<mailto:{}|{}>", email, author)
    }
}

/// Ref, linked to the compare URL whenever there is one (even if the ref is empty).
pub fn ref_field(git_ref: &str, compare_url: &str) -> String {
    if compare_url.is_empty() {
        format!("*Ref:*\n{}", git_ref)
    } else {
        format!("*Ref:*\n<{}|{}>", compare_url, git_ref)
    }
}

/// Commit message with the short id; linked to the commit when a URL is known.
pub fn commit_line(commit_msg: &str, short_commit: &str, commit_url: &str) -> String {
    if short_commit.is_empty() {
        format!("*Message:*\n{}", commit_msg)
    } else if commit_url.is_empty() {
        format!("*Message:*\n{} ({})", commit_msg, short_commit)
    } else {
        format!(
            "*Message:*\n<{}|{} ({})>",
            commit_url, commit_msg, short_commit
        )
    }
}

/// Link to the workflow run page
pub fn run_url(server_url: &str, repo: &str, run_id: &str) -> String {
    format!("{}/{}/actions/runs/{}", server_url, repo, run_id)
}

/// Assemble the fixed-shape message: a repository context line, then one colored
/// attachment with the run title, the field grid and the commit line.
pub fn build_message(ctx: &NotificationContext) -> Result<Message> {
    let short_commit = short_commit_id(&ctx.commit_id);
    let run_link = run_url(&ctx.server_url, &ctx.repo, &ctx.run_id);
    debug!(%run_link, short_commit, "Building message");

    let header = Block::context(vec![
        Element::Image(Image {
            image_url: ctx.avatar_url.clone(),
            alt_text: ctx.owner.clone(),
        }),
        Element::Text(TextObject::mrkdwn(format!("*{}*", ctx.repo))),
    ])?;

    let title = Block::text(TextObject::mrkdwn(format!(
        "*<{}|{} #{}>*",
        run_link, ctx.workflow, ctx.run_number
    )));

    let fields = Block::fields(vec![
        TextObject::mrkdwn(ref_field(&ctx.git_ref, &ctx.compare_url)),
        TextObject::mrkdwn(author_field(&ctx.author, &ctx.email)),
        TextObject::mrkdwn(format!("*Event:*\n{}", ctx.event)),
        TextObject::mrkdwn(format!("*Status:*\n{}", ctx.status)),
    ])?;

    let commit = Block::text(TextObject::mrkdwn(commit_line(
        &ctx.commit_msg,
        short_commit,
        &ctx.commit_url,
    )));

    Ok(Message {
        text: format!(
            "GitHub Actions ({}): {} {}",
            ctx.repo, ctx.workflow, ctx.status
        ),
        blocks: vec![header],
        attachments: vec![Attachment {
            blocks: vec![title, fields, commit],
            color: ctx.status.color().to_string(),
        }],
        thread_ts: String::new(),
        mrkdwn: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutcomeStatus;
    use serde_json::json;

    fn context() -> NotificationContext {
        NotificationContext {
            webhook_url: "https://hooks.example/T1".into(),
            status: OutcomeStatus::Success,
            author: "Jane Doe".into(),
            email: String::new(),
            commit_id: "abcdef1234567".into(),
            commit_msg: "Fix bug".into(),
            commit_url: "https://git/x/commit/abcdef1234567".into(),
            avatar_url: "https://avatars.example/acme.png".into(),
            compare_url: "https://git/x/commit/abcdef1234567".into(),
            event: "push".into(),
            git_ref: "refs/heads/main".into(),
            repo: "acme/widget".into(),
            owner: "acme".into(),
            run_id: "42".into(),
            run_number: "7".into(),
            workflow: "CI".into(),
            server_url: "https://github.com".into(),
            dry_run: false,
        }
    }

    #[test]
    fn short_commit_id_truncates_to_eight() {
        assert_eq!(short_commit_id("abcdef1234567"), "abcdef12");
        assert_eq!(short_commit_id("abcdef12"), "abcdef12");
        assert_eq!(short_commit_id("abc"), "abc");
        assert_eq!(short_commit_id(""), "");
    }

    #[test]
    fn author_field_links_email_when_present() {
        assert_eq!(author_field("Jane", ""), "*Author:*\nJane");
        assert_eq!(
            author_field("Jane", "jane@example.com"),
            "*Author:*\n<mailto:jane@example.com|Jane>"
        );
    }

    #[test]
    fn ref_field_links_whenever_compare_url_present() {
        assert_eq!(ref_field("main", ""), "*Ref:*\nmain");
        assert_eq!(ref_field("main", "https://c"), "*Ref:*\n<https://c|main>");
        assert_eq!(ref_field("", "https://c"), "*Ref:*\n<https://c|>");
    }

    #[test]
    fn commit_line_matrix() {
        assert_eq!(
            commit_line("Fix", "abcdef12", "https://c"),
            "*Message:*\n<https://c|Fix (abcdef12)>"
        );
        assert_eq!(commit_line("Fix", "abcdef12", ""), "*Message:*\nFix (abcdef12)");
        assert_eq!(commit_line("Fix", "", "https://c"), "*Message:*\nFix");
        assert_eq!(commit_line("Fix", "", ""), "*Message:*\nFix");
    }

    #[test]
    fn attachment_color_follows_status() {
        for status in [
            OutcomeStatus::Success,
            OutcomeStatus::Failure,
            OutcomeStatus::Cancelled,
        ] {
            let ctx = NotificationContext {
                status,
                ..context()
            };
            let message = build_message(&ctx).unwrap();
            assert_eq!(message.attachments[0].color, status.color());
        }
    }

    #[test]
    fn message_has_fixed_shape() {
        let message = build_message(&context()).unwrap();
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["text"], "GitHub Actions (acme/widget): CI success");
        assert!(value.get("thread_ts").is_none());
        assert!(value.get("mrkdwn").is_none());
        assert_eq!(
            value["blocks"],
            json!([{
                "type": "context",
                "elements": [
                    {"type": "image", "image_url": "https://avatars.example/acme.png", "alt_text": "acme"},
                    {"type": "mrkdwn", "text": "*acme/widget*"}
                ]
            }])
        );

        let attachment = &value["attachments"][0];
        assert_eq!(attachment["color"], "#2eb886");
        let blocks = attachment["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0]["text"]["text"],
            "*<https://github.com/acme/widget/actions/runs/42|CI #7>*"
        );

        let fields: Vec<&str> = blocks[1]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["text"].as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec![
                "*Ref:*\n<https://git/x/commit/abcdef1234567|refs/heads/main>",
                "*Author:*\nJane Doe",
                "*Event:*\npush",
                "*Status:*\nsuccess",
            ]
        );
        assert_eq!(
            blocks[2]["text"]["text"],
            "*Message:*\n<https://git/x/commit/abcdef1234567|Fix bug (abcdef12)>"
        );
    }

    #[test]
    fn run_url_uses_configured_host() {
        let ctx = NotificationContext {
            server_url: "https://ghe.example".into(),
            ..context()
        };
        let message = build_message(&ctx).unwrap();
        let value = serde_json::to_value(&message).unwrap();
        let title = value["attachments"][0]["blocks"][0]["text"]["text"]
            .as_str()
            .unwrap();
        assert!(title.starts_with("*<https://ghe.example/acme/widget/actions/runs/42|"));
    }
}
