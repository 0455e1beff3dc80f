//! Build chat cards from a pull-request snapshot and an aggregate.
//!
//! Rendering is pure: the same inputs always serialize to the same bytes.

use crate::aggregate::Checks;
use crate::card::{Button, Card, CardHeader, KeyValue, Message, Section, WidgetMarkup};
use crate::context::PullRequestContext;
use crate::status::{Status, StatusRecord};

pub const IMAGE_SUCCESS: &str = "https://www.shareicon.net/download/2017/02/09/878601_check_512x512.png";
pub const IMAGE_FAILURE: &str = "https://www.shareicon.net/download/2017/02/09/878603_close_512x512.png";
pub const IMAGE_IN_PROGRESS: &str = "https://www.shareicon.net/download/2017/02/09/878594_gear_512x512.png";
pub const IMAGE_GITHUB_AVATAR: &str = "https://avatars0.githubusercontent.com/in/15368?s=40&v=4";

pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => IMAGE_SUCCESS,
        Status::Failure => IMAGE_FAILURE,
        Status::InProgress => IMAGE_IN_PROGRESS,
    }
}

/// Render the single-card message for one notification.
///
/// `checks` is `None` for the opening card, which is sent before any check
/// data exists and carries no checks section.
pub fn render_message(
    ctx: &PullRequestContext,
    title: &str,
    status: Status,
    checks: Option<&Checks>,
) -> Message {
    let mut sections = vec![
        view_section(ctx.thread_key().as_str(), &ctx.html_url),
        author_section(ctx),
    ];
    if let Some(checks) = checks {
        sections.push(checks_section(checks));
    }

    Message {
        cards: vec![Card {
            header: Some(CardHeader {
                title: title.to_string(),
                subtitle: ctx.title.clone(),
                image_url: status_icon(status).to_string(),
                image_style: "IMAGE".to_string(),
            }),
            sections,
        }],
        ..Default::default()
    }
}

fn view_section(content: &str, url: &str) -> Section {
    Section {
        header: String::new(),
        widgets: vec![WidgetMarkup {
            key_value: Some(KeyValue {
                content: content.to_string(),
                button: Some(Button::text("View", url)),
                ..Default::default()
            }),
            ..Default::default()
        }],
    }
}

fn author_section(ctx: &PullRequestContext) -> Section {
    Section {
        header: String::new(),
        widgets: vec![WidgetMarkup {
            key_value: Some(KeyValue {
                top_label: "Author".to_string(),
                content: ctx.author.login.clone(),
                icon_url: ctx.author.avatar_url.clone(),
                button: Some(Button::image(
                    "View Profile",
                    IMAGE_GITHUB_AVATAR,
                    &ctx.author.profile_url,
                )),
                ..Default::default()
            }),
            ..Default::default()
        }],
    }
}

fn checks_section(checks: &Checks) -> Section {
    Section {
        header: "Checks".to_string(),
        widgets: checks.iter().map(check_widget).collect(),
    }
}

fn check_widget(record: &StatusRecord) -> WidgetMarkup {
    let button = record
        .has_link()
        .then(|| Button::image("View", &record.avatar_url, &record.target_url));

    WidgetMarkup {
        key_value: Some(KeyValue {
            top_label: record.name.clone(),
            content: record.message.clone(),
            icon_url: status_icon(record.status).to_string(),
            button,
            ..Default::default()
        }),
        ..Default::default()
    }
}
