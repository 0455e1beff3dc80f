//! Chat card message model.
//!
//! Serialized in camelCase with empty fields omitted, which is the shape the
//! chat webhook accepts and echoes back.

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A chat message carrying one or more cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    /// Resource name assigned by the chat service; empty on outgoing messages.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

/// Conversation thread a message was posted into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thread {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CardHeader>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardHeader {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,

    /// `IMAGE` (square) or `AVATAR` (circular).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub widgets: Vec<WidgetMarkup>,
}

/// A section widget. Exactly one field is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetMarkup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_value: Option<KeyValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_paragraph: Option<TextParagraph>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyValue {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub top_label: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,

    #[serde(skip_serializing_if = "is_false")]
    pub content_multiline: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub bottom_label: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextParagraph {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

/// Either a text button or an image button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Button {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_button: Option<TextButton>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_button: Option<ImageButton>,
}

impl Button {
    pub fn text(text: &str, url: &str) -> Self {
        Button {
            text_button: Some(TextButton {
                text: text.to_string(),
                on_click: Some(OnClick::open(url)),
            }),
            image_button: None,
        }
    }

    pub fn image(name: &str, icon_url: &str, url: &str) -> Self {
        Button {
            text_button: None,
            image_button: Some(ImageButton {
                name: name.to_string(),
                icon_url: icon_url.to_string(),
                on_click: Some(OnClick::open(url)),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextButton {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageButton {
    /// Accessibility text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnClick {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_link: Option<OpenLink>,
}

impl OnClick {
    pub fn open(url: &str) -> Self {
        OnClick {
            open_link: Some(OpenLink {
                url: url.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenLink {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}
