//! Incoming-webhook message structures
//!
//! Empty strings, empty lists and unset flags are left out of the JSON.

use serde::Serialize;

use crate::error::{NotifyError, Result};

/// Maximum number of elements in a context block
pub const MAX_CONTEXT_ELEMENTS: usize = 10;
/// Maximum number of fields in a section block
pub const MAX_SECTION_FIELDS: usize = 10;
/// Maximum length of a block id
pub const MAX_BLOCK_ID_LEN: usize = 255;

/// Incoming webhook message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Plain-text fallback shown in notifications
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Parent message timestamp when replying in a thread
    #[serde(skip_serializing_if = "String::is_empty")]
    pub thread_ts: String,
    /// Only sent when set; the destination treats a missing flag as true
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mrkdwn: bool,
}

impl Message {
    /// Serialize the message. serde_json leaves `<`, `>` and `&` unescaped.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Colored group of blocks rendered below the message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
}

/// Layout block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Context {
        elements: Vec<Element>,
        #[serde(skip_serializing_if = "String::is_empty")]
        block_id: String,
    },
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
        #[serde(skip_serializing_if = "String::is_empty")]
        block_id: String,
    },
}

impl Block {
    pub fn context(elements: Vec<Element>) -> Result<Self> {
        if elements.len() > MAX_CONTEXT_ELEMENTS {
            return Err(NotifyError::InvalidPayload(format!(
                "context block has {} elements, maximum is {}",
                elements.len(),
                MAX_CONTEXT_ELEMENTS
            )));
        }
        Ok(Block::Context {
            elements,
            block_id: String::new(),
        })
    }

    /// Section with a single text object
    pub fn text(text: TextObject) -> Self {
        Block::Section {
            text: Some(text),
            fields: Vec::new(),
            accessory: None,
            block_id: String::new(),
        }
    }

    /// Section laid out as a two-column field grid
    pub fn fields(fields: Vec<TextObject>) -> Result<Self> {
        if fields.len() > MAX_SECTION_FIELDS {
            return Err(NotifyError::InvalidPayload(format!(
                "section block has {} fields, maximum is {}",
                fields.len(),
                MAX_SECTION_FIELDS
            )));
        }
        Ok(Block::Section {
            text: None,
            fields,
            accessory: None,
            block_id: String::new(),
        })
    }

    /// Attach an accessory element. No-op for context blocks.
    pub fn with_accessory(mut self, element: Element) -> Self {
        if let Block::Section { accessory, .. } = &mut self {
            *accessory = Some(element);
        }
        self
    }

    /// Set the block id, at most 255 characters.
    pub fn with_block_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.chars().count() > MAX_BLOCK_ID_LEN {
            return Err(NotifyError::InvalidPayload(format!(
                "block_id is longer than {} characters",
                MAX_BLOCK_ID_LEN
            )));
        }
        match &mut self {
            Block::Context { block_id, .. } | Block::Section { block_id, .. } => *block_id = id,
        }
        Ok(self)
    }
}

/// Inline element of a context block, or a section accessory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Image(Image),
    Text(TextObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "image")]
pub struct Image {
    pub image_url: String,
    pub alt_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    PlainText,
    Mrkdwn,
}

/// Text composition object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextType,
    pub text: String,
    /// Only meaningful for `plain_text`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub emoji: bool,
    /// Only meaningful for `mrkdwn`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub verbatim: bool,
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextType::PlainText,
            text: text.into(),
            emoji: false,
            verbatim: false,
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextType::Mrkdwn,
            text: text.into(),
            emoji: false,
            verbatim: false,
        }
    }

    /// Render emoji shortcodes. Ignored unless the object is `plain_text`.
    #[must_use]
    pub fn with_emoji(mut self) -> Self {
        self.emoji = self.kind == TextType::PlainText;
        self
    }

    /// Disable link and mention parsing. Ignored unless the object is `mrkdwn`.
    #[must_use]
    pub fn with_verbatim(mut self) -> Self {
        self.verbatim = self.kind == TextType::Mrkdwn;
        self
    }
}
