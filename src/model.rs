//! Typed conversation description
//!
//! A description arrives as YAML or JSON, goes through variable substitution
//! as a raw value tree, and only then is deserialized into these types. The
//! deserialization layer is deliberately lenient: most fields are optional
//! with defined defaults, explicitly null values read the same as absent
//! ones, and numeric or boolean output options also accept their string
//! spellings so that substituted placeholders still fit.
//! [`RawChatFile::validate`] promotes the lenient form into the final model
//! and reports what is structurally missing.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::template::Variables;

/// Which side of the conversation a message comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The device owner; rendered right-aligned with the sent palette
    #[serde(alias = "self")]
    Me,
    /// The other party; rendered left-aligned with the received palette
    #[default]
    #[serde(alias = "other", alias = "them")]
    Contact,
}

/// Platform style the mock imitates; selects layout metrics and palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleVariant {
    /// iOS-style screen, the default
    #[default]
    #[serde(alias = "whatsapp")]
    Ios,
    /// Android-style screen with bubble tails
    Android,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Sender side; an absent or null value reads as the contact
    #[serde(default, deserialize_with = "default_on_null")]
    pub from: Sender,
    /// Message body; newlines become line breaks in the bubble
    #[serde(default, deserialize_with = "default_on_null")]
    pub text: String,
    /// Optional timestamp shown inside the bubble
    #[serde(default)]
    pub time: Option<String>,
}

/// The conversation partner shown in the header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Display name; initials for the avatar circle derive from it.
    /// A null name falls back like an absent one; an empty string stays empty.
    #[serde(deserialize_with = "lenient_name")]
    pub name: String,
    /// Phone number, informational only
    pub phone: Option<String>,
    /// Presence line under the name; rendered as "online" when absent
    pub status: Option<String>,
    /// Avatar reference: a remote URL, a `data:` URL, or a local file path
    pub avatar: Option<String>,
}

impl Default for Contact {
    fn default() -> Self {
        Contact {
            name: "Contact".to_string(),
            phone: None,
            status: None,
            avatar: None,
        }
    }
}

impl Contact {
    /// Presence text with the default applied
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or("online")
    }
}

/// A validated conversation ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub platform: StyleVariant,
    pub contact: Contact,
    pub messages: Vec<Message>,
}

/// Output preferences embedded in the description
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOptions {
    /// Output filename; may itself contain placeholders
    pub filename: Option<String>,
    /// Document width in CSS pixels
    #[serde(deserialize_with = "lenient_width")]
    pub width: Option<u32>,
    /// Render with the dark palette
    #[serde(deserialize_with = "lenient_flag")]
    pub dark_mode: bool,
    /// Render with the Android style regardless of `platform`
    #[serde(deserialize_with = "lenient_flag")]
    pub android: bool,
}

/// A complete, validated description file
#[derive(Debug, Clone, PartialEq)]
pub struct ChatFile {
    pub conversation: Conversation,
    /// Default variable values declared by the description itself
    pub variables: Variables,
    pub output: OutputOptions,
}

impl ChatFile {
    /// Effective style variant: an override flag beats both the description's
    /// `output.android` and the conversation's declared platform.
    pub fn style(&self, force_android: bool) -> StyleVariant {
        if force_android || self.output.android {
            StyleVariant::Android
        } else {
            self.conversation.platform
        }
    }
}

/// Lenient mirror of [`Conversation`] used during extraction
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConversation {
    #[serde(deserialize_with = "default_on_null")]
    pub platform: StyleVariant,
    #[serde(deserialize_with = "default_on_null")]
    pub contact: Contact,
    pub messages: Option<Vec<Message>>,
}

/// Lenient mirror of [`ChatFile`] used during extraction
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChatFile {
    pub conversation: Option<RawConversation>,
    #[serde(deserialize_with = "default_on_null")]
    pub variables: Variables,
    #[serde(deserialize_with = "default_on_null")]
    pub output: OutputOptions,
}

impl RawChatFile {
    /// Promote the lenient form into the validated model.
    ///
    /// Only two things are structurally required: the `conversation` mapping
    /// and its `messages` sequence. Everything else defaults.
    pub fn validate(self) -> Result<ChatFile> {
        let conversation = self
            .conversation
            .ok_or_else(|| Error::invalid_conversation("conversation"))?;
        let messages = conversation
            .messages
            .ok_or_else(|| Error::invalid_conversation("conversation.messages"))?;

        Ok(ChatFile {
            conversation: Conversation {
                platform: conversation.platform,
                contact: conversation.contact,
                messages,
            },
            variables: self.variables,
            output: self.output,
        })
    }
}

/// Treat an explicitly null value as an absent one.
///
/// `#[serde(default)]` covers missing keys only; a YAML section stub like
/// `output:` or `contact:` arrives as an explicit null and lands here.
fn default_on_null<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a null contact name, falling back like an absent one.
fn lenient_name<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| "Contact".to_string()))
}

/// Accept a width as a number or as a numeric string.
///
/// The string forms show up when a placeholder fills the field, e.g.
/// `width: "{{w}}"`. An empty string (an unset variable) and a zero width
/// both read as absent.
fn lenient_width<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)
        .map_err(|_| D::Error::custom("output.width must be a positive number"))?
    {
        None => None,
        Some(Raw::Number(width)) => Some(width),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                let width = text.parse().map_err(|_| {
                    D::Error::custom(format!("output.width: '{text}' is not a pixel count"))
                })?;
                Some(width)
            }
        }
    };

    Ok(parsed.filter(|&width| width > 0))
}

/// Accept a flag as a boolean or as its string spelling.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)
        .map_err(|_| D::Error::custom("expected true or false"))?
    {
        None => Ok(false),
        Some(Raw::Flag(flag)) => Ok(flag),
        Some(Raw::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "0" => Ok(false),
            "true" | "yes" | "1" => Ok(true),
            other => Err(D::Error::custom(format!(
                "'{other}' is not a boolean flag"
            ))),
        },
    }
}
