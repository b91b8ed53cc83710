//! Domain types for study materials and chat transcripts.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opening message the assistant shows when a study session starts.
pub const GREETING: &str = "Hello! I'm your study kitty. Ask me anything about your materials.";

/// An uploaded study document: its name (used only for the extension) and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename (without path).
    pub name: String,

    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an uploaded file from a name and its bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Ok(Self { name, bytes })
    }

    /// Lowercased extension of the filename, or an empty string if there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// The format of an uploaded document, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// Plain text, Markdown or CSV.
    PlainText,
    /// Portable Document Format.
    Pdf,
    /// Word-processing Office Open XML.
    Docx,
    /// Presentation Office Open XML.
    Pptx,
    /// Legacy binary Word document (best-effort only).
    LegacyDoc,
}

impl DocumentFormat {
    /// Every extension we accept, in the order shown to users.
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] =
        &["txt", "md", "csv", "pdf", "docx", "pptx", "doc"];

    /// Detect format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "md" | "csv" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "doc" => Some(Self::LegacyDoc),
            _ => None,
        }
    }

    /// Detect format for an uploaded file, failing with `UnsupportedFormat`.
    pub fn for_file(file: &UploadedFile) -> Result<Self> {
        let ext = file.extension();
        Self::from_extension(&ext).ok_or_else(|| Error::unsupported(ext))
    }

    /// Supported extensions formatted for an error message.
    pub fn supported_list() -> String {
        let dotted: Vec<String> = Self::SUPPORTED_EXTENSIONS
            .iter()
            .map(|e| format!(".{}", e))
            .collect();
        match dotted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "Text",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Pptx => "PPTX",
            Self::LegacyDoc => "DOC",
        };
        f.write_str(name)
    }
}

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completions APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,

    /// Marks the synthetic opening greeting, which is not user content.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub greeting: bool,
}

impl ChatTurn {
    /// A turn typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            greeting: false,
        }
    }

    /// A turn produced by the assistant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            greeting: false,
        }
    }

    /// The canned greeting that opens every session.
    pub fn greeting() -> Self {
        Self {
            role: Role::Assistant,
            content: GREETING.to_string(),
            greeting: true,
        }
    }
}

/// An ordered, append-only conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript that starts with the canned greeting.
    pub fn with_greeting() -> Self {
        Self {
            turns: vec![ChatTurn::greeting()],
        }
    }

    /// Append a turn.
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// All turns in conversation order.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Parse a transcript from its JSON array form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the transcript as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Vec<ChatTurn>> for Transcript {
    fn from(turns: Vec<ChatTurn>) -> Self {
        Self { turns }
    }
}
