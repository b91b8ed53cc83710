//! Core domain types, error taxonomy, and study-context assembly
//! for the study assistant.

pub mod context;
pub mod error;
pub mod persona;
pub mod types;

pub use context::{combine_materials, DOCUMENT_SEPARATOR};
pub use error::{Error, Result};
pub use persona::{system_instruction, DEFAULT_ASSISTANT_NAME, DEFAULT_PERSONA};
pub use types::{ChatTurn, DocumentFormat, Role, Transcript, UploadedFile, GREETING};
