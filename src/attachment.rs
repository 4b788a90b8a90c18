//! File attachments for letters (`issue.send` → `letter.attaches`).

use crate::{Error, ErrorContext, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An attachment in the shape the API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Base64-encoded file content.
    pub content: String,
    pub encoding: String,
    pub charset: String,
}

impl Attachment {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            encoding: "base64".to_string(),
            charset: "utf-8".to_string(),
        }
    }

    /// Read a file. `name` defaults to the file's base name.
    pub fn from_path(path: impl AsRef<Path>, name: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::configuration_with_context(
                        "attachment path has no file name",
                        ErrorContext::new()
                            .with_details(path.display().to_string())
                            .with_source("attachment"),
                    )
                })?,
        };
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(name, &bytes))
    }

    /// Original bytes of the attachment.
    pub fn decode(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.content)
    }
}

/// Shorthand for [`Attachment::from_path`].
pub fn attach_file(path: impl AsRef<Path>, name: Option<&str>) -> Result<Attachment> {
    Attachment::from_path(path, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_wire_shape() {
        let attachment = Attachment::from_bytes("hello.txt", b"hello");
        assert_eq!(
            serde_json::to_value(&attachment).unwrap(),
            json!({
                "name": "hello.txt",
                "content": "aGVsbG8=",
                "encoding": "base64",
                "charset": "utf-8"
            })
        );
    }

    #[test]
    fn decode_restores_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(Attachment::from_bytes("b.bin", &bytes).decode().unwrap(), bytes);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = attach_file("/nonexistent/letter.pdf", None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn root_path_has_no_name() {
        assert!(matches!(
            Attachment::from_path("/", None),
            Err(Error::Configuration { .. })
        ));
    }
}
