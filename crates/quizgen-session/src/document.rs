use std::fmt;
use std::path::Path;

use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::{Result, SessionError};

/// An uploaded file waiting to be processed.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    bytes: Bytes,
}

impl Document {
    /// Wraps raw file contents under a display name.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a document from disk, named after the file.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SessionError::Upload {
                path: path.display().to_string(),
                source,
            })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, bytes))
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw contents.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for a zero-byte upload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex-encoded SHA-256 of the contents.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_sha256_of_contents() {
        let doc = Document::new("a.pdf", Bytes::from_static(b"abc"));
        assert_eq!(
            doc.fingerprint(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(doc.len(), 3);
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        tokio::fs::write(&path, b"%PDF-").await.unwrap();

        let doc = Document::read(&path).await.unwrap();
        assert_eq!(doc.name(), "notes.pdf");
        assert_eq!(doc.bytes().as_ref(), b"%PDF-");

        let missing = Document::read(dir.path().join("missing.pdf")).await;
        assert!(matches!(missing, Err(SessionError::Upload { .. })));
    }
}
