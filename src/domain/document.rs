use thiserror::Error;

pub const MIB: u64 = 1024 * 1024;

/// A file handed back by the document picker. Only metadata, never content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference {
    pub name: String,
    pub size_bytes: u64,
    /// Opaque location handle from the picker (a URI on device).
    pub location: String,
}

impl DocumentReference {
    pub fn new(name: impl Into<String>, size_bytes: u64, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            location: location.into(),
        }
    }

    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentSlot {
    #[default]
    NotUploaded,
    Uploaded(DocumentReference),
}

impl DocumentSlot {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, DocumentSlot::Uploaded(_))
    }

    pub fn reference(&self) -> Option<&DocumentReference> {
        match self {
            DocumentSlot::Uploaded(doc) => Some(doc),
            DocumentSlot::NotUploaded => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Too Large: {name} is {}, the limit is {}", megabytes(*size), megabytes(*limit))]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("Unsupported file type: {name} (allowed: {allowed})")]
    UnsupportedType { name: String, allowed: String },
}

fn megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MIB as f64)
}

/// An upload slot on a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_bytes: u64,
    pub allowed_extensions: &'static [&'static str],
}

pub const STANDARD_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

impl DocumentSpec {
    pub fn new(name: &'static str, label: &'static str, max_bytes: u64) -> Self {
        Self {
            name,
            label,
            required: true,
            max_bytes,
            allowed_extensions: STANDARD_EXTENSIONS,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Checks a picked file against the slot's ceiling and type list.
    pub fn accept(&self, doc: &DocumentReference) -> Result<(), UploadError> {
        if doc.size_bytes > self.max_bytes {
            return Err(UploadError::TooLarge {
                name: doc.name.clone(),
                size: doc.size_bytes,
                limit: self.max_bytes,
            });
        }
        match doc.extension() {
            Some(ext) if self.allowed_extensions.contains(&ext.as_str()) => Ok(()),
            _ => Err(UploadError::UnsupportedType {
                name: doc.name.clone(),
                allowed: self.allowed_extensions.join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversize_is_rejected() {
        let spec = DocumentSpec::new("address_proof", "Address Proof", 2 * MIB);
        let doc = DocumentReference::new("bill.pdf", 3 * MIB, "file:///bill.pdf");
        let err = spec.accept(&doc).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit, .. } if limit == 2 * MIB));
        assert_eq!(err.to_string(), "Too Large: bill.pdf is 3.0 MB, the limit is 2.0 MB");
    }

    #[test]
    fn test_exact_ceiling_is_accepted() {
        let spec = DocumentSpec::new("address_proof", "Address Proof", 2 * MIB);
        let doc = DocumentReference::new("scan.JPG", 2 * MIB, "file:///scan.JPG");
        assert!(spec.accept(&doc).is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let spec = DocumentSpec::new("deed", "Sale Deed", 5 * MIB);
        let doc = DocumentReference::new("deed.docx", 10, "file:///deed.docx");
        assert!(matches!(
            spec.accept(&doc),
            Err(UploadError::UnsupportedType { .. })
        ));
        let no_ext = DocumentReference::new("deed", 10, "file:///deed");
        assert!(spec.accept(&no_ext).is_err());
    }
}
