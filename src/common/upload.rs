use std::path::{Path, PathBuf};

/// A file part of a multipart body, already written to temporary storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    field_name: String,
    filename: String,
    content_type: Option<String>,
    size: u64,
    path: PathBuf,
}

impl UploadedFile {
    pub fn new(field_name: String, filename: String, content_type: Option<String>, size: u64, path: PathBuf) -> UploadedFile {
        UploadedFile { field_name, filename, content_type, size, path }
    }

    /// Name of the form field the file was sent under.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// File name as supplied by the client. Not safe to use as a path.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Content type of the part, if the client sent one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Number of bytes stored.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Where the content was written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
