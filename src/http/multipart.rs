//! Multipart form assembly.
//!
//! Scalars become text fields, lists become indexed fields (`languages[0]`,
//! `languages[1]`, ...), and a file part is added only when a file was
//! actually selected. Blank optional values are left out so an update never
//! overwrites a stored value with an empty string.

use medadmin_core::{ApiError, FileUpload};
use reqwest::multipart::{Form, Part};

/// A file part: field name plus validated content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file: FileUpload,
}

/// Ordered multipart fields, built before any request is made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    file: Option<FilePart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always-sent text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }

    /// Text field sent only when present and not blank.
    #[must_use]
    pub fn text_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()) {
            Some(v) if !v.trim().is_empty() => self.text(name, v),
            _ => self,
        }
    }

    /// Indexed fields `name[0]`, `name[1]`, ... for each non-blank item.
    #[must_use]
    pub fn list<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let items = values
            .into_iter()
            .map(|v| v.to_string())
            .filter(|v| !v.trim().is_empty());
        for (index, value) in items.enumerate() {
            self.fields.push((format!("{}[{}]", name, index), value));
        }
        self
    }

    /// Attaches `file` under `field` when one was selected.
    #[must_use]
    pub fn file(mut self, field: impl Into<String>, file: Option<FileUpload>) -> Self {
        if let Some(file) = file {
            self.file = Some(FilePart {
                field: field.into(),
                file,
            });
        }
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first text field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn file_part(&self) -> Option<&FilePart> {
        self.file.as_ref()
    }

    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        if let Some(FilePart { field, file }) = self.file {
            let (file_name, mime_type, bytes) = file.into_parts();
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(&mime_type)
                .map_err(|e| ApiError::validation([format!("Invalid file type: {}", e)]))?;
            form = form.part(field, part);
        }

        Ok(form)
    }
}
