// Request bodies for write operations.
//
// Writes go out either as JSON or as multipart form data. The form is kept
// as plain data until send time so callers (and tests) can inspect exactly
// what will be transmitted.

use std::path::Path;

use reqwest::multipart::{Form, Part};

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk, using its final path component as the upload name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        Ok(Self { file_name, bytes })
    }
}

/// One multipart field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(Upload),
}

/// Ordered multipart form. Repeated names are allowed (e.g. `tags`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .push((name.to_owned(), FormValue::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, upload: Upload) -> Self {
        self.fields.push((name.to_owned(), FormValue::File(upload)));
        self
    }

    /// Attach a file only when one was supplied.
    pub fn optional_file(self, name: &str, upload: Option<&Upload>) -> Self {
        match upload {
            Some(u) => self.file(name, u.clone()),
            None => self,
        }
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    /// All text values submitted under `name`, in order.
    pub fn texts<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields.iter().filter_map(move |(n, v)| match v {
            FormValue::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }

    /// The file submitted under `name`, if any.
    pub fn file_named(&self, name: &str) -> Option<&Upload> {
        self.fields.iter().find_map(|(n, v)| match v {
            FormValue::File(u) if n == name => Some(u),
            _ => None,
        })
    }

    pub(crate) fn into_form(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(upload) => {
                    form.part(name, Part::bytes(upload.bytes).file_name(upload.file_name))
                }
            })
    }
}

/// Body of a write request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(FormData),
}
