//! Encoding and decoding between document data and the `body` column.
//!
//! Bodies are stored as compact JSON objects.

use roster_core::store::{Document, DocumentData};
use serde_json::Value;

use crate::{Error, Result};

pub fn encode_body(data: &DocumentData) -> Result<String> { Ok(serde_json::to_string(data)?) }

pub fn decode_body(id: &str, body: &str) -> Result<DocumentData> {
  match serde_json::from_str(body)? {
    Value::Object(map) => Ok(map),
    _ => Err(Error::NotAnObject(id.to_owned())),
  }
}

/// A row as read from SQLite, before JSON decoding.
pub struct RawDocument {
  pub doc_id: String,
  pub body:   String,
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    let data = decode_body(&self.doc_id, &self.body)?;
    Ok(Document { id: self.doc_id, data })
  }
}
