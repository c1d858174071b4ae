//! The employee record and its field table.
//!
//! Field access goes through [`Field`], a fixed enumeration of the six
//! required columns, rather than name-based lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  store::{Document, DocumentData, WriteData, WriteValue},
  timestamp::Timestamp,
};

/// Document key holding the creation timestamp.
pub const CREATED_AT: &str = "createdAt";
/// Document key holding the last-write timestamp.
pub const UPDATED_AT: &str = "updatedAt";

// ─── Field table ─────────────────────────────────────────────────────────────

/// One of the six required employee fields, in column order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
  FirstName,
  LastName,
  Email,
  PhoneNumber,
  Department,
  Address,
}

impl Field {
  pub const ALL: [Field; 6] = [
    Field::FirstName,
    Field::LastName,
    Field::Email,
    Field::PhoneNumber,
    Field::Department,
    Field::Address,
  ];

  /// Document key / column identifier.
  pub fn id(self) -> &'static str {
    match self {
      Self::FirstName => "first_name",
      Self::LastName => "last_name",
      Self::Email => "email",
      Self::PhoneNumber => "phone_number",
      Self::Department => "department",
      Self::Address => "address",
    }
  }

  /// Human-readable column label.
  pub fn label(self) -> &'static str {
    match self {
      Self::FirstName => "First Name",
      Self::LastName => "Last Name",
      Self::Email => "Email",
      Self::PhoneNumber => "Phone Number",
      Self::Department => "Department",
      Self::Address => "Address",
    }
  }

  pub fn from_id(id: &str) -> Option<Self> { Self::ALL.into_iter().find(|f| f.id() == id) }

  pub fn get(self, fields: &EmployeeFields) -> &str {
    match self {
      Self::FirstName => &fields.first_name,
      Self::LastName => &fields.last_name,
      Self::Email => &fields.email,
      Self::PhoneNumber => &fields.phone_number,
      Self::Department => &fields.department,
      Self::Address => &fields.address,
    }
  }

  pub fn get_mut(self, fields: &mut EmployeeFields) -> &mut String {
    match self {
      Self::FirstName => &mut fields.first_name,
      Self::LastName => &mut fields.last_name,
      Self::Email => &mut fields.email,
      Self::PhoneNumber => &mut fields.phone_number,
      Self::Department => &mut fields.department,
      Self::Address => &mut fields.address,
    }
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The user-editable part of an employee record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFields {
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone_number: String,
  pub department:   String,
  pub address:      String,
}

impl EmployeeFields {
  /// Decode from stored document data. Missing or non-string values become
  /// empty strings.
  pub fn from_data(data: &DocumentData) -> Self {
    let mut fields = Self::default();
    for field in Field::ALL {
      if let Some(Value::String(s)) = data.get(field.id()) {
        *field.get_mut(&mut fields) = s.clone();
      }
    }
    fields
  }

  /// All six fields as a write payload (no timestamps).
  pub fn to_write_data(&self) -> WriteData {
    Field::ALL
      .into_iter()
      .map(|f| (f.id().to_owned(), WriteValue::string(f.get(self))))
      .collect()
  }
}

// ─── Employee ────────────────────────────────────────────────────────────────

/// A persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub id:         String,
  #[serde(flatten)]
  pub fields:     EmployeeFields,
  /// Server-assigned on creation; never rewritten.
  pub created_at: Option<Timestamp>,
  /// Server-assigned on every write.
  pub updated_at: Option<Timestamp>,
}

impl Employee {
  pub fn from_document(doc: Document) -> Self {
    Self {
      fields:     EmployeeFields::from_data(&doc.data),
      created_at: doc.data.get(CREATED_AT).and_then(Timestamp::from_json),
      updated_at: doc.data.get(UPDATED_AT).and_then(Timestamp::from_json),
      id:         doc.id,
    }
  }

  pub fn get(&self, field: Field) -> &str { field.get(&self.fields) }

  /// `"First Last"`, used for status messages.
  pub fn display_name(&self) -> String {
    format!("{} {}", self.fields.first_name, self.fields.last_name)
      .trim()
      .to_owned()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn field_ids_round_trip() {
    for field in Field::ALL {
      assert_eq!(Field::from_id(field.id()), Some(field));
    }
    assert_eq!(Field::from_id("salary"), None);
  }

  #[test]
  fn decodes_document_leniently() {
    let data = json!({
      "first_name": "Ada",
      "last_name": 7,
      "email": "ada@example.com",
      "updatedAt": { "seconds": 10, "nanoseconds": 0 },
      "createdAt": "not a timestamp",
    });
    let Value::Object(data) = data else { unreachable!() };

    let emp = Employee::from_document(Document { id: "e1".into(), data });
    assert_eq!(emp.id, "e1");
    assert_eq!(emp.fields.first_name, "Ada");
    assert_eq!(emp.fields.last_name, "");
    assert_eq!(emp.fields.address, "");
    assert_eq!(emp.updated_at, Some(Timestamp::new(10, 0)));
    assert_eq!(emp.created_at, None);
  }

  #[test]
  fn write_data_names_all_six_fields() {
    let fields = EmployeeFields {
      first_name: "Ada".into(),
      department: "Engineering".into(),
      ..Default::default()
    };
    let data = fields.to_write_data();
    assert_eq!(data.len(), 6);
    assert_eq!(data["first_name"], WriteValue::string("Ada"));
    assert_eq!(data["address"], WriteValue::string(""));
    assert!(!data.contains_key(UPDATED_AT));
  }
}
