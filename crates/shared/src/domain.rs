use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record as returned by the `/usuarios` collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "edad", default)]
    pub age: Option<i64>,
    #[serde(rename = "rol", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Creation payload posted to the collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "edad")]
    pub age: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("age must be a whole number, got '{0}'")]
    InvalidAge(String),
}

/// Free-text form fields backing the creation form.
///
/// The empty draft is `{nombre: "", email: "", edad: ""}`; `edad` stays text
/// until submission so the form can hold partial input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl UserDraft {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Applies the required-field constraints and turns the draft into a payload.
    /// Fields are taken as typed: nothing is trimmed.
    pub fn to_new_user(&self) -> Result<NewUser, DraftError> {
        if self.name.is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.email.is_empty() {
            return Err(DraftError::MissingEmail);
        }
        let age = match self.age.as_str() {
            "" => None,
            raw => Some(
                raw.parse::<i64>()
                    .map_err(|_| DraftError::InvalidAge(raw.to_string()))?,
            ),
        };
        Ok(NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            age,
        })
    }
}
