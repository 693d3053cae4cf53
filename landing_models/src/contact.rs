use std::{fmt, str::FromStr};

use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::email_address::EmailAddress;

/// The four controlled fields of the contact form, exactly as typed by the
/// visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Company,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [Self::Name, Self::Email, Self::Company, Self::Message];

    /// Name of the corresponding html form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Message => "message",
        }
    }

    pub fn required(self) -> bool {
        !matches!(self, Self::Company)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown contact form field: {0:?}")]
pub struct UnknownContactField(pub String);

impl FromStr for ContactField {
    type Err = UnknownContactField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownContactField(s.into()))
    }
}

impl ContactForm {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Company => &self.company,
            ContactField::Message => &self.message,
        }
    }

    /// Replaces the value of `field`, leaving the other fields untouched.
    pub fn set(&mut self, field: ContactField, value: String) {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Company => &mut self.company,
            ContactField::Message => &mut self.message,
        };
        *slot = value;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        ContactField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }

    /// Applies the same constraints a browser enforces for the rendered form
    /// (`required` and `type="email"`). There are no length limits.
    ///
    /// Fields are checked in form order and the first violation is returned.
    pub fn validate(&self) -> Result<ContactMessage, ContactFormError> {
        let name = ContactMessageAuthorName::try_new(self.name.clone())
            .map_err(|_| ContactFormError::Missing(ContactField::Name))?;

        let email = required(ContactField::Email, &self.email)?
            .parse::<EmailAddress>()
            .map_err(|_| ContactFormError::InvalidEmail)?;

        let company = (!self.company.is_empty())
            .then(|| ContactMessageCompany::new(self.company.clone()));

        let content = ContactMessageContent::try_new(self.message.clone())
            .map_err(|_| ContactFormError::Missing(ContactField::Message))?;

        Ok(ContactMessage {
            author: ContactMessageAuthor { name, email },
            company,
            content,
        })
    }
}

fn required(field: ContactField, value: &str) -> Result<String, ContactFormError> {
    if value.is_empty() {
        Err(ContactFormError::Missing(field))
    } else {
        Ok(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFormError {
    #[error("Please fill out the {0} field.")]
    Missing(ContactField),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

impl ContactFormError {
    pub fn field(self) -> ContactField {
        match self {
            Self::Missing(field) => field,
            Self::InvalidEmail => ContactField::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub company: Option<ContactMessageCompany>,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    derive(Debug, Clone, PartialEq, Eq, From, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageCompany(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);
