//! Ordered view of a VCF INFO column.
//!
//! Tokens keep their original order, so a field that is only read (or has a value
//! replaced in place) serialises back to the same text.

use crate::{constants::VCF_MISSING_VALUE, utils::util::Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct InfoEntry {
    key: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoField {
    entries: Vec<InfoEntry>,
}

impl InfoField {
    /// Parses a `;`-joined INFO column. `.` is the empty field, bare keys are flags.
    ///
    /// Keys must be unique; a repeated key is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries: Vec<InfoEntry> = Vec::new();
        if text == VCF_MISSING_VALUE {
            return Ok(Self { entries });
        }
        for token in text.split(';').filter(|token| !token.is_empty()) {
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value.to_string())),
                None => (token, None),
            };
            if key.is_empty() {
                return Err(crate::svconvert_error!(
                    "INFO token without a key: '{}'",
                    token
                ));
            }
            if entries.iter().any(|entry| entry.key == key) {
                return Err(crate::svconvert_error!("Duplicate INFO key: '{}'", key));
            }
            entries.push(InfoEntry {
                key: key.to_string(),
                value,
            });
        }
        Ok(Self { entries })
    }

    /// Value of a `key=value` token. Flags and absent keys yield `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.value.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Replaces the value of `key` where it stands, or appends `key=value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(InfoEntry {
                key: key.to_string(),
                value,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "{VCF_MISSING_VALUE}");
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            match &entry.value {
                Some(value) => write!(f, "{}={}", entry.key, value)?,
                None => write!(f, "{}", entry.key)?,
            }
        }
        Ok(())
    }
}
