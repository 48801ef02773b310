//! Local address book: human name tags for addresses, per chain.
//!
//! Persisted as a pretty-printed JSON array. A missing file is an empty
//! book, so first use needs no setup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AddressBookError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBookEntry {
    pub chain_id: u64,
    pub address: String,
    pub name_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
}

impl AddressBookEntry {
    pub fn new(chain_id: u64, address: impl Into<String>, name_tag: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: address.into(),
            name_tag: name_tag.into(),
            ens_name: None,
        }
    }

    /// Stable id: `"{chain}_{lowercase address}_{ens name or empty}"`.
    pub fn id(&self) -> String {
        format!(
            "{}_{}_{}",
            self.chain_id,
            self.address.to_lowercase(),
            self.ens_name.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    entries: Vec<AddressBookEntry>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a file that does not exist yields an empty book.
    pub fn load(path: &Path) -> Result<Self, AddressBookError> {
        if !path.exists() {
            debug!(path = %path.display(), "no address book yet");
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path).map_err(|e| AddressBookError::Io(e.to_string()))?;
        let entries: Vec<AddressBookEntry> =
            serde_json::from_str(&raw).map_err(|e| AddressBookError::Serialization(e.to_string()))?;
        debug!(path = %path.display(), count = entries.len(), "address book loaded");
        Ok(Self { entries })
    }

    /// Write the book to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), AddressBookError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AddressBookError::Io(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| AddressBookError::Serialization(e.to_string()))?;
        fs::write(path, raw).map_err(|e| AddressBookError::Io(e.to_string()))?;
        info!(path = %path.display(), count = self.entries.len(), "address book saved");
        Ok(())
    }

    /// Insert or replace the entry with the same [`AddressBookEntry::id`].
    /// Returns the replaced entry, if any.
    pub fn upsert(&mut self, entry: AddressBookEntry) -> Option<AddressBookEntry> {
        let id = entry.id();
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Result<AddressBookEntry, AddressBookError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| AddressBookError::UnknownEntry(id.to_string()))?;
        Ok(self.entries.remove(pos))
    }

    /// First entry for `address` on `chain_id`, ignoring address case.
    pub fn find(&self, chain_id: u64, address: &str) -> Option<&AddressBookEntry> {
        self.entries
            .iter()
            .find(|e| e.chain_id == chain_id && e.address.eq_ignore_ascii_case(address))
    }

    pub fn entries(&self) -> &[AddressBookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
