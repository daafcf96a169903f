// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Typed read access into parsed TSS responses.

A successful TSS exchange yields a dictionary mapping fixed keys
(`APImg4Ticket`, `APTicket`, `BBTicket`) to opaque ticket buffers and
component names to entry dictionaries carrying `Path` and `Blob` fields.
[TssResponse] wraps that dictionary and exposes accessors which
distinguish a missing entry (an error) from an entry that simply lacks
an optional field.
*/

use {
    crate::error::TssError,
    log::{debug, error},
    plist::{Dictionary, Value},
};

/// The fixed ticket slots a TSS response can carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketKind {
    /// IMG4 AP ticket (`APImg4Ticket`).
    ApImg4,
    /// Legacy IMG3 AP ticket (`APTicket`).
    Ap,
    /// Baseband ticket (`BBTicket`).
    Baseband,
}

impl TicketKind {
    /// The response key holding this ticket.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ApImg4 => "APImg4Ticket",
            Self::Ap => "APTicket",
            Self::Baseband => "BBTicket",
        }
    }
}

/// A parsed TSS server response.
#[derive(Clone, Debug)]
pub struct TssResponse {
    dict: Dictionary,
}

impl TssResponse {
    /// Wrap an already-parsed response document.
    pub fn from_dictionary(dict: Dictionary) -> Self {
        Self { dict }
    }

    /// Obtain the underlying response document.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Fetch one of the fixed ticket buffers.
    pub fn ticket(&self, kind: TicketKind) -> Result<&[u8], TssError> {
        let key = kind.key();

        let node = self
            .dict
            .get(key)
            .ok_or_else(|| TssError::NotFound(key.to_string()))?;

        node.as_data()
            .ok_or_else(|| TssError::TypeMismatch(key.to_string(), "response".to_string(), "data"))
    }

    /// Fetch the IMG4 AP ticket.
    pub fn ap_img4_ticket(&self) -> Result<&[u8], TssError> {
        self.ticket(TicketKind::ApImg4)
    }

    /// Fetch the legacy IMG3 AP ticket.
    pub fn ap_ticket(&self) -> Result<&[u8], TssError> {
        self.ticket(TicketKind::Ap)
    }

    /// Fetch the baseband ticket.
    pub fn baseband_ticket(&self) -> Result<&[u8], TssError> {
        self.ticket(TicketKind::Baseband)
    }

    /// Fetch the `Path` of a named response entry.
    ///
    /// A missing entry is an error. An entry without a usable `Path` is
    /// `Ok(None)`: the server legitimately omits paths for some entries.
    pub fn path_for_entry(&self, entry: &str) -> Result<Option<&str>, TssError> {
        let node = self
            .dict
            .get(entry)
            .and_then(Value::as_dictionary)
            .ok_or_else(|| TssError::NotFound(format!("{} entry", entry)))?;

        match node.get("Path").and_then(Value::as_string) {
            Some(path) => Ok(Some(path)),
            None => {
                debug!("unable to find {} path in TSS entry", entry);
                Ok(None)
            }
        }
    }

    /// Fetch the signed `Blob` of a named response entry.
    pub fn blob_by_entry(&self, entry: &str) -> Result<&[u8], TssError> {
        let node = self
            .dict
            .get(entry)
            .and_then(Value::as_dictionary)
            .ok_or_else(|| TssError::NotFound(format!("{} entry", entry)))?;

        node.get("Blob").and_then(Value::as_data).ok_or_else(|| {
            error!("unable to find blob in {} entry", entry);
            TssError::TypeMismatch("Blob".to_string(), format!("{} entry", entry), "data")
        })
    }

    /// Fetch the signed `Blob` of the first entry whose `Path` matches.
    ///
    /// Entries are scanned in document order, so duplicate paths resolve
    /// to the first match. Entries without a `Path` are skipped. This is
    /// O(entries) per lookup.
    pub fn blob_by_path(&self, path: &str) -> Result<&[u8], TssError> {
        for (key, node) in self.dict.iter() {
            let entry = match node.as_dictionary() {
                Some(entry) => entry,
                None => continue,
            };

            let entry_path = match entry.get("Path").and_then(Value::as_string) {
                Some(entry_path) => entry_path,
                None => {
                    debug!("TSS entry {} has no path", key);
                    continue;
                }
            };

            if entry_path == path {
                return entry.get("Blob").and_then(Value::as_data).ok_or_else(|| {
                    error!("unable to find blob in {} entry", key);
                    TssError::TypeMismatch("Blob".to_string(), format!("{} entry", key), "data")
                });
            }
        }

        Err(TssError::NotFound(format!("entry with path {}", path)))
    }
}
