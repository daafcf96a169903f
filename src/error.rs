// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Unified error type for TSS client operations.
#[derive(Debug, Error)]
pub enum TssError {
    #[error("unable to find required {0} in {1}")]
    MissingField(String, String),

    #[error("{0} in {1} is not of expected type {2}")]
    TypeMismatch(String, String, &'static str),

    #[error("{0} is not a base-16 integer: {1}")]
    HexDecode(String, String),

    #[error("build manifest entry {0} is not a dictionary")]
    MalformedManifestEntry(String),

    #[error("invalid ECID: must be non-zero")]
    ZeroEcid,

    #[error("TSS request failed (status={}, message={message})", .status.map_or(-1, |s| s as i64))]
    TransportFailure {
        /// Last protocol status code seen, if the server sent one.
        status: Option<u64>,
        /// Server `MESSAGE=` text or last transport-level error text.
        message: String,
    },

    #[error("incorrectly formatted TSS response")]
    MalformedResponse,

    #[error("unable to find {0} in TSS response")]
    NotFound(String),

    #[error("error parsing plist XML: {0}")]
    PlistParseXml(plist::Error),

    #[error("error serializing plist to XML: {0}")]
    PlistSerializeXml(plist::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
