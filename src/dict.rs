// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Typed access to plist dictionaries carrying TSS protocol fields.

TSS documents are ordered string-keyed dictionaries whose leaf values are
strings, unsigned integers, booleans, opaque data buffers, or nested
dictionaries. [plist::Dictionary] preserves insertion order, which the
protocol relies on when scanning response entries.

The accessors here are fail-fast: a missing key or a value of the wrong
type is an error naming the offending field and the document it was
expected in, never a silent default.
*/

use {
    crate::error::TssError,
    plist::{Dictionary, Value},
};

/// Fetch a data (opaque byte buffer) value from a dictionary.
pub fn get_data<'a>(dict: &'a Dictionary, key: &str, ctx: &str) -> Result<&'a [u8], TssError> {
    get_value(dict, key, ctx)?
        .as_data()
        .ok_or_else(|| TssError::TypeMismatch(key.to_string(), ctx.to_string(), "data"))
}

/// Fetch an unsigned integer value from a dictionary.
///
/// A negative integer is a type mismatch, not a wrapped value.
pub fn get_uint(dict: &Dictionary, key: &str, ctx: &str) -> Result<u64, TssError> {
    get_value(dict, key, ctx)?
        .as_unsigned_integer()
        .ok_or_else(|| TssError::TypeMismatch(key.to_string(), ctx.to_string(), "unsigned integer"))
}

/// Fetch a boolean value from a dictionary.
pub fn get_bool(dict: &Dictionary, key: &str, ctx: &str) -> Result<bool, TssError> {
    get_value(dict, key, ctx)?
        .as_boolean()
        .ok_or_else(|| TssError::TypeMismatch(key.to_string(), ctx.to_string(), "boolean"))
}

/// Fetch a string value from a dictionary.
pub fn get_string<'a>(dict: &'a Dictionary, key: &str, ctx: &str) -> Result<&'a str, TssError> {
    get_value(dict, key, ctx)?
        .as_string()
        .ok_or_else(|| TssError::TypeMismatch(key.to_string(), ctx.to_string(), "string"))
}

/// Fetch a nested dictionary value from a dictionary.
pub fn get_dict<'a>(
    dict: &'a Dictionary,
    key: &str,
    ctx: &str,
) -> Result<&'a Dictionary, TssError> {
    get_value(dict, key, ctx)?
        .as_dictionary()
        .ok_or_else(|| TssError::TypeMismatch(key.to_string(), ctx.to_string(), "dictionary"))
}

/// Decode a base-16 string field into an unsigned integer.
///
/// Build manifests encode hardware identifiers like `ApChipID` as hex
/// strings (`"8930"` means `0x8930`). An optional `0x` prefix is accepted.
pub fn get_hex_uint(dict: &Dictionary, key: &str, ctx: &str) -> Result<u64, TssError> {
    let value = get_string(dict, key, ctx)?;

    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    u64::from_str_radix(digits, 16)
        .map_err(|_| TssError::HexDecode(key.to_string(), value.to_string()))
}

/// Merge `overrides` into `dict`, replacing top-level keys wholesale.
///
/// Nested dictionaries are not merged recursively: an override for a key
/// holding a dictionary replaces the whole dictionary.
pub fn merge_into(dict: &mut Dictionary, overrides: &Dictionary) {
    for (key, value) in overrides.iter() {
        dict.insert(key.clone(), value.clone());
    }
}

fn get_value<'a>(dict: &'a Dictionary, key: &str, ctx: &str) -> Result<&'a Value, TssError> {
    dict.get(key)
        .ok_or_else(|| TssError::MissingField(key.to_string(), ctx.to_string()))
}
