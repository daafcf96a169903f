// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Construction of TSS signing requests.

A [TssRequest] starts from a base document carrying client identification
tags and accumulates *tag groups*: AP tags for IMG4 or legacy IMG3 signing,
baseband tags, and tags derived from a build manifest's identity document.

Each tag-group method is atomic. Required fields are validated against the
caller's documents before anything is committed, so a failed call leaves
the request exactly as it was. The builder does not enforce call order:
[TssRequest::add_ap_img3_tags] requires fields that
[TssRequest::add_ap_tags_from_manifest] populates, and it is the caller's
job to sequence those calls.

Caller-supplied parameter and build identity dictionaries are only ever
read; values are copied into the request.
*/

use {
    crate::{dict, error::TssError},
    log::{debug, warn},
    plist::{Dictionary, Value},
    uuid::Uuid,
};

/// Client version tag sent with every request.
pub const TSS_CLIENT_VERSION_STRING: &str = "libauthinstall-293.1.16";

/// Manifest entries never copied into an AP signing request.
///
/// `BasebandFirmware` belongs to the baseband request; `Diags` and `OS`
/// are only used with diagnostics firmware.
const AP_MANIFEST_EXCLUDED_KEYS: [&str; 3] = ["BasebandFirmware", "Diags", "OS"];

/// Baseband key hashes copied from the build identity when present.
///
/// `BbActivationManifestKeyHash` is used by Qualcomm MDM6610 and
/// `BbSkeyId` by XMM 6180/GSM; the server tolerates their absence.
const BASEBAND_KEY_HASH_FIELDS: [&str; 5] = [
    "BbProvisioningManifestKeyHash",
    "BbActivationManifestKeyHash",
    "BbCalibrationManifestKeyHash",
    "BbFactoryActivationManifestKeyHash",
    "BbSkeyId",
];

/// Render a chip ECID as the decimal string the TSS protocol expects.
///
/// An ECID of 0 is never valid for a real device.
pub fn ecid_to_string(ecid: u64) -> Result<String, TssError> {
    if ecid == 0 {
        return Err(TssError::ZeroEcid);
    }

    Ok(ecid.to_string())
}

/// A TSS signing request under construction.
#[derive(Clone, Debug)]
pub struct TssRequest {
    dict: Dictionary,
}

impl TssRequest {
    /// Create a base request with client identification tags.
    ///
    /// The request carries a locality, the host platform, a client version
    /// string, and a freshly generated session UUID. `overrides` is merged
    /// last so caller-supplied values win.
    pub fn new(overrides: Option<&Dictionary>) -> Self {
        let mut dict = Dictionary::new();

        dict.insert(
            "@Locality".to_string(),
            Value::String("en_US".to_string()),
        );

        let host_platform = if cfg!(windows) { "windows" } else { "mac" };
        dict.insert(
            "@HostPlatformInfo".to_string(),
            Value::String(host_platform.to_string()),
        );

        dict.insert(
            "@VersionInfo".to_string(),
            Value::String(TSS_CLIENT_VERSION_STRING.to_string()),
        );

        let guid = Uuid::new_v4().hyphenated().to_string().to_ascii_uppercase();
        dict.insert("@UUID".to_string(), Value::String(guid));

        if let Some(overrides) = overrides {
            dict::merge_into(&mut dict, overrides);
        }

        Self { dict }
    }

    /// Obtain the request document.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Consume the request, yielding the underlying document.
    pub fn into_dictionary(self) -> Dictionary {
        self.dict
    }

    /// Serialize the request to its XML plist wire form.
    pub fn to_xml(&self) -> Result<String, TssError> {
        let mut buffer = Vec::new();

        Value::Dictionary(self.dict.clone())
            .to_writer_xml(&mut buffer)
            .map_err(TssError::PlistSerializeXml)?;

        // The plist writer only emits UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Add the tags requesting an IMG4 AP ticket.
    ///
    /// `parameters` must supply `ApNonce` and `ApSepNonce` buffers.
    /// `ApSecurityMode` must either already be on the request or be
    /// supplied as an unsigned integer in `parameters`.
    pub fn add_ap_img4_tags(&mut self, parameters: &Dictionary) -> Result<(), TssError> {
        let mut tags = Dictionary::new();

        let ap_nonce = dict::get_data(parameters, "ApNonce", "parameters")?;
        debug!("requesting IMG4 ticket for ApNonce {}", hex::encode(ap_nonce));
        tags.insert("ApNonce".to_string(), Value::Data(ap_nonce.to_vec()));

        tags.insert("@ApImg4Ticket".to_string(), Value::Boolean(true));

        if !self.dict.contains_key("ApSecurityMode") {
            let security_mode = dict::get_uint(parameters, "ApSecurityMode", "parameters")?;
            tags.insert(
                "ApSecurityMode".to_string(),
                Value::Integer(security_mode.into()),
            );
        }

        let sep_nonce = dict::get_data(parameters, "ApSepNonce", "parameters")?;
        tags.insert("ApSepNonce".to_string(), Value::Data(sep_nonce.to_vec()));

        dict::merge_into(&mut self.dict, &tags);

        Ok(())
    }

    /// Add the tags requesting a legacy IMG3 AP ticket.
    ///
    /// `ApNonce` is optional, but fails the call when present with the
    /// wrong type. `ApBoardID`, `ApChipID`, and `ApSecurityDomain` must
    /// already be on the request (see
    /// [TssRequest::add_ap_tags_from_manifest]).
    pub fn add_ap_img3_tags(&mut self, parameters: &Dictionary) -> Result<(), TssError> {
        let mut tags = Dictionary::new();

        if let Some(node) = parameters.get("ApNonce") {
            let ap_nonce = node.as_data().ok_or_else(|| {
                TssError::TypeMismatch("ApNonce".to_string(), "parameters".to_string(), "data")
            })?;
            tags.insert("ApNonce".to_string(), Value::Data(ap_nonce.to_vec()));
        }

        tags.insert("@APTicket".to_string(), Value::Boolean(true));

        let ecid = dict::get_uint(parameters, "ApECID", "parameters")?;
        tags.insert("ApECID".to_string(), Value::Integer(ecid.into()));

        // Populated from the build manifest; must already be present.
        dict::get_uint(&self.dict, "ApBoardID", "request")?;
        dict::get_uint(&self.dict, "ApChipID", "request")?;
        dict::get_uint(&self.dict, "ApSecurityDomain", "request")?;

        let production_mode = dict::get_bool(parameters, "ApProductionMode", "parameters")?;
        tags.insert(
            "ApProductionMode".to_string(),
            Value::Boolean(production_mode),
        );

        dict::merge_into(&mut self.dict, &tags);

        Ok(())
    }

    /// Add the tags requesting a baseband ticket.
    pub fn add_baseband_tags(&mut self, parameters: &Dictionary) -> Result<(), TssError> {
        let mut tags = Dictionary::new();

        let bb_nonce = dict::get_data(parameters, "BbNonce", "parameters")?;
        debug!("requesting BB ticket for BbNonce {}", hex::encode(bb_nonce));
        tags.insert("BbNonce".to_string(), Value::Data(bb_nonce.to_vec()));

        tags.insert("@BBTicket".to_string(), Value::Boolean(true));

        let gold_cert_id = dict::get_uint(parameters, "BbGoldCertId", "parameters")?;
        tags.insert(
            "BbGoldCertId".to_string(),
            Value::Integer(gold_cert_id.into()),
        );

        let snum = dict::get_data(parameters, "BbSNUM", "parameters")?;
        tags.insert("BbSNUM".to_string(), Value::Data(snum.to_vec()));

        dict::merge_into(&mut self.dict, &tags);

        Ok(())
    }

    /// Add AP tags derived from a build identity document.
    ///
    /// Copies `UniqueBuildID`, hex-decodes the `ApChipID`, `ApBoardID`,
    /// and `ApSecurityDomain` identifiers, and copies every entry of the
    /// identity's component `Manifest` other than `BasebandFirmware`,
    /// `Diags`, and `OS`. Each copied component drops its `Info`
    /// dictionary and gains `EPRO`/`ESEC` flags signaling IMG4 support.
    /// `overrides` is merged last.
    pub fn add_ap_tags_from_manifest(
        &mut self,
        build_identity: &Dictionary,
        overrides: Option<&Dictionary>,
    ) -> Result<(), TssError> {
        let mut tags = Dictionary::new();

        let unique_build_id = dict::get_data(build_identity, "UniqueBuildID", "build identity")?;
        tags.insert(
            "UniqueBuildID".to_string(),
            Value::Data(unique_build_id.to_vec()),
        );

        for field in ["ApChipID", "ApBoardID", "ApSecurityDomain"] {
            let decoded = dict::get_hex_uint(build_identity, field, "build identity")?;
            tags.insert(field.to_string(), Value::Integer(decoded.into()));
        }

        let manifest = dict::get_dict(build_identity, "Manifest", "build identity")?;

        for (key, node) in manifest.iter() {
            if AP_MANIFEST_EXCLUDED_KEYS.contains(&key.as_str()) {
                continue;
            }

            let entry = node
                .as_dictionary()
                .ok_or_else(|| TssError::MalformedManifestEntry(key.clone()))?;

            let mut tss_entry = entry.clone();
            tss_entry.remove("Info");

            // TODO only set these if the device supports IMG4.
            tss_entry.insert("EPRO".to_string(), Value::Boolean(true));
            tss_entry.insert("ESEC".to_string(), Value::Boolean(true));

            tags.insert(key.clone(), Value::Dictionary(tss_entry));
        }

        dict::merge_into(&mut self.dict, &tags);

        if let Some(overrides) = overrides {
            dict::merge_into(&mut self.dict, overrides);
        }

        Ok(())
    }

    /// Add baseband tags derived from a build identity document.
    ///
    /// Hex-decodes `BbChipID` and copies the `BasebandFirmware` manifest
    /// entry wholesale; both are required. The various baseband key
    /// hashes are copied when present, with a warning when absent: the
    /// server tolerates missing baseband key hashes, unlike the AP path.
    /// `overrides` is merged last.
    pub fn add_baseband_tags_from_manifest(
        &mut self,
        build_identity: &Dictionary,
        overrides: Option<&Dictionary>,
    ) -> Result<(), TssError> {
        let mut tags = Dictionary::new();

        let bb_chip_id = dict::get_hex_uint(build_identity, "BbChipID", "build identity")?;
        tags.insert("BbChipID".to_string(), Value::Integer(bb_chip_id.into()));

        for field in BASEBAND_KEY_HASH_FIELDS {
            match build_identity.get(field).and_then(Value::as_data) {
                Some(data) => {
                    tags.insert(field.to_string(), Value::Data(data.to_vec()));
                }
                None => {
                    warn!("unable to find {} node in build identity", field);
                }
            }
        }

        let firmware = build_identity
            .get("Manifest")
            .and_then(Value::as_dictionary)
            .and_then(|manifest| manifest.get("BasebandFirmware"))
            .and_then(Value::as_dictionary)
            .ok_or_else(|| {
                TssError::MissingField("BasebandFirmware".to_string(), "build manifest".to_string())
            })?;
        tags.insert(
            "BasebandFirmware".to_string(),
            Value::Dictionary(firmware.clone()),
        );

        dict::merge_into(&mut self.dict, &tags);

        if let Some(overrides) = overrides {
            dict::merge_into(&mut self.dict, overrides);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ap_parameters() -> Dictionary {
        let mut parameters = Dictionary::new();
        parameters.insert("ApNonce".to_string(), Value::Data(vec![1, 2, 3, 4]));
        parameters.insert("ApSepNonce".to_string(), Value::Data(vec![5, 6, 7, 8]));
        parameters.insert("ApSecurityMode".to_string(), Value::Integer(1u64.into()));
        parameters.insert("ApECID".to_string(), Value::Integer(0xdeadbeefu64.into()));
        parameters.insert("ApProductionMode".to_string(), Value::Boolean(true));
        parameters
    }

    fn build_identity() -> Dictionary {
        let mut info = Dictionary::new();
        info.insert("RestoreRequestRules".to_string(), Value::Boolean(true));

        let mut iboot = Dictionary::new();
        iboot.insert(
            "Digest".to_string(),
            Value::Data(vec![0xaa, 0xbb, 0xcc, 0xdd]),
        );
        iboot.insert("Info".to_string(), Value::Dictionary(info));

        let mut baseband = Dictionary::new();
        baseband.insert("Digest".to_string(), Value::Data(vec![0x11]));

        let mut os = Dictionary::new();
        os.insert("Digest".to_string(), Value::Data(vec![0x22]));

        let mut diags = Dictionary::new();
        diags.insert("Digest".to_string(), Value::Data(vec![0x33]));

        let mut manifest = Dictionary::new();
        manifest.insert("iBoot".to_string(), Value::Dictionary(iboot));
        manifest.insert("BasebandFirmware".to_string(), Value::Dictionary(baseband));
        manifest.insert("OS".to_string(), Value::Dictionary(os));
        manifest.insert("Diags".to_string(), Value::Dictionary(diags));

        let mut identity = Dictionary::new();
        identity.insert("UniqueBuildID".to_string(), Value::Data(vec![9, 9, 9]));
        identity.insert("ApChipID".to_string(), Value::String("8930".to_string()));
        identity.insert("ApBoardID".to_string(), Value::String("4".to_string()));
        identity.insert("ApSecurityDomain".to_string(), Value::String("1".to_string()));
        identity.insert("BbChipID".to_string(), Value::String("e3".to_string()));
        identity.insert(
            "BbProvisioningManifestKeyHash".to_string(),
            Value::Data(vec![0x42; 20]),
        );
        identity.insert("Manifest".to_string(), Value::Dictionary(manifest));
        identity
    }

    #[test]
    fn base_request_tags() {
        let request = TssRequest::new(None);
        let dict = request.dictionary();

        assert_eq!(
            dict.get("@Locality").and_then(Value::as_string),
            Some("en_US")
        );
        assert!(dict.get("@HostPlatformInfo").is_some());
        assert_eq!(
            dict.get("@VersionInfo").and_then(Value::as_string),
            Some(TSS_CLIENT_VERSION_STRING)
        );

        let uuid = dict.get("@UUID").and_then(Value::as_string).unwrap();
        assert_eq!(uuid.len(), 36);
        assert_eq!(uuid, uuid.to_ascii_uppercase());
    }

    #[test]
    fn base_request_overrides_win() {
        let mut overrides = Dictionary::new();
        overrides.insert("@Locality".to_string(), Value::String("en_GB".to_string()));
        overrides.insert("ApECID".to_string(), Value::Integer(7u64.into()));

        let request = TssRequest::new(Some(&overrides));
        let dict = request.dictionary();

        assert_eq!(
            dict.get("@Locality").and_then(Value::as_string),
            Some("en_GB")
        );
        assert_eq!(
            dict.get("ApECID").and_then(Value::as_unsigned_integer),
            Some(7)
        );
    }

    #[test]
    fn session_uuid_is_unique() {
        let a = TssRequest::new(None);
        let b = TssRequest::new(None);

        assert_ne!(
            a.dictionary().get("@UUID").and_then(Value::as_string),
            b.dictionary().get("@UUID").and_then(Value::as_string)
        );
    }

    #[test]
    fn ap_img4_tags() -> Result<(), TssError> {
        let mut request = TssRequest::new(None);
        request.add_ap_img4_tags(&ap_parameters())?;

        let dict = request.dictionary();
        assert_eq!(
            dict.get("ApNonce").and_then(Value::as_data),
            Some(&[1u8, 2, 3, 4][..])
        );
        assert_eq!(
            dict.get("ApSepNonce").and_then(Value::as_data),
            Some(&[5u8, 6, 7, 8][..])
        );
        assert_eq!(
            dict.get("@ApImg4Ticket").and_then(Value::as_boolean),
            Some(true)
        );
        assert_eq!(
            dict.get("ApSecurityMode").and_then(Value::as_unsigned_integer),
            Some(1)
        );

        Ok(())
    }

    #[test]
    fn ap_img4_tags_missing_sep_nonce_leaves_request_unchanged() {
        let mut parameters = ap_parameters();
        parameters.remove("ApSepNonce");

        let mut request = TssRequest::new(None);
        let before = request.dictionary().clone();

        let result = request.add_ap_img4_tags(&parameters);
        assert!(matches!(result, Err(TssError::MissingField(_, _))));
        assert_eq!(request.dictionary(), &before);
    }

    #[test]
    fn ap_img4_tags_security_mode_from_request_wins() -> Result<(), TssError> {
        let mut parameters = ap_parameters();
        parameters.remove("ApSecurityMode");

        // Not in parameters and not on the request: error.
        let mut request = TssRequest::new(None);
        assert!(matches!(
            request.add_ap_img4_tags(&parameters),
            Err(TssError::MissingField(_, _))
        ));

        // Already on the request: parameters not consulted.
        let mut overrides = Dictionary::new();
        overrides.insert("ApSecurityMode".to_string(), Value::Integer(0u64.into()));
        let mut request = TssRequest::new(Some(&overrides));
        request.add_ap_img4_tags(&parameters)?;

        assert_eq!(
            request
                .dictionary()
                .get("ApSecurityMode")
                .and_then(Value::as_unsigned_integer),
            Some(0)
        );

        Ok(())
    }

    #[test]
    fn ap_img3_requires_manifest_tags_first() {
        let mut request = TssRequest::new(None);

        let result = request.add_ap_img3_tags(&ap_parameters());
        assert!(matches!(result, Err(TssError::MissingField(_, _))));
    }

    #[test]
    fn ap_img3_after_manifest_tags() -> Result<(), TssError> {
        let mut request = TssRequest::new(None);
        request.add_ap_tags_from_manifest(&build_identity(), None)?;
        request.add_ap_img3_tags(&ap_parameters())?;

        let dict = request.dictionary();
        assert_eq!(
            dict.get("ApChipID").and_then(Value::as_unsigned_integer),
            Some(0x8930)
        );
        assert_eq!(
            dict.get("ApBoardID").and_then(Value::as_unsigned_integer),
            Some(0x4)
        );
        assert_eq!(
            dict.get("ApSecurityDomain")
                .and_then(Value::as_unsigned_integer),
            Some(0x1)
        );
        assert_eq!(
            dict.get("@APTicket").and_then(Value::as_boolean),
            Some(true)
        );
        assert_eq!(
            dict.get("ApECID").and_then(Value::as_unsigned_integer),
            Some(0xdeadbeef)
        );
        assert_eq!(
            dict.get("ApProductionMode").and_then(Value::as_boolean),
            Some(true)
        );

        Ok(())
    }

    #[test]
    fn ap_img3_rejects_mistyped_optional_nonce() {
        let mut parameters = ap_parameters();
        parameters.insert("ApNonce".to_string(), Value::String("oops".to_string()));

        let mut request = TssRequest::new(None);
        request
            .add_ap_tags_from_manifest(&build_identity(), None)
            .unwrap();
        let before = request.dictionary().clone();

        let result = request.add_ap_img3_tags(&parameters);
        assert!(matches!(result, Err(TssError::TypeMismatch(_, _, _))));
        assert_eq!(request.dictionary(), &before);
    }

    #[test]
    fn baseband_tags() -> Result<(), TssError> {
        let mut parameters = Dictionary::new();
        parameters.insert("BbNonce".to_string(), Value::Data(vec![0xf0, 0x0d]));
        parameters.insert("BbGoldCertId".to_string(), Value::Integer(1234u64.into()));
        parameters.insert("BbSNUM".to_string(), Value::Data(vec![0x51]));

        let mut request = TssRequest::new(None);
        request.add_baseband_tags(&parameters)?;

        let dict = request.dictionary();
        assert_eq!(dict.get("@BBTicket").and_then(Value::as_boolean), Some(true));
        assert_eq!(
            dict.get("BbGoldCertId").and_then(Value::as_unsigned_integer),
            Some(1234)
        );
        assert_eq!(dict.get("BbSNUM").and_then(Value::as_data), Some(&[0x51][..]));

        Ok(())
    }

    #[test]
    fn manifest_tags_exclude_and_decorate() -> Result<(), TssError> {
        let mut request = TssRequest::new(None);
        request.add_ap_tags_from_manifest(&build_identity(), None)?;

        let dict = request.dictionary();
        assert_eq!(
            dict.get("UniqueBuildID").and_then(Value::as_data),
            Some(&[9u8, 9, 9][..])
        );
        assert!(dict.get("BasebandFirmware").is_none());
        assert!(dict.get("Diags").is_none());
        assert!(dict.get("OS").is_none());

        let iboot = dict.get("iBoot").and_then(Value::as_dictionary).unwrap();
        assert!(iboot.get("Info").is_none());
        assert_eq!(iboot.get("EPRO").and_then(Value::as_boolean), Some(true));
        assert_eq!(iboot.get("ESEC").and_then(Value::as_boolean), Some(true));
        assert_eq!(
            iboot.get("Digest").and_then(Value::as_data),
            Some(&[0xaa, 0xbb, 0xcc, 0xdd][..])
        );

        // Source document is untouched.
        let identity = build_identity();
        let entry = identity
            .get("Manifest")
            .and_then(Value::as_dictionary)
            .and_then(|m| m.get("iBoot"))
            .and_then(Value::as_dictionary)
            .unwrap();
        assert!(entry.get("Info").is_some());

        Ok(())
    }

    #[test]
    fn manifest_tags_overrides_applied_last() -> Result<(), TssError> {
        let mut overrides = Dictionary::new();
        overrides.insert("ApChipID".to_string(), Value::Integer(0x7777u64.into()));

        let mut request = TssRequest::new(None);
        request.add_ap_tags_from_manifest(&build_identity(), Some(&overrides))?;

        assert_eq!(
            request
                .dictionary()
                .get("ApChipID")
                .and_then(Value::as_unsigned_integer),
            Some(0x7777)
        );

        Ok(())
    }

    #[test]
    fn manifest_tags_missing_field_fails_cleanly() {
        let mut identity = build_identity();
        identity.remove("ApSecurityDomain");

        let mut request = TssRequest::new(None);
        let before = request.dictionary().clone();

        let result = request.add_ap_tags_from_manifest(&identity, None);
        assert!(matches!(result, Err(TssError::MissingField(_, _))));
        assert_eq!(request.dictionary(), &before);
    }

    #[test]
    fn manifest_tags_reject_non_dict_entry() {
        let mut identity = build_identity();
        let manifest = identity
            .get_mut("Manifest")
            .and_then(Value::as_dictionary_mut)
            .unwrap();
        manifest.insert("Broken".to_string(), Value::String("nope".to_string()));

        let mut request = TssRequest::new(None);
        let result = request.add_ap_tags_from_manifest(&identity, None);
        assert!(matches!(result, Err(TssError::MalformedManifestEntry(_))));
    }

    #[test]
    fn baseband_manifest_tags() -> Result<(), TssError> {
        let mut request = TssRequest::new(None);
        // Only one of the optional key hashes is present; the rest warn.
        request.add_baseband_tags_from_manifest(&build_identity(), None)?;

        let dict = request.dictionary();
        assert_eq!(
            dict.get("BbChipID").and_then(Value::as_unsigned_integer),
            Some(0xe3)
        );
        assert!(dict.get("BbProvisioningManifestKeyHash").is_some());
        assert!(dict.get("BbActivationManifestKeyHash").is_none());

        let firmware = dict
            .get("BasebandFirmware")
            .and_then(Value::as_dictionary)
            .unwrap();
        assert_eq!(
            firmware.get("Digest").and_then(Value::as_data),
            Some(&[0x11][..])
        );

        Ok(())
    }

    #[test]
    fn baseband_manifest_tags_require_firmware_entry() {
        let mut identity = build_identity();
        let manifest = identity
            .get_mut("Manifest")
            .and_then(Value::as_dictionary_mut)
            .unwrap();
        manifest.remove("BasebandFirmware");

        let mut request = TssRequest::new(None);
        let before = request.dictionary().clone();

        let result = request.add_baseband_tags_from_manifest(&identity, None);
        assert!(matches!(result, Err(TssError::MissingField(_, _))));
        assert_eq!(request.dictionary(), &before);
    }

    #[test]
    fn ecid_strings() {
        assert_eq!(ecid_to_string(3405691582).unwrap(), "3405691582");
        assert!(matches!(ecid_to_string(0), Err(TssError::ZeroEcid)));
    }

    #[test]
    fn xml_round_trips_through_plist() -> Result<(), TssError> {
        let mut request = TssRequest::new(None);
        request.add_ap_tags_from_manifest(&build_identity(), None)?;

        let xml = request.to_xml()?;
        assert!(xml.starts_with("<?xml"));

        let value = plist::Value::from_reader_xml(std::io::Cursor::new(xml.as_bytes()))
            .map_err(TssError::PlistParseXml)?;
        let parsed = value.into_dictionary().unwrap();

        assert_eq!(
            parsed.get("UniqueBuildID").and_then(Value::as_data),
            Some(&[9u8, 9, 9][..])
        );
        assert_eq!(
            parsed.get("ApChipID").and_then(Value::as_unsigned_integer),
            Some(0x8930)
        );

        Ok(())
    }
}
