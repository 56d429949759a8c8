use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Candidate protocol versions. The order of `ALL` is the probe order and
/// the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    #[serde(rename = "TLSv1")]
    Tls10,
    #[serde(rename = "TLSv1.1")]
    Tls11,
    #[serde(rename = "TLSv1.2")]
    Tls12,
    #[serde(rename = "TLSv1.3")]
    Tls13,
}

impl ProtocolVersion {
    pub const ALL: [ProtocolVersion; 4] = [
        ProtocolVersion::Tls10,
        ProtocolVersion::Tls11,
        ProtocolVersion::Tls12,
        ProtocolVersion::Tls13,
    ];

    /// OpenSSL's name for the version, as reported after a handshake.
    pub fn label(self) -> &'static str {
        match self {
            ProtocolVersion::Tls10 => "TLSv1",
            ProtocolVersion::Tls11 => "TLSv1.1",
            ProtocolVersion::Tls12 => "TLSv1.2",
            ProtocolVersion::Tls13 => "TLSv1.3",
        }
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, ProtocolVersion::Tls10 | ProtocolVersion::Tls11)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Identity and validity fields of the leaf certificate, or the reason they
/// could not be read. A certificate is never reported with a partial set of
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CertificateInfo {
    Details(CertificateDetails),
    Unreadable { extraction_error: String },
}

impl CertificateInfo {
    pub fn unreadable(reason: impl Into<String>) -> Self {
        CertificateInfo::Unreadable {
            extraction_error: reason.into(),
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, CertificateInfo::Details(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateDetails {
    pub subject: String,
    pub issuer: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub signature_algorithm: String,
}

/// Outcome of one connection attempt with one forced protocol version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub version: ProtocolVersion,
    pub supported: bool,
    pub cipher_suites: Vec<String>,
    pub negotiated_protocols: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ProbeResult {
    pub fn negotiated(
        version: ProtocolVersion,
        cipher_suites: Vec<String>,
        negotiated_protocols: Vec<String>,
        certificate: CertificateInfo,
    ) -> Self {
        ProbeResult {
            version,
            supported: true,
            cipher_suites,
            negotiated_protocols,
            certificate: Some(certificate),
            failure_reason: None,
        }
    }

    pub fn failed(version: ProtocolVersion, reason: impl Into<String>) -> Self {
        ProbeResult {
            version,
            supported: false,
            cipher_suites: Vec::new(),
            negotiated_protocols: Vec::new(),
            certificate: None,
            failure_reason: Some(reason.into()),
        }
    }
}

/// One entry per candidate version, in `ProtocolVersion::ALL` order. A failed
/// probe still yields an entry, never an omission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub host: String,
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    pub fn get(&self, version: ProtocolVersion) -> Option<&ProbeResult> {
        self.results.iter().find(|result| result.version == version)
    }

    pub fn supported_versions(&self) -> impl Iterator<Item = ProtocolVersion> + '_ {
        self.results
            .iter()
            .filter(|result| result.supported)
            .map(|result| result.version)
    }

    /// Whether TLSv1 or TLSv1.1 negotiated. Certificate extraction health is
    /// deliberately ignored here.
    pub fn has_legacy_support(&self) -> bool {
        self.supported_versions()
            .any(|version| version.is_legacy())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub domain: Option<String>,
    pub probe: ProbeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub port: u16,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            port: 443,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Clone, Debug, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    Pretty,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jsonl => write!(f, "jsonl"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn version_order_is_fixed() {
        let labels: Vec<_> = ProtocolVersion::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(labels, ["TLSv1", "TLSv1.1", "TLSv1.2", "TLSv1.3"]);
    }

    #[test]
    fn legacy_versions() {
        assert!(ProtocolVersion::Tls10.is_legacy());
        assert!(ProtocolVersion::Tls11.is_legacy());
        assert!(!ProtocolVersion::Tls12.is_legacy());
        assert!(!ProtocolVersion::Tls13.is_legacy());
    }

    #[test]
    fn failed_result_carries_no_session_data() {
        let result = ProbeResult::failed(ProtocolVersion::Tls11, "connection refused");
        assert!(!result.supported);
        assert!(result.cipher_suites.is_empty());
        assert!(result.negotiated_protocols.is_empty());
        assert!(result.certificate.is_none());
        assert_eq!(result.failure_reason.as_deref(), Some("connection refused"));
    }

    #[test]
    fn negotiated_result_carries_no_failure() {
        let result = ProbeResult::negotiated(
            ProtocolVersion::Tls13,
            vec!["TLS_AES_256_GCM_SHA384".into()],
            vec!["TLSv1.3".into()],
            CertificateInfo::unreadable("truncated DER"),
        );
        assert!(result.supported);
        assert!(result.failure_reason.is_none());
        assert!(result.certificate.is_some());
    }

    #[test]
    fn certificate_info_serializes_exclusively() {
        let unreadable = CertificateInfo::unreadable("bad OID");
        let json = serde_json::to_value(&unreadable).unwrap();
        assert!(json.get("extraction_error").is_some());
        assert!(json.get("subject").is_none());

        let details = CertificateInfo::Details(CertificateDetails {
            subject: "CN=example.com".into(),
            issuer: "CN=Test CA".into(),
            valid_from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            valid_to: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            signature_algorithm: "sha256WithRSAEncryption".into(),
        });
        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("extraction_error").is_none());
        assert!(json.get("subject").is_some());
        assert!(json.get("valid_to").is_some());
    }

    #[test]
    fn report_lookup_and_legacy_flag() {
        let report = ProbeReport {
            host: "example.com".into(),
            results: vec![
                ProbeResult::failed(ProtocolVersion::Tls10, "handshake failure"),
                ProbeResult::negotiated(
                    ProtocolVersion::Tls11,
                    vec!["ECDHE-RSA-AES128-SHA".into()],
                    vec!["TLSv1.1".into()],
                    CertificateInfo::unreadable("empty chain"),
                ),
            ],
        };
        assert!(report.get(ProtocolVersion::Tls10).is_some());
        assert!(report.get(ProtocolVersion::Tls12).is_none());
        assert_eq!(
            report.supported_versions().collect::<Vec<_>>(),
            vec![ProtocolVersion::Tls11]
        );
        assert!(report.has_legacy_support());
    }
}
