use crate::model::{CertificateDetails, CertificateInfo};
use anyhow::{anyhow, Context};
use chrono::{DateTime, TimeZone, Utc};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::stack::StackRef;
use openssl::x509::{X509NameRef, X509Ref, X509};

/// Reads the identity and validity fields off the leaf of the peer's chain.
/// Encoding oddities are far more common than handshake failures, so every
/// problem is reported as `Unreadable` instead of aborting the probe.
pub fn extract(chain: Option<&StackRef<X509>>) -> CertificateInfo {
    let Some(leaf) = chain.and_then(|chain| chain.iter().next()) else {
        return CertificateInfo::unreadable("peer presented no certificate chain");
    };
    match read_identity(leaf) {
        Ok(details) => CertificateInfo::Details(details),
        Err(err) => CertificateInfo::unreadable(format!("{err:#}")),
    }
}

fn read_identity(cert: &X509Ref) -> anyhow::Result<CertificateDetails> {
    let valid_from = asn1_to_utc(cert.not_before()).context("unreadable notBefore")?;
    let valid_to = asn1_to_utc(cert.not_after()).context("unreadable notAfter")?;

    let algorithm = cert.signature_algorithm().object();
    let signature_algorithm = algorithm
        .nid()
        .long_name()
        .map(str::to_owned)
        .unwrap_or_else(|_| algorithm.to_string());

    Ok(CertificateDetails {
        subject: format_x509_name(cert.subject_name()),
        issuer: format_x509_name(cert.issuer_name()),
        valid_from,
        valid_to,
        signature_algorithm,
    })
}

fn format_x509_name(name: &X509NameRef) -> String {
    let mut parts = Vec::new();
    for entry in name.entries() {
        let key = entry.object().nid().short_name().unwrap_or("UNKNOWN");
        let value = entry
            .data()
            .as_utf8()
            .map(|val| val.to_string())
            .unwrap_or_default();
        if !value.is_empty() {
            parts.push(format!("{key}={value}"));
        }
    }
    parts.join(", ")
}

fn asn1_to_utc(time: &Asn1TimeRef) -> anyhow::Result<DateTime<Utc>> {
    let epoch = Asn1Time::from_unix(0).context("cannot build epoch reference")?;
    let diff = epoch.diff(time).context("cannot diff ASN.1 time")?;
    let secs = i64::from(diff.days) * 86_400 + i64::from(diff.secs);
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| anyhow!("timestamp out of range: {secs}"))
}
