use super::{cert, trust};
use crate::model::{CertificateInfo, ProbeConfig, ProbeResult, ProtocolVersion};
use anyhow::Context;
use openssl::ssl::{SslConnector, SslMethod, SslVersion};
use std::pin::Pin;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_openssl::SslStream;
use tracing::debug;

/// Attempts one TCP+TLS connection per call, with negotiation pinned to a
/// single protocol version.
pub struct VersionProber {
    cfg: ProbeConfig,
}

struct HandshakeOutcome {
    cipher_suites: Vec<String>,
    negotiated_protocols: Vec<String>,
    certificate: CertificateInfo,
}

impl VersionProber {
    pub fn new(cfg: ProbeConfig) -> Self {
        Self { cfg }
    }

    /// Probes `host` for exactly `version`. Never returns an error: DNS
    /// failures, refused connections, timeouts and handshake rejections all
    /// become a failed result, so one version's incompatibility cannot
    /// prevent probing the rest.
    pub async fn probe(&self, host: &str, version: ProtocolVersion) -> ProbeResult {
        debug!(%host, %version, port = self.cfg.port, "starting probe");
        match timeout(self.cfg.timeout, self.handshake(host, version)).await {
            Ok(Ok(outcome)) => ProbeResult::negotiated(
                version,
                outcome.cipher_suites,
                outcome.negotiated_protocols,
                outcome.certificate,
            ),
            Ok(Err(err)) => ProbeResult::failed(version, format!("{err:#}")),
            Err(_) => ProbeResult::failed(
                version,
                format!(
                    "timed out after {}ms (connect + handshake)",
                    self.cfg.timeout.as_millis()
                ),
            ),
        }
    }

    async fn handshake(
        &self,
        host: &str,
        version: ProtocolVersion,
    ) -> anyhow::Result<HandshakeOutcome> {
        let connector = single_version_connector(version)?;

        let tcp = TcpStream::connect((host, self.cfg.port))
            .await
            .with_context(|| format!("failed to connect to {host}:{}", self.cfg.port))?;

        let mut config = connector
            .configure()
            .context("failed to configure TLS connector")?;
        config.set_verify_hostname(false);
        let ssl = config.into_ssl(host).context("failed to configure TLS SNI")?;
        let mut tls = SslStream::new(ssl, tcp).context("failed to initialize TLS stream")?;
        Pin::new(&mut tls)
            .connect()
            .await
            .with_context(|| format!("{version} handshake failed for host {host}"))?;

        let ssl = tls.ssl();
        let cipher_suites = ssl
            .current_cipher()
            .map(|cipher| cipher.name().to_string())
            .into_iter()
            .collect();
        let negotiated_protocols = vec![ssl.version_str().to_string()];
        let certificate = cert::extract(ssl.peer_cert_chain());

        // Dropping the stream closes the socket; discovery does not need a
        // clean TLS shutdown.
        Ok(HandshakeOutcome {
            cipher_suites,
            negotiated_protocols,
            certificate,
        })
    }
}

/// Builds a fresh connector that offers exactly one protocol version, with
/// trust verification disabled. Per-connector configuration keeps repeated
/// probes from interfering with each other.
fn single_version_connector(version: ProtocolVersion) -> anyhow::Result<SslConnector> {
    let mut builder =
        SslConnector::builder(SslMethod::tls()).context("failed to create TLS connector")?;
    let forced = forced_version(version);
    builder
        .set_min_proto_version(Some(forced))
        .with_context(|| format!("cannot set minimum protocol {version}"))?;
    builder
        .set_max_proto_version(Some(forced))
        .with_context(|| format!("cannot set maximum protocol {version}"))?;
    if version.is_legacy() {
        // OpenSSL 3 refuses TLS < 1.2 above security level 0.
        builder.set_security_level(0);
    }
    trust::install_permissive(&mut builder);
    Ok(builder.build())
}

fn forced_version(version: ProtocolVersion) -> SslVersion {
    match version {
        ProtocolVersion::Tls10 => SslVersion::TLS1,
        ProtocolVersion::Tls11 => SslVersion::TLS1_1,
        ProtocolVersion::Tls12 => SslVersion::TLS1_2,
        ProtocolVersion::Tls13 => SslVersion::TLS1_3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_builds_for_every_version() {
        for version in ProtocolVersion::ALL {
            single_version_connector(version).unwrap();
        }
    }
}
