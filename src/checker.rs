use crate::model::{ProbeConfig, ProbeReport, ProtocolVersion};
use crate::probe::VersionProber;
use tracing::debug;

/// Drives the prober across every candidate version and collects the ordered
/// report. This is the entry point the CLI layer consumes.
pub struct TlsChecker {
    prober: VersionProber,
}

impl TlsChecker {
    pub fn new(cfg: ProbeConfig) -> Self {
        Self {
            prober: VersionProber::new(cfg),
        }
    }

    /// Probes each version sequentially, never short-circuiting: an
    /// unreachable host yields four failed entries rather than a top-level
    /// error.
    pub async fn check_host(&self, host: &str) -> ProbeReport {
        let mut results = Vec::with_capacity(ProtocolVersion::ALL.len());
        for version in ProtocolVersion::ALL {
            let result = self.prober.probe(host, version).await;
            debug!(%version, supported = result.supported, "probe finished");
            results.push(result);
        }
        ProbeReport {
            host: host.to_string(),
            results,
        }
    }
}
