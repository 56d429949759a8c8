use openssl::ssl::{SslConnectorBuilder, SslVerifyMode};
use openssl::x509::X509StoreContextRef;

/// Installs an accept-all chain verifier on the connector. The chain is still
/// requested (so the extractor can read it) but never rejected, which lets
/// handshakes complete against self-signed and expired certificates.
///
/// Discovery use only: the results say nothing about whether the peer should
/// be trusted.
pub fn install_permissive(builder: &mut SslConnectorBuilder) {
    builder.set_verify_callback(SslVerifyMode::PEER, accept_any_chain);
}

fn accept_any_chain(_preverified: bool, _ctx: &mut X509StoreContextRef) -> bool {
    true
}
