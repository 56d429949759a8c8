use anyhow::bail;

/// Normalizes user input into a bare hostname: trims, lowercases, strips the
/// scheme, any path and any port suffix, then validates the label syntax.
pub fn normalize_host(raw: &str) -> anyhow::Result<String> {
    let mut host = raw.trim().to_ascii_lowercase();
    if let Some(rest) = host.strip_prefix("https://") {
        host = rest.to_string();
    } else if let Some(rest) = host.strip_prefix("http://") {
        host = rest.to_string();
    }
    if let Some(idx) = host.find('/') {
        host.truncate(idx);
    }
    if let Some(idx) = host.find(':') {
        host.truncate(idx);
    }

    if host.is_empty() || !is_valid_domain(&host) {
        bail!("invalid domain: {raw}");
    }
    Ok(host)
}

fn is_valid_domain(host: &str) -> bool {
    host.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > 63 {
        return false;
    }
    if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_port_and_path() {
        assert_eq!(
            normalize_host("https://Example.COM:8443/path?q=1").unwrap(),
            "example.com"
        );
        assert_eq!(normalize_host("http://example.com/").unwrap(), "example.com");
        assert_eq!(normalize_host("  example.com  ").unwrap(), "example.com");
    }

    #[test]
    fn accepts_plain_hosts() {
        assert_eq!(normalize_host("localhost").unwrap(), "localhost");
        assert_eq!(normalize_host("127.0.0.1").unwrap(), "127.0.0.1");
        assert_eq!(normalize_host("a-b.example.org").unwrap(), "a-b.example.org");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(normalize_host("").is_err());
        assert!(normalize_host("https://").is_err());
        assert!(normalize_host("-leading.example.com").is_err());
        assert!(normalize_host("trailing-.example.com").is_err());
        assert!(normalize_host("double..dot").is_err());
        assert!(normalize_host("exa mple.com").is_err());
        assert!(normalize_host(&format!("{}.com", "a".repeat(64))).is_err());
    }
}
