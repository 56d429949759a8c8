use crate::model::{Config, OutputConfig, OutputFormat, ProbeConfig};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about = "TLS protocol capability checker", long_about = None)]
pub struct Cli {
    /// Domain to check; starts interactive mode when omitted
    #[arg(value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Port to probe
    #[arg(short = 'p', long = "port", default_value_t = 443)]
    pub port: u16,

    /// Per-version probe timeout in seconds (covers connect + handshake)
    #[arg(long = "timeout", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Output format
    #[arg(long = "output", default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<Config> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout must be greater than zero");
        }

        Ok(Config {
            domain: self.domain,
            probe: ProbeConfig {
                port: self.port,
                timeout: Duration::from_secs(self.timeout_secs),
            },
            output: OutputConfig {
                format: self.output,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_probe_contract() {
        let cli = Cli::parse_from(["tlscheck", "example.com"]);
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.domain.as_deref(), Some("example.com"));
        assert_eq!(cfg.probe.port, 443);
        assert_eq!(cfg.probe.timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cli = Cli::parse_from(["tlscheck", "--timeout", "0", "example.com"]);
        assert!(cli.into_config().is_err());
    }
}
