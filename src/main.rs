use clap::Parser;
use std::io::Write;
use tlscheck::checker::TlsChecker;
use tlscheck::cli::Cli;
use tlscheck::model::OutputConfig;
use tlscheck::{input, output};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = cli.into_config()?;
    let checker = TlsChecker::new(cfg.probe.clone());

    match cfg.domain.clone() {
        Some(domain) => check_domain(&checker, &domain, &cfg.output).await,
        None => run_interactive(&checker, &cfg.output).await,
    }
}

async fn check_domain(checker: &TlsChecker, raw: &str, out: &OutputConfig) -> anyhow::Result<()> {
    let host = input::normalize_host(raw)?;
    info!(%host, "checking TLS support");
    let report = checker.check_host(&host).await;
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    output::write_report(out, &mut writer, &report)
}

async fn run_interactive(checker: &TlsChecker, out: &OutputConfig) -> anyhow::Result<()> {
    output::print_usage();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Enter domain (quit/exit to end): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match line.to_ascii_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => {
                output::print_usage();
                continue;
            }
            _ => {}
        }

        // A bad domain only ends the current prompt, not the session.
        if let Err(err) = check_domain(checker, &line, out).await {
            eprintln!("{err:#}");
        }
        println!();
    }

    Ok(())
}
