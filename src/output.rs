use crate::model::{CertificateInfo, OutputConfig, OutputFormat, ProbeReport, ProbeResult};
use chrono::{DateTime, Utc};
use std::io::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const BRIGHT_GREEN: &str = "\x1b[92m";

const TABLE_WIDTH: usize = 80;
const VALUE_WIDTH: usize = 54;

pub fn write_report<W: Write>(
    cfg: &OutputConfig,
    writer: &mut W,
    report: &ProbeReport,
) -> anyhow::Result<()> {
    match cfg.format {
        OutputFormat::Jsonl => {
            let line = serde_json::to_string(report)?;
            writeln!(writer, "{line}")?;
        }
        OutputFormat::Pretty => write_pretty(writer, report)?,
    }
    Ok(())
}

pub fn print_usage() {
    println!("Checks which TLS protocol versions a host will negotiate on port 443.");
    println!("Enter a domain name (e.g. example.com).");
    println!("Commands: help, quit, exit");
}

fn write_pretty<W: Write>(w: &mut W, report: &ProbeReport) -> anyhow::Result<()> {
    writeln!(w)?;
    rule(w, '=')?;
    centered(w, &format!("TLS Support Status: {}", report.host))?;
    rule(w, '=')?;

    for result in &report.results {
        writeln!(w)?;
        write_version_section(w, result)?;
    }

    writeln!(w)?;
    write_summary(w, report)?;
    Ok(())
}

fn write_version_section<W: Write>(w: &mut W, result: &ProbeResult) -> anyhow::Result<()> {
    rule(w, '-')?;
    centered(w, &format!("TLS Version: {}", result.version))?;
    rule(w, '-')?;

    let status = if result.supported {
        format!("{BOLD}{BRIGHT_GREEN}SUPPORTED{RESET}")
    } else {
        format!("{BOLD}{RED}NOT SUPPORTED{RESET}")
    };
    row(w, "Status", &status)?;

    if let Some(reason) = &result.failure_reason {
        row(w, "Error", &format!("{YELLOW}{}{RESET}", truncate(reason)))?;
    }

    if !result.cipher_suites.is_empty() {
        row(
            w,
            "Cipher Suites",
            &format!("{BLUE}({} negotiated){RESET}", result.cipher_suites.len()),
        )?;
        for cipher in &result.cipher_suites {
            row(w, "", &format!("  - {}", truncate(cipher)))?;
        }
    }

    if !result.negotiated_protocols.is_empty() {
        row(w, "Protocols", &result.negotiated_protocols.join(", "))?;
    }

    match &result.certificate {
        Some(CertificateInfo::Details(details)) => {
            row(w, "Cert Subject", &truncate(&details.subject))?;
            row(w, "Cert Issuer", &truncate(&details.issuer))?;
            row(w, "Valid From", &format_timestamp(&details.valid_from))?;
            row(w, "Valid To", &format_timestamp(&details.valid_to))?;
            row(w, "Signature Alg", &truncate(&details.signature_algorithm))?;
        }
        Some(CertificateInfo::Unreadable { extraction_error }) => {
            row(
                w,
                "Cert Error",
                &format!("{RED}{}{RESET}", truncate(extraction_error)),
            )?;
        }
        None => {}
    }

    Ok(())
}

fn write_summary<W: Write>(w: &mut W, report: &ProbeReport) -> anyhow::Result<()> {
    rule(w, '-')?;
    centered(w, "Summary")?;
    rule(w, '-')?;
    for result in &report.results {
        let status = if result.supported {
            format!("{BRIGHT_GREEN}supported{RESET}")
        } else {
            format!("{RED}not supported{RESET}")
        };
        row(w, result.version.label(), &status)?;
    }
    if report.has_legacy_support() {
        writeln!(
            w,
            "{BOLD}{YELLOW}WARNING: legacy protocol versions (TLSv1/TLSv1.1) are enabled{RESET}"
        )?;
    }
    rule(w, '=')?;
    Ok(())
}

fn rule<W: Write>(w: &mut W, ch: char) -> std::io::Result<()> {
    writeln!(w, "{}", ch.to_string().repeat(TABLE_WIDTH))
}

fn centered<W: Write>(w: &mut W, text: &str) -> std::io::Result<()> {
    let pad = TABLE_WIDTH.saturating_sub(text.len()) / 2;
    writeln!(w, "{}{}", " ".repeat(pad), text)
}

fn row<W: Write>(w: &mut W, key: &str, value: &str) -> std::io::Result<()> {
    writeln!(w, "| {key:<18} | {value}")
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= VALUE_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(VALUE_WIDTH).collect();
    format!("{cut}...")
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
