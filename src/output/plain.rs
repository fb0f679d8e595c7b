//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::RenderedReport;
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print the run header before probing begins.
pub fn print_sweep_header(local_address: Option<&str>, network: &str, targets: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("lansweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    if let Some(local) = local_address {
        println!("{} Local address: {}", style("•").dim(), style(local).white().bold());
    }
    println!("{} Network: {}", style("•").dim(), style(network).yellow());
    println!(
        "{} Probing {} addresses...",
        style("•").dim(),
        style(targets).white().bold()
    );
    println!();
}

/// Print one host as soon as it answers.
pub fn print_host_found(address: &str) {
    println!("  {} {}", style("+").green().bold(), address);
}

/// Write the end-of-run summary.
pub fn write_plain<W: Write>(out: &mut W, report: &RenderedReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                  {} Sweep Summary",
        style("lansweep").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Network:").bold(), report.network)?;
    if let Some(local) = &report.local_address {
        writeln!(out, "  {} {}", style("Local address:").bold(), local)?;
    }
    if report.completed < report.targets {
        writeln!(
            out,
            "  {} {} of {} addresses probed in {:.2}s",
            style("Statistics:").bold(),
            report.completed,
            report.targets,
            report.duration_secs()
        )?;
    } else {
        writeln!(
            out,
            "  {} {} addresses probed in {:.2}s",
            style("Statistics:").bold(),
            report.targets,
            report.duration_secs()
        )?;
    }
    if report.interrupted {
        writeln!(
            out,
            "  {} sweep interrupted, results are partial",
            style("Note:").yellow().bold()
        )?;
    }
    writeln!(out)?;

    if report.hosts.is_empty() {
        writeln!(out, "  {}", style("No active hosts found.").dim())?;
    } else if report.privacy.is_reveal() {
        writeln!(
            out,
            "  {} active hosts:",
            style(report.active_count).green().bold()
        )?;
        for host in &report.hosts {
            writeln!(out, "    {}", host.address)?;
        }
    } else {
        let masked: Vec<&str> = report.hosts.iter().map(|h| h.address.as_str()).collect();
        writeln!(
            out,
            "  {} active hosts: {}",
            style(report.active_count).green().bold(),
            masked.join(", ")
        )?;
        writeln!(
            out,
            "  {}",
            style("Host identifiers are masked; pass --reveal to show them.").dim()
        )?;
    }

    if report.neighbors_resolved && !report.hosts.is_empty() {
        writeln!(out)?;
        write_neighbors(out, report.resolved_hosts())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Write an address → link-address table.
pub fn write_neighbors<'a, W, I>(out: &mut W, rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(
        out,
        "  {:<18}  {}",
        style("ADDRESS").bold(),
        style("LINK ADDRESS").bold()
    )?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    let mut any = false;
    for (address, mac) in rows {
        any = true;
        writeln!(out, "  {:<18}  {}", address, mac)?;
    }
    if !any {
        writeln!(out, "  {}", style("No neighbor entries for the active hosts.").dim())?;
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Privacy;
    use crate::output::tests::sample_report;

    fn render(privacy: Privacy) -> String {
        console::set_colors_enabled(false);
        let report = RenderedReport::from_report(&sample_report(privacy));
        let mut buf = Vec::new();
        write_plain(&mut buf, &report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_masked_summary() {
        let text = render(Privacy::Masked);
        assert!(text.contains("2 active hosts: 192.168.1.x, 192.168.1.x"));
        assert!(text.contains("aa:bb:cc:xx:xx:xx"));
        assert!(!text.contains("192.168.1.55"));
        assert!(!text.contains("192.168.1.10"));
    }

    #[test]
    fn test_revealed_summary() {
        let text = render(Privacy::Reveal);
        assert!(text.contains("    192.168.1.55"));
        assert!(text.contains("aa:bb:cc:dd:ee:ff"));
        assert!(text.contains("Local address: 192.168.1.10"));
    }

    #[test]
    fn test_interrupted_summary_counts_completed_probes() {
        console::set_colors_enabled(false);
        let mut partial = sample_report(Privacy::Masked);
        partial.completed = 2;
        partial.interrupted = true;
        partial.neighbors = None;

        let mut buf = Vec::new();
        write_plain(&mut buf, &RenderedReport::from_report(&partial)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("2 of 254 addresses probed"));
        assert!(text.contains("results are partial"));

        assert!(render(Privacy::Masked).contains("254 addresses probed"));
        assert!(!render(Privacy::Masked).contains(" of 254"));
    }

    #[test]
    fn test_neighbor_table_omits_unresolved_hosts() {
        let text = render(Privacy::Reveal);
        let table_start = text.find("LINK ADDRESS").unwrap();
        assert!(!text[table_start..].contains("192.168.1.55"));
    }
}
