//! CSV output formatting.

use super::RenderedReport;
use std::io::Write;

/// Write one `address,link_address` row per active host.
pub fn write_csv<W: Write>(out: &mut W, report: &RenderedReport) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["address", "link_address"])?;
    for host in &report.hosts {
        wtr.write_record([host.address.as_str(), host.link_address.as_deref().unwrap_or("")])?;
    }

    wtr.flush()?;
    Ok(())
}
