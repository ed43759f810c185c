//! Write pipeline summaries as JSON reports.

use crate::core::error::ColguardResult;
use crate::core::report::PipelineSummary;
use indexmap::IndexMap;
use log::info;
use std::path::Path;

/// Render one summary as pretty JSON.
pub fn report_to_string(summary: &PipelineSummary) -> ColguardResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Write one summary to `path`.
pub fn write_report(path: impl AsRef<Path>, summary: &PipelineSummary) -> ColguardResult<()> {
    let path = path.as_ref();
    std::fs::write(path, report_to_string(summary)?)?;
    info!("Report written to {}", path.display());
    Ok(())
}

/// Write several summaries as one object keyed by input name, in order.
pub fn write_reports<'a, I>(path: impl AsRef<Path>, summaries: I) -> ColguardResult<()>
where
    I: IntoIterator<Item = (&'a str, &'a PipelineSummary)>,
{
    let path = path.as_ref();
    let keyed: IndexMap<&str, &PipelineSummary> = summaries.into_iter().collect();
    std::fs::write(path, serde_json::to_string_pretty(&keyed)?)?;
    info!("Report for {} inputs written to {}", keyed.len(), path.display());
    Ok(())
}
