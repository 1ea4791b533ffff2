use crate::error::Result;
use crate::export::Table;
use crate::reconcile::Reconciled;
use crate::utils::MetadataReader;
use std::path::Path;

/// Turn a QC reason code into a sentence. Unknown codes pass through.
pub fn describe_qc_failure(reason: &str) -> String {
    let reason = reason.trim();
    match reason.split_once(':') {
        Some((code, value)) if code.contains("seq_len") => {
            format!("Sequence too short: only {} bases.", value.trim())
        }
        Some((code, value)) if code.contains("N_content") => match value.trim().parse::<f64>() {
            Ok(fraction) => format!(
                "Sequence has too many Ns: {:.1}% of bases",
                (fraction * 100.0).round()
            ),
            Err(_) => reason.to_string(),
        },
        _ => reason.to_string(),
    }
}

/// Read a `name,reason_for_failure` file into a table keyed by display name.
pub fn qc_fail_table(path: &Path, reconciled: &Reconciled) -> Result<Table> {
    let mut reader = MetadataReader::open(path)?;
    reader.require(&["name", "reason_for_failure"])?;
    let mut table = Table::new("Name", ["Reason for failure"]);
    reader.for_each_row(|row| {
        let name = row.value("name");
        let display = reconciled
            .resolve_query(name)
            .and_then(|n| reconciled.get(n))
            .map(|t| t.display_name.as_str())
            .unwrap_or(name);
        table.push_row(display, vec![describe_qc_failure(row.value("reason_for_failure"))]);
        Ok(())
    })?;
    Ok(table)
}
