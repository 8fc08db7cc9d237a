//! Human-readable summary renderer for diff records.

use crate::diff::model::DiffRecord;
use crate::model::VrpRecord;

/// Maximum records listed per section before the list is truncated.
const MAX_LISTED: usize = 50;

/// Render a human-readable Markdown/text summary of a [`DiffRecord`].
///
/// Informational only; the structured record is the source of truth.
pub fn render_human_summary(diff: &DiffRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## VRP Diff {} → {}\n\n",
        diff.serial.saturating_sub(1),
        diff.serial
    ));
    out.push_str(&format!(
        "**Accepted**: {}  \n**Upstream generated**: {}  \n**Fetched**: {}\n\n",
        diff.timestamp.to_rfc3339(),
        diff.metadata.generated,
        diff.metadata.fetched_at.to_rfc3339(),
    ));
    out.push_str(&format!(
        "**Added**: {}  \n**Removed**: {}\n\n",
        diff.added_count, diff.removed_count
    ));

    if diff.added.is_empty() && diff.removed.is_empty() {
        out.push_str("_No record-level changes._\n");
        return out;
    }

    render_section(&mut out, "Added", '+', &diff.added);
    render_section(&mut out, "Removed", '-', &diff.removed);
    out
}

fn render_section(out: &mut String, title: &str, marker: char, records: &[VrpRecord]) {
    if records.is_empty() {
        return;
    }
    out.push_str(&format!("### {}\n\n", title));
    for record in records.iter().take(MAX_LISTED) {
        out.push_str(&format!(
            "{} {} {} max {} ({})\n",
            marker,
            record.prefix(),
            record.asn(),
            record.max_length().value(),
            record.trust_anchor()
        ));
    }
    if records.len() > MAX_LISTED {
        out.push_str(&format!("… and {} more\n", records.len() - MAX_LISTED));
    }
    out.push('\n');
}
