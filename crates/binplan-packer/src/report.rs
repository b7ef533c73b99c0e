//! Human-readable plan formatting.

use binplan_core::{ByteSize, ExcludedObject};

use crate::plan::BinPlan;

pub fn format_plan(plan: &BinPlan, excluded: &[ExcludedObject]) -> String {
    let summary = plan.summary();
    let mut out = String::new();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  binplan Bin Plan                        ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Bins:     {:<30}║\n", summary.total_bins));
    out.push_str(&format!("║  Objects:  {:<30}║\n", summary.total_items));
    out.push_str(&format!("║  Bytes:    {:<30}║\n", summary.total_bytes));
    out.push_str(&format!(
        "║  Capacity: {:<30}║\n",
        ByteSize(plan.desired_capacity()).to_string()
    ));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    for (i, bin) in plan.bins().iter().enumerate() {
        let marker = if bin.total() > plan.desired_capacity() {
            "  (over capacity)"
        } else {
            ""
        };
        out.push_str(&format!(
            "Bin {i}: {} objects, {} bytes{marker}\n",
            bin.len(),
            bin.total()
        ));
        for object in bin.objects() {
            out.push_str(&format!("  • {} ({} bytes)\n", object.id, object.size));
        }
    }

    if !excluded.is_empty() {
        out.push_str(&format!("\nEXCLUDED ({} objects):\n\n", excluded.len()));
        for e in excluded {
            out.push_str(&format!(
                "  • {} ({} bytes > {} byte ceiling)\n",
                e.id, e.size, e.threshold
            ));
        }
    }

    out
}
