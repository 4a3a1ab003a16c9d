//! Console matching report.
//!
//! Printed after every run so whoever maintains the alias table can see at a
//! glance which rainfall names failed to match and which map districts are
//! blank.

use crate::reconcile::Reconciliation;
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Renders the matching report and category summary as plain text.
pub fn format_report(reconciliation: &Reconciliation) -> String {
    let d = &reconciliation.diagnostics;
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "📊 MATCHING REPORT ({})", reconciliation.month);
    let _ = writeln!(out, "{}", RULE);

    if d.unresolved.is_empty() {
        let _ = writeln!(out, "All rainfall records matched a boundary feature.");
    } else {
        let _ = writeln!(out, "Unresolved rainfall names ({}):", d.unresolved.len());
        for u in &d.unresolved {
            match &u.note {
                Some(note) => {
                    let _ = writeln!(out, "   - {} ({:.1} mm): {}", u.district_name, u.rainfall_mm, note);
                }
                None => {
                    let _ = writeln!(out, "   - {} ({:.1} mm)", u.district_name, u.rainfall_mm);
                }
            }
        }
    }

    if !d.ambiguous.is_empty() {
        let _ = writeln!(out, "Split districts, value withheld ({}):", d.ambiguous.len());
        for a in &d.ambiguous {
            let _ = writeln!(
                out,
                "   - {} ({:.1} mm) → {}",
                a.district_name,
                a.rainfall_mm,
                a.candidates.join(", ")
            );
        }
    }

    if !d.collisions.is_empty() {
        let _ = writeln!(out, "Collisions, value withheld ({}):", d.collisions.len());
        for c in &d.collisions {
            let sources: Vec<String> = c
                .contributors
                .iter()
                .map(|s| format!("{} = {:.1} mm", s.district_name, s.rainfall_mm))
                .collect();
            let _ = writeln!(out, "   - {}: {}", c.canonical_name, sources.join("; "));
        }
    }

    if !d.out_of_range.is_empty() {
        let _ = writeln!(out, "Dropped records ({}):", d.out_of_range.len());
        for o in &d.out_of_range {
            let _ = writeln!(out, "   - {}: {}", o.district_name, o.reason);
        }
    }

    if !d.no_data.is_empty() {
        let mut names: Vec<&str> = d.no_data.iter().map(|n| n.canonical_name.as_str()).collect();
        names.sort_unstable();
        let _ = writeln!(out, "Districts with no data ({}): {}", names.len(), names.join(", "));
    }

    if !d.stale_aliases.is_empty() {
        let _ = writeln!(out, "Aliases with targets missing from the boundaries ({}):", d.stale_aliases.len());
        for s in &d.stale_aliases {
            let _ = writeln!(out, "   - {} → {}", s.variant, s.missing_targets.join(", "));
        }
    }

    if d.is_clean() {
        let _ = writeln!(out, "✓ Clean run: every district has a value.");
    }

    let _ = writeln!(out, "{}", RULE);
    for (category, count) in reconciliation.category_counts() {
        let _ = writeln!(out, "{:<16} {:>4}", category.label(), count);
    }
    let _ = writeln!(out, "{}", RULE);

    out
}

pub fn print_report(reconciliation: &Reconciliation) {
    print!("\n{}", format_report(reconciliation));
}
