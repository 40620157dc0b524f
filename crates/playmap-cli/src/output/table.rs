use playmap_core::facets::FacetIndex;
use playmap_core::filter::{Clause, FilterState, RenderView};
use playmap_core::model::Facet;
use playmap_core::moderation::{ModerationEntry, ProposalTarget};
use playmap_core::Collection;
use std::collections::BTreeMap;

pub fn print_normalized(collection: &Collection) {
    let report = &collection.report;
    println!("=== Records ===\n");
    println!(
        "  Loaded {} of {} record(s)\n",
        report.loaded, report.total
    );

    if !collection.records.is_empty() {
        let max_name = collection
            .records
            .iter()
            .map(|r| r.display_name().len())
            .max()
            .unwrap_or(10);

        for r in &collection.records {
            println!(
                "  {:<8} {:<width$}  {:>10.5} {:>10.5}  {}",
                r.id.to_string(),
                r.display_name(),
                r.lat,
                r.lng,
                r.classification,
                width = max_name
            );
        }
        println!();
    }

    if !report.dropped.is_empty() {
        println!("  Dropped:");
        for d in &report.dropped {
            println!("    #{:<4} {:<10} {}", d.index, d.record, d.reason);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        let counts: Vec<String> = report
            .warning_counts()
            .into_iter()
            .map(|(kind, count)| format!("{count} {}", kind.label()))
            .collect();
        println!("  Warnings ({}):", counts.join(", "));
        for w in &report.warnings {
            println!("    {:<10} {}", w.record, w.message);
        }
        println!();
    }
}

pub fn print_facets(index: &FacetIndex) {
    for facet in Facet::ALL {
        let values = index.values(facet);
        println!("{} ({})", facet.label(), values.len());
        for v in values {
            println!("  {v}");
        }
        println!();
    }

    let keywords = index.keywords();
    println!("Keywords ({})", keywords.len());
    if !keywords.is_empty() {
        println!("  {}", keywords.join(", "));
    }
}

fn filter_summary(filter: &FilterState) -> String {
    let mut parts = vec![format!("size {}", filter.size_range)];
    for f in &filter.facilities {
        parts.push(f.label().to_string());
    }
    for (facet, selected) in &filter.facets {
        parts.push(format!("{} in [{}]", facet.key(), selected.join(", ")));
    }
    if !filter.keywords.is_empty() {
        parts.push(format!("tagged any of [{}]", filter.keywords.join(", ")));
    }
    parts.join("; ")
}

pub fn print_view(
    collection: &Collection,
    filter: &FilterState,
    view: &RenderView,
    rejected: &BTreeMap<Clause, usize>,
    verbose: bool,
) {
    println!("=== View ===\n");
    println!("  Filter:   {}", filter_summary(filter));
    println!(
        "  Visible:  {} of {} record(s)",
        view.visible_total,
        collection.len()
    );
    match view.viewport {
        Some(ref b) => println!("  In view:  {} (bounds {})", view.in_viewport, b),
        None => println!("  In view:  {} (no viewport)", view.in_viewport),
    }
    println!();

    if !view.stale_selections.is_empty() {
        println!("  Selections matching no record:");
        for s in &view.stale_selections {
            println!("    {}", s.value);
        }
        println!();
    }

    if !view.clusters.is_empty() {
        println!("  Clusters:");
        for c in &view.clusters {
            println!(
                "    {:<12} {:>5}  {:<34} {}px / {}pt",
                c.cell,
                c.count,
                c.dominant.label(),
                c.tier.diameter_px(),
                c.tier.font_size_px()
            );
        }
        println!();
    }

    if verbose {
        if !view.visible.is_empty() {
            let max_name = view.visible.iter().map(|v| v.name.len()).max().unwrap_or(10);
            println!("  Visible records:");
            for v in &view.visible {
                let marker = if v.in_viewport { "" } else { "  (outside viewport)" };
                println!(
                    "    {:<8} {:<width$}  {}{}",
                    v.id.to_string(),
                    v.name,
                    v.classification,
                    marker,
                    width = max_name
                );
            }
            println!();
        }

        if !rejected.is_empty() {
            println!("  Hidden by:");
            for (clause, count) in rejected {
                println!("    {:<28} {}", clause.to_string(), count);
            }
            println!();
        }
    }
}

pub fn print_review(entry: &ModerationEntry) {
    let heading = match entry.target {
        ProposalTarget::Existing(ref id) => format!("Edit to '{}' (id {})", entry.record_name, id),
        ProposalTarget::New { lat, lng } => {
            format!("New playground '{}' at {:.5}, {:.5}", entry.record_name, lat, lng)
        }
    };
    println!("=== {} ===\n", heading);

    if let Some(ref who) = entry.submitted_by {
        println!("  Submitted by: {who}\n");
    }

    if !entry.has_changes() {
        println!("  No changes.");
        return;
    }

    let max_field = entry
        .changes
        .iter()
        .map(|c| c.field.len())
        .max()
        .unwrap_or(10);
    for c in &entry.changes {
        println!(
            "  {:<width$}  {} -> {}",
            c.field,
            c.old_value,
            c.new_value,
            width = max_field
        );
    }
    println!();
}
