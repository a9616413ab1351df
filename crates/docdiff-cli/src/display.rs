//! Terminal rendering for outlines, provision comparisons, and climate columns.

use docdiff_core::compare::NO_TEXT;
use docdiff_core::config::ClimateConfig;
use docdiff_core::{Category, Explorer, Row, RowKind, Side, Tier};
use docdiff_sync::{MinimapMark, PairDetail, PairResolver, Shade};

const MAX_LINE: usize = 100;
const MINIMAP_WIDTH: usize = 60;

// ── Outline ──

/// Print the visible rows of an outline tree.
pub fn print_outline(label: &str, rows: &[Row<'_>]) {
    println!("=== {label} ===");
    if rows.is_empty() {
        println!("  (no matches)");
    }
    for row in rows {
        let indent = "  ".repeat(row.depth);
        match row.kind {
            RowKind::Node => {
                let marker = match (row.has_children, row.expanded) {
                    (false, _) => ' ',
                    (true, true) => '▾',
                    (true, false) => '▸',
                };
                println!("{indent}{marker} {} {}", row.id, row.title);
            }
            RowKind::Provision => {
                let badge = row.counts.map(count_badge).unwrap_or_default();
                println!("{indent}  {:<16} {:<60} {badge}", row.id, truncate(row.title, 60));
            }
        }
    }
    println!();
}

/// `L:n M:n H:n`, omitting empty tiers.
pub fn count_badge(counts: [usize; 3]) -> String {
    Tier::ALL
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(tier, n)| format!("{}:{n}", tier_letter(*tier)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn tier_letter(tier: Tier) -> char {
    match tier {
        Tier::Low => 'L',
        Tier::Medium => 'M',
        Tier::High => 'H',
    }
}

// ── Provision comparison ──

pub fn print_provision(
    explorer: &Explorer,
    side: Side,
    id: &str,
    tier: Tier,
    tab: Option<Category>,
    html: bool,
) {
    let spec = explorer.sides().spec(side);
    let title = explorer.provision(side, id).map_or("", |p| p.title.as_str());
    println!("=== {id} ({}) ===", spec.label);
    if !title.is_empty() {
        println!("{title}");
    }
    println!();

    let text = explorer.provision_text(id, tab);
    let tab_name = tab.map_or("default", Category::as_str);
    println!("Text [{tab_name}]");
    if text.is_empty() {
        println!("  {NO_TEXT}");
    } else if html {
        println!("{}", text.to_html());
    } else {
        for line in text.to_terminal(tab).lines() {
            println!("  {line}");
        }
    }
    println!();

    let other = explorer.sides().spec(side.opposite());
    let counts = explorer.index().counts(side, id);
    println!("{} counterparts [{}]  ({})", other.label, tier, count_badge(counts));
    let counterparts = explorer.counterparts(side, id, tier);
    if counterparts.is_empty() {
        println!("  (none at this tier)");
    }
    for cp in counterparts {
        match cp.provision {
            Some(p) => println!("  {:<16} {}", cp.id, truncate(&p.title, 70)),
            None => println!("  {}", cp.id),
        }
    }
    println!();
}

/// Print comparison notes for one tab, or every tab with text.
pub fn print_comparison(explorer: &Explorer, left: &str, right: &str, tab: Option<Category>) {
    println!("Comparison {left} ↔ {right}");
    let tabs = match tab {
        Some(t) => vec![t],
        None => Category::ALL.to_vec(),
    };
    for t in tabs {
        let md = explorer.comparison_text(left, right, t);
        let text = docdiff_core::annotate::markdown_to_text(&md);
        println!("  {t}:");
        for line in text.lines() {
            println!("    {}", truncate(line, MAX_LINE));
        }
    }
    println!();
}

// ── Climate ──

pub fn print_column(resolver: &PairResolver, label: &str, side: Side, filter: &str) {
    let column = resolver.column(side);
    let visible = column.filter(filter);
    println!(
        "=== {label} ({}; {} of {} paragraphs) ===",
        column.document(),
        visible.len(),
        column.len()
    );
    for i in visible {
        let para = &column.paragraphs()[i];
        let mark = match resolver.shade(side, &para.para_id) {
            Some(Shade::Anchor) => '●',
            Some(_) => '*',
            None => ' ',
        };
        println!(
            "{mark} {:>6} [{:>3}] {}",
            para.para_id,
            column.count_at(i),
            truncate(&para.text, MAX_LINE)
        );
    }
    println!();
}

/// The minimap maps whole-document positions, so it is hidden while a filter
/// narrows the column.
pub fn minimap_visible(requested: bool, filter: &str) -> bool {
    requested && filter.trim().is_empty()
}

pub fn print_minimap(marks: &[MinimapMark]) {
    println!("[{}]", minimap_strip(marks, MINIMAP_WIDTH));
    println!();
}

/// Squash minimap marks into `width` cells; the strongest shade in a cell wins.
pub fn minimap_strip(marks: &[MinimapMark], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut cells: Vec<Option<Shade>> = vec![None; width];
    for mark in marks {
        let cell = ((mark.position / 100.0) * (width - 1) as f64).round() as usize;
        let slot = &mut cells[cell.min(width - 1)];
        if slot.is_none_or(|s| rank(mark.shade) > rank(s)) {
            *slot = Some(mark.shade);
        }
    }
    cells
        .into_iter()
        .map(|c| match c {
            Some(Shade::Anchor) => '●',
            Some(Shade::Matched) => '*',
            Some(Shade::Paired) => '|',
            Some(Shade::Unpaired) => '.',
            None => ' ',
        })
        .collect()
}

fn rank(shade: Shade) -> u8 {
    match shade {
        Shade::Unpaired => 0,
        Shade::Paired => 1,
        Shade::Matched => 2,
        Shade::Anchor => 3,
    }
}

pub fn print_matches(resolver: &PairResolver, climate: &ClimateConfig) {
    let Some(anchor) = resolver.anchor() else {
        return;
    };
    let other = climate.label(anchor.side.opposite());
    println!(
        "=== Matches for {} #{} in {other} ===",
        climate.label(anchor.side),
        anchor.para_id
    );
    if let Some(err) = resolver.last_error() {
        println!("  lookup failed: {err}");
        println!();
        return;
    }
    let matched = resolver.matched();
    if matched.is_empty() {
        println!("  (no matches)");
    }
    for (i, m) in matched.iter().enumerate() {
        println!("  {i:>3}. {:>6}  {}", m.para_id, truncate(&m.text, MAX_LINE));
    }
    println!();
}

pub fn print_detail(detail: &PairDetail, climate: &ClimateConfig) {
    println!("=== Pair detail ===");
    for (side, text) in [(Side::A, &detail.side_a), (Side::B, &detail.side_b)] {
        println!("{}:", climate.label(side));
        println!("  {}", text.as_deref().unwrap_or("(missing)"));
    }
    println!("Similarity: {}", detail.similarity_label());
    if !detail.d_4.is_null() {
        println!("Detail: {}", detail.d_4);
    }
    println!();
}

// ── Helpers ──

/// Cut `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_skips_empty_tiers() {
        assert_eq!(count_badge([1, 0, 2]), "L:1 H:2");
        assert_eq!(count_badge([0, 0, 0]), "");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn minimap_hidden_while_filtering() {
        assert!(minimap_visible(true, ""));
        assert!(minimap_visible(true, "  "));
        assert!(!minimap_visible(true, "carbon"));
        assert!(!minimap_visible(false, ""));
    }

    #[test]
    fn strip_keeps_strongest_shade() {
        let marks = vec![
            MinimapMark { index: 0, position: 0.0, shade: Shade::Unpaired },
            MinimapMark { index: 1, position: 1.0, shade: Shade::Anchor },
            MinimapMark { index: 2, position: 100.0, shade: Shade::Paired },
        ];
        assert_eq!(minimap_strip(&marks, 3), "● |");
    }
}
