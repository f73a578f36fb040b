//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View Model Computation**: `Dashboard` → `UIViewModel`
//! 2. **Layout**: header, search bar, table (or empty state), summary, footer
//!
//! Output is plain text so it can be printed to any terminal or captured in
//! tests. The caller decides where it goes.

use crate::app::Dashboard;
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel,
};
use std::fmt::{self, Write};

/// Narrowest layout the table columns fit in.
pub const MIN_COLS: usize = 80;

const NAME_WIDTH: usize = 18;

/// Renders the dashboard into a string sized for `cols` terminal columns.
///
/// # Example
///
/// ```rust
/// use cryptodash::app::Dashboard;
/// use cryptodash::ui::render;
///
/// let frame = render(&Dashboard::default(), 80);
/// assert!(frame.contains("Fortress Crypto (0)"));
/// ```
#[must_use]
pub fn render(state: &Dashboard, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel();
    let mut frame = String::new();
    if let Err(e) = render_viewmodel(&mut frame, &viewmodel, cols) {
        tracing::debug!(error = %e, "failed to render frame");
    }
    frame
}

/// Writes a view model as a full frame.
///
/// Empty state replaces the table; everything else is always shown.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn render_viewmodel(out: &mut impl Write, vm: &UIViewModel, cols: usize) -> fmt::Result {
    let cols = cols.max(MIN_COLS);

    render_header(out, &vm.header, cols)?;
    render_border(out, cols)?;
    render_search_bar(out, &vm.search_bar)?;
    if let Some(banner) = &vm.result_banner {
        writeln!(out, " {banner}")?;
    }
    writeln!(out)?;

    if let Some(empty) = &vm.empty_state {
        render_empty_state(out, empty)?;
    } else {
        render_table(out, &vm.rows)?;
    }

    render_border(out, cols)?;
    if let Some(summary) = &vm.summary {
        writeln!(
            out,
            " Market: {} assets, {} gaining, {} losing",
            summary.total, summary.gaining, summary.losing
        )?;
    }
    render_footer(out, &vm.footer)
}

fn render_header(out: &mut impl Write, header: &HeaderInfo, cols: usize) -> fmt::Result {
    let status = format!("[{}]", header.status);
    let gap = cols
        .saturating_sub(header.title.chars().count() + status.chars().count())
        .max(1);
    writeln!(out, "{}{}{}", header.title, " ".repeat(gap), status)
}

fn render_border(out: &mut impl Write, cols: usize) -> fmt::Result {
    writeln!(out, "{}", "─".repeat(cols))
}

fn render_search_bar(out: &mut impl Write, search: &SearchBarInfo) -> fmt::Result {
    writeln!(out, " Search: {}_", search.query)
}

fn render_empty_state(out: &mut impl Write, empty: &EmptyState) -> fmt::Result {
    writeln!(out, "   {}", empty.message)?;
    if !empty.subtitle.is_empty() {
        writeln!(out, "   {}", empty.subtitle)?;
    }
    Ok(())
}

fn render_table(out: &mut impl Write, rows: &[DisplayItem]) -> fmt::Result {
    writeln!(
        out,
        " {:<5} {:<NAME_WIDTH$} {:<7} {:>14} {:>9} {:>10} {:>10}",
        "RANK", "NAME", "SYMBOL", "PRICE", "24H", "MCAP", "VOL 24H"
    )?;
    for item in rows {
        let name: String = item.name.chars().take(NAME_WIDTH).collect();
        writeln!(
            out,
            " {:<5} {:<NAME_WIDTH$} {:<7} {:>14} {:>9} {:>10} {:>10}",
            item.rank,
            name,
            item.symbol,
            item.price,
            item.change_24h,
            item.market_cap,
            item.volume_24h
        )?;
    }
    Ok(())
}

fn render_footer(out: &mut impl Write, footer: &FooterInfo) -> fmt::Result {
    match &footer.last_updated {
        Some(at) => writeln!(out, " Last updated: {at} | {}", footer.keybindings),
        None => writeln!(out, " {}", footer.keybindings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetRecord;

    fn ready(assets: Vec<AssetRecord>) -> Dashboard {
        let mut dashboard = Dashboard::default();
        let generation = dashboard.controller.refetch();
        dashboard.controller.resolve(generation, Ok(assets));
        dashboard.filter.on_dataset_changed(dashboard.controller.dataset());
        dashboard
    }

    #[test]
    fn idle_frame_shows_loading_message() {
        let frame = render(&Dashboard::default(), 80);
        assert!(frame.contains("[idle]"));
        assert!(frame.contains("Loading market data..."));
        assert!(!frame.contains("RANK"));
    }

    #[test]
    fn ready_frame_lists_rows_and_summary() {
        let frame = render(
            &ready(vec![
                AssetRecord {
                    market_cap: Some(980_000_000_000.0),
                    total_volume: Some(25_000_000_000.0),
                    ..AssetRecord::new("Bitcoin", "btc")
                        .with_price(50_000.0)
                        .with_change_24h(2.0)
                },
                AssetRecord::new("Ethereum", "eth")
                    .with_price(3_000.0)
                    .with_change_24h(-1.0),
            ]),
            80,
        );
        assert!(frame.contains("Fortress Crypto (2)"));
        assert!(frame.contains("[live]"));
        assert!(frame.contains("$50,000.00"));
        assert!(frame.contains("-1.00%"));
        assert!(frame.contains("MCAP"));
        assert!(frame.contains("$980.00B"));
        assert!(frame.contains("$25.00B"));
        assert!(frame.contains("2 assets, 1 gaining, 1 losing"));
        assert!(frame.contains("Last updated:"));
    }

    #[test]
    fn narrow_terminal_is_widened_to_minimum() {
        let frame = render(&Dashboard::default(), 10);
        let border = frame.lines().nth(1).unwrap();
        assert_eq!(border.chars().count(), MIN_COLS);
    }

    #[test]
    fn table_rows_fit_the_minimum_width() {
        let frame = render(
            &ready(vec![AssetRecord {
                market_cap: Some(1_300_000_000_000.0),
                total_volume: Some(45_000_000_000.0),
                ..AssetRecord::new("Bitcoin", "btc")
                    .with_price(109_000.0)
                    .with_change_24h(-12.5)
            }]),
            MIN_COLS,
        );
        let row = frame.lines().find(|l| l.contains("Bitcoin")).unwrap();
        assert!(row.chars().count() <= MIN_COLS, "{row}");
    }
}
