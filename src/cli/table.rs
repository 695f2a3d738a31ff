//! Plain-text table for terminal output

use crate::alert::CellClass;
use crate::market::Horizon;
use crate::screener::{RowView, ScreenerView};
use rust_decimal::Decimal;
use std::fmt::Write;

fn format_change(value: Option<Decimal>, class: CellClass) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    let sign = if value > Decimal::ZERO { "+" } else { "" };
    let marker = if class.is_flagged() { "!" } else { "" };
    format!("{sign}{value:.2}%{marker}")
}

fn format_compact(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    let units = [
        (Decimal::from(1_000_000_000_000u64), "T"),
        (Decimal::from(1_000_000_000u64), "B"),
        (Decimal::from(1_000_000u64), "M"),
    ];
    for (scale, suffix) in units {
        if value >= scale {
            return format!("{}{suffix}", (value / scale).round_dp(2));
        }
    }
    value.round_dp(0).to_string()
}

fn write_row(out: &mut String, row: &RowView) {
    let asset = &row.asset;
    let _ = write!(
        out,
        "{:>4}  {:<8} {:>14}",
        asset.rank,
        asset.symbol.to_uppercase(),
        asset.price.normalize().to_string()
    );
    for horizon in Horizon::ALL {
        let _ = write!(
            out,
            " {:>10}",
            format_change(asset.change.get(horizon), row.classes.get(horizon))
        );
    }
    let _ = writeln!(out, " {:>10}", format_compact(asset.market_cap));
}

/// Render the first `limit` rows of a view, with a status line
pub fn render_table(view: &ScreenerView, limit: usize, movers_only: bool) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:>4}  {:<8} {:>14}", "#", "SYMBOL", "PRICE");
    for horizon in Horizon::ALL {
        let _ = write!(out, " {:>10}", horizon.label());
    }
    let _ = writeln!(out, " {:>10}", "MCAP");

    let rows: Box<dyn Iterator<Item = &RowView>> = if movers_only {
        Box::new(view.flagged_rows())
    } else {
        Box::new(view.rows.iter())
    };
    for row in rows.take(limit) {
        write_row(&mut out, row);
    }

    let sort = view.settings.sort;
    let _ = write!(out, "sorted by {} {:?}", sort.key, sort.order);
    if let Some(at) = view.last_updated {
        let _ = write!(out, " | updated {}", at.format("%H:%M:%S UTC"));
    }
    if let Some(alert) = view.alert.filter(|a| a.triggered) {
        let _ = write!(out, " | {} movers", alert.flagged_assets);
        if view.settings.muted {
            out.push_str(" (muted)");
        }
    }
    if let Some(error) = &view.error {
        let _ = write!(out, " | {error}");
    }
    out
}
