//! Human-readable advisory report
//!
//! Mirrors what the desk actually reads: headline portfolio metrics, the
//! optimization verdict with both sensitivity scores, the recommended trade
//! in natural language, and a per-position Pareto summary sorted by the
//! returns gradient.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::optimizer::Optimizer;

/// Render the full multi-line report for one engine instance.
pub fn render(optimizer: &Optimizer) -> String {
    let mut output = String::new();

    output.push_str(&headline(optimizer));
    output.push('\n');
    output.push_str(&verdict(optimizer));
    output.push('\n');
    output.push_str(&recommendation(optimizer));
    output.push('\n');
    output.push_str("PARETO OPTIMALITY KEY METRICS\n");
    output.push_str(&pareto_table(optimizer));

    output
}

fn headline(optimizer: &Optimizer) -> String {
    let mut section = String::from("PORTFOLIO KEY METRICS\n");
    if let Some(date) = optimizer.book().date() {
        section.push_str(&format!("Snapshot date - {date}\n"));
    }
    section.push_str(&format!(
        "Expected max drawdown - {:.4}\n",
        optimizer.returns_metrics().draw_down
    ));
    section.push_str(&format!(
        "Expected dividends - {:.0}\n",
        optimizer.dividends_metrics().expected_dividends
    ));
    section.push_str(&format!(
        "Minimal dividends - {:.0}\n",
        optimizer.dividends_metrics().minimal_dividends
    ));
    section
}

fn verdict(optimizer: &Optimizer) -> String {
    let heading = if optimizer.needs_optimization() {
        "OPTIMIZATION REQUIRED"
    } else {
        "OPTIMIZATION NOT REQUIRED"
    };
    format!(
        "{heading}\nDividends growth - {:.2} SD\nDrawdown growth - {:.2} SD\n",
        optimizer.t_dividends_growth(),
        optimizer.t_drawdown_growth()
    )
}

fn recommendation(optimizer: &Optimizer) -> String {
    format!(
        "RECOMMENDED\n{}\n\nCash withdrawal: {}\n",
        optimizer.recommend_trade(),
        optimizer.cash_out()
    )
}

/// Render just the per-position Pareto summary table.
pub fn pareto_table(optimizer: &Optimizer) -> String {
    let book = optimizer.book();
    let dividends_growth = optimizer.dividends_gradient_growth();
    let drawdown_growth = optimizer.drawdown_gradient_growth();
    let dominated = optimizer.dominated_tickers();

    // All rows, sentinels included, sorted by returns gradient descending.
    let mut order: Vec<usize> = (0..book.len()).collect();
    order.sort_by(|&a, &b| {
        optimizer.returns_metrics().gradient[b].total_cmp(&optimizer.returns_metrics().gradient[a])
    });

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "TICKER",
            "D_GRADIENT",
            "R_GRADIENT",
            "DOMINATED",
            "VOLUME_FACTOR",
            "DIVIDENDS_GROWTH",
            "DRAWDOWN_GROWTH",
        ]);

    for index in order {
        table.add_row(vec![
            book.ticker(index).to_string(),
            format!("{:.4}", optimizer.dividends_metrics().gradient[index]),
            format!("{:.4}", optimizer.returns_metrics().gradient[index]),
            dominated[index].clone().unwrap_or_default(),
            format!("{:.2}", book.volume_factors()[index]),
            format!("{:.4}", dividends_growth[index]),
            format!("{:.4}", drawdown_growth[index]),
        ]);
    }

    format!("{table}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::metrics::{DividendsInput, ReturnsInput};
    use crate::portfolio::{PositionBook, PositionRecord};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn engine() -> Optimizer {
        let positions = vec![
            PositionRecord {
                ticker: "A".to_string(),
                shares: 1000,
                price: dec!(100),
                lot_size: 10,
                volume_factor: 1.0,
            },
            PositionRecord {
                ticker: "B".to_string(),
                shares: 2000,
                price: dec!(100),
                lot_size: 10,
                volume_factor: 1.0,
            },
        ];
        let book = PositionBook::new(None, &positions, dec!(100000)).unwrap();
        let dividends = DividendsInput {
            gradient: HashMap::from([("A".to_string(), 1.0), ("B".to_string(), 2.0)]),
            std: 0.5,
            expected_dividends: 12345.0,
            minimal_dividends: 10000.0,
        };
        let returns = ReturnsInput {
            gradient: HashMap::from([("A".to_string(), 1.0), ("B".to_string(), 2.0)]),
            draw_down: -0.25,
            std_at_draw_down: 0.1,
        };
        Optimizer::new(book, &dividends, &returns, Settings::default()).unwrap()
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = engine().report();
        assert!(report.contains("PORTFOLIO KEY METRICS"));
        assert!(report.contains("Expected max drawdown - -0.2500"));
        assert!(report.contains("Expected dividends - 12345"));
        assert!(report.contains("OPTIMIZATION"));
        assert!(report.contains("RECOMMENDED"));
        assert!(report.contains("PARETO OPTIMALITY KEY METRICS"));
        assert!(report.contains("R_GRADIENT"));
    }

    #[test]
    fn test_table_sorted_by_returns_gradient() {
        let report = engine().report();
        // B's returns gradient (2) beats A's (1); B must appear first in
        // the table section.
        let table_start = report.find("PARETO").unwrap();
        let table = &report[table_start..];
        let pos_a = table.find("\u{2502} A").unwrap_or(usize::MAX);
        let pos_b = table.find("\u{2502} B").unwrap_or(usize::MAX);
        assert!(pos_b < pos_a, "B must be listed before A");
    }

    #[test]
    fn test_verdict_wording() {
        let engine = engine();
        let report = engine.report();
        if engine.needs_optimization() {
            assert!(report.contains("OPTIMIZATION REQUIRED"));
        } else {
            assert!(report.contains("OPTIMIZATION NOT REQUIRED"));
        }
    }
}
