//! Pareto rebalancing engine
//!
//! One `Optimizer` instance is a read-only view over one snapshot: the
//! validated position book plus both aligned metric sets. The two growth
//! matrices are built lazily on first access and memoized for the lifetime
//! of the instance; constructing a new engine against fresh inputs is the
//! only invalidation path.

use std::sync::OnceLock;

use crate::config::Settings;
use crate::metrics::{DividendsInput, DividendsMetrics, ReturnsInput, ReturnsMetrics};
use crate::portfolio::{InvalidPortfolioState, PositionBook, Snapshot};

pub mod aggregate;
pub mod dominance;
pub mod matrix;
pub mod policy;
pub mod report;
pub mod trade;

pub use matrix::GrowthMatrix;
pub use policy::{Metric, MetricSelection};
pub use trade::{CashOutAdvice, TradeLeg, TradeRecommendation};

pub struct Optimizer {
    book: PositionBook,
    dividends: DividendsMetrics,
    returns: ReturnsMetrics,
    settings: Settings,
    dividends_matrix: OnceLock<GrowthMatrix>,
    drawdown_matrix: OnceLock<GrowthMatrix>,
}

impl Optimizer {
    /// Build an engine over a validated book and raw provider inputs.
    ///
    /// Metric maps are aligned to the book here; missing or non-finite
    /// entries fail fast before any matrix is built.
    pub fn new(
        book: PositionBook,
        dividends: &DividendsInput,
        returns: &ReturnsInput,
        settings: Settings,
    ) -> Result<Self, InvalidPortfolioState> {
        let dividends = DividendsMetrics::align(&book, dividends)?;
        let returns = ReturnsMetrics::align(&book, returns)?;
        Ok(Self {
            book,
            dividends,
            returns,
            settings,
            dividends_matrix: OnceLock::new(),
            drawdown_matrix: OnceLock::new(),
        })
    }

    /// Convenience constructor from a loaded snapshot document.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        settings: Settings,
    ) -> Result<Self, InvalidPortfolioState> {
        let book = snapshot.build_book()?;
        Self::new(book, &snapshot.dividends, &snapshot.returns, settings)
    }

    pub fn book(&self) -> &PositionBook {
        &self.book
    }

    pub fn dividends_metrics(&self) -> &DividendsMetrics {
        &self.dividends
    }

    pub fn returns_metrics(&self) -> &ReturnsMetrics {
        &self.returns
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Growth of the dividend gradient when the row position is replaced by
    /// the column position, vetoed by the returns gradient.
    pub fn dividends_growth_matrix(&self) -> &GrowthMatrix {
        self.dividends_matrix.get_or_init(|| {
            matrix::build_growth_matrix(
                &self.dividends.gradient,
                &self.returns.gradient,
                self.book.weights(),
                self.book.volume_factors(),
            )
        })
    }

    /// Growth of the drawdown gradient, vetoed by the dividend gradient.
    pub fn drawdown_growth_matrix(&self) -> &GrowthMatrix {
        self.drawdown_matrix.get_or_init(|| {
            matrix::build_growth_matrix(
                &self.returns.gradient,
                &self.dividends.gradient,
                self.book.weights(),
                self.book.volume_factors(),
            )
        })
    }

    pub fn matrix_for(&self, metric: Metric) -> &GrowthMatrix {
        match metric {
            Metric::Dividends => self.dividends_growth_matrix(),
            Metric::Drawdown => self.drawdown_growth_matrix(),
        }
    }

    /// Best dividend-gradient growth per position (sentinel rows included,
    /// sentinel columns excluded).
    pub fn dividends_gradient_growth(&self) -> Vec<f64> {
        aggregate::growth_vector(self.dividends_growth_matrix(), self.book.tradable())
    }

    /// Best drawdown-gradient growth per position.
    pub fn drawdown_gradient_growth(&self) -> Vec<f64> {
        aggregate::growth_vector(self.drawdown_growth_matrix(), self.book.tradable())
    }

    fn growth_for(&self, metric: Metric) -> Vec<f64> {
        match metric {
            Metric::Dividends => self.dividends_gradient_growth(),
            Metric::Drawdown => self.drawdown_gradient_growth(),
        }
    }

    /// Potential dividend improvement in standard-deviation units.
    pub fn t_dividends_growth(&self) -> f64 {
        aggregate::t_statistic(
            self.book.weights(),
            &self.dividends_gradient_growth(),
            self.book.tradable(),
            self.dividends.std,
        )
    }

    /// Potential drawdown improvement in standard-deviation units.
    pub fn t_drawdown_growth(&self) -> f64 {
        aggregate::t_statistic(
            self.book.weights(),
            &self.drawdown_gradient_growth(),
            self.book.tradable(),
            self.returns.std_at_draw_down,
        )
    }

    pub fn needs_optimization(&self) -> bool {
        self.t_dividends_growth().max(self.t_drawdown_growth()) > self.settings.t_score
    }

    /// Metric chosen by the configured selection policy.
    pub fn selected_metric(&self) -> Metric {
        self.settings
            .selection
            .select(self.t_dividends_growth(), self.t_drawdown_growth())
    }

    /// Dominator index per position under the given matrix.
    pub fn dominated_under(&self, metric: Metric) -> Vec<Option<usize>> {
        dominance::dominated(self.matrix_for(metric), self.book.tradable())
    }

    /// Dominator index per position under the policy-selected matrix.
    pub fn dominated(&self) -> Vec<Option<usize>> {
        self.dominated_under(self.selected_metric())
    }

    /// Dominator tickers under the selected matrix, for presentation.
    pub fn dominated_tickers(&self) -> Vec<Option<String>> {
        self.dominated()
            .iter()
            .map(|dominator| dominator.map(|index| self.book.ticker(index).to_string()))
            .collect()
    }

    /// The single best next trade under the selected matrix.
    pub fn recommend_trade(&self) -> TradeRecommendation {
        let metric = self.selected_metric();
        trade::recommend_trade(
            &self.book,
            &self.growth_for(metric),
            self.matrix_for(metric),
            &self.settings,
        )
    }

    /// Cash-withdrawal suggestion, computed independently of the trade
    /// recommendation from the dividends-oriented dominance relation.
    pub fn cash_out(&self) -> CashOutAdvice {
        trade::cash_out_advice(
            &self.book,
            &self.dividends.gradient,
            &self.dominated_under(Metric::Dividends),
            &self.settings,
        )
    }

    /// Multi-line human-readable report.
    pub fn report(&self) -> String {
        report::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PositionRecord;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn record(ticker: &str, shares: u64, price: Decimal) -> PositionRecord {
        PositionRecord {
            ticker: ticker.to_string(),
            shares,
            price,
            lot_size: 10,
            volume_factor: 1.0,
        }
    }

    /// Reference scenario: weights 0.1 / 0.2 / 0.3, cash 0.4, dividend
    /// gradients [1, 5, 2], drawdown gradients [3, 1, 4].
    fn reference_engine(settings: Settings) -> Optimizer {
        let positions = vec![
            record("A", 1000, dec!(100)),
            record("B", 2000, dec!(100)),
            record("C", 3000, dec!(100)),
        ];
        let book = PositionBook::new(None, &positions, dec!(400000)).unwrap();
        let dividends = DividendsInput {
            gradient: HashMap::from([
                ("A".to_string(), 1.0),
                ("B".to_string(), 5.0),
                ("C".to_string(), 2.0),
            ]),
            std: 0.05,
            expected_dividends: 50000.0,
            minimal_dividends: 40000.0,
        };
        let returns = ReturnsInput {
            gradient: HashMap::from([
                ("A".to_string(), 3.0),
                ("B".to_string(), 1.0),
                ("C".to_string(), 4.0),
            ]),
            draw_down: -0.25,
            std_at_draw_down: 0.1,
        };
        Optimizer::new(book, &dividends, &returns, settings).unwrap()
    }

    #[test]
    fn test_reference_scenario_dividends_matrix() {
        let engine = reference_engine(Settings::default());
        let matrix = engine.dividends_growth_matrix();
        // Row A: B vetoed by drawdown, C kept with growth (2 - 1) * 1 = 1.
        assert_eq!(matrix.get(0, 1), 0.0);
        assert_eq!(matrix.get(0, 2), 1.0);

        let dominated = engine.dominated_under(Metric::Dividends);
        assert_eq!(dominated[0], Some(2), "A must be dominated by C");
    }

    #[test]
    fn test_sentinels_are_never_dominated() {
        let engine = reference_engine(Settings::default());
        for metric in [Metric::Dividends, Metric::Drawdown] {
            let dominated = engine.dominated_under(metric);
            assert_eq!(dominated[engine.book().cash_index()], None);
            assert_eq!(dominated[engine.book().portfolio_index()], None);
        }
    }

    #[test]
    fn test_t_statistics() {
        let engine = reference_engine(Settings::default());
        // Dividends: only A grows (1.0), weight 0.1, std 0.05 -> t = 2.
        assert!((engine.t_dividends_growth() - 2.0).abs() < 1e-12);
        // Drawdown matrix: only A -> C passes the dividend veto, growth
        // 4 - 3 = 1; weight 0.1, std 0.1 -> t = 1.
        assert!((engine.t_drawdown_growth() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_policy_drives_by_drawdown() {
        let engine = reference_engine(Settings::default());
        assert_eq!(engine.selected_metric(), Metric::Drawdown);
        // Under the drawdown matrix only A has growth; C is its dominator.
        let TradeRecommendation::Trade { sell, buy } = engine.recommend_trade() else {
            panic!("expected a trade");
        };
        assert_eq!(sell.ticker, "A");
        assert_eq!(buy.ticker, "C");
    }

    #[test]
    fn test_verdict_threshold_is_strict() {
        // max(t) is exactly 2.0 here; the verdict uses a strict inequality.
        let engine = reference_engine(Settings::default());
        assert!(!engine.needs_optimization());

        let settings = Settings {
            t_score: 0.5,
            ..Settings::default()
        };
        let engine = reference_engine(settings);
        assert!(engine.needs_optimization());
    }

    #[test]
    fn test_memoized_results_are_identical() {
        let engine = reference_engine(Settings::default());
        let first = engine.dividends_growth_matrix().clone();
        let second = engine.dividends_growth_matrix().clone();
        assert_eq!(first, second);
        assert_eq!(engine.t_drawdown_growth(), engine.t_drawdown_growth());
        assert_eq!(engine.recommend_trade(), engine.recommend_trade());
        assert_eq!(engine.cash_out(), engine.cash_out());
    }

    #[test]
    fn test_cash_out_uses_dividends_dominance() {
        let engine = reference_engine(Settings::default());
        // Only A is dominated under the dividends matrix; cash weight 0.4
        // already exceeds max_trade, so no sale is needed.
        assert_eq!(engine.cash_out(), CashOutAdvice::CashSufficient);
    }

    #[test]
    fn test_missing_metric_fails_construction() {
        let positions = vec![record("A", 1000, dec!(100))];
        let book = PositionBook::new(None, &positions, dec!(0)).unwrap();
        let dividends = DividendsInput {
            gradient: HashMap::new(),
            std: 0.05,
            expected_dividends: 0.0,
            minimal_dividends: 0.0,
        };
        let returns = ReturnsInput {
            gradient: HashMap::from([("A".to_string(), 1.0)]),
            draw_down: 0.0,
            std_at_draw_down: 0.1,
        };
        assert!(Optimizer::new(book, &dividends, &returns, Settings::default()).is_err());
    }
}
