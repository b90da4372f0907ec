//! Reports over stored transactions
//!
//! Two kinds of report are built from any [`TransactionRepository`]:
//!
//! - Listing reports ([`build_report`]): one page of transactions plus a
//!   summary over every record the query matches, not just the page.
//! - The dashboard ([`build_dashboard`]): counts, amounts, network
//!   distribution and the most recent transactions within a date range.
//!
//! Reports only ever contain [`TransactionView`]s, so raw card numbers never
//! reach an output.

use super::batch::summarize;
use super::mask::mask_card_number;
use super::traits::{newest_first, Page, TransactionRepository};
use crate::io::fields::{parse_range_bound, RangeEdge};
use crate::types::{
    BatchStats, CardNetwork, ProcessingError, RejectionReason, TransactionId, TransactionRecord,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// Number of transactions listed in the dashboard's recent section
pub const RECENT_TRANSACTIONS: usize = 10;

/// Display-safe projection of a stored record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub id: TransactionId,

    /// Masked card number (`****-****-****-1234`)
    pub card_number: String,

    /// Network display name (`American Express`)
    pub card_network: String,

    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub is_valid: bool,
    pub rejection_reason: Option<RejectionReason>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TransactionRecord> for TransactionView {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            id: record.id,
            card_number: mask_card_number(&record.card_number),
            card_network: record.card_network.display_name().to_string(),
            amount: record.amount,
            timestamp: record.timestamp,
            is_valid: record.is_valid,
            rejection_reason: record.rejection_reason,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Totals over every record a report query matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_count: usize,

    /// Sum of accepted amounts
    pub total_amount: Decimal,

    pub valid_transactions: usize,
    pub rejected_transactions: usize,
}

impl From<BatchStats> for ReportSummary {
    fn from(stats: BatchStats) -> Self {
        Self {
            total_count: stats.total,
            total_amount: stats.accepted_amount,
            valid_transactions: stats.valid,
            rejected_transactions: stats.rejected,
        }
    }
}

/// A summary plus one page of matching transactions, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub transactions: Vec<TransactionView>,
}

/// Which records a listing report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportQuery {
    All,
    ByNetwork(CardNetwork),

    /// Records with `start <= timestamp <= end`
    ByDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Rejected,
}

/// Build one page of a listing report
///
/// # Errors
///
/// `InvalidDateRange` when a date range query ends before it starts, and
/// `ArithmeticOverflow` when the matching amounts cannot be totalled.
pub fn build_report(
    repository: &dyn TransactionRepository,
    query: &ReportQuery,
    page: Page,
) -> Result<Report, ProcessingError> {
    let (summary, records) = match *query {
        ReportQuery::All => {
            let total = repository.total_count();
            let rejected = repository.rejected_count();
            let summary = ReportSummary {
                total_count: total,
                total_amount: repository.total_amount()?,
                valid_transactions: total - rejected,
                rejected_transactions: rejected,
            };
            (summary, repository.all(page))
        }
        ReportQuery::ByNetwork(network) => {
            let matching = repository.select(&|record| record.card_network == network);
            (
                summarize(&matching)?.into(),
                page.apply(newest_first(matching)),
            )
        }
        ReportQuery::ByDateRange { start, end } => {
            if end < start {
                return Err(ProcessingError::invalid_date_range(start, end));
            }
            let matching = repository
                .select(&|record| record.timestamp >= start && record.timestamp <= end);
            (
                summarize(&matching)?.into(),
                page.apply(newest_first(matching)),
            )
        }
        ReportQuery::Rejected => {
            let rejected = repository.rejected_count();
            let summary = ReportSummary {
                total_count: rejected,
                total_amount: Decimal::ZERO,
                valid_transactions: 0,
                rejected_transactions: rejected,
            };
            (summary, repository.rejected(page))
        }
    };

    Ok(Report {
        summary,
        transactions: records.iter().map(TransactionView::from).collect(),
    })
}

/// Period covered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardRange {
    /// The given number of days up to now
    LastDays(u32),

    Custom {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl DashboardRange {
    /// Concrete `(start, end)` bounds relative to `now`
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match *self {
            DashboardRange::LastDays(days) => (now - Duration::days(i64::from(days)), now),
            DashboardRange::Custom { start, end } => (start, end),
        }
    }
}

impl Default for DashboardRange {
    fn default() -> Self {
        DashboardRange::LastDays(7)
    }
}

impl FromStr for DashboardRange {
    type Err = ProcessingError;

    /// Parse `7d`, `30d`, `90d` or `YYYY-MM-DD|YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();

        if let Some((start, end)) = value.split_once('|') {
            let start = parse_range_bound(start, RangeEdge::Start);
            let end = parse_range_bound(end, RangeEdge::End);
            return match (start, end) {
                (Some(start), Some(end)) if end < start => {
                    Err(ProcessingError::invalid_date_range(start, end))
                }
                (Some(start), Some(end)) => Ok(DashboardRange::Custom { start, end }),
                _ => Err(ProcessingError::invalid_date_range_spec(s)),
            };
        }

        match value {
            "7d" => Ok(DashboardRange::LastDays(7)),
            "30d" => Ok(DashboardRange::LastDays(30)),
            "90d" => Ok(DashboardRange::LastDays(90)),
            _ => Err(ProcessingError::invalid_date_range_spec(s)),
        }
    }
}

/// Share of one card network among the dashboard's transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkDistribution {
    pub card_network: String,
    pub count: usize,

    /// Percentage of all transactions in range (0-100)
    pub percentage: f64,
}

/// Dashboard statistics for one date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_transactions: usize,
    pub valid_transactions: usize,
    pub invalid_transactions: usize,

    /// Sum of accepted amounts
    pub total_amount: Decimal,

    /// Mean accepted amount rounded to cents, zero when nothing was accepted
    pub average_amount: Decimal,

    /// Networks present in range, in `CardNetwork::ALL` order
    pub card_network_distribution: Vec<NetworkDistribution>,

    pub recent_transactions: Vec<TransactionView>,
}

/// Build dashboard statistics for `range`, resolving relative ranges against `now`
///
/// # Errors
///
/// `ArithmeticOverflow` when the accepted amounts in range cannot be totalled.
pub fn build_dashboard(
    repository: &dyn TransactionRepository,
    range: &DashboardRange,
    now: DateTime<Utc>,
) -> Result<DashboardStats, ProcessingError> {
    let (start, end) = range.resolve(now);
    let in_range = repository.by_date_range(start, end, Page::everything());
    let stats = summarize(&in_range)?;

    let average_amount = if stats.valid > 0 {
        (stats.accepted_amount / Decimal::from(stats.valid)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let card_network_distribution = CardNetwork::ALL
        .into_iter()
        .filter_map(|network| {
            let count = in_range
                .iter()
                .filter(|record| record.card_network == network)
                .count();
            (count > 0).then(|| NetworkDistribution {
                card_network: network.display_name().to_string(),
                count,
                percentage: count as f64 / stats.total as f64 * 100.0,
            })
        })
        .collect();

    Ok(DashboardStats {
        total_transactions: stats.total,
        valid_transactions: stats.valid,
        invalid_transactions: stats.rejected,
        total_amount: stats.accepted_amount,
        average_amount,
        card_network_distribution,
        recent_transactions: in_range
            .iter()
            .take(RECENT_TRANSACTIONS)
            .map(TransactionView::from)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{at, record, sample_records};
    use crate::core::TransactionStore;
    use rstest::rstest;

    fn loaded_store() -> TransactionStore {
        let mut store = TransactionStore::new();
        store.add_range(sample_records());
        store
    }

    #[test]
    fn test_view_masks_card_and_names_network() {
        let record = record("378282246310005", 3000, at(3, 12));
        let view = TransactionView::from(&record);

        assert_eq!(view.card_number, "****-****-****-0005");
        assert_eq!(view.card_network, "American Express");
        assert_eq!(view.id, record.id);
        assert_eq!(view.rejection_reason, None);
    }

    #[test]
    fn test_all_report() {
        let store = loaded_store();
        let report = build_report(&store, &ReportQuery::All, Page::new(1, 2).unwrap()).unwrap();

        assert_eq!(
            report.summary,
            ReportSummary {
                total_count: 6,
                total_amount: Decimal::new(34125, 2),
                valid_transactions: 4,
                rejected_transactions: 2,
            }
        );
        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.transactions[0].timestamp, at(5, 15));
        assert_eq!(report.transactions[1].timestamp, at(4, 8));
    }

    #[rstest]
    #[case(CardNetwork::Visa, 2, 11050, 2, 0)]
    #[case(CardNetwork::MasterCard, 1, 20075, 1, 0)]
    #[case(CardNetwork::Unknown, 2, 0, 0, 2)]
    #[case(CardNetwork::Discover, 0, 0, 0, 0)]
    fn test_network_report_counts_its_own_records(
        #[case] network: CardNetwork,
        #[case] total: usize,
        #[case] cents: i64,
        #[case] valid: usize,
        #[case] rejected: usize,
    ) {
        let store = loaded_store();
        let report =
            build_report(&store, &ReportQuery::ByNetwork(network), Page::default()).unwrap();

        assert_eq!(report.summary.total_count, total);
        assert_eq!(report.summary.total_amount, Decimal::new(cents, 2));
        assert_eq!(report.summary.valid_transactions, valid);
        assert_eq!(report.summary.rejected_transactions, rejected);
        assert_eq!(report.transactions.len(), total);
    }

    #[test]
    fn test_date_range_report_summarises_whole_range() {
        let store = loaded_store();
        let query = ReportQuery::ByDateRange {
            start: at(2, 0),
            end: at(3, 23),
        };

        let report = build_report(&store, &query, Page::new(1, 1).unwrap()).unwrap();

        assert_eq!(report.summary.total_count, 3);
        assert_eq!(report.summary.valid_transactions, 2);
        assert_eq!(report.summary.rejected_transactions, 1);
        assert_eq!(report.summary.total_amount, Decimal::new(23075, 2));
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].timestamp, at(3, 12));
    }

    #[test]
    fn test_date_range_report_rejects_reversed_range() {
        let store = loaded_store();
        let query = ReportQuery::ByDateRange {
            start: at(3, 0),
            end: at(2, 0),
        };

        assert!(matches!(
            build_report(&store, &query, Page::default()),
            Err(ProcessingError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_rejected_report() {
        let store = loaded_store();
        let report = build_report(&store, &ReportQuery::Rejected, Page::default()).unwrap();

        assert_eq!(report.summary.total_count, 2);
        assert_eq!(report.summary.total_amount, Decimal::ZERO);
        assert_eq!(report.summary.valid_transactions, 0);
        assert_eq!(report.summary.rejected_transactions, 2);
        assert!(report.transactions.iter().all(|t| !t.is_valid));
        assert_eq!(
            report.transactions[0].rejection_reason,
            Some(RejectionReason::UnknownCardType)
        );
    }

    #[test]
    fn test_empty_repository_report() {
        let store = TransactionStore::new();
        let report = build_report(&store, &ReportQuery::All, Page::default()).unwrap();

        assert_eq!(report.summary, ReportSummary::default());
        assert!(report.transactions.is_empty());
    }

    #[rstest]
    #[case("7d", DashboardRange::LastDays(7))]
    #[case("30d", DashboardRange::LastDays(30))]
    #[case(" 90d ", DashboardRange::LastDays(90))]
    fn test_parse_relative_range(#[case] raw: &str, #[case] expected: DashboardRange) {
        assert_eq!(raw.parse::<DashboardRange>().unwrap(), expected);
    }

    #[test]
    fn test_parse_custom_range_end_covers_day() {
        let range: DashboardRange = "2024-01-01|2024-01-05".parse().unwrap();
        let (start, end) = range.resolve(at(20, 0));

        assert_eq!(start, at(1, 0));
        assert!(end > at(5, 23));
        assert!(end < at(6, 0));
    }

    #[rstest]
    #[case("14d")]
    #[case("")]
    #[case("2024-01-01")]
    #[case("2024-01-01|")]
    #[case("yesterday|today")]
    fn test_parse_invalid_range(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<DashboardRange>(),
            Err(ProcessingError::invalid_date_range_spec(raw))
        );
    }

    #[test]
    fn test_parse_reversed_custom_range() {
        assert!(matches!(
            "2024-01-05|2024-01-01".parse::<DashboardRange>(),
            Err(ProcessingError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_dashboard_over_custom_range() {
        let store = loaded_store();
        let range: DashboardRange = "2024-01-01|2024-01-05".parse().unwrap();

        let stats = build_dashboard(&store, &range, at(20, 0)).unwrap();

        assert_eq!(stats.total_transactions, 6);
        assert_eq!(stats.valid_transactions, 4);
        assert_eq!(stats.invalid_transactions, 2);
        assert_eq!(stats.total_amount, Decimal::new(34125, 2));
        assert_eq!(stats.average_amount, Decimal::new(8531, 2));

        let names: Vec<_> = stats
            .card_network_distribution
            .iter()
            .map(|d| (d.card_network.as_str(), d.count))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Visa", 2),
                ("MasterCard", 1),
                ("American Express", 1),
                ("Unknown", 2)
            ]
        );
        let visa_share = stats.card_network_distribution[0].percentage;
        assert!((visa_share - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(stats.recent_transactions.len(), 6);
        assert_eq!(stats.recent_transactions[0].timestamp, at(5, 15));
    }

    #[test]
    fn test_dashboard_relative_range() {
        let store = loaded_store();
        let stats = build_dashboard(&store, &DashboardRange::LastDays(7), at(10, 0)).unwrap();

        // 3 January 00:00 onwards
        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.valid_transactions, 2);
        assert_eq!(stats.total_amount, Decimal::new(4000, 2));
        assert_eq!(stats.average_amount, Decimal::new(2000, 2));
    }

    #[test]
    fn test_dashboard_recent_is_capped() {
        let mut store = TransactionStore::new();
        for day in 1..=15 {
            store.add(record("4111111111111111", 100, at(day, 12)));
        }

        let stats = build_dashboard(&store, &DashboardRange::LastDays(30), at(20, 0)).unwrap();

        assert_eq!(stats.total_transactions, 15);
        assert_eq!(stats.recent_transactions.len(), RECENT_TRANSACTIONS);
        assert_eq!(stats.recent_transactions[0].timestamp, at(15, 12));
        assert_eq!(stats.recent_transactions[9].timestamp, at(6, 12));
    }

    #[test]
    fn test_dashboard_empty_range() {
        let store = loaded_store();
        let stats = build_dashboard(&store, &DashboardRange::LastDays(7), at(31, 0)).unwrap();

        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.average_amount, Decimal::ZERO);
        assert!(stats.card_network_distribution.is_empty());
        assert!(stats.recent_transactions.is_empty());
    }

    #[test]
    fn test_totals_that_overflow_fail_the_report() {
        let mut store = TransactionStore::new();
        for card in ["4532015112830366", "4111111111111111"] {
            let mut big = record(card, 0, at(2, 10));
            big.amount = Decimal::MAX;
            store.add(big);
        }

        let err = build_report(&store, &ReportQuery::All, Page::default()).unwrap_err();
        assert!(matches!(err, ProcessingError::ArithmeticOverflow { .. }));

        let by_network = build_report(
            &store,
            &ReportQuery::ByNetwork(CardNetwork::Visa),
            Page::default(),
        );
        assert!(by_network.is_err());

        let dashboard = build_dashboard(&store, &DashboardRange::LastDays(7), at(5, 0));
        assert!(matches!(
            dashboard,
            Err(ProcessingError::ArithmeticOverflow { .. })
        ));

        let rejected = build_report(&store, &ReportQuery::Rejected, Page::default()).unwrap();
        assert_eq!(rejected.summary.total_count, 0);
    }
}
