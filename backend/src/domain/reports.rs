//! Dashboard counters and the annual profit/loss report.
//!
//! Both are plain arithmetic over rows the services have already loaded.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::bike::{Bike, BikeStatus};
use super::expense::{DateRange, Expense, growth_percent};
use super::money::Money;
use super::payment::{Payment, PaymentStatus};
use super::rider::{FinancedRider, RiderStatus};

/// First year the business kept records.
pub const FIRST_REPORT_YEAR: i32 = 2020;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Headline counters for the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub potential_riders: usize,
    pub financed_riders: usize,
    pub bikes: usize,
    #[schema(value_type = f64)]
    pub total_revenue: Money,
    pub active_riders: usize,
    pub overdue_payments: usize,
}

/// Row counts feeding [`DashboardStats::compute`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardCounts {
    pub potential_riders: usize,
    pub bikes: usize,
}

impl DashboardStats {
    /// Combine counters with the loaded financed riders and payments.
    pub fn compute(counts: DashboardCounts, riders: &[FinancedRider], payments: &[Payment]) -> Self {
        Self {
            potential_riders: counts.potential_riders,
            financed_riders: riders.len(),
            bikes: counts.bikes,
            // Pending, failed and overdue payments are not revenue.
            total_revenue: payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Completed)
                .map(|payment| payment.amount)
                .sum(),
            active_riders: riders
                .iter()
                .filter(|rider| rider.status == RiderStatus::Financed)
                .count(),
            overdue_payments: payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Overdue)
                .count(),
        }
    }
}

/// One month of the annual report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    pub month: String,
    #[schema(value_type = f64)]
    pub revenue: Money,
    #[schema(value_type = f64)]
    pub expenses: Money,
    #[schema(value_type = f64)]
    pub profit: Money,
    pub riders_financed: usize,
    pub margin: f64,
}

/// Key performance indicators for a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportKpis {
    pub profit_margin: f64,
    pub revenue_per_rider: f64,
}

/// Profit and loss for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualReport {
    pub year: i32,
    #[schema(value_type = f64)]
    pub total_revenue: Money,
    #[schema(value_type = f64)]
    pub total_expenses: Money,
    #[schema(value_type = f64)]
    pub net_profit: Money,
    pub total_riders: usize,
    pub active_bikes: usize,
    pub avg_daily_collection: f64,
    pub revenue_growth: f64,
    pub monthly: Vec<MonthlyBreakdown>,
    pub kpis: ReportKpis,
}

/// Rows feeding [`AnnualReport::compute`]. Payments may span any dates and
/// statuses; only completed payments count as revenue.
#[derive(Debug, Clone, Copy)]
pub struct AnnualInputs<'a> {
    pub payments: &'a [Payment],
    pub expenses: &'a [Expense],
    pub riders: &'a [FinancedRider],
    pub bikes: &'a [Bike],
}

/// Raised when a report year is outside the supported window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("year must be between {min} and {max}")]
pub struct ReportYearOutOfRange {
    pub min: i32,
    pub max: i32,
}

/// Accept years from [`FIRST_REPORT_YEAR`] up to next year.
pub fn check_report_year(year: i32, today: NaiveDate) -> Result<DateRange, ReportYearOutOfRange> {
    let max = today.year() + 1;
    let out_of_range = ReportYearOutOfRange {
        min: FIRST_REPORT_YEAR,
        max,
    };
    if !(FIRST_REPORT_YEAR..=max).contains(&year) {
        return Err(out_of_range);
    }
    DateRange::year(year).ok_or(out_of_range)
}

fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

fn revenue_in(payments: &[Payment], range: Option<DateRange>) -> Money {
    payments
        .iter()
        .filter(|payment| payment.status == PaymentStatus::Completed)
        .filter(|payment| range.is_some_and(|r| r.contains(payment.payment_date)))
        .map(|payment| payment.amount)
        .sum()
}

impl AnnualReport {
    /// Build the report for `year` from loaded rows.
    pub fn compute(year: i32, inputs: AnnualInputs<'_>) -> Self {
        let range = DateRange::year(year);
        let in_year = |day: NaiveDate| range.is_some_and(|r| r.contains(day));

        let total_revenue = revenue_in(inputs.payments, range);
        let previous_revenue = revenue_in(inputs.payments, DateRange::year(year - 1));
        let total_expenses: Money = inputs
            .expenses
            .iter()
            .filter(|expense| in_year(expense.expense_date))
            .map(|expense| expense.amount)
            .sum();
        let net_profit = total_revenue - total_expenses;
        let total_riders = inputs
            .riders
            .iter()
            .filter(|rider| in_year(rider.created_at.date_naive()))
            .count();

        let monthly = (1..=12u32)
            .zip(MONTH_NAMES)
            .map(|(month, name)| {
                let in_month = |day: NaiveDate| day.year() == year && day.month() == month;
                let revenue: Money = inputs
                    .payments
                    .iter()
                    .filter(|p| p.status == PaymentStatus::Completed && in_month(p.payment_date))
                    .map(|p| p.amount)
                    .sum();
                let expenses: Money = inputs
                    .expenses
                    .iter()
                    .filter(|e| in_month(e.expense_date))
                    .map(|e| e.amount)
                    .sum();
                let profit = revenue - expenses;
                MonthlyBreakdown {
                    month: name.to_owned(),
                    revenue,
                    expenses,
                    profit,
                    riders_financed: inputs
                        .riders
                        .iter()
                        .filter(|r| in_month(r.created_at.date_naive()))
                        .count(),
                    margin: profit.percent_of(revenue),
                }
            })
            .collect();

        let revenue_per_rider = match u32::try_from(total_riders) {
            Ok(0) | Err(_) => 0.0,
            Ok(count) => total_revenue.per(count),
        };

        Self {
            year,
            total_revenue,
            total_expenses,
            net_profit,
            total_riders,
            active_bikes: inputs
                .bikes
                .iter()
                .filter(|bike| bike.status == BikeStatus::Financed)
                .count(),
            avg_daily_collection: total_revenue.per(days_in_year(year)),
            revenue_growth: growth_percent(total_revenue, previous_revenue),
            monthly,
            kpis: ReportKpis {
                profit_margin: net_profit.percent_of(total_revenue),
                revenue_per_rider,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::expense::ExpenseCategory;
    use crate::domain::test_support::{bike, expense, financed_rider_created, payment};
    use rstest::rstest;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[rstest]
    #[case(2019, false)]
    #[case(2020, true)]
    #[case(2027, true)]
    #[case(2028, false)]
    fn report_year_window(#[case] year: i32, #[case] ok: bool) {
        assert_eq!(check_report_year(year, date(2026, 10, 16)).is_ok(), ok);
    }

    #[rstest]
    #[case(2024, 366)]
    #[case(2026, 365)]
    #[case(2000, 366)]
    #[case(2100, 365)]
    fn leap_years(#[case] year: i32, #[case] days: u32) {
        assert_eq!(days_in_year(year), days);
    }

    #[rstest]
    fn annual_report_buckets_by_month() {
        let rider = financed_rider_created("Mutua", 100_000, date(2024, 1, 1), date(2024, 3, 5));
        let payments = vec![
            payment(rider.id, 36_600, date(2024, 3, 10), PaymentStatus::Completed),
            payment(rider.id, 1_000, date(2024, 3, 11), PaymentStatus::Pending),
            payment(rider.id, 20_000, date(2023, 6, 1), PaymentStatus::Completed),
        ];
        let expenses = vec![expense(ExpenseCategory::Fuel, 6_600, date(2024, 3, 12))];
        let bikes = vec![bike(BikeStatus::Financed), bike(BikeStatus::Available)];
        let riders = vec![rider];

        let report = AnnualReport::compute(
            2024,
            AnnualInputs {
                payments: &payments,
                expenses: &expenses,
                riders: &riders,
                bikes: &bikes,
            },
        );

        assert_eq!(report.total_revenue, Money::from_whole_shillings(36_600));
        assert_eq!(report.net_profit, Money::from_whole_shillings(30_000));
        assert_eq!(report.avg_daily_collection, 100.0);
        assert_eq!(report.total_riders, 1);
        assert_eq!(report.active_bikes, 1);
        assert_eq!(report.revenue_growth, 83.0);
        assert_eq!(report.kpis.revenue_per_rider, 36_600.0);
        assert_eq!(report.monthly.len(), 12);
        let march = report.monthly.get(2).expect("march row");
        assert_eq!(march.month, "March");
        assert_eq!(march.riders_financed, 1);
        assert_eq!(march.profit, Money::from_whole_shillings(30_000));
        let april = report.monthly.get(3).expect("april row");
        assert_eq!(april.margin, 0.0);
    }

    #[rstest]
    fn empty_year_has_zero_ratios() {
        let report = AnnualReport::compute(
            2026,
            AnnualInputs {
                payments: &[],
                expenses: &[],
                riders: &[],
                bikes: &[],
            },
        );
        assert_eq!(report.kpis.profit_margin, 0.0);
        assert_eq!(report.kpis.revenue_per_rider, 0.0);
        assert_eq!(report.revenue_growth, 0.0);
    }

    #[rstest]
    fn dashboard_counts_revenue_and_overdue() {
        let rider_id = Uuid::new_v4();
        let payments = vec![
            payment(rider_id, 500, date(2026, 1, 1), PaymentStatus::Completed),
            payment(rider_id, 300, date(2026, 1, 2), PaymentStatus::Overdue),
        ];
        let riders = vec![financed_rider_created(
            "Njeri",
            1_000,
            date(2026, 1, 1),
            date(2026, 1, 1),
        )];
        let stats = DashboardStats::compute(
            DashboardCounts {
                potential_riders: 4,
                bikes: 2,
            },
            &riders,
            &payments,
        );
        assert_eq!(stats.total_revenue, Money::from_whole_shillings(500));
        assert_eq!(stats.overdue_payments, 1);
        assert_eq!(stats.active_riders, 1);
        assert_eq!(stats.financed_riders, 1);
    }
}
