use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::{
    error::Result,
    models::{LocalizedText, MonthlyStat, StatsOverview, TopSellingProduct, YearlyStats},
    queries::product_queries,
};

/// Dashboard timestamps are reported in store-local time.
const STORE_TIME_ZONE: &str = "Asia/Ho_Chi_Minh";

pub async fn overview(pool: &PgPool) -> Result<StatsOverview> {
    let total_orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders");
    let total_delivered =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = 'delivered'");
    let total_cancelled =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = 'cancelled'");
    let total_income = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE status = 'delivered'",
    );

    let (total_orders, total_delivered, total_cancelled, total_income) = tokio::try_join!(
        total_orders.fetch_one(pool),
        total_delivered.fetch_one(pool),
        total_cancelled.fetch_one(pool),
        total_income.fetch_one(pool),
    )?;

    Ok(StatsOverview {
        total_orders,
        total_income,
        total_cancelled,
        total_delivered,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct MonthlyRow {
    month: i32,
    total_orders: i64,
    total_income: Decimal,
}

pub async fn monthly(pool: &PgPool, year: i32) -> Result<Vec<MonthlyStat>> {
    let rows = sqlx::query_as::<_, MonthlyRow>(&format!(
        "SELECT EXTRACT(MONTH FROM o.created_at AT TIME ZONE '{tz}')::int AS month,
                COUNT(*)::bigint AS total_orders,
                COALESCE(SUM(CASE WHEN o.status = 'delivered' THEN o.total_amount ELSE 0 END), 0)
                    AS total_income
         FROM orders o
         WHERE EXTRACT(YEAR FROM o.created_at AT TIME ZONE '{tz}') = $1
         GROUP BY month
         ORDER BY month",
        tz = STORE_TIME_ZONE,
    ))
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(fill_monthly_stats(&rows))
}

/// Materialize all twelve months and compute month-over-month income growth.
fn fill_monthly_stats(rows: &[MonthlyRow]) -> Vec<MonthlyStat> {
    let full: Vec<(i64, Decimal)> = (1..=12)
        .map(|month| {
            rows.iter()
                .find(|row| row.month == month)
                .map(|row| (row.total_orders, row.total_income))
                .unwrap_or((0, Decimal::ZERO))
        })
        .collect();

    full.iter()
        .enumerate()
        .map(|(index, &(total_orders, total_income))| {
            let growth_rate = if index == 0 {
                0.0
            } else {
                growth_rate(full[index - 1].1, total_income)
            };

            MonthlyStat {
                month: index as i32 + 1,
                total_orders,
                total_income,
                growth_rate,
            }
        })
        .collect()
}

/// Percentage change against the previous month, rounded to two decimals.
/// A month coming out of nothing counts as 100% growth.
fn growth_rate(previous: Decimal, current: Decimal) -> f64 {
    if previous.is_zero() {
        if current > Decimal::ZERO { 100.0 } else { 0.0 }
    } else {
        let prev = previous.to_f64().unwrap_or(0.0);
        let cur = current.to_f64().unwrap_or(0.0);
        ((cur - prev) / prev * 100.0 * 100.0).round() / 100.0
    }
}

#[derive(Debug, sqlx::FromRow)]
struct YearlyRow {
    total_orders: i64,
    delivered_orders: i64,
    cancelled_orders: i64,
    total_income: Decimal,
}

pub async fn yearly(pool: &PgPool, year: i32) -> Result<YearlyStats> {
    let row = sqlx::query_as::<_, YearlyRow>(&format!(
        "SELECT COUNT(*)::bigint AS total_orders,
                COUNT(*) FILTER (WHERE status = 'delivered')::bigint AS delivered_orders,
                COUNT(*) FILTER (WHERE status = 'cancelled')::bigint AS cancelled_orders,
                COALESCE(SUM(total_amount) FILTER (WHERE status = 'delivered'), 0)
                    AS total_income
         FROM orders
         WHERE EXTRACT(YEAR FROM created_at AT TIME ZONE '{tz}') = $1",
        tz = STORE_TIME_ZONE,
    ))
    .bind(year)
    .fetch_one(pool)
    .await?;

    let delivery_rate = if row.total_orders == 0 {
        0.0
    } else {
        (row.delivered_orders as f64 / row.total_orders as f64 * 100.0 * 100.0).round() / 100.0
    };

    Ok(YearlyStats {
        year,
        total_orders: row.total_orders,
        delivered_orders: row.delivered_orders,
        cancelled_orders: row.cancelled_orders,
        total_income: row.total_income,
        delivery_rate,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct TopSellingRow {
    product_id: i32,
    product_name: Json<LocalizedText>,
    total_sold: i64,
    total_revenue: Decimal,
}

/// Best sellers over delivered orders; images are looked up separately so the
/// aggregation does not multiply rows.
pub async fn top_selling(pool: &PgPool, limit: i64) -> Result<Vec<TopSellingProduct>> {
    let rows = sqlx::query_as::<_, TopSellingRow>(
        "SELECT p.id AS product_id,
                p.name AS product_name,
                SUM(i.quantity)::bigint AS total_sold,
                SUM(i.total_price) AS total_revenue
         FROM order_items i
         INNER JOIN orders o ON o.id = i.order_id
         INNER JOIN products p ON p.id = i.product_id
         WHERE o.status = 'delivered'
         GROUP BY p.id, p.name
         ORDER BY SUM(i.quantity) DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = rows.iter().map(|r| r.product_id).collect();
    let mut images_map = product_queries::find_images_by_product_ids(pool, &product_ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| TopSellingProduct {
            product_id: row.product_id,
            product_name: row.product_name,
            product_images: images_map
                .remove(&row.product_id)
                .unwrap_or_default()
                .into_iter()
                .map(|img| img.url)
                .collect(),
            total_sold: row.total_sold,
            total_revenue: row.total_revenue,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_from_zero_is_100_when_income_appears() {
        assert_eq!(growth_rate(Decimal::ZERO, Decimal::from(500)), 100.0);
        assert_eq!(growth_rate(Decimal::ZERO, Decimal::ZERO), 0.0);
    }

    #[test]
    fn growth_rate_rounds_to_two_decimals() {
        let rate = growth_rate(Decimal::from(300), Decimal::from(400));
        assert_eq!(rate, 33.33);

        let rate = growth_rate(Decimal::from(400), Decimal::from(300));
        assert_eq!(rate, -25.0);
    }

    #[test]
    fn monthly_stats_materialize_all_twelve_months() {
        let rows = vec![
            MonthlyRow {
                month: 2,
                total_orders: 3,
                total_income: Decimal::from(900),
            },
            MonthlyRow {
                month: 3,
                total_orders: 5,
                total_income: Decimal::from(1800),
            },
        ];

        let stats = fill_monthly_stats(&rows);
        assert_eq!(stats.len(), 12);

        assert_eq!(stats[0].month, 1);
        assert_eq!(stats[0].total_orders, 0);
        assert_eq!(stats[0].growth_rate, 0.0);

        // January had nothing, February appears out of nowhere
        assert_eq!(stats[1].growth_rate, 100.0);
        assert_eq!(stats[2].growth_rate, 100.0);

        // April drops back to zero
        assert_eq!(stats[3].total_income, Decimal::ZERO);
        assert_eq!(stats[3].growth_rate, -100.0);
    }
}
