use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;

use super::LocalizedText;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_orders: i64,
    pub total_income: Decimal,
    pub total_cancelled: i64,
    pub total_delivered: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStat {
    pub month: i32,
    pub total_orders: i64,
    pub total_income: Decimal,
    pub growth_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
    pub year: i32,
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub cancelled_orders: i64,
    pub total_income: Decimal,
    pub delivery_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProduct {
    pub product_id: i32,
    pub product_name: Json<LocalizedText>,
    pub product_images: Vec<String>,
    pub total_sold: i64,
    pub total_revenue: Decimal,
}
