use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{LocalizedText, Product, ProductImage};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipping" => Some(OrderStatus::Shipping),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Hard delete is only allowed for orders that never went into fulfilment.
    pub fn can_delete(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Cancelled)
    }

    /// Cancellation is blocked once the order is delivered or already cancelled.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Human-readable confirmation for a status update response.
    pub fn transition_message(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order has been transferred to pending status",
            OrderStatus::Confirmed => "Order has been confirmed successfully",
            OrderStatus::Processing => "Order is being processed",
            OrderStatus::Shipping => "Order is being shipped",
            OrderStatus::Delivered => "Order has been delivered successfully",
            OrderStatus::Cancelled => "Order has been cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub order_code: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub ward: String,
    pub district: String,
    pub city: String,
    pub notes: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product attributes frozen into the item row at purchase time. Later product
/// edits must never show through here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: i32,
    pub name: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub images: Vec<String>,
}

impl ProductSnapshot {
    pub fn capture(product: &Product, images: &[ProductImage]) -> Self {
        Self {
            id: product.id,
            name: (*product.name).clone(),
            brand: product.brand.clone(),
            product_code: product.product_code.clone(),
            color: product.color.clone(),
            size: product.size.clone(),
            images: images.iter().map(|img| img.url.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub product_snapshot: Json<ProductSnapshot>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Item data computed by the order workflow before anything is persisted:
/// price fixed at creation time plus the product snapshot.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub snapshot: ProductSnapshot,
}

// Request types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub ward: String,
    pub district: String,
    pub city: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_code: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<OrderWithItems>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
    }

    #[test]
    fn delete_only_allowed_before_fulfilment() {
        assert!(OrderStatus::Pending.can_delete());
        assert!(OrderStatus::Cancelled.can_delete());
        assert!(!OrderStatus::Processing.can_delete());
        assert!(!OrderStatus::Delivered.can_delete());
    }

    #[test]
    fn cancel_blocked_when_delivered_or_cancelled() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Shipping.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn snapshot_captures_product_fields_and_image_urls() {
        let product = Product {
            id: 9,
            name: Json(LocalizedText::new("lò nướng", "griller")),
            description: None,
            price: Decimal::from(4_000_000_i64),
            total_price: None,
            brand: Some("Hafele".to_string()),
            product_code: Some("HF-900".to_string()),
            color: None,
            origin: None,
            material: None,
            size: Some("60L".to_string()),
            specifications: None,
            is_active: true,
            view_count: 0,
            category_id: Some(2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let images = vec![
            ProductImage {
                id: 1,
                product_id: 9,
                url: "https://cdn.nestira.vn/p/9/a.jpg".to_string(),
            },
            ProductImage {
                id: 2,
                product_id: 9,
                url: "https://cdn.nestira.vn/p/9/b.jpg".to_string(),
            },
        ];

        let snapshot = ProductSnapshot::capture(&product, &images);
        assert_eq!(snapshot.id, 9);
        assert_eq!(snapshot.name.en.as_deref(), Some("griller"));
        assert_eq!(snapshot.images.len(), 2);
        assert_eq!(snapshot.size.as_deref(), Some("60L"));
    }
}
