use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    middleware,
    models::{
        CancelOrderRequest, CreateOrderItemRequest, CreateOrderRequest, NewOrderItem, Order,
        OrderListResponse, OrderStatus, OrderWithItems, PageQuery, Product, ProductImage,
        ProductSnapshot, UpdateOrderStatusRequest,
    },
    queries::{order_queries, product_queries},
    services::email_service,
    utils::order_code::generate_order_code,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 20;

/// The order-creation workflow: resolve and validate the requested products,
/// persist the order and its snapshot items in one transaction, then fire
/// the confirmation emails as a best-effort side effect.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<OrderWithItems>> {
    validate_order_request(&payload)?;

    let requested_ids: Vec<i32> = payload.items.iter().map(|i| i.product_id).collect();
    let products = product_queries::find_active_by_ids(&state.db, &requested_ids).await?;

    let items = build_order_items(&payload.items, &products)?;

    let order_code = generate_order_code();
    let order =
        order_queries::create_order_with_items(&state.db, &order_code, &payload, &items).await?;

    let items = order_queries::find_items(&state.db, order.id).await?;
    let order = OrderWithItems { order, items };

    // Best-effort notifications; the order is already committed.
    if let Err(e) = email_service::send_order_confirmation(&state.ses, &state.config.email, &order).await
    {
        tracing::error!("Failed to send order confirmation email: {}", e);
    }
    if let Err(e) = email_service::send_new_order_admin(&state.ses, &state.config.email, &order).await
    {
        tracing::error!("Failed to send new order notification email: {}", e);
    }

    Ok(Json(order))
}

/// Price each requested line against the resolved catalog state. Any id the
/// lookup did not return means a missing or inactive product, which fails the
/// whole order.
fn build_order_items(
    requested: &[CreateOrderItemRequest],
    products: &HashMap<i32, (Product, Vec<ProductImage>)>,
) -> Result<Vec<NewOrderItem>> {
    let mut items = Vec::with_capacity(requested.len());

    for item in requested {
        let (product, images) = products.get(&item.product_id).ok_or_else(|| {
            AppError::BadRequest(
                "Some products do not exist or are no longer available".to_string(),
            )
        })?;

        let unit_price = product.effective_price();

        items.push(NewOrderItem {
            product_id: product.id,
            quantity: item.quantity,
            unit_price,
            total_price: unit_price * rust_decimal::Decimal::from(item.quantity),
            snapshot: ProductSnapshot::capture(product, images),
        });
    }

    Ok(items)
}

fn validate_order_request(payload: &CreateOrderRequest) -> Result<()> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".to_string()));
    }

    for item in &payload.items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for product {}",
                item.product_id
            )));
        }
    }

    if payload.customer_email.is_empty() || !payload.customer_email.contains('@') {
        return Err(AppError::BadRequest("Invalid customer email".to_string()));
    }

    if payload.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("Customer name is required".to_string()));
    }

    if payload.shipping_address.trim().is_empty() {
        return Err(AppError::BadRequest("Shipping address is required".to_string()));
    }

    Ok(())
}

pub async fn get_all_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<OrderListResponse>> {
    middleware::authenticate(&headers)?;

    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let (orders, total) = order_queries::find_page(&state.db, page, limit).await?;
    let orders = order_queries::attach_items(&state.db, orders).await?;

    Ok(Json(OrderListResponse { orders, total }))
}

pub async fn get_orders_by_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(status): Path<String>,
) -> Result<Json<Vec<OrderWithItems>>> {
    middleware::authenticate(&headers)?;

    let status = parse_status(&status)?;
    let orders = order_queries::find_by_status(&state.db, status).await?;
    let orders = order_queries::attach_items(&state.db, orders).await?;

    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_code): Path<String>,
) -> Result<Json<OrderWithItems>> {
    let order = find_order_by_code(&state, &order_code).await?;
    let items = order_queries::find_items(&state.db, order.id).await?;

    Ok(Json(OrderWithItems { order, items }))
}

/// Move an order straight to the requested status. There is no transition
/// graph: any target is accepted, and only confirmed/shipping/delivered/
/// cancelled trigger a notification.
pub async fn update_order_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_code): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    middleware::authorize_admin(&headers)?;

    let status = parse_status(&payload.status)?;
    let old_status = find_order_by_code(&state, &order_code).await?.status;

    let order = order_queries::update_status(&state.db, &order_code, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    send_status_email(&state, &order, status).await;

    Ok(Json(json!({
        "message": format!("{} (from {} → {})", status.transition_message(), old_status, status),
        "data": order,
    })))
}

/// One notification per target state; failures are logged and swallowed.
async fn send_status_email(state: &AppState, order: &Order, status: OrderStatus) {
    let result = match status {
        OrderStatus::Confirmed => {
            email_service::send_order_approved(&state.ses, &state.config.email, order).await
        }
        OrderStatus::Shipping => {
            email_service::send_order_shipping(&state.ses, &state.config.email, order).await
        }
        OrderStatus::Delivered => {
            email_service::send_order_delivered(&state.ses, &state.config.email, order).await
        }
        OrderStatus::Cancelled => {
            email_service::send_order_cancelled(&state.ses, &state.config.email, order).await
        }
        OrderStatus::Pending | OrderStatus::Processing => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!(
            "Failed to send status email for order {}: {}",
            order.order_code,
            e
        );
    }
}

pub async fn delete_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    middleware::authorize_admin(&headers)?;

    let id: i32 = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid order id".to_string()))?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    delete_checked(&state, &order).await?;

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

pub async fn delete_order_by_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_code): Path<String>,
) -> Result<Json<serde_json::Value>> {
    middleware::authorize_admin(&headers)?;

    let order = find_order_by_code(&state, &order_code).await?;
    delete_checked(&state, &order).await?;

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

async fn delete_checked(state: &AppState, order: &Order) -> Result<()> {
    if !order.status.can_delete() {
        return Err(AppError::BadRequest(
            "Only pending or cancelled orders can be deleted".to_string(),
        ));
    }

    order_queries::delete_with_items(&state.db, order.id).await
}

/// Soft delete: flip the order to cancelled instead of removing it.
pub async fn cancel_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CancelOrderRequest>,
) -> Result<Json<serde_json::Value>> {
    middleware::authorize_admin(&headers)?;

    let order = find_order_by_code(&state, &payload.order_code).await?;

    match order.status {
        OrderStatus::Delivered => {
            return Err(AppError::BadRequest(
                "Cannot cancel order that has been delivered".to_string(),
            ));
        }
        OrderStatus::Cancelled => {
            return Err(AppError::BadRequest(
                "Order has been cancelled before".to_string(),
            ));
        }
        _ => {}
    }

    let order = order_queries::update_status(&state.db, &payload.order_code, OrderStatus::Cancelled)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(json!({
        "message": "Order cancelled successfully",
        "data": order,
    })))
}

async fn find_order_by_code(state: &AppState, order_code: &str) -> Result<Order> {
    order_queries::find_by_code(&state.db, order_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

fn parse_status(value: &str) -> Result<OrderStatus> {
    OrderStatus::parse(value)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid order status: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocalizedText;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json as SqlxJson;

    fn make_product(id: i32, price: i64, total_price: Option<i64>) -> (Product, Vec<ProductImage>) {
        let now = Utc::now();
        let product = Product {
            id,
            name: SqlxJson(LocalizedText::new("bếp từ đôi", "double induction cooker")),
            description: None,
            price: Decimal::from(price),
            total_price: total_price.map(Decimal::from),
            brand: Some("Nestira".to_string()),
            product_code: Some(format!("NST-{}", id)),
            color: None,
            origin: None,
            material: None,
            size: None,
            specifications: None,
            is_active: true,
            view_count: 0,
            category_id: Some(1),
            created_at: now,
            updated_at: now,
        };
        let images = vec![ProductImage {
            id: 1,
            product_id: id,
            url: format!("https://cdn.nestira.vn/p/{}/main.jpg", id),
        }];

        (product, images)
    }

    fn request(items: Vec<CreateOrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Nguyễn Văn A".to_string(),
            customer_phone: "0901234567".to_string(),
            customer_email: "a@example.com".to_string(),
            shipping_address: "12 Lý Thường Kiệt".to_string(),
            ward: "Phường 7".to_string(),
            district: "Quận 3".to_string(),
            city: "TP. Hồ Chí Minh".to_string(),
            notes: None,
            items,
        }
    }

    #[test]
    fn items_freeze_effective_price_and_sum_matches() {
        let mut products = HashMap::new();
        products.insert(1, make_product(1, 2_000_000, Some(1_800_000)));
        products.insert(2, make_product(2, 500_000, None));

        let requested = vec![
            CreateOrderItemRequest { product_id: 1, quantity: 2 },
            CreateOrderItemRequest { product_id: 2, quantity: 3 },
        ];

        let items = build_order_items(&requested, &products).unwrap();

        // discounted total price wins over the base price
        assert_eq!(items[0].unit_price, Decimal::from(1_800_000));
        assert_eq!(items[0].total_price, Decimal::from(3_600_000));
        assert_eq!(items[1].unit_price, Decimal::from(500_000));
        assert_eq!(items[1].total_price, Decimal::from(1_500_000));

        let total: Decimal = items.iter().map(|i| i.total_price).sum();
        assert_eq!(total, Decimal::from(5_100_000));
    }

    #[test]
    fn unknown_product_fails_the_whole_order() {
        let mut products = HashMap::new();
        products.insert(1, make_product(1, 2_000_000, None));

        let requested = vec![
            CreateOrderItemRequest { product_id: 1, quantity: 1 },
            CreateOrderItemRequest { product_id: 99, quantity: 1 },
        ];

        let err = build_order_items(&requested, &products).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn snapshot_carries_product_fields_into_the_item() {
        let mut products = HashMap::new();
        products.insert(7, make_product(7, 900_000, None));

        let requested = vec![CreateOrderItemRequest { product_id: 7, quantity: 1 }];
        let items = build_order_items(&requested, &products).unwrap();

        assert_eq!(items[0].snapshot.id, 7);
        assert_eq!(items[0].snapshot.product_code.as_deref(), Some("NST-7"));
        assert_eq!(items[0].snapshot.images, vec!["https://cdn.nestira.vn/p/7/main.jpg"]);
    }

    #[test]
    fn empty_cart_and_bad_email_are_rejected() {
        let err = validate_order_request(&request(vec![])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let mut req = request(vec![CreateOrderItemRequest { product_id: 1, quantity: 1 }]);
        req.customer_email = "not-an-email".to_string();
        assert!(validate_order_request(&req).is_err());

        let mut req = request(vec![CreateOrderItemRequest { product_id: 1, quantity: 0 }]);
        req.customer_email = "a@example.com".to_string();
        assert!(validate_order_request(&req).is_err());
    }

    #[test]
    fn valid_request_passes_validation() {
        let req = request(vec![CreateOrderItemRequest { product_id: 1, quantity: 2 }]);
        assert!(validate_order_request(&req).is_ok());
    }
}
