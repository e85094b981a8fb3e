use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::{
    error::Result,
    models::{CreateOrderRequest, NewOrderItem, Order, OrderItem, OrderStatus, OrderWithItems},
};

/// Persist an order and its items in one transaction: header first with a
/// zero total, then the items with prices and snapshots fixed at creation
/// time, then the header again with the accumulated total. A failure anywhere
/// rolls the whole order back.
pub async fn create_order_with_items(
    pool: &PgPool,
    order_code: &str,
    req: &CreateOrderRequest,
    items: &[NewOrderItem],
) -> Result<Order> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (order_code, customer_name, customer_phone, customer_email,
         shipping_address, ward, district, city, notes, total_amount, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, 'pending')
         RETURNING *",
    )
    .bind(order_code)
    .bind(&req.customer_name)
    .bind(&req.customer_phone)
    .bind(&req.customer_email)
    .bind(&req.shipping_address)
    .bind(&req.ward)
    .bind(&req.district)
    .bind(&req.city)
    .bind(&req.notes)
    .fetch_one(&mut *tx)
    .await?;

    let mut total_amount = Decimal::ZERO;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, total_price,
             product_snapshot)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.total_price)
        .bind(Json(&item.snapshot))
        .execute(&mut *tx)
        .await?;

        total_amount += item.total_price;
    }

    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET total_amount = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(total_amount)
    .bind(order.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn find_by_code(pool: &PgPool, order_code: &str) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_code = $1")
        .bind(order_code)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn find_items(pool: &PgPool, order_id: i32) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn find_items_for_orders(
    pool: &PgPool,
    order_ids: &[i32],
) -> Result<HashMap<i32, Vec<OrderItem>>> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id ASC",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut items_map: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    Ok(items_map)
}

/// Attach items to a page of orders with one batched lookup.
pub async fn attach_items(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderWithItems>> {
    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut items_map = find_items_for_orders(pool, &order_ids).await?;

    Ok(orders
        .into_iter()
        .map(|order| OrderWithItems {
            items: items_map.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}

/// A page of orders, newest first, plus the total count.
pub async fn find_page(pool: &PgPool, page: i64, limit: i64) -> Result<(Vec<Order>, i64)> {
    let offset = (page - 1) * limit;

    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    Ok((orders, total))
}

pub async fn find_by_status(pool: &PgPool, status: OrderStatus) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE status = $1 ORDER BY created_at DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn update_status(
    pool: &PgPool,
    order_code: &str,
    status: OrderStatus,
) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = NOW()
         WHERE order_code = $2 RETURNING *",
    )
    .bind(status)
    .bind(order_code)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Remove an order and its items; items go first to satisfy the foreign key.
pub async fn delete_with_items(pool: &PgPool, order_id: i32) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
