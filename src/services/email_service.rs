use aws_sdk_sesv2::Client as SesClient;
use rust_decimal::Decimal;

use crate::{
    config::EmailConfig,
    error::{AppError, Result},
    models::{NewsletterSubscriber, Order, OrderItem, OrderWithItems, Promotion},
};

const BASE_TEMPLATE: &str = include_str!("../utils/templates/base.html");
const ORDER_CONFIRMATION: &str = include_str!("../utils/templates/order-confirmation.html");
const NEW_ORDER_ADMIN: &str = include_str!("../utils/templates/new-order-admin.html");
const ORDER_APPROVED: &str = include_str!("../utils/templates/order-approved.html");
const ORDER_SHIPPING: &str = include_str!("../utils/templates/order-shipping.html");
const ORDER_DELIVERED: &str = include_str!("../utils/templates/order-delivered.html");
const ORDER_CANCELLED: &str = include_str!("../utils/templates/order-cancelled.html");
const NEWSLETTER: &str = include_str!("../utils/templates/newsletter.html");

pub async fn send_order_confirmation(
    ses: &SesClient,
    email: &EmailConfig,
    order: &OrderWithItems,
) -> Result<()> {
    let content = ORDER_CONFIRMATION
        .replace("{{customer_name}}", &order.order.customer_name)
        .replace("{{order_code}}", &order.order.order_code)
        .replace("{{shipping_info}}", &render_shipping_info(&order.order))
        .replace("{{items_rows}}", &render_items_rows(&order.items))
        .replace("{{total_amount}}", &format_vnd(order.order.total_amount));

    send_html_email(
        ses,
        email,
        &order.order.customer_email,
        &format!("[Nestira] Xác nhận đơn hàng: ID #{}", order.order.order_code),
        &wrap_base("Xác nhận đơn hàng", &content),
    )
    .await
}

pub async fn send_new_order_admin(
    ses: &SesClient,
    email: &EmailConfig,
    order: &OrderWithItems,
) -> Result<()> {
    let content = NEW_ORDER_ADMIN
        .replace("{{order_code}}", &order.order.order_code)
        .replace("{{customer_name}}", &order.order.customer_name)
        .replace("{{customer_phone}}", &order.order.customer_phone)
        .replace("{{customer_email}}", &order.order.customer_email)
        .replace("{{shipping_info}}", &render_shipping_info(&order.order))
        .replace("{{items_rows}}", &render_items_rows(&order.items))
        .replace("{{total_amount}}", &format_vnd(order.order.total_amount));

    send_html_email(
        ses,
        email,
        &email.admin_address,
        &format!("[Nestira] Đơn hàng mới: ID #{}", order.order.order_code),
        &wrap_base("Đơn hàng mới", &content),
    )
    .await
}

pub async fn send_order_approved(ses: &SesClient, email: &EmailConfig, order: &Order) -> Result<()> {
    let content = ORDER_APPROVED
        .replace("{{customer_name}}", &order.customer_name)
        .replace("{{order_code}}", &order.order_code)
        .replace("{{total_amount}}", &format_vnd(order.total_amount));

    send_html_email(
        ses,
        email,
        &order.customer_email,
        &format!("[Nestira] Đơn hàng đã được xác nhận: ID #{}", order.order_code),
        &wrap_base("Đơn hàng đã được xác nhận", &content),
    )
    .await
}

pub async fn send_order_shipping(ses: &SesClient, email: &EmailConfig, order: &Order) -> Result<()> {
    let content = ORDER_SHIPPING
        .replace("{{customer_name}}", &order.customer_name)
        .replace("{{order_code}}", &order.order_code)
        .replace("{{shipping_info}}", &render_shipping_info(order));

    send_html_email(
        ses,
        email,
        &order.customer_email,
        &format!("[Nestira] Đơn hàng đang được giao: ID #{}", order.order_code),
        &wrap_base("Đơn hàng đang được giao", &content),
    )
    .await
}

pub async fn send_order_delivered(ses: &SesClient, email: &EmailConfig, order: &Order) -> Result<()> {
    let content = ORDER_DELIVERED
        .replace("{{customer_name}}", &order.customer_name)
        .replace("{{order_code}}", &order.order_code);

    send_html_email(
        ses,
        email,
        &order.customer_email,
        &format!(
            "[Nestira] Đơn hàng đã được giao thành công: ID #{}",
            order.order_code
        ),
        &wrap_base("Đơn hàng đã được giao", &content),
    )
    .await
}

pub async fn send_order_cancelled(ses: &SesClient, email: &EmailConfig, order: &Order) -> Result<()> {
    let content = ORDER_CANCELLED
        .replace("{{customer_name}}", &order.customer_name)
        .replace("{{order_code}}", &order.order_code);

    send_html_email(
        ses,
        email,
        &order.customer_email,
        &format!("[Nestira] Đơn hàng đã bị hủy: ID #{}", order.order_code),
        &wrap_base("Đơn hàng đã bị hủy", &content),
    )
    .await
}

pub async fn send_newsletter(
    ses: &SesClient,
    email: &EmailConfig,
    subscriber: &NewsletterSubscriber,
    promotion: &Promotion,
    locale: &str,
) -> Result<()> {
    let recipient = subscriber.email.as_deref().ok_or_else(|| {
        AppError::BadRequest("Subscriber has no email address".to_string())
    })?;

    let thumbnail_block = promotion
        .thumbnail
        .as_deref()
        .map(|url| format!("<img src=\"{}\" alt=\"promotion\" style=\"max-width: 100%;\">", url))
        .unwrap_or_default();

    let content = NEWSLETTER
        .replace(
            "{{subscriber_name}}",
            subscriber.full_name.as_deref().unwrap_or("bạn"),
        )
        .replace("{{promotion_title}}", &promotion.title.resolve_or_empty(locale))
        .replace(
            "{{promotion_content}}",
            &promotion
                .content
                .as_ref()
                .map(|c| c.resolve_or_empty(locale))
                .unwrap_or_default(),
        )
        .replace("{{thumbnail_block}}", &thumbnail_block);

    let subject = if locale == "vi" {
        "[Nestira] Tin khuyến mãi mới"
    } else {
        "[Nestira] New Promotion"
    };

    send_html_email(
        ses,
        email,
        recipient,
        subject,
        &wrap_base(subject, &content),
    )
    .await
}

async fn send_html_email(
    ses: &SesClient,
    email: &EmailConfig,
    recipient: &str,
    subject: &str,
    html: &str,
) -> Result<()> {
    let destination = aws_sdk_sesv2::types::Destination::builder()
        .to_addresses(recipient)
        .build();

    let subject = aws_sdk_sesv2::types::Content::builder()
        .data(subject)
        .charset("UTF-8")
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to build subject: {}", e)))?;

    let html_body = aws_sdk_sesv2::types::Content::builder()
        .data(html)
        .charset("UTF-8")
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to build HTML body: {}", e)))?;

    let body = aws_sdk_sesv2::types::Body::builder().html(html_body).build();

    let message = aws_sdk_sesv2::types::Message::builder()
        .subject(subject)
        .body(body)
        .build();

    let content = aws_sdk_sesv2::types::EmailContent::builder()
        .simple(message)
        .build();

    ses.send_email()
        .from_email_address(&email.from_address)
        .destination(destination)
        .content(content)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Failed to send email to {}: {:?}", recipient, e);
            AppError::InternalError("Failed to send email".to_string())
        })?;

    tracing::info!("Email sent to {}", recipient);

    Ok(())
}

fn wrap_base(title: &str, content: &str) -> String {
    BASE_TEMPLATE
        .replace("{{title}}", title)
        .replace("{{content}}", content)
}

fn render_shipping_info(order: &Order) -> String {
    format!(
        "<div class=\"info-box\">\
         <p><strong>Địa chỉ giao hàng:</strong> {}, {}, {}, {}</p>\
         <p><strong>Ghi chú:</strong> {}</p>\
         </div>",
        order.shipping_address,
        order.ward,
        order.district,
        order.city,
        order.notes.as_deref().unwrap_or("Không có"),
    )
}

fn render_items_rows(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td>\
                 <td style=\"text-align: center;\">{}</td>\
                 <td style=\"text-align: right;\">{}đ</td>\
                 <td style=\"text-align: right;\">{}đ</td></tr>",
                item.product_snapshot.name.resolve_or_empty("vi"),
                item.quantity,
                format_vnd(item.unit_price),
                format_vnd(item.total_price),
            )
        })
        .collect()
}

/// Format a VND amount with dot thousands separators, e.g. `18.500.000`.
fn format_vnd(amount: Decimal) -> String {
    let plain = amount.trunc().to_string();
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocalizedText, ProductSnapshot};
    use chrono::Utc;
    use sqlx::types::Json;

    #[test]
    fn vnd_formatting_groups_by_thousands() {
        assert_eq!(format_vnd(Decimal::from(0)), "0");
        assert_eq!(format_vnd(Decimal::from(950)), "950");
        assert_eq!(format_vnd(Decimal::from(18_500_000_i64)), "18.500.000");
        assert_eq!(format_vnd(Decimal::from(-1_200_i64)), "-1.200");
    }

    #[test]
    fn items_rows_use_vietnamese_snapshot_name() {
        let items = vec![OrderItem {
            id: 1,
            order_id: 1,
            product_id: Some(9),
            quantity: 2,
            unit_price: Decimal::from(500_000_i64),
            total_price: Decimal::from(1_000_000_i64),
            product_snapshot: Json(ProductSnapshot {
                id: 9,
                name: LocalizedText::new("máy pha cà phê", "coffee machine"),
                brand: None,
                product_code: None,
                color: None,
                size: None,
                images: vec![],
            }),
            created_at: Utc::now(),
        }];

        let rows = render_items_rows(&items);
        assert!(rows.contains("máy pha cà phê"));
        assert!(rows.contains("500.000đ"));
        assert!(rows.contains("1.000.000đ"));
    }

    #[test]
    fn base_template_receives_title_and_content() {
        let html = wrap_base("Đơn hàng mới", "<p>hello</p>");
        assert!(html.contains("<title>Đơn hàng mới</title>"));
        assert!(html.contains("<p>hello</p>"));
    }
}
