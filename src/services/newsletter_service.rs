use std::time::Duration;

use aws_sdk_sesv2::Client as SesClient;
use futures::future::join_all;

use crate::{
    config::EmailConfig,
    models::{BroadcastReport, NewsletterSubscriber, Promotion},
    services::email_service,
};

/// Subscribers per concurrent send wave. Bounds the number of open SES
/// connections during a campaign.
const BATCH_SIZE: usize = 10;
const BATCH_DELAY: Duration = Duration::from_secs(1);

/// Send a promotion to every subscriber in batches, waiting for each batch to
/// settle and pausing between batches. Per-recipient failures are collected
/// into the report and never abort the campaign.
pub async fn broadcast(
    ses: &SesClient,
    email: &EmailConfig,
    subscribers: &[NewsletterSubscriber],
    promotion: &Promotion,
    locale: &str,
) -> BroadcastReport {
    if subscribers.is_empty() {
        tracing::warn!("No subscribers found");
        return BroadcastReport {
            total_sent: 0,
            total_failed: 0,
            details: vec!["No subscribers found".to_string()],
        };
    }

    let mut total_sent = 0;
    let mut total_failed = 0;
    let mut details = Vec::new();

    for (batch_index, batch) in subscribers.chunks(BATCH_SIZE).enumerate() {
        if batch_index > 0 {
            tokio::time::sleep(BATCH_DELAY).await;
        }

        let results = join_all(
            batch
                .iter()
                .map(|subscriber| email_service::send_newsletter(ses, email, subscriber, promotion, locale)),
        )
        .await;

        for (subscriber, result) in batch.iter().zip(results) {
            let recipient = subscriber.email.as_deref().unwrap_or("<no email>");
            match result {
                Ok(()) => {
                    total_sent += 1;
                    tracing::info!(
                        "Newsletter sent to {} (promotion: {}, locale: {})",
                        recipient,
                        promotion.id,
                        locale
                    );
                }
                Err(e) => {
                    total_failed += 1;
                    let detail = format!("Failed to send to {}: {}", recipient, e);
                    tracing::error!("{}", detail);
                    details.push(detail);
                }
            }
        }
    }

    tracing::info!(
        "Newsletter campaign completed: {} sent, {} failed (promotion: {})",
        total_sent,
        total_failed,
        promotion.id
    );

    if total_failed == 0 {
        details = vec![format!("Successfully sent to {} subscribers", total_sent)];
    }

    BroadcastReport {
        total_sent,
        total_failed,
        details,
    }
}
