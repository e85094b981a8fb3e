use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ApiResponse, BroadcastReport, MessageResponse, NewsletterSubscriber, Promotion,
        SubscribeRequest, SubscriberListResponse, SubscriberSummary,
    },
    queries::{newsletter_queries, promotion_queries},
    services::{email_service, newsletter_service},
    utils::extractors::Locale,
};

pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<ApiResponse<SubscriberSummary>>> {
    if let Some(email) = payload.email.as_deref().filter(|e| !e.is_empty()) {
        if newsletter_queries::find_by_email(&state.db, email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Email is already subscribed to newsletters".to_string(),
            ));
        }
    }

    let subscriber = newsletter_queries::create(&state.db, &payload).await?;

    tracing::info!("New subscriber added: {:?}", subscriber.email);

    Ok(Json(ApiResponse::new(
        "Successfully subscribed to newsletters",
        SubscriberSummary {
            id: subscriber.id,
            email: subscriber.email,
            full_name: subscriber.full_name,
        },
    )))
}

/// Send one promotion to one subscriber. Unlike order notifications this is
/// the operation itself, so a transport failure surfaces to the caller.
pub async fn send_to_subscriber(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path((subscriber_id, promotion_id)): Path<(i32, i32)>,
) -> Result<Json<MessageResponse>> {
    let subscriber = find_subscriber(&state, subscriber_id).await?;
    let promotion = find_promotion(&state, promotion_id).await?;

    email_service::send_newsletter(&state.ses, &state.config.email, &subscriber, &promotion, &locale)
        .await?;

    tracing::info!(
        "Newsletter sent to {:?} (promotion: {}, locale: {})",
        subscriber.email,
        promotion_id,
        locale
    );

    let message = if locale == "vi" {
        format!(
            "Đã gửi tin tức đến {} thành công",
            subscriber.email.as_deref().unwrap_or_default()
        )
    } else {
        format!(
            "Newsletter sent to {} successfully",
            subscriber.email.as_deref().unwrap_or_default()
        )
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Broadcast a promotion to the whole list, batched.
pub async fn send_to_all(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(promotion_id): Path<i32>,
) -> Result<Json<BroadcastReport>> {
    let promotion = find_promotion(&state, promotion_id).await?;
    let subscribers = newsletter_queries::find_all(&state.db).await?;

    let report = newsletter_service::broadcast(
        &state.ses,
        &state.config.email,
        &subscribers,
        &promotion,
        &locale,
    )
    .await;

    Ok(Json(report))
}

pub async fn get_all_subscribers(
    State(state): State<AppState>,
) -> Result<Json<SubscriberListResponse>> {
    let subscribers = newsletter_queries::find_all(&state.db).await?;

    Ok(Json(SubscriberListResponse {
        count: subscribers.len(),
        data: subscribers,
    }))
}

pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(subscriber_id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let subscriber = find_subscriber(&state, subscriber_id).await?;

    newsletter_queries::delete(&state.db, subscriber_id).await?;

    tracing::info!(
        "Subscriber deleted: {:?} (ID: {})",
        subscriber.email,
        subscriber_id
    );

    Ok(Json(MessageResponse::new(format!(
        "Subscriber {} has been successfully deleted",
        subscriber.email.as_deref().unwrap_or_default()
    ))))
}

async fn find_subscriber(state: &AppState, id: i32) -> Result<NewsletterSubscriber> {
    newsletter_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Newsletter subscriber with ID {} not found", id))
        })
}

async fn find_promotion(state: &AppState, id: i32) -> Result<Promotion> {
    promotion_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Promotion with ID {} not found", id)))
}
