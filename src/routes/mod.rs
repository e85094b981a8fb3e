mod auth;
mod categories;
mod health;
mod newsletters;
mod orders;
mod products;
mod promotions;
mod search;
mod statistical;
mod users;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};

use crate::{AppState, middleware};

/// Everything under `/apis/svc` sits behind the static API-key gate; the
/// health endpoints stay outside it for the load balancer.
pub fn create_router(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .nest("/orders", orders_router())
        .nest("/products", products_router())
        .nest("/categories", categories_router())
        .nest("/search", search_router())
        .nest("/auth", auth_router())
        .nest("/statistical", statistical_router())
        .nest("/newsletters", newsletters_router())
        .nest("/promotion", promotions_router())
        .nest("/users", users_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::api_key_guard,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/apis/svc", api)
}

/// Order routes authorize inside the handlers: the public lookup-by-code
/// route shares its path shape with the admin delete-by-id route, which
/// rules out per-route middleware layers here.
fn orders_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(orders::create_order))
        .route("/all", get(orders::get_all_orders))
        .route(
            "/status/:value",
            get(orders::get_orders_by_status).patch(orders::update_order_status),
        )
        .route("/code/:order_code", delete(orders::delete_order_by_code))
        .route("/cancel", put(orders::cancel_order))
        .route("/:order_code", get(orders::get_order).delete(orders::delete_order))
}

fn products_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/create", post(products::create_product))
        .route("/update/:id", patch(products::update_product))
        .route("/delete/:id", delete(products::soft_delete_product))
        .route("/restore/:id", patch(products::restore_product))
        .route("/hard-delete/:id", delete(products::hard_delete_product))
        .route_layer(axum_middleware::from_fn(middleware::admin_middleware));

    let authed = Router::new()
        .route("/list", get(products::list_products))
        .route("/list-delete", get(products::list_deleted_products))
        .route("/list-sort", get(products::list_sorted_products))
        .route("/detail/:id", get(products::get_product))
        .route_layer(axum_middleware::from_fn(middleware::auth_middleware));

    let public = Router::new()
        .route("/kitchen", get(products::kitchen_products))
        .route("/tech", get(products::tech_products));

    admin.merge(authed).merge(public)
}

fn categories_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(categories::create_category))
        .route("/list", get(categories::list_categories))
        .route("/list-delete", get(categories::list_deleted_categories))
        .route("/detail/:id", get(categories::get_category))
        .route("/update/:id", patch(categories::update_category))
        .route("/delete/:id", delete(categories::soft_delete_category))
        .route("/restore/:id", patch(categories::restore_category))
        .route("/hard-delete/:id", delete(categories::hard_delete_category))
}

fn search_router() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(search::suggestions))
        .route("/products", get(search::search_products))
        .route("/category/:id/products", get(search::products_by_category))
        .route("/advanced", get(search::advanced_search))
}

fn auth_router() -> Router<AppState> {
    let authed = Router::new()
        .route("/me", get(auth::me))
        .route_layer(axum_middleware::from_fn(middleware::auth_middleware));

    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(authed)
}

fn statistical_router() -> Router<AppState> {
    Router::new()
        .route("/analytics/overview", get(statistical::overview))
        .route("/analytics/monthly/:year", get(statistical::monthly))
        .route("/analytics/yearly/:year", get(statistical::yearly))
        .route(
            "/analytics/top-selling-products",
            get(statistical::top_selling_products),
        )
        .route_layer(axum_middleware::from_fn(middleware::auth_middleware))
}

fn newsletters_router() -> Router<AppState> {
    let admin = Router::new()
        .route(
            "/send/:subscriber_id/promotion/:promotion_id",
            post(newsletters::send_to_subscriber),
        )
        .route(
            "/send-all/promotion/:promotion_id",
            post(newsletters::send_to_all),
        )
        .route("/:subscriber_id", delete(newsletters::delete_subscriber))
        .route_layer(axum_middleware::from_fn(middleware::admin_middleware));

    let authed = Router::new()
        .route("/get-all-subscribers", get(newsletters::get_all_subscribers))
        .route_layer(axum_middleware::from_fn(middleware::auth_middleware));

    Router::new()
        .route("/subscribe", post(newsletters::subscribe))
        .merge(admin)
        .merge(authed)
}

fn promotions_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/create", post(promotions::create_promotion))
        .route("/update/:id", patch(promotions::update_promotion))
        .route("/delete/:id", delete(promotions::delete_promotion))
        .route_layer(axum_middleware::from_fn(middleware::admin_middleware));

    Router::new()
        .route("/list", get(promotions::list_promotions))
        .route("/list-latest", get(promotions::latest_promotions))
        .route("/detail/:id", get(promotions::get_promotion))
        .merge(admin)
}

fn users_router() -> Router<AppState> {
    Router::new().route("/seed", get(users::seed))
}
