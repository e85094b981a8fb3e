pub mod category_queries;
pub mod newsletter_queries;
pub mod order_queries;
pub mod product_queries;
pub mod promotion_queries;
pub mod search_queries;
pub mod stats_queries;
pub mod user_queries;
