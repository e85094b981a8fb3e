use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{AdvancedSearchQuery, Category, Product, ProductDetail},
    queries::product_queries,
};

/// Active categories whose name matches the query in either locale, for the
/// search-box suggestion dropdown.
pub async fn category_suggestions(pool: &PgPool, query: Option<&str>) -> Result<Vec<Category>> {
    let mut query_builder = QueryBuilder::<Postgres>::new(
        "SELECT * FROM categories WHERE is_active = TRUE",
    );

    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q);
        query_builder.push(" AND (name ->> 'vi' ILIKE ");
        query_builder.push_bind(pattern.clone());
        query_builder.push(" OR name ->> 'en' ILIKE ");
        query_builder.push_bind(pattern);
        query_builder.push(")");
    }

    query_builder.push(" ORDER BY name ASC");

    let categories = query_builder
        .build_query_as::<Category>()
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

/// Keyword search over active products in active categories: localized name
/// or product code, case-insensitive partial match.
pub async fn search_products(
    pool: &PgPool,
    query: &str,
    page: i64,
    limit: i64,
) -> Result<(Vec<ProductDetail>, i64)> {
    let pattern = format!("%{}%", query.trim());

    let push_filters = |qb: &mut QueryBuilder<Postgres>| {
        qb.push(
            " FROM products p
             INNER JOIN categories c ON c.id = p.category_id
             WHERE p.is_active = TRUE AND c.is_active = TRUE
             AND (p.name ->> 'vi' ILIKE ",
        );
        qb.push_bind(pattern.clone());
        qb.push(" OR p.name ->> 'en' ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.product_code ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(")");
    };

    let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
    push_filters(&mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut select_builder = QueryBuilder::<Postgres>::new("SELECT p.*");
    push_filters(&mut select_builder);
    select_builder.push(" ORDER BY p.created_at DESC LIMIT ");
    select_builder.push_bind(limit);
    select_builder.push(" OFFSET ");
    select_builder.push_bind((page - 1) * limit);

    let products = select_builder
        .build_query_as::<Product>()
        .fetch_all(pool)
        .await?;

    let details = product_queries::attach_details(pool, products).await?;
    Ok((details, total))
}

/// Active products of one active category, paginated.
pub async fn products_by_category(
    pool: &PgPool,
    category_id: i32,
    page: i64,
    limit: i64,
) -> Result<(Vec<ProductDetail>, i64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM products p
         INNER JOIN categories c ON c.id = p.category_id
         WHERE p.is_active = TRUE AND c.is_active = TRUE AND c.id = $1",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    let products = sqlx::query_as::<_, Product>(
        "SELECT p.* FROM products p
         INNER JOIN categories c ON c.id = p.category_id
         WHERE p.is_active = TRUE AND c.is_active = TRUE AND c.id = $1
         ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(category_id)
    .bind(limit)
    .bind((page - 1) * limit)
    .fetch_all(pool)
    .await?;

    let details = product_queries::attach_details(pool, products).await?;
    Ok((details, total))
}

/// Advanced search: every supplied predicate is ANDed. Price bounds are
/// inclusive.
pub async fn advanced_search(
    pool: &PgPool,
    filters: &AdvancedSearchQuery,
    page: i64,
    limit: i64,
) -> Result<(Vec<ProductDetail>, i64)> {
    let push_filters = |qb: &mut QueryBuilder<Postgres>| {
        qb.push(
            " FROM products p
             INNER JOIN categories c ON c.id = p.category_id
             WHERE p.is_active = TRUE AND c.is_active = TRUE",
        );

        if let Some(q) = filters.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", q);
            qb.push(" AND (p.name ->> 'vi' ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.name ->> 'en' ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.product_code ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category_id) = filters.category_id {
            qb.push(" AND c.id = ");
            qb.push_bind(category_id);
        }

        if let Some(min_price) = filters.min_price {
            qb.push(" AND p.price >= ");
            qb.push_bind(min_price);
        }

        if let Some(max_price) = filters.max_price {
            qb.push(" AND p.price <= ");
            qb.push_bind(max_price);
        }

        if let Some(brand) = filters.brand.as_deref().filter(|b| !b.is_empty()) {
            qb.push(" AND p.brand ILIKE ");
            qb.push_bind(format!("%{}%", brand));
        }

        if let Some(color) = filters.color.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND p.color ILIKE ");
            qb.push_bind(format!("%{}%", color));
        }

        if let Some(size) = filters.size.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND p.size ILIKE ");
            qb.push_bind(format!("%{}%", size));
        }
    };

    let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
    push_filters(&mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut select_builder = QueryBuilder::<Postgres>::new("SELECT p.*");
    push_filters(&mut select_builder);
    select_builder.push(" ORDER BY p.created_at DESC LIMIT ");
    select_builder.push_bind(limit);
    select_builder.push(" OFFSET ");
    select_builder.push_bind((page - 1) * limit);

    let products = select_builder
        .build_query_as::<Product>()
        .fetch_all(pool)
        .await?;

    let details = product_queries::attach_details(pool, products).await?;
    Ok((details, total))
}
