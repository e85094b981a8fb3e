use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, Result, is_unique_violation},
    models::{
        Category, CreateProductRequest, LocalizedText, Product, ProductDetail, ProductImage,
        ProductSort, UpdateProductRequest,
    },
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_by_name(pool: &PgPool, name: &LocalizedText) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE name = $1")
        .bind(Json(name))
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_images_by_product_id(pool: &PgPool, id: i32) -> Result<Vec<ProductImage>> {
    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = $1 ORDER BY id ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn find_images_by_product_ids(
    pool: &PgPool,
    product_ids: &[i32],
) -> Result<HashMap<i32, Vec<ProductImage>>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = ANY($1) ORDER BY product_id, id ASC",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    let mut images_map: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for image in images {
        images_map.entry(image.product_id).or_default().push(image);
    }

    Ok(images_map)
}

/// Attach category and images to a page of products with two batched lookups.
pub async fn attach_details(pool: &PgPool, products: Vec<Product>) -> Result<Vec<ProductDetail>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let category_ids: Vec<i32> = products.iter().filter_map(|p| p.category_id).collect();

    let mut images_map = find_images_by_product_ids(pool, &product_ids).await?;

    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ANY($1)")
        .bind(&category_ids)
        .fetch_all(pool)
        .await?;
    let categories_map: HashMap<i32, Category> =
        categories.into_iter().map(|c| (c.id, c)).collect();

    let details = products
        .into_iter()
        .map(|product| ProductDetail {
            category: product
                .category_id
                .and_then(|id| categories_map.get(&id).cloned()),
            images: images_map.remove(&product.id).unwrap_or_default(),
            product,
        })
        .collect();

    Ok(details)
}

pub async fn find_detail(pool: &PgPool, id: i32) -> Result<Option<ProductDetail>> {
    let Some(product) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    Ok(attach_details(pool, vec![product]).await?.pop())
}

/// All products with the given active flag, with category and images.
pub async fn find_by_active(pool: &PgPool, is_active: bool) -> Result<Vec<ProductDetail>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE is_active = $1 ORDER BY id ASC",
    )
    .bind(is_active)
    .fetch_all(pool)
    .await?;

    attach_details(pool, products).await
}

/// Active products sorted for the storefront listing.
pub async fn find_sorted(pool: &PgPool, sort: Option<ProductSort>) -> Result<Vec<ProductDetail>> {
    let order_by = match sort {
        Some(ProductSort::PriceAsc) => "total_price ASC",
        Some(ProductSort::PriceDesc) => "total_price DESC",
        Some(ProductSort::ViewsDesc) => "view_count DESC",
        None => "created_at DESC",
    };

    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT * FROM products WHERE is_active = TRUE ORDER BY {}",
        order_by
    ))
    .fetch_all(pool)
    .await?;

    attach_details(pool, products).await
}

/// Resolve the products an order refers to, requiring every id to exist and be
/// active. Returns them with their images for snapshotting.
pub async fn find_active_by_ids(
    pool: &PgPool,
    ids: &[i32],
) -> Result<HashMap<i32, (Product, Vec<ProductImage>)>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE is_active = TRUE AND id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let mut images_map = find_images_by_product_ids(pool, &product_ids).await?;

    Ok(products
        .into_iter()
        .map(|product| {
            let images = images_map.remove(&product.id).unwrap_or_default();
            (product.id, (product, images))
        })
        .collect())
}

/// Insert a product and its image rows in one transaction. The unique check
/// on the name is done by the caller; a concurrent duplicate still surfaces
/// as a conflict here.
pub async fn create(pool: &PgPool, req: &CreateProductRequest) -> Result<Product> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, description, price, total_price, brand, product_code,
         color, origin, material, size, specifications, category_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING *",
    )
    .bind(Json(&req.name))
    .bind(req.description.as_ref().map(Json))
    .bind(req.price)
    .bind(req.total_price)
    .bind(&req.brand)
    .bind(&req.product_code)
    .bind(&req.color)
    .bind(req.origin.as_ref().map(Json))
    .bind(req.material.as_ref().map(Json))
    .bind(&req.size)
    .bind(req.specifications.as_ref().map(Json))
    .bind(req.category_id)
    .fetch_one(&mut *tx)
    .await;

    let product = match result {
        Ok(product) => product,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict("Product name already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    if !req.image_urls.is_empty() {
        insert_images(&mut tx, product.id, &req.image_urls).await?;
    }

    tx.commit().await?;
    Ok(product)
}

async fn insert_images(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    product_id: i32,
    urls: &[String],
) -> Result<()> {
    let mut query_builder =
        QueryBuilder::<Postgres>::new("INSERT INTO product_images (product_id, url) ");

    query_builder.push_values(urls, |mut b, url| {
        b.push_bind(product_id).push_bind(url);
    });

    query_builder.build().execute(&mut **tx).await?;
    Ok(())
}

/// Partial update. Locale maps supplied in the request replace the stored
/// ones wholesale; supplying image URLs replaces the whole image set.
pub async fn update(pool: &PgPool, id: i32, req: UpdateProductRequest) -> Result<Option<Product>> {
    let mut tx = pool.begin().await?;

    let mut query_builder = QueryBuilder::<Postgres>::new("UPDATE products SET ");
    let mut has_fields = false;

    if let Some(name) = req.name {
        query_builder.push("name = ");
        query_builder.push_bind(Json(name));
        has_fields = true;
    }

    if let Some(description) = req.description {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("description = ");
        query_builder.push_bind(Json(description));
        has_fields = true;
    }

    if let Some(price) = req.price {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("price = ");
        query_builder.push_bind(price);
        has_fields = true;
    }

    if let Some(total_price) = req.total_price {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("total_price = ");
        query_builder.push_bind(total_price);
        has_fields = true;
    }

    if let Some(category_id) = req.category_id {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("category_id = ");
        query_builder.push_bind(category_id);
        has_fields = true;
    }

    if let Some(brand) = req.brand {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("brand = ");
        query_builder.push_bind(brand);
        has_fields = true;
    }

    if let Some(product_code) = req.product_code {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("product_code = ");
        query_builder.push_bind(product_code);
        has_fields = true;
    }

    if let Some(color) = req.color {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("color = ");
        query_builder.push_bind(color);
        has_fields = true;
    }

    if let Some(size) = req.size {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("size = ");
        query_builder.push_bind(size);
        has_fields = true;
    }

    if let Some(origin) = req.origin {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("origin = ");
        query_builder.push_bind(Json(origin));
        has_fields = true;
    }

    if let Some(material) = req.material {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("material = ");
        query_builder.push_bind(Json(material));
        has_fields = true;
    }

    if let Some(specifications) = req.specifications {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("specifications = ");
        query_builder.push_bind(Json(specifications));
        has_fields = true;
    }

    let product = if has_fields {
        query_builder.push(", updated_at = NOW() WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING *");

        query_builder
            .build_query_as::<Product>()
            .fetch_optional(&mut *tx)
            .await?
    } else {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
    };

    let Some(product) = product else {
        tx.rollback().await?;
        return Ok(None);
    };

    if let Some(urls) = &req.image_urls {
        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if !urls.is_empty() {
            insert_images(&mut tx, id, urls).await?;
        }
    }

    tx.commit().await?;
    Ok(Some(product))
}

/// Bump the view counter and return the fresh row.
pub async fn increment_view_count(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET view_count = view_count + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn set_active(pool: &PgPool, id: i32, is_active: bool) -> Result<bool> {
    let result =
        sqlx::query("UPDATE products SET is_active = $1, updated_at = NOW() WHERE id = $2")
            .bind(is_active)
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn hard_delete(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Active products whose own name or category name matches any of the given
/// keywords for one locale, newest first. Feeds the curated showcases.
pub async fn find_by_keywords(
    pool: &PgPool,
    keywords: &[&str],
    locale: &str,
) -> Result<Vec<ProductDetail>> {
    if keywords.is_empty() {
        return Ok(Vec::new());
    }

    let mut query_builder = QueryBuilder::<Postgres>::new(
        "SELECT p.* FROM products p
         LEFT JOIN categories c ON c.id = p.category_id
         WHERE p.is_active = TRUE AND (",
    );

    for (i, keyword) in keywords.iter().enumerate() {
        if i > 0 {
            query_builder.push(" OR ");
        }
        let pattern = format!("%{}%", keyword.to_lowercase());
        query_builder.push("LOWER(c.name ->> ");
        query_builder.push_bind(locale.to_string());
        query_builder.push(") LIKE ");
        query_builder.push_bind(pattern.clone());
        query_builder.push(" OR LOWER(p.name ->> ");
        query_builder.push_bind(locale.to_string());
        query_builder.push(") LIKE ");
        query_builder.push_bind(pattern);
    }

    query_builder.push(") ORDER BY p.created_at DESC");

    let products = query_builder
        .build_query_as::<Product>()
        .fetch_all(pool)
        .await?;

    attach_details(pool, products).await
}
