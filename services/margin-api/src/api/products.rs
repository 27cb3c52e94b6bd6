//! /api/products

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use marginiq_common::PagedResult;
use marginiq_domain_core::{Product, ProductId};
use serde::Serialize;

use super::params::ProductListParams;
use super::{ApiJson, ApiResult, AppState, ok};
use crate::application::{ProductPatch, UpdateProductCommand};
use crate::domain::ProductStats;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/categories", get(categories))
        .route("/regions", get(regions))
        .route("/suppliers", get(suppliers))
        .route("/stats", get(stats))
        .route("/{id}", get(get_product).put(update_product))
}

/// 商品分页列表
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl From<PagedResult<Product>> for ProductList {
    fn from(page: PagedResult<Product>) -> Self {
        Self {
            products: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

pub(super) async fn list_products_from(
    handler: &AppState,
    params: ProductListParams,
    source: &str,
) -> ApiResult<ProductList> {
    let page = handler.list_products(&params.into_query(), source).await?;
    Ok(ok(page.into()))
}

async fn list_products(
    State(handler): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> ApiResult<ProductList> {
    list_products_from(&handler, params, "products").await
}

async fn get_product(
    State(handler): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    Ok(ok(handler.get_product(&ProductId(id)).await?))
}

async fn update_product(
    State(handler): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<Product> {
    let cmd = UpdateProductCommand {
        product_id: ProductId(id),
        patch,
    };
    Ok(ok(handler.update_product(cmd).await?))
}

async fn categories(State(handler): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ok(handler.product_categories().await?))
}

async fn regions(State(handler): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ok(handler.product_regions().await?))
}

async fn suppliers(State(handler): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ok(handler.product_suppliers().await?))
}

async fn stats(State(handler): State<AppState>) -> ApiResult<ProductStats> {
    Ok(ok(handler.product_stats().await?))
}
