pub mod handlers;

pub use handlers::*;

use crate::service::ProcurementQueries;
use crate::upstream::ExtractionClient;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 上传文件大小上限
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// 构建全部路由
pub fn router(queries: Arc<ProcurementQueries>, client: Arc<ExtractionClient>) -> Router {
    // CSV 聚合路由
    let dashboard_routes = Router::new()
        .route("/api/purchase-orders", get(handlers::list_purchase_orders))
        .route("/api/invoices", get(handlers::list_invoices))
        .route("/api/goods-received", get(handlers::list_goods_received))
        .route("/api/overview", get(handlers::overview))
        .with_state(queries);

    // 外部后端代理路由
    let proxy_routes = Router::new()
        .route("/api/backend/:kind", get(handlers::backend_list))
        .route("/api/extract-invoice", post(handlers::extract_invoice))
        .route("/api/extract-and-match", post(handlers::extract_and_match))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)))
        .with_state(client);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(dashboard_routes)
        .merge(proxy_routes)
}
