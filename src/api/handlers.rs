use crate::error::{LoadError, ProxyError};
use crate::models::QueryOutcome;
use crate::service::ProcurementQueries;
use crate::upstream::{BackendList, ExtractionClient, UploadForm, UploadPart};
use axum::{
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// 区分 loaded / no-data / failed 的响应头
pub const LOAD_STATUS_HEADER: &str = "x-load-status";

/// 通用消息响应体
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 采购订单列表 (CSV)
pub async fn list_purchase_orders(State(queries): State<Arc<ProcurementQueries>>) -> Response {
    let outcome = run_query(queries, |q| q.list_purchase_orders()).await;
    outcome_response(outcome)
}

/// 发票列表 (CSV), 以请求时刻评估状态
pub async fn list_invoices(State(queries): State<Arc<ProcurementQueries>>) -> Response {
    let now = Utc::now();
    let outcome = run_query(queries, move |q| q.list_invoices(now)).await;
    outcome_response(outcome)
}

/// 收货单列表 (CSV)
pub async fn list_goods_received(State(queries): State<Arc<ProcurementQueries>>) -> Response {
    let outcome = run_query(queries, |q| q.list_goods_received()).await;
    outcome_response(outcome)
}

/// 仪表盘概览
pub async fn overview(State(queries): State<Arc<ProcurementQueries>>) -> Response {
    let now = Utc::now();
    match tokio::task::spawn_blocking(move || queries.overview(now)).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => {
            tracing::error!("Overview task failed: {}", e);
            let response = MessageResponse {
                success: false,
                message: format!("Error: {}", e),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

/// 后端列表代理 (purchase-orders / invoices / goods-received)
pub async fn backend_list(
    State(client): State<Arc<ExtractionClient>>,
    Path(kind): Path<String>,
) -> Response {
    let Some(list) = BackendList::from_slug(&kind) else {
        let response = MessageResponse {
            success: false,
            message: format!("Unknown list: {}", kind),
        };
        return (StatusCode::NOT_FOUND, Json(response)).into_response();
    };

    match client.list(list).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => proxy_error_response(e),
    }
}

/// 发票提取代理, 转发后端状态码
pub async fn extract_invoice(
    State(client): State<Arc<ExtractionClient>>,
    multipart: Multipart,
) -> Response {
    let result = match read_upload(multipart).await {
        Ok(form) => client.extract(form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(e) => proxy_error_response(e),
    }
}

/// 提取 + 采购订单匹配代理, 转发后端状态码
pub async fn extract_and_match(
    State(client): State<Arc<ExtractionClient>>,
    multipart: Multipart,
) -> Response {
    let result = match read_upload(multipart).await {
        Ok(form) => client.extract_and_match(form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(e) => proxy_error_response(e),
    }
}

/// 在阻塞线程池上执行 CSV 查询
async fn run_query<T, F>(queries: Arc<ProcurementQueries>, query: F) -> QueryOutcome<T>
where
    T: Send + 'static,
    F: FnOnce(&ProcurementQueries) -> QueryOutcome<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || query(&queries)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Query task failed: {}", e);
            QueryOutcome::Failed {
                error: LoadError::Aborted(e.to_string()),
            }
        }
    }
}

/// 失败时返回空数组, 状态放在响应头
fn outcome_response<T: Serialize>(outcome: QueryOutcome<T>) -> Response {
    let status = outcome.status();
    (
        StatusCode::OK,
        [(LOAD_STATUS_HEADER, status.as_str())],
        Json(outcome.into_items()),
    )
        .into_response()
}

fn proxy_error_response(e: ProxyError) -> Response {
    tracing::error!("Error proxying to extraction backend: {} ({})", e, e.details());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(e.to_body())).into_response()
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, ProxyError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::unknown(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ProxyError::unknown(e.to_string()))?
            .to_vec();

        parts.push(UploadPart {
            name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(UploadForm { parts })
}
