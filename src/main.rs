use procurement_dashboard::{api, AppConfig, ExtractionClient, ProcurementQueries};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式, 级别由 RUST_LOG 控制 (默认 info)
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // CSV 查询服务 + 外部后端客户端
    let queries = Arc::new(ProcurementQueries::from_config(&config.fixtures)?);
    let client = Arc::new(ExtractionClient::from_config(&config.backend)?);
    info!("Reading fixtures from {}", config.fixtures.dir.display());
    info!("Extraction backend at {}", client.base_url());

    let app = api::router(queries, client);

    // 启动服务器
    let addr = config.bind_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/purchase-orders    - CSV purchase orders");
    info!("  GET  /api/invoices           - CSV invoices");
    info!("  GET  /api/goods-received     - CSV goods received notes");
    info!("  GET  /api/overview           - dashboard counts");
    info!("  GET  /api/backend/:kind      - backend list proxy");
    info!("  POST /api/extract-invoice    - extraction proxy");
    info!("  POST /api/extract-and-match  - extraction + matching proxy");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
