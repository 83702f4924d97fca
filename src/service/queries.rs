use super::{aggregate_goods_received, aggregate_invoices, aggregate_purchase_orders};
use crate::config::FixturesConfig;
use crate::error::ConfigError;
use crate::models::{
    Aggregation, DashboardOverview, GoodsReceived, Invoice, KindSummary, PurchaseOrder,
    QueryOutcome,
};
use crate::source::{RecordLoader, RecordSource};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// 只读查询服务: 每次调用都重新读取并聚合, 无缓存
pub struct ProcurementQueries {
    loader: RecordLoader,
}

impl ProcurementQueries {
    pub fn new(loader: RecordLoader) -> Self {
        Self { loader }
    }

    pub fn from_config(config: &FixturesConfig) -> Result<Self, ConfigError> {
        let loader = RecordLoader::new(&config.dir).with_options(config.load_options()?);
        Ok(Self::new(loader))
    }

    pub fn list_purchase_orders(&self) -> QueryOutcome<PurchaseOrder> {
        self.run(RecordSource::PurchaseOrders, aggregate_purchase_orders)
    }

    /// `now` 为发票状态的评估时刻
    pub fn list_invoices(&self, now: DateTime<Utc>) -> QueryOutcome<Invoice> {
        self.run(RecordSource::Invoices, |rows| aggregate_invoices(rows, now))
    }

    pub fn list_goods_received(&self) -> QueryOutcome<GoodsReceived> {
        self.run(RecordSource::GoodsReceived, aggregate_goods_received)
    }

    /// 三类数据并行加载后汇总计数
    pub fn overview(&self, now: DateTime<Utc>) -> DashboardOverview {
        let (purchase_orders, (invoices, goods_received)) = rayon::join(
            || self.list_purchase_orders(),
            || rayon::join(|| self.list_invoices(now), || self.list_goods_received()),
        );

        DashboardOverview {
            purchase_orders: KindSummary::from_outcome(&purchase_orders, |po| po.status.as_str()),
            invoices: KindSummary::from_outcome(&invoices, |inv| inv.status.as_str()),
            goods_received: KindSummary::from_outcome(&goods_received, |gr| gr.status.as_str()),
        }
    }

    /// 加载 + 聚合; 加载失败降级为 `Failed` 并记录错误, 不向上抛出
    fn run<L, A, F>(&self, source: RecordSource, reduce: F) -> QueryOutcome<A>
    where
        L: DeserializeOwned,
        F: FnOnce(Vec<L>) -> Aggregation<A>,
    {
        let rows = match self.loader.load::<L>(source) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Error loading {}: {}", source.file_name(), e);
                return QueryOutcome::Failed { error: e };
            }
        };

        let row_count = rows.len();
        let aggregation = reduce(rows);
        for warning in &aggregation.warnings {
            tracing::warn!("{}: {}", source.file_name(), warning);
        }
        tracing::info!(
            "{}: {} rows -> {} documents, {} warnings",
            source.file_name(),
            row_count,
            aggregation.items.len(),
            aggregation.warnings.len()
        );

        QueryOutcome::from_aggregation(aggregation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregationWarning, LoadStatus};
    use bigdecimal::BigDecimal;
    use std::path::PathBuf;

    #[test]
    fn missing_directory_fails_softly() {
        let queries = ProcurementQueries::new(RecordLoader::new("/no/such/fixtures"));

        let outcome = queries.list_purchase_orders();
        assert_eq!(outcome.status(), LoadStatus::Failed);
        assert!(outcome.into_items().is_empty());

        let overview = queries.overview(Utc::now());
        assert_eq!(overview.invoices.load_status, LoadStatus::Failed);
        assert_eq!(overview.goods_received.total, 0);
    }

    #[test]
    fn configured_delimiter_reaches_the_loader() {
        let dir = std::env::temp_dir().join(format!("procurement-semicolon-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("purchase-orders.csv"),
            "PO_Number;Vendor_Name;Total;PO_Status\nPO-9;Acme;10.00;Open\nPO-9;Acme;12,50;Open\n",
        )
        .unwrap();

        let config = FixturesConfig {
            dir: PathBuf::from(&dir),
            delimiter: ";".to_string(),
        };
        let outcome = ProcurementQueries::from_config(&config).unwrap().list_purchase_orders();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(outcome.status(), LoadStatus::Loaded);
        assert_eq!(outcome.items()[0].vendor_name, "Acme");
        assert_eq!(outcome.items()[0].total_amount, BigDecimal::from(10));
        assert!(matches!(
            &outcome.warnings()[0],
            AggregationWarning::UnparsableAmount { item: 2, value, .. } if value == "12,50"
        ));
    }
}
