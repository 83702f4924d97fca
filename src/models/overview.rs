use super::result::{LoadStatus, QueryOutcome};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单类单据的概览统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSummary {
    pub total: usize,
    pub load_status: LoadStatus,
    /// 状态 -> 数量, 按状态首次出现顺序
    pub by_status: IndexMap<String, usize>,
    pub warnings: usize,
}

impl KindSummary {
    pub fn from_outcome<T, F>(outcome: &QueryOutcome<T>, status_of: F) -> Self
    where
        F: Fn(&T) -> &str,
    {
        let mut by_status: IndexMap<String, usize> = IndexMap::new();
        for item in outcome.items() {
            *by_status.entry(status_of(item).to_string()).or_insert(0) += 1;
        }

        Self {
            total: outcome.items().len(),
            load_status: outcome.status(),
            by_status,
            warnings: outcome.warnings().len(),
        }
    }
}

/// 仪表盘概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub purchase_orders: KindSummary,
    pub invoices: KindSummary,
    pub goods_received: KindSummary,
}
