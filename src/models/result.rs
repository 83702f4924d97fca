use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 聚合过程中的告警 (不中断聚合)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationWarning {
    /// 金额列无法解析, 按 0 计入; `item` 为单据内明细序号 (从 1 开始)
    UnparsableAmount {
        key: String,
        item: usize,
        column: String,
        value: String,
    },
    /// 日期列无法解析
    UnparsableDate {
        key: String,
        column: String,
        value: String,
    },
    /// 同一单据的表头字段与首行不一致 (仍以首行为准)
    HeaderMismatch {
        key: String,
        item: usize,
        column: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparsableAmount { key, item, column, value } => write!(
                f,
                "item {} of document '{}': {} value '{}' is not a number, counted as 0",
                item, key, column, value
            ),
            Self::UnparsableDate { key, column, value } => write!(
                f,
                "document '{}': {} value '{}' is not a date",
                key, column, value
            ),
            Self::HeaderMismatch { key, item, column, expected, found } => write!(
                f,
                "item {} of document '{}': {} is '{}' but first item has '{}'",
                item, key, column, found, expected
            ),
        }
    }
}

/// 一次聚合的输出
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation<T> {
    pub items: Vec<T>,
    pub warnings: Vec<AggregationWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStatus {
    Loaded,
    NoData,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::NoData => "no-data",
            Self::Failed => "failed",
        }
    }
}

/// 查询结果: 区分 "有数据" / "源为空" / "加载失败"
#[derive(Debug)]
pub enum QueryOutcome<T> {
    Loaded {
        items: Vec<T>,
        warnings: Vec<AggregationWarning>,
    },
    NoData,
    Failed {
        error: LoadError,
    },
}

impl<T> QueryOutcome<T> {
    pub fn from_aggregation(aggregation: Aggregation<T>) -> Self {
        if aggregation.items.is_empty() {
            Self::NoData
        } else {
            Self::Loaded {
                items: aggregation.items,
                warnings: aggregation.warnings,
            }
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self {
            Self::Loaded { .. } => LoadStatus::Loaded,
            Self::NoData => LoadStatus::NoData,
            Self::Failed { .. } => LoadStatus::Failed,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded { items, .. } => items,
            _ => &[],
        }
    }

    pub fn warnings(&self) -> &[AggregationWarning] {
        match self {
            Self::Loaded { warnings, .. } => warnings,
            _ => &[],
        }
    }

    /// 失败时返回空列表
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Loaded { items, .. } => items,
            _ => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
