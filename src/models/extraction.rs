//! 外部提取/匹配服务的响应结构
//!
//! 发票字段由外部服务决定, 这里只固定需要读取的部分, 其余字段原样透传。

use super::invoice::MatchIndicator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `/api/extract-invoice/` 的标准化响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub document_type: String,
    pub invoices: Vec<Value>,
}

impl ExtractionResponse {
    /// 兼容旧格式 `{ extracted_invoices: [...] }`
    pub fn from_body(body: Value) -> Self {
        let mut body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let document_type = body
            .get("document_type")
            .and_then(Value::as_str)
            .unwrap_or("invoice")
            .to_string();

        let invoices = match body.remove("extracted_invoices").or_else(|| body.remove("invoices")) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        Self {
            document_type,
            invoices,
        }
    }
}

/// 匹配结果中决定指示灯的字段, 宽松读取
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchingInfo {
    pub matched_po: Option<Value>,
    pub match_confidence: Option<f64>,
    pub match_type: Option<String>,
}

impl MatchingInfo {
    /// 置信度可为数字或数字字符串; 其余类型视为缺失
    pub fn from_value(matching: &Value) -> Self {
        let match_confidence = match matching.get("match_confidence") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        Self {
            matched_po: matching.get("matched_po").filter(|v| !v.is_null()).cloned(),
            match_confidence,
            match_type: matching.get("match_type").and_then(Value::as_str).map(str::to_string),
        }
    }

    pub fn indicator(&self) -> MatchIndicator {
        match &self.matched_po {
            None => MatchIndicator::Red,
            Some(_) => self
                .match_confidence
                .map(MatchIndicator::from_confidence)
                .unwrap_or(MatchIndicator::Unknown),
        }
    }
}

/// `/api/extract-and-match/` 响应, 后端返回体原样保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchResponse {
    pub body: Value,
}

impl MatchResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn invoices(&self) -> &[Value] {
        self.body
            .get("invoices")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 为每张发票追加 `match_indicator`, 不改动其他字段
    pub fn annotate(mut self) -> Self {
        if let Some(Value::Array(invoices)) = self.body.get_mut("invoices") {
            for invoice in invoices.iter_mut() {
                let Value::Object(fields) = invoice else {
                    continue;
                };
                let indicator = match fields.get("matching") {
                    None | Some(Value::Null) => MatchIndicator::Unknown,
                    Some(matching) => MatchingInfo::from_value(matching).indicator(),
                };
                fields.insert(
                    "match_indicator".to_string(),
                    Value::String(indicator.as_str().to_string()),
                );
            }
        }
        self
    }
}

/// 列表接口: 分页信封取 `results`, 否则原样返回
pub fn unwrap_results(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("results") => {
            map.remove("results").unwrap_or(Value::Null)
        }
        other => other,
    }
}
