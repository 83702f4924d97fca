use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 发票明细行 (invoices.csv 的一行)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceLine {
    #[serde(rename = "Invoice_Number")]
    pub invoice_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "PO_Number")]
    pub po_number: String,
    #[serde(rename = "GR_Number")]
    pub gr_number: String,
    #[serde(rename = "Vendor_ID")]
    pub vendor_id: String,
    #[serde(rename = "Vendor_Name")]
    pub vendor_name: String,
    #[serde(rename = "Company_ID")]
    pub company_id: String,
    #[serde(rename = "Company_Name")]
    pub company_name: String,
    #[serde(rename = "Item_Code")]
    pub item_code: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Unit_Price")]
    pub unit_price: String,
    #[serde(rename = "Total")]
    pub total: String,
    #[serde(rename = "Discount_Percent")]
    pub discount_percent: String,
    #[serde(rename = "Discount_Amount")]
    pub discount_amount: String,
    #[serde(rename = "Sub_Total")]
    pub sub_total: String,
    #[serde(rename = "Tax_Rate")]
    pub tax_rate: String,
    #[serde(rename = "Tax_Amount")]
    pub tax_amount: String,
    #[serde(rename = "Shipping")]
    pub shipping: String,
    #[serde(rename = "Total_Due")]
    pub total_due: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Due_Date")]
    pub due_date: String,
    #[serde(rename = "Payment_Terms")]
    pub payment_terms: String,
}

/// 发票处理状态 (由到期日与评估时刻的距离推导)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Review,
    #[serde(rename = "In Approval")]
    InApproval,
    Approved,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "Review",
            Self::InApproval => "In Approval",
            Self::Approved => "Approved",
            Self::Paid => "Paid",
        }
    }
}

/// 匹配指示灯
///
/// CSV 数据没有对账信号, 固定为 `Unknown`; 真实信号来自匹配服务的
/// `match_confidence` (0-100)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchIndicator {
    Red,
    Yellow,
    Green,
    Unknown,
}

impl MatchIndicator {
    /// >= 90 绿, >= 70 黄, 其余红
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence.is_nan() {
            Self::Unknown
        } else if confidence >= 90.0 {
            Self::Green
        } else if confidence >= 70.0 {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Unknown => "unknown",
        }
    }
}

/// 发票 (按 Invoice_Number 聚合)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub date: String,
    pub due_date: String,
    pub po_number: String,
    pub gr_number: String,
    pub vendor: String,
    pub amount: String,
    pub total_due: BigDecimal,
    pub currency: String,
    pub status: InvoiceStatus,
    #[serde(rename = "match")]
    pub match_indicator: MatchIndicator,
    pub items: Vec<InvoiceLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_thresholds() {
        assert_eq!(MatchIndicator::from_confidence(100.0), MatchIndicator::Green);
        assert_eq!(MatchIndicator::from_confidence(90.0), MatchIndicator::Green);
        assert_eq!(MatchIndicator::from_confidence(89.9), MatchIndicator::Yellow);
        assert_eq!(MatchIndicator::from_confidence(70.0), MatchIndicator::Yellow);
        assert_eq!(MatchIndicator::from_confidence(12.0), MatchIndicator::Red);
        assert_eq!(MatchIndicator::from_confidence(f64::NAN), MatchIndicator::Unknown);
    }

    #[test]
    fn status_serializes_display_labels() {
        assert_eq!(
            serde_json::to_value(InvoiceStatus::InApproval).unwrap(),
            "In Approval"
        );
        assert_eq!(InvoiceStatus::InApproval.as_str(), "In Approval");
        assert_eq!(serde_json::to_value(MatchIndicator::Unknown).unwrap(), "unknown");
    }
}
