use serde::{Deserialize, Serialize};

/// 收货单明细行 (goods-received.csv 的一行)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoodsReceivedLine {
    #[serde(rename = "GR_Number")]
    pub gr_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "PO_Number")]
    pub po_number: String,
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
    #[serde(rename = "Quantity_Ordered")]
    pub quantity_ordered: String,
    #[serde(rename = "Quantity_Received")]
    pub quantity_received: String,
    #[serde(rename = "Delivery_Status")]
    pub delivery_status: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Partial,
    Complete,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partial => "Partial",
            Self::Complete => "Complete",
        }
    }
}

/// 收货单 (按 GR_Number 聚合)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsReceived {
    pub id: String,
    pub gr_number: String,
    pub date: String,
    pub po_number: String,
    pub vendor: String,
    pub status: DeliveryStatus,
    pub items: Vec<GoodsReceivedLine>,
}
