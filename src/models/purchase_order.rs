use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 采购订单明细行 (purchase-orders.csv 的一行)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseOrderLine {
    #[serde(rename = "PO_Number")]
    pub po_number: String,
    #[serde(rename = "Date")]
    pub date: String,
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
    #[serde(rename = "Required_Delivery_Date")]
    pub required_delivery_date: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "PO_Status")]
    pub po_status: String,
}

/// 采购订单 (按 PO_Number 聚合)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub po_number: String,
    pub date: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub company_id: String,
    pub company_name: String,
    pub items: Vec<PurchaseOrderLine>,
    pub total_amount: BigDecimal,
    pub currency: String,
    pub status: String,
}
