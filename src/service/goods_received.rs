use super::aggregate::{aggregate_by_key, LineItem};
use crate::models::{Aggregation, DeliveryStatus, GoodsReceived, GoodsReceivedLine};

impl LineItem for GoodsReceivedLine {
    const KEY_COLUMN: &'static str = "GR_Number";

    fn document_key(&self) -> &str {
        &self.gr_number
    }

    fn header_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Date", self.date.as_str()),
            ("PO_Number", self.po_number.as_str()),
            ("Vendor_Name", self.vendor_name.as_str()),
        ]
    }
}

/// 任一行 Delivery_Status 为 Partial 则整单 Partial
pub fn delivery_status(items: &[GoodsReceivedLine]) -> DeliveryStatus {
    if items.iter().any(|l| l.delivery_status == "Partial") {
        DeliveryStatus::Partial
    } else {
        DeliveryStatus::Complete
    }
}

pub fn aggregate_goods_received(rows: Vec<GoodsReceivedLine>) -> Aggregation<GoodsReceived> {
    aggregate_by_key(rows, |gr_number, items, _| {
        let first = &items[0];

        GoodsReceived {
            id: gr_number.clone(),
            date: first.date.clone(),
            po_number: first.po_number.clone(),
            vendor: first.vendor_name.clone(),
            status: delivery_status(&items),
            gr_number,
            items,
        }
    })
}
