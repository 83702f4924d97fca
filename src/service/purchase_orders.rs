use super::aggregate::{aggregate_by_key, sum_column, LineItem};
use crate::models::{Aggregation, PurchaseOrder, PurchaseOrderLine};

impl LineItem for PurchaseOrderLine {
    const KEY_COLUMN: &'static str = "PO_Number";

    fn document_key(&self) -> &str {
        &self.po_number
    }

    fn header_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Date", self.date.as_str()),
            ("Vendor_ID", self.vendor_id.as_str()),
            ("Vendor_Name", self.vendor_name.as_str()),
            ("Company_ID", self.company_id.as_str()),
            ("Company_Name", self.company_name.as_str()),
            ("Currency", self.currency.as_str()),
            ("PO_Status", self.po_status.as_str()),
        ]
    }
}

/// 采购订单聚合: totalAmount = Σ Total
pub fn aggregate_purchase_orders(rows: Vec<PurchaseOrderLine>) -> Aggregation<PurchaseOrder> {
    aggregate_by_key(rows, |po_number, items, warnings| {
        let total_amount = sum_column(&po_number, &items, "Total", |l| l.total.as_str(), warnings);
        let first = &items[0];

        PurchaseOrder {
            date: first.date.clone(),
            vendor_id: first.vendor_id.clone(),
            vendor_name: first.vendor_name.clone(),
            company_id: first.company_id.clone(),
            company_name: first.company_name.clone(),
            currency: first.currency.clone(),
            status: first.po_status.clone(),
            po_number,
            total_amount,
            items,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AggregationWarning;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn line(po: &str, total: &str) -> PurchaseOrderLine {
        PurchaseOrderLine {
            po_number: po.into(),
            date: "2024-03-01".into(),
            vendor_name: "Acme Supplies".into(),
            currency: "USD".into(),
            po_status: "Open".into(),
            total: total.into(),
            ..Default::default()
        }
    }

    #[test]
    fn three_lines_sum_into_one_order() {
        let rows = vec![line("PO-1", "100.00"), line("PO-1", "50.00"), line("PO-1", "25.00")];
        let aggregation = aggregate_purchase_orders(rows);

        assert_eq!(aggregation.items.len(), 1);
        let po = &aggregation.items[0];
        assert_eq!(po.po_number, "PO-1");
        assert_eq!(po.total_amount, BigDecimal::from_str("175.00").unwrap());
        assert_eq!(po.items.len(), 3);
        assert_eq!(po.status, "Open");
        assert!(aggregation.warnings.is_empty());
    }

    #[test]
    fn unparsable_total_contributes_zero() {
        let rows = vec![line("PO-2", "N/A"), line("PO-2", "40")];
        let aggregation = aggregate_purchase_orders(rows);

        assert_eq!(aggregation.items[0].total_amount, BigDecimal::from(40));
        assert!(matches!(
            aggregation.warnings.as_slice(),
            [AggregationWarning::UnparsableAmount { column, .. }] if column == "Total"
        ));
    }

    #[test]
    fn orders_emitted_in_first_seen_order() {
        let rows = vec![line("PO-9", "1"), line("PO-3", "1"), line("PO-9", "1")];
        let numbers: Vec<String> = aggregate_purchase_orders(rows)
            .items
            .into_iter()
            .map(|po| po.po_number)
            .collect();
        assert_eq!(numbers, vec!["PO-9", "PO-3"]);
    }
}
