use super::aggregate::{aggregate_by_key, sum_column, LineItem};
use crate::models::{
    Aggregation, AggregationWarning, Invoice, InvoiceLine, InvoiceStatus, MatchIndicator,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};

/// 单据号为空时的占位符
const MISSING_REFERENCE: &str = "—";

impl LineItem for InvoiceLine {
    const KEY_COLUMN: &'static str = "Invoice_Number";

    fn document_key(&self) -> &str {
        &self.invoice_number
    }

    fn header_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Date", self.date.as_str()),
            ("PO_Number", self.po_number.as_str()),
            ("GR_Number", self.gr_number.as_str()),
            ("Vendor_Name", self.vendor_name.as_str()),
            ("Currency", self.currency.as_str()),
            ("Due_Date", self.due_date.as_str()),
        ]
    }
}

/// 解析到期日: `YYYY-MM-DD` (按 UTC 零点), RFC 3339, 或 `MM/DD/YYYY`
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// 由到期日与评估时刻推导状态
///
/// 已过期 => Paid; 剩余不足 7 天 => Approved; 不足 14 天 => In Approval; 否则 Review。
pub fn invoice_status(due: DateTime<Utc>, now: DateTime<Utc>) -> InvoiceStatus {
    if due < now {
        return InvoiceStatus::Paid;
    }

    let days_until_due = (due - now).num_days();
    if days_until_due < 7 {
        InvoiceStatus::Approved
    } else if days_until_due < 14 {
        InvoiceStatus::InApproval
    } else {
        InvoiceStatus::Review
    }
}

pub fn format_amount(amount: &BigDecimal) -> String {
    format!("${}", amount.round(2).with_scale(2))
}

fn or_placeholder(value: &str) -> String {
    if value.is_empty() {
        MISSING_REFERENCE.to_string()
    } else {
        value.to_string()
    }
}

/// 发票聚合; `now` 为评估时刻
pub fn aggregate_invoices(rows: Vec<InvoiceLine>, now: DateTime<Utc>) -> Aggregation<Invoice> {
    aggregate_by_key(rows, |invoice_number, items, warnings| {
        let total_due = sum_column(
            &invoice_number,
            &items,
            "Total_Due",
            |l| l.total_due.as_str(),
            warnings,
        );
        let first = &items[0];

        let status = match parse_due_date(&first.due_date) {
            Some(due) => invoice_status(due, now),
            None => {
                warnings.push(AggregationWarning::UnparsableDate {
                    key: invoice_number.clone(),
                    column: "Due_Date".to_string(),
                    value: first.due_date.clone(),
                });
                InvoiceStatus::Review
            }
        };

        Invoice {
            id: invoice_number.clone(),
            date: first.date.clone(),
            due_date: first.due_date.clone(),
            po_number: or_placeholder(&first.po_number),
            gr_number: or_placeholder(&first.gr_number),
            vendor: first.vendor_name.clone(),
            amount: format_amount(&total_due),
            currency: first.currency.clone(),
            status,
            match_indicator: MatchIndicator::Unknown,
            invoice_number,
            total_due,
            items,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn line(number: &str, total_due: &str, due_date: &str) -> InvoiceLine {
        InvoiceLine {
            invoice_number: number.into(),
            date: "2023-12-01".into(),
            vendor_name: "Acme Supplies".into(),
            currency: "USD".into(),
            total_due: total_due.into(),
            due_date: due_date.into(),
            ..Default::default()
        }
    }

    fn status_for(due_date: &str) -> InvoiceStatus {
        aggregate_invoices(vec![line("INV-1", "1", due_date)], now()).items[0].status
    }

    #[test]
    fn status_follows_days_until_due() {
        assert_eq!(status_for("2024-01-21"), InvoiceStatus::Review);
        assert_eq!(status_for("2024-01-11"), InvoiceStatus::InApproval);
        assert_eq!(status_for("2024-01-04"), InvoiceStatus::Approved);
        assert_eq!(status_for("2023-12-20"), InvoiceStatus::Paid);
    }

    #[test]
    fn status_boundaries() {
        let now = now();
        assert_eq!(invoice_status(now + Duration::days(7), now), InvoiceStatus::InApproval);
        assert_eq!(
            invoice_status(now + Duration::days(7) - Duration::seconds(1), now),
            InvoiceStatus::Approved
        );
        assert_eq!(invoice_status(now + Duration::days(14), now), InvoiceStatus::Review);
        assert_eq!(invoice_status(now, now), InvoiceStatus::Approved);
        assert_eq!(invoice_status(now - Duration::seconds(1), now), InvoiceStatus::Paid);
    }

    #[test]
    fn amount_is_formatted_and_references_defaulted() {
        let rows = vec![line("INV-7", "100.5", "2024-02-01"), line("INV-7", "20.255", "2024-02-01")];
        let aggregation = aggregate_invoices(rows, now());
        let invoice = &aggregation.items[0];

        assert_eq!(invoice.id, "INV-7");
        assert_eq!(invoice.total_due, BigDecimal::from_str("120.755").unwrap());
        assert_eq!(invoice.amount, "$120.76");
        assert_eq!(invoice.po_number, "—");
        assert_eq!(invoice.gr_number, "—");
        assert_eq!(invoice.match_indicator, MatchIndicator::Unknown);
    }

    #[test]
    fn unparsable_due_date_is_review_with_warning() {
        let aggregation = aggregate_invoices(vec![line("INV-3", "5", "someday")], now());
        assert_eq!(aggregation.items[0].status, InvoiceStatus::Review);
        assert!(matches!(
            aggregation.warnings.as_slice(),
            [AggregationWarning::UnparsableDate { value, .. }] if value == "someday"
        ));
    }

    #[test]
    fn due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2024-03-05"), Some(expected));
        assert_eq!(parse_due_date("03/05/2024"), Some(expected));
        assert_eq!(parse_due_date("2024-03-05T00:00:00Z"), Some(expected));
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let rows = vec![line("INV-1", "10", "2024-01-30"), line("INV-2", "x", "2024-01-02")];
        let first = aggregate_invoices(rows.clone(), now());
        let second = aggregate_invoices(rows, now());
        assert_eq!(first, second);
    }
}
