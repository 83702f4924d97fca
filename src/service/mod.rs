pub mod aggregate;
pub mod goods_received;
pub mod invoices;
pub mod purchase_orders;
pub mod queries;

pub use goods_received::aggregate_goods_received;
pub use invoices::aggregate_invoices;
pub use purchase_orders::aggregate_purchase_orders;
pub use queries::ProcurementQueries;
