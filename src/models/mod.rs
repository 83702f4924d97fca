pub mod extraction;
pub mod goods_received;
pub mod invoice;
pub mod overview;
pub mod purchase_order;
pub mod result;

pub use extraction::{ExtractionResponse, MatchResponse, MatchingInfo};
pub use goods_received::{DeliveryStatus, GoodsReceived, GoodsReceivedLine};
pub use invoice::{Invoice, InvoiceLine, InvoiceStatus, MatchIndicator};
pub use overview::{DashboardOverview, KindSummary};
pub use purchase_order::{PurchaseOrder, PurchaseOrderLine};
pub use result::{Aggregation, AggregationWarning, LoadStatus, QueryOutcome};
