pub mod loader;

pub use loader::{read_records, LoadOptions, RecordLoader, RecordSource};
