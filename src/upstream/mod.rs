pub mod client;

pub use client::{BackendList, BackendReply, ExtractionClient, Timeouts, UploadForm, UploadPart};
