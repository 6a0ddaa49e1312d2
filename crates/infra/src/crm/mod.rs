//! CRM adapters

pub mod pipedrive;

pub use pipedrive::PipedriveClient;
