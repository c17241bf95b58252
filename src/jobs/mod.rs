//! Background jobs.

pub mod sync_job;

pub use sync_job::SyncJob;
