// pup-core/src/lib.rs
pub mod fetch;
pub mod ledger;
pub mod resolve;
pub mod updater;

pub use fetch::FetchEngine;
pub use ledger::VersionLedger;
pub use resolve::{resolve_entry, DownloadItem, DownloadJob, ResolveContext, Resolver};
pub use updater::Updater;
