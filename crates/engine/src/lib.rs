//! Client-side domain logic of the finance tracker.
//!
//! The server owns every record; this crate only derives what the client
//! shows on top of fetched data:
//!
//! - [`balance`]: running balances rebuilt across paginated transactions.
//! - [`report`], [`html`], [`export`]: the exported transaction report.
//! - [`filters`], [`search`]: filter bar and searchable select state.
//! - [`invoice`]: draft totals and due dates.

pub use balance::{BalancedTransaction, Reconstruction, reconstruct};
pub use directory::{AccountDirectory, CategoryDirectory, Directory};
pub use error::EngineError;
pub use filters::{DatePreset, FilterState};
pub use report::{Report, ReportMeta, parse_timezone};
pub use search::SearchableSelect;

pub mod balance;
mod directory;
mod error;
pub mod export;
pub mod filters;
pub mod html;
pub mod invoice;
pub mod report;
pub mod search;

type ResultEngine<T> = Result<T, EngineError>;
