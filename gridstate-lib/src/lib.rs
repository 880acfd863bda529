//! Headless table state engine
//!
//! Keeps the view state of a data table (sort, search query, page, page size,
//! loading) and derives the rows to show from it. Nothing here renders; a UI
//! layer reads a [`table::TableSnapshot`] and draws it however it likes.
//!
//! Three ways to drive a table:
//!
//! - [`table::Table`] holds rows in memory and runs the filter, sort and
//!   paginate pipeline locally.
//! - [`remote::RemoteTable`] asks a [`remote::PageFetcher`] for each page,
//!   debounces search input and drops responses that arrive out of order.
//! - [`load_once::LoadOnceTable`] downloads everything once through a
//!   [`load_once::RecordFetcher`] and works locally afterwards.

pub mod cache;
pub mod column;
pub mod error;
pub mod load_once;
pub mod model;
pub mod pipeline;
pub mod remote;
pub mod table;

mod fetch;
mod state;

pub use fetch::FetchTicket;
pub use fetch::RequestId;
