//! Domain building blocks shared by the database and API crates.
//!
//! Nothing in here touches the database or HTTP. The poster file rules and
//! the [`storage::FileStorage`] seam live here so both the service layer and
//! its tests can use them.

pub mod error;
pub mod paging;
pub mod poster;
pub mod storage;
pub mod types;
pub mod validation;
