//! In-memory caches
//!
//! Holds the time-bounded slug-list cache that spares repeated pagination of the
//! remote listing. Nothing in this module is persisted.

mod slug_list;

pub use slug_list::SlugListCache;
