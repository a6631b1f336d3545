#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod cache;
mod error;
mod record;
mod store;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod memory;

pub use crate::backend::{Range, SheetBackend};
pub use crate::cache::{CachedValue, SheetCache};
pub use crate::error::{BoxError, SheetError, SheetResult};
pub use crate::record::Record;
pub use crate::store::RowStore;
