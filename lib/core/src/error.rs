//! Error handling foundation for talkfinder.
//!
//! Each crate keeps its own error enum in an `error` module. Fallible
//! functions return that enum wrapped in a rootcause `Report`; this alias
//! saves spelling the wrapper out.

use rootcause::Report;

/// `Result` whose error is a `Report` over the crate's error enum `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
