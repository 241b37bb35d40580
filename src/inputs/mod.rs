//! Input discovery for both pipeline stages.
//!
//! # Submodules
//!
//! - [`digest`]: finds the newest `digest_YYYYMMDD_*.txt` and reads it
//! - [`records`]: loads persisted `{slug}.json` article records for the feed
//!
//! Both follow the same rule: a missing directory or no matching files is
//! [`DigestError::InputNotFound`](crate::error::DigestError::InputNotFound),
//! which the binary reports and then stops without writing anything.

pub mod digest;
pub mod records;
