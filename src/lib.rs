//! # connstr
//!
//! Connection string parsing and validation for document databases.
//!
//! connstr provides:
//! - A parser for `mongodb://`, `mongodb+srv://`, and scheme-less host lists
//! - One classified error per malformed input, with stable message prefixes
//!   and numeric codes
//! - Typed access to URI options and a resolved client configuration
//! - A pluggable connector for reaching the parsed hosts
//!
//! ## Quick Start
//!
//! ```rust
//! use connstr::prelude::*;
//!
//! let conn = ConnectionString::parse("mongodb://localhost:27017/test").unwrap();
//! assert_eq!(conn.hosts()[0].port, Some(27017));
//! assert_eq!(conn.database(), Some("test"));
//!
//! match ConnectionString::parse("mongodb://127.0.0.1:1cat/test") {
//!     Err(e) => assert_eq!(e.code(), ErrorCode::FailedToParse),
//!     Ok(_) => unreachable!(),
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use connstr_core::*;
