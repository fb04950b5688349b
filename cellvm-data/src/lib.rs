// cellvm-data - Values, persistent collections and ledger state for cellvm
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # cellvm-data
//!
//! Immutable values for the cellvm execution core.
//! Provides the `Value` type, structurally shared persistent collections
//! (lists, vectors, maps, blob-maps, sets), the ledger `State`, and the
//! canonical encoding used for content identity.
//!
//! Everything here is `Send + Sync` and never mutated after construction, so
//! values can be shared freely between contexts running on different
//! threads.

pub mod blob;
pub mod blob_map;
pub mod encoding;
pub mod error;
pub mod keyword;
pub mod list;
pub mod map;
pub mod sequence;
pub mod set;
pub mod state;
pub mod symbol;
pub mod value;
pub mod vector;

pub use blob::{Address, Blob};
pub use blob_map::BlobMap;
pub use encoding::ContentHash;
pub use error::{DataError, Result};
pub use keyword::Keyword;
pub use list::List;
pub use map::Map;
pub use sequence::{Seq, Sequence};
pub use set::Set;
pub use state::{AccountStatus, State};
pub use symbol::Symbol;
pub use value::Value;
pub use vector::Vector;
