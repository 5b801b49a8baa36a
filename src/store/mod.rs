//! Flat-file persistence for employee, attendance and user records.
//!
//! Each file is loaded into memory once and rewritten in full after every
//! mutation through a temporary file (see [`write_atomically`]).

mod codec;
mod record;
mod record_store;

pub use codec::{Decoded, decode, encode};
pub use record::{Record, column, expect_columns, parse_column};
pub use record_store::{RecordStore, temp_path, write_atomically};
