//! Reader for the brace-delimited key/value text format upgrade scripts are written in.
//!
//! ```text
//! "upgrades"
//! {
//!     "ItemUpgrades"
//!     {
//!         "1"
//!         {
//!             "attribute"  "damage bonus"
//!             "increment"  "0.25"
//!         }
//!     }
//! }
//! ```
//!
//! Keys are matched case-insensitively. Numeric accessors coerce the way the game's reader
//! does: a value that is not a number reads as zero, never as an error.

mod parser;
mod tree;

pub use parser::{parse_keyvalues, KeyValuesError, MAX_NESTING};
pub use tree::{KeyValues, KvValue};
