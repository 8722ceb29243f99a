//! Opening signature tables and move-prefix classification.
//!
//! An [`OpeningDatabase`] is an ordered list of [`Opening`] entries, each
//! naming one or more canonical SAN move prefixes. A game is classified by
//! the first entry, in table order, with a signature its opening moves start
//! with. Games matching nothing are classified as [`UNKNOWN_OPENING`].

pub mod builtin;
pub mod database;
pub mod opening;

pub use builtin::builtin_database;
pub use database::{DatabaseError, OpeningDatabase, UNKNOWN_OPENING};
pub use opening::Opening;
