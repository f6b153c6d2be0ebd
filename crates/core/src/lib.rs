//! Domain core for the skill tracker: the XP progression engine, ledger
//! rules, input validation, and the shared error taxonomy.
//!
//! Nothing in this crate performs I/O.

pub mod account;
pub mod category;
pub mod error;
pub mod ledger;
pub mod ownership;
pub mod progression;
pub mod skill;
pub mod types;
