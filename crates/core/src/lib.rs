//! Domain types and pure logic shared by the persistence and HTTP layers.
//!
//! Nothing in this crate touches the database or the network.

pub mod error;
pub mod links;
pub mod pages;
pub mod roles;
pub mod search;
pub mod types;
pub mod users;
