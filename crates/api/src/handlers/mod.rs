pub mod accounts;
pub mod links;
pub mod pages;
pub mod revisions;
pub mod search;
