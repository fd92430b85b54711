//! HTTP request handlers
//!
//! `pages` serves the HTML form flow, `summary` the JSON API.

pub mod pages;
pub mod summary;

pub use pages::*;
pub use summary::*;
