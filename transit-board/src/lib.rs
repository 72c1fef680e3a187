//! Favorite transit stops and live departure boards.
//!
//! A small proxy holds the Digitransit API key and forwards stop searches
//! and departure lookups; the client side keeps a list of favorite stops
//! and renders an ordered, filterable departure board for one of them.

pub mod board;
pub mod digitransit;
pub mod domain;
pub mod favorites;
pub mod proxy;
pub mod session;
pub mod transit;
