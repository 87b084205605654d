#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

//! Fetches an IPTV / HLS playlist, normalizes it into `(title, uri)` entries
//! and serves them over a small paginated HTTP API.

pub mod decode;
pub mod download;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod playlist;
pub mod server;
pub mod source;
pub mod store;
pub mod util;
