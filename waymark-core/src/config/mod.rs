//! Configuration types
//!
//! Device configuration is written as TOML. On the device it is parsed by
//! the small `no_std` parser in [`toml`]; host tools and the firmware build
//! script can deserialize the same types through serde.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
