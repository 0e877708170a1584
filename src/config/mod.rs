//! Configuration modules for the Rollbook API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with `from_env()` constructors:
//!
//! - [`cors`]: CORS allowed origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`server`]: listen port

pub mod cors;
pub mod database;
pub mod server;
