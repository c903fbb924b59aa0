//! The `utils` module holds the pieces shared across `priomq`: the error
//! taxonomy and logging setup.

pub mod error;
pub mod logging;
