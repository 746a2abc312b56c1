//! Shared pieces used by the server, the dashboard and the binaries.

pub mod types;

pub mod utils {
    pub mod logging;
}
