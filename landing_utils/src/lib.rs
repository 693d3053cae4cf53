pub use landing_utils_derive::trace_instrument;

mod macros;

/// Version string of the running binary, e.g. `0.1.0`.
pub fn landing_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
