//! Opt-in diagnostic output.
//!
//! The library emits `tracing` events but never installs a subscriber on
//! its own. Hosts that want the allocation/release notices on stderr call
//! `teacup_logging_init` once.

use std::ffi::{c_char, CStr};

use tracing_subscriber::EnvFilter;

use crate::status::TeacupStatus;

/// Environment variable read when no explicit filter is given.
pub const LOG_ENV_VAR: &str = "TEACUP_LOG";

const DEFAULT_FILTER: &str = "teacup_core=debug,teacup_ffi=debug";

fn resolve_filter(directives: Option<&str>) -> Option<EnvFilter> {
    match directives {
        Some(d) => EnvFilter::try_new(d).ok(),
        None => Some(
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        ),
    }
}

/// Install a stderr `fmt` subscriber for this process.
///
/// `filter` is an `EnvFilter` directive string such as
/// `"teacup_core=debug"`; when null, `TEACUP_LOG` is consulted, falling back
/// to `debug` for the teacup crates. Returns `InvalidArgument` for an
/// unparsable filter and `InvalidState` if a global subscriber is already
/// installed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn teacup_logging_init(filter: *const c_char) -> i32 {
    ffi_guard!({
        let directives = if filter.is_null() {
            None
        } else {
            // SAFETY: caller guarantees filter is a valid null-terminated C string.
            match unsafe { CStr::from_ptr(filter) }.to_str() {
                Ok(s) => Some(s),
                Err(_) => return TeacupStatus::InvalidArgument as i32,
            }
        };
        let Some(env_filter) = resolve_filter(directives) else {
            return TeacupStatus::InvalidArgument as i32;
        };
        match tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
        {
            Ok(()) => TeacupStatus::Ok as i32,
            Err(_) => TeacupStatus::InvalidState as i32,
        }
    })
}
