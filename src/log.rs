//! Utilities for logging diagnostic messages.
//!
//! Logging is off unless the `SAFALOGO_LOG` environment variable is set.
//! Messages go to stderr so they never mix with the status report on stdout.

use once_cell::sync::Lazy;

#[macro_export]
macro_rules! safalogo_log {
    (
        $($arg:tt)+
    ) => {
        if $crate::log::log_enabled() {
            eprintln!("safalogo: {}", format_args!($($arg)+));
        }
    };
}

pub fn log_enabled() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| ::std::env::var_os("SAFALOGO_LOG").is_some());

    *ENABLED
}
