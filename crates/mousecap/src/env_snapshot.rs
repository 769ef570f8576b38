#![forbid(unsafe_code)]

//! Ambient process state, captured once per detection call.
//!
//! Every other component in this crate is a pure function of an
//! [`EnvSnapshot`], so tests can inject synthetic environments without
//! mutating real process state. The snapshot is cheap to build and is not
//! cached: the environment does not change at runtime, but re-reading it
//! per call keeps detection free of invalidation concerns.

use std::env;

use crossterm::tty::IsTty;

/// Platform family relevant to terminal identity guessing.
///
/// macOS emulators sometimes place a full path in `TERM_PROGRAM`; Android
/// needs the Termux special case. Everything else behaves the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS family.
    MacOs,
    /// Android (Termux detection applies).
    Android,
    /// Linux, including the framebuffer console.
    Linux,
    /// Any other platform.
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

/// One immutable snapshot of the process environment and stream flags.
///
/// String fields hold the empty string when the variable is unset, so
/// downstream matching never deals with `Option<String>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// A continuous-integration marker (`CI`) is present.
    pub ci: bool,
    /// An SSH session marker (`SSH_CONNECTION`) is present.
    pub ssh_session: bool,
    /// Raw `TERM` value.
    pub term: String,
    /// Raw `TERM_PROGRAM` value.
    pub term_program: String,
    /// Raw `COLORTERM` value.
    pub colorterm: String,
    /// Parsed `VTE_VERSION`, when present and numeric.
    pub vte_version: Option<u32>,
    /// `TERMUX_VERSION` is present.
    pub termux: bool,
    /// Any environment variable *name* contains `KONSOLE`.
    pub konsole_marker: bool,
    /// Platform family.
    pub platform: Platform,
    /// Standard output is a terminal device.
    pub stdout_is_tty: bool,
    /// Standard input is a terminal device.
    pub stdin_is_tty: bool,
}

impl EnvSnapshot {
    /// Capture the real process environment and stream flags.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ci: env::var_os("CI").is_some(),
            ssh_session: env::var_os("SSH_CONNECTION").is_some(),
            term: env::var("TERM").unwrap_or_default(),
            term_program: env::var("TERM_PROGRAM").unwrap_or_default(),
            colorterm: env::var("COLORTERM").unwrap_or_default(),
            vte_version: env::var("VTE_VERSION")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            termux: env::var_os("TERMUX_VERSION").is_some(),
            konsole_marker: env::vars_os()
                .any(|(name, _)| name.to_string_lossy().contains("KONSOLE")),
            platform: Platform::current(),
            stdout_is_tty: std::io::stdout().is_tty(),
            stdin_is_tty: std::io::stdin().is_tty(),
        }
    }

    /// An all-empty, non-interactive baseline for tests.
    ///
    /// Set individual fields to build up a synthetic environment.
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            ci: false,
            ssh_session: false,
            term: String::new(),
            term_program: String::new(),
            colorterm: String::new(),
            vte_version: None,
            termux: false,
            konsole_marker: false,
            platform: Platform::Other,
            stdout_is_tty: false,
            stdin_is_tty: false,
        }
    }
}
