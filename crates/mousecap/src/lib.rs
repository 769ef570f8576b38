#![forbid(unsafe_code)]

//! Terminal mouse capability detection.
//!
//! Answers one question at startup: does the controlling terminal support
//! mouse reporting, and through which protocol? Two independent strategies
//! feed a single decision:
//!
//! - [`identity`] — a pure classifier that guesses the terminal emulator
//!   from environment variables (`TERM`, `TERM_PROGRAM`, `COLORTERM`, ...)
//!   and normalizes the guess through a table of known emulators.
//! - [`probe`] — an active round trip: write a Primary Device Attributes
//!   query (`ESC [ c`) to the terminal and wait, bounded by a timeout, for
//!   the capability report. A terminal that answers structured escape
//!   queries is assumed capable of mouse reporting.
//!
//! [`mouse::detect_mouse_support`] sequences the two: safety gates first
//! (never probe a pipe or a CI job), then the probe, then the static table
//! as fallback. Detection never fails and never panics; every error path
//! degrades to the heuristic verdict.
//!
//! # Safety Contract
//!
//! - **Bounded timeouts**: the probe resolves within its timeout plus a
//!   small fixed overhead.
//! - **Raw-mode restoration**: the input stream's raw-mode state after a
//!   probe equals the state before it, on every exit path.
//! - **One probe at a time**: callers must not issue concurrent probes
//!   against the same terminal; a second in-flight probe would race on
//!   raw-mode state.

pub mod env_snapshot;
pub mod identity;
pub mod mouse;
pub mod probe;

pub use env_snapshot::{EnvSnapshot, Platform};
pub use identity::{TerminalIdentity, classify};
pub use mouse::{
    DEFAULT_PROBE_TIMEOUT, MouseCapability, MouseProtocol, detect_mouse_support,
    mouse_support_detail,
};
pub use probe::{DA1_QUERY, probe_terminal};
