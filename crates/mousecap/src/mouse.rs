#![forbid(unsafe_code)]

//! Mouse support decision: probe first, heuristics as fallback.
//!
//! [`detect_mouse_support`] sequences the safety gates, the active probe
//! from [`crate::probe`], and the identity table from [`crate::identity`]
//! into one boolean. [`mouse_support_detail`] is the synchronous,
//! heuristic-only variant that also names the protocol.
//!
//! # Fail-Open Guarantee
//!
//! No path returns an error or panics. Probe failures, timeouts, and
//! malformed responses all degrade silently to the heuristic verdict.

use std::time::Duration;

use crate::env_snapshot::EnvSnapshot;
use crate::identity::{TerminalIdentity, classify_from_snapshot};
use crate::probe;

/// Default bound on the probe round trip.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// A structured escape response starts with the CSI introducer.
const ESCAPE_INTRODUCER: &str = "\x1b[";

/// Mouse-reporting protocol a terminal is expected to understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseProtocol {
    /// No mouse reporting.
    None,
    /// X11/SGR mouse reporting over escape sequences.
    Xterm,
    /// Linux console mouse via the external gpm daemon.
    Gpm,
}

impl MouseProtocol {
    /// Stable string form (`"none"`, `"xterm"`, `"gpm"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Xterm => "xterm",
            Self::Gpm => "gpm",
        }
    }
}

impl std::fmt::Display for MouseProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal identity extended with the mouse verdict.
///
/// Invariant: `protocol` is [`MouseProtocol::None`] exactly when
/// `mouse_supported` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseCapability {
    /// The heuristic classifier's identity guess.
    pub identity: TerminalIdentity,
    /// Whether mouse reporting is expected to work.
    pub mouse_supported: bool,
    /// The protocol the terminal is expected to speak.
    pub protocol: MouseProtocol,
}

/// Emulator identities known to speak X11/SGR mouse reporting.
///
/// Checked against both the canonical identity and its family label, so
/// an unrecognized passthrough like `vscode` still matches.
const XTERM_MOUSE_TERMINALS: &[&str] = &[
    "xterm",
    "xterm-256color",
    "xterm-truecolor",
    "rxvt",
    "rxvt-256color",
    "gnome",
    "gnome-256color",
    "konsole",
    "konsole-256color",
    "xfce",
    "eterm",
    "eterm-256color",
    "osx-256color",
    "iterm",
    "kitty",
    "alacritty",
    "wezterm",
    "ghostty",
    "foot",
    "contour",
    "vscode",
    "terminology",
    "termux",
    "screen",
    "screen-256color",
    "tmux",
    "tmux-256color",
];

/// Detect mouse support, probing the terminal when safe.
///
/// Returns `false` immediately when stdout is not a terminal or a CI
/// marker is set — probing a batch job risks hanging it on input that
/// never arrives. Otherwise sends a Primary Device Attributes query; any
/// structured escape response means the terminal can be asked to report
/// mouse events. An inconclusive probe falls back to the identity table.
#[must_use]
pub fn detect_mouse_support(timeout: Duration) -> bool {
    detect_with(&EnvSnapshot::from_env(), probe::probe_terminal, timeout)
}

/// Heuristic-only mouse verdict with identity and protocol attached.
///
/// Synchronous and free of terminal I/O; suitable for diagnostics and
/// telemetry even in non-interactive contexts.
#[must_use]
pub fn mouse_support_detail() -> MouseCapability {
    capability_from_snapshot(&EnvSnapshot::from_env())
}

/// Map a snapshot through the classifier and the protocol table.
#[must_use]
pub fn capability_from_snapshot(env: &EnvSnapshot) -> MouseCapability {
    let identity = classify_from_snapshot(env);
    let protocol = protocol_for(&identity);
    MouseCapability {
        mouse_supported: protocol != MouseProtocol::None,
        protocol,
        identity,
    }
}

/// Decision core with the prober injected, so every path is testable
/// without a terminal.
fn detect_with<P>(env: &EnvSnapshot, prober: P, timeout: Duration) -> bool
where
    P: FnOnce(&[u8], Duration) -> Option<String>,
{
    if !env.stdout_is_tty || env.ci {
        #[cfg(feature = "tracing")]
        tracing::debug!(tty = env.stdout_is_tty, ci = env.ci, "probe skipped");
        return false;
    }

    if let Some(response) = prober(probe::DA1_QUERY, timeout)
        && response.contains(ESCAPE_INTRODUCER)
    {
        #[cfg(feature = "tracing")]
        tracing::debug!("terminal answered device-attributes query");
        return true;
    }

    // Probe inconclusive: no response, or a response without the escape
    // introducer. Fall back to the static identity table.
    let verdict = capability_from_snapshot(env);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        app_id = %verdict.identity.app_id,
        protocol = %verdict.protocol,
        "probe inconclusive, using heuristic verdict"
    );

    verdict.mouse_supported
}

/// Protocol lookup for a resolved identity.
fn protocol_for(identity: &TerminalIdentity) -> MouseProtocol {
    if !identity.is_interactive {
        return MouseProtocol::None;
    }

    // The linux console *may* report mouse input through gpm. The daemon's
    // presence is not verified here; this stays optimistic.
    if identity.app_id == "linux" {
        return MouseProtocol::Gpm;
    }

    let listed = |id: &str| XTERM_MOUSE_TERMINALS.contains(&id);
    if listed(&identity.app_id) || listed(&identity.generic_id) {
        MouseProtocol::Xterm
    } else {
        MouseProtocol::None
    }
}
