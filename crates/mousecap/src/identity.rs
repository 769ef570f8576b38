#![forbid(unsafe_code)]

//! Heuristic terminal identification from environment variables.
//!
//! No emulator announces itself reliably: most advertise `TERM=xterm` or
//! `TERM=xterm-256color` for compatibility, and the real identity hides in
//! `TERM_PROGRAM`, `COLORTERM`, or side-channel markers (`VTE_VERSION`,
//! Konsole-prefixed variables, `TERMUX_VERSION`). This module seeds a
//! candidate identity from those variables and normalizes it through a
//! closed dispatch table of known emulators.
//!
//! Detection is a pure function of an [`EnvSnapshot`]: deterministic, no
//! I/O, never fails. Absent inputs produce `"unknown"` sentinels rather
//! than errors.

use crate::env_snapshot::{EnvSnapshot, Platform};

/// VTE versions at or above this ship the modern GNOME terminal stack.
const VTE_GNOME_THRESHOLD: u32 = 3803;

/// The classifier's best guess at the terminal emulator's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalIdentity {
    /// Standard output is a terminal device. When false, no further
    /// guessing is possible and the identity is the `"none"` sentinel.
    pub is_interactive: bool,
    /// The process runs inside an SSH session.
    pub is_remote_session: bool,
    /// Canonical emulator identity (e.g. `"gnome-256color"`, `"kitty"`),
    /// or a lower-cased passthrough for unrecognized terminals.
    pub app_id: String,
    /// Whether the guess reflects the true emulator rather than an
    /// xterm-compatibility fallback.
    pub confident: bool,
    /// Family label for the identity, `"unknown"` when the emulator is
    /// not in the dispatch table.
    pub generic_id: String,
}

/// Classify the terminal from the real process environment.
#[must_use]
pub fn classify() -> TerminalIdentity {
    classify_from_snapshot(&EnvSnapshot::from_env())
}

/// Classify the terminal from a captured environment snapshot.
///
/// Pure and deterministic: the same snapshot always yields the same
/// identity.
#[must_use]
pub fn classify_from_snapshot(env: &EnvSnapshot) -> TerminalIdentity {
    if !env.stdout_is_tty {
        return TerminalIdentity {
            is_interactive: false,
            is_remote_session: env.ssh_session,
            app_id: "none".to_string(),
            confident: true,
            generic_id: "none".to_string(),
        };
    }

    let colors_256 = env.term.contains("256") || env.colorterm.contains("256");
    let true_color = is_true_color_token(&env.colorterm);

    // Candidate priority: COLORTERM (unless it is only the true-color
    // token), then TERM_PROGRAM, then TERM.
    let mut candidate = if !env.colorterm.is_empty() && !true_color {
        env.colorterm.clone()
    } else if !env.term_program.is_empty() {
        env.term_program.clone()
    } else {
        env.term.clone()
    };

    if env.platform == Platform::MacOs {
        // Some macOS emulators place a full path in TERM_PROGRAM.
        candidate = basename(&candidate).to_string();
    }
    if env.platform == Platform::Android && env.termux {
        candidate = "termux".to_string();
    }

    if candidate.is_empty() {
        return TerminalIdentity {
            is_interactive: true,
            is_remote_session: env.ssh_session,
            app_id: "unknown".to_string(),
            confident: false,
            generic_id: "unknown".to_string(),
        };
    }

    // Confident when the candidate came from somewhere other than TERM,
    // or TERM itself is more specific than the two generic xterm values.
    let confident =
        candidate != env.term || (env.term != "xterm" && env.term != "xterm-256color");

    let resolved = canonicalize(&candidate, confident, colors_256 || true_color, true_color, env);

    TerminalIdentity {
        is_interactive: true,
        is_remote_session: env.ssh_session,
        app_id: resolved.app_id,
        confident: resolved.confident,
        generic_id: resolved.generic_id,
    }
}

/// Outcome of one dispatch-table rule.
struct Resolved {
    app_id: String,
    generic_id: String,
    confident: bool,
}

impl Resolved {
    /// A table entry whose canonical form doubles as its family label.
    fn known(id: &str, confident: bool) -> Self {
        Self {
            app_id: id.to_string(),
            generic_id: id.to_string(),
            confident,
        }
    }
}

/// Normalize a candidate identity through the known-emulator table.
///
/// Each arm is one canonicalization rule: rewrite to a color-variant form,
/// consult a disambiguation marker, or pass through unchanged. Identities
/// with no rule fall out the bottom as lower-cased passthroughs with an
/// `"unknown"` family label.
fn canonicalize(
    candidate: &str,
    confident: bool,
    color: bool,
    true_color: bool,
    env: &EnvSnapshot,
) -> Resolved {
    let gnome_variant = if color { "gnome-256color" } else { "gnome" };
    let konsole_variant = if color { "konsole-256color" } else { "konsole" };

    match candidate {
        // The ambiguous bare-xterm values. When the guess is already
        // confident the value came from somewhere specific; keep it.
        // Otherwise try to unmask the real emulator from secondary
        // markers, first match wins.
        "xterm" | "xterm-256color" => {
            if confident {
                Resolved::known(candidate, confident)
            } else if true_color {
                Resolved::known("xterm-truecolor", false)
            } else if env
                .vte_version
                .is_some_and(|v| v >= VTE_GNOME_THRESHOLD)
            {
                Resolved::known(gnome_variant, true)
            } else if env.platform == Platform::MacOs {
                Resolved::known("osx-256color", false)
            } else if env.konsole_marker {
                Resolved::known(konsole_variant, true)
            } else {
                Resolved::known(candidate, false)
            }
        }

        // Already canonical; no rewriting needed.
        "linux" | "aterm" | "kuake" | "tilda" | "terminology" | "wterm" | "mrxvt"
        | "termux" => Resolved::known(candidate, confident),

        // GNOME terminal family, including wrappers built on the same
        // VTE widget.
        "gnome" | "gnome-256color" | "gnome-terminal" | "gnome-terminal-256color"
        | "terminator" | "guake" => Resolved::known(gnome_variant, confident),

        // Konsole reports colors through the family label only.
        "konsole" => Resolved {
            app_id: "konsole".to_string(),
            generic_id: konsole_variant.to_string(),
            confident,
        },

        "rxvt" | "rxvt-xpm" | "rxvt-unicode" | "rxvt-unicode-256color" | "urxvt"
        | "urxvt-ml" | "urxvt256c" | "urxvt256c-ml" => {
            let variant = if env.term == "rxvt-256color"
                || env.term == "rxvt-unicode-256color"
                || color
            {
                "rxvt-256color"
            } else {
                "rxvt"
            };
            Resolved::known(variant, confident)
        }

        "xfce" | "xfce-terminal" | "xfce4-terminal" => Resolved::known("xfce", confident),

        "eterm" | "Eterm" => Resolved::known(
            if color { "eterm-256color" } else { "eterm" },
            confident,
        ),

        "Apple_Terminal" | "apple_terminal" | "Terminal" | "terminal" => {
            Resolved::known("osx-256color", confident)
        }

        "iTerm.app" | "iterm2" | "iTerm2" | "iterm" => Resolved::known("iterm", confident),

        "xterm-kitty" | "kitty" => Resolved::known("kitty", confident),

        // Unrecognized: keep the lower-cased raw value so callers can
        // still log or match it, but flag the family as unknown.
        other => Resolved {
            app_id: other.to_lowercase(),
            generic_id: "unknown".to_string(),
            confident,
        },
    }
}

/// COLORTERM values that advertise 24-bit color and nothing else.
fn is_true_color_token(colorterm: &str) -> bool {
    matches!(
        colorterm.to_ascii_lowercase().as_str(),
        "truecolor" | "24bit" | "24bits"
    )
}

/// Final path component, for macOS emulators that export full paths.
fn basename(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}
