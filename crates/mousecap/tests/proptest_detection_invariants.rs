//! Property-based invariant tests for terminal detection.
//!
//! These tests verify structural invariants that must hold for any
//! environment snapshot:
//!
//! 1. Classification is deterministic.
//! 2. The canonical identity is always lower-case.
//! 3. The classifier always produces a value (no panics, no empty ids).
//! 4. Protocol is `none` exactly when mouse support is false.
//! 5. Non-interactive snapshots always yield the `"none"` sentinel.

use mousecap::env_snapshot::{EnvSnapshot, Platform};
use mousecap::identity::classify_from_snapshot;
use mousecap::mouse::{MouseProtocol, capability_from_snapshot};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn platform_strategy() -> impl Strategy<Value = Platform> {
    prop_oneof![
        Just(Platform::MacOs),
        Just(Platform::Android),
        Just(Platform::Linux),
        Just(Platform::Other),
    ]
}

fn env_var_strategy() -> impl Strategy<Value = String> {
    // Mix of realistic terminal names and arbitrary junk.
    prop_oneof![
        Just(String::new()),
        Just("xterm".to_string()),
        Just("xterm-256color".to_string()),
        Just("linux".to_string()),
        Just("xterm-kitty".to_string()),
        Just("gnome-terminal".to_string()),
        Just("truecolor".to_string()),
        "[a-zA-Z0-9_./-]{1,20}",
    ]
}

fn snapshot_strategy() -> impl Strategy<Value = EnvSnapshot> {
    (
        (
            any::<bool>(),
            any::<bool>(),
            env_var_strategy(),
            env_var_strategy(),
            env_var_strategy(),
            proptest::option::of(0u32..10_000),
        ),
        (
            any::<bool>(),
            any::<bool>(),
            platform_strategy(),
            any::<bool>(),
            any::<bool>(),
        ),
    )
        .prop_map(
            |(
                (ci, ssh_session, term, term_program, colorterm, vte_version),
                (termux, konsole_marker, platform, stdout_is_tty, stdin_is_tty),
            )| EnvSnapshot {
                ci,
                ssh_session,
                term,
                term_program,
                colorterm,
                vte_version,
                termux,
                konsole_marker,
                platform,
                stdout_is_tty,
                stdin_is_tty,
            },
        )
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Classification is deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classification_deterministic(snap in snapshot_strategy()) {
        prop_assert_eq!(
            classify_from_snapshot(&snap),
            classify_from_snapshot(&snap)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Canonical identity is lower-case
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn app_id_is_lowercase(snap in snapshot_strategy()) {
        let id = classify_from_snapshot(&snap);
        prop_assert_eq!(
            id.app_id.clone(),
            id.app_id.to_lowercase(),
            "canonical id not lower-case: {:?}",
            id
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Classifier always produces non-empty sentinels
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identity_fields_never_empty(snap in snapshot_strategy()) {
        let id = classify_from_snapshot(&snap);
        prop_assert!(!id.app_id.is_empty());
        prop_assert!(!id.generic_id.is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Protocol is `none` exactly when unsupported
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn protocol_matches_support(snap in snapshot_strategy()) {
        let cap = capability_from_snapshot(&snap);
        prop_assert_eq!(
            cap.mouse_supported,
            cap.protocol != MouseProtocol::None,
            "support/protocol mismatch: {:?}",
            cap
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Non-interactive snapshots yield the "none" sentinel
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn non_interactive_is_none_sentinel(snap in snapshot_strategy()) {
        let mut snap = snap;
        snap.stdout_is_tty = false;
        let id = classify_from_snapshot(&snap);
        prop_assert!(!id.is_interactive);
        prop_assert_eq!(id.app_id, "none");
        prop_assert!(id.confident);
    }
}
