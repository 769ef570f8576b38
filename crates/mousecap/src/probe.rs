#![forbid(unsafe_code)]

//! Active terminal probing: one bounded query round trip.
//!
//! Writes a capability-request escape sequence to the terminal and waits
//! for the report, with a hard timeout. A terminal that answers at all is
//! escape-sequence-aware, which is the empirical signal the mouse decision
//! in [`crate::mouse`] builds on.
//!
//! # Safety Contract
//!
//! - **Bounded**: the probe resolves within its timeout plus a small fixed
//!   overhead. On timeout it returns `None` (fail-open).
//! - **Raw-mode restoration**: the terminal's raw-mode state is captured
//!   before the probe and restored on every exit path, exactly once.
//! - **Non-interactive input**: when stdin is not a terminal device the
//!   probe resolves `None` immediately without touching stream state.
//!
//! Runtime probing reads `/dev/tty` directly and is only available on
//! Unix targets; elsewhere [`probe_terminal`] returns `None`.

use std::time::Duration;

/// Primary Device Attributes query (`ESC [ c`).
///
/// Every escape-aware terminal answers this with `ESC [ ? Ps ; ... c`.
pub const DA1_QUERY: &[u8] = b"\x1b[c";

/// Maximum bytes to accept in a single probe response.
const MAX_RESPONSE_LEN: usize = 256;

/// Conventional final byte of a capability-report response.
const RESPONSE_TERMINATOR: u8 = b'c';

/// Send `query` to the terminal and wait for the response.
///
/// Returns the response text, or `None` on timeout, non-interactive
/// input, or any stream error. Errors are deliberately indistinguishable
/// from timeouts: capability detection must never fail the caller.
#[must_use]
pub fn probe_terminal(query: &[u8], timeout: Duration) -> Option<String> {
    #[cfg(unix)]
    return probe_terminal_unix(query, timeout);

    #[cfg(not(unix))]
    {
        let _ = (query, timeout);
        None
    }
}

#[cfg(unix)]
fn probe_terminal_unix(query: &[u8], timeout: Duration) -> Option<String> {
    use std::io::Write;

    use crossterm::tty::IsTty;

    if !std::io::stdin().is_tty() {
        // Nothing will ever arrive on a pipe; don't disturb stream mode.
        return None;
    }

    // Guard construction records the pre-probe raw-mode state; drop
    // restores it on both the data and the timeout path.
    let _raw = RawModeGuard::enter(CrosstermRawMode)?;

    let mut stdout = std::io::stdout();
    stdout.write_all(query).ok()?;
    stdout.flush().ok()?;

    let bytes = read_tty_response(timeout)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(len = bytes.len(), "probe response received");

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Raw-mode operations on the terminal, injectable for tests.
trait RawMode {
    fn is_raw(&self) -> std::io::Result<bool>;
    fn enable(&self) -> std::io::Result<()>;
    fn disable(&self) -> std::io::Result<()>;
}

/// The real terminal, through crossterm.
struct CrosstermRawMode;

impl RawMode for CrosstermRawMode {
    fn is_raw(&self) -> std::io::Result<bool> {
        crossterm::terminal::is_raw_mode_enabled()
    }

    fn enable(&self) -> std::io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn disable(&self) -> std::io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Restores the raw-mode state captured at construction.
///
/// Entering is a no-op when the terminal is already raw (do not assume a
/// fixed baseline); leaving only disables raw mode if this guard enabled
/// it. Drop runs exactly once, so restoration cannot double-fire.
struct RawModeGuard<M: RawMode> {
    mode: M,
    was_raw: bool,
}

impl<M: RawMode> RawModeGuard<M> {
    fn enter(mode: M) -> Option<Self> {
        let was_raw = mode.is_raw().ok()?;
        if !was_raw {
            mode.enable().ok()?;
        }
        Some(Self { mode, was_raw })
    }
}

impl<M: RawMode> Drop for RawModeGuard<M> {
    fn drop(&mut self) {
        if !self.was_raw {
            let _ = self.mode.disable();
        }
    }
}

/// Read a response from `/dev/tty` with a hard timeout.
///
/// A background thread performs the blocking byte-by-byte read and checks
/// for the response terminator; the caller waits on a rendezvous channel
/// bounded by `timeout`. Whichever side finishes first wins — a late
/// response is dropped with the channel.
#[cfg(unix)]
fn read_tty_response(timeout: Duration) -> Option<Vec<u8>> {
    use std::io::Read;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    let tty = std::fs::File::open("/dev/tty").ok()?;
    let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(1);

    // Internal guard so the thread cannot outlive the caller for long.
    let thread_timeout = timeout + Duration::from_millis(200);

    thread::Builder::new()
        .name("mousecap-probe".into())
        .spawn(move || {
            let mut reader = std::io::BufReader::new(tty);
            let mut response = Vec::with_capacity(16);
            let mut buf = [0u8; 1];
            let start = Instant::now();

            while response.len() < MAX_RESPONSE_LEN {
                match reader.read(&mut buf) {
                    Ok(1) => {
                        response.push(buf[0]);
                        if response_complete(&response) {
                            break;
                        }
                    }
                    _ => break,
                }
                if start.elapsed() > thread_timeout {
                    break;
                }
            }

            let _ = tx.send(response);
        })
        .ok()?;

    match rx.recv_timeout(timeout) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        _ => None,
    }
}

/// A capability report is complete once the buffer ends with the
/// terminator byte.
fn response_complete(buf: &[u8]) -> bool {
    buf.last() == Some(&RESPONSE_TERMINATOR)
}
