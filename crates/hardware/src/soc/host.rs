//! Host byte streams for the serial models.
//!
//! This module provides:
//! 1. **`ByteSource`:** The non-blocking poll interface the receive model reads from.
//! 2. **`HostInput`:** A file descriptor (normally stdin) switched into raw,
//!    non-blocking mode for the lifetime of the value.
//!
//! Raw mode is a process-wide mutation of the terminal. `HostInput` records the
//! previous terminal attributes and descriptor flags when it is created and puts
//! them back when it is dropped.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::RawFd;

use tracing::debug;

/// A source of bytes that never blocks.
pub trait ByteSource: Send {
    /// Attempts to read one byte.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(byte))` - A byte was available.
    /// * `Ok(None)` - Nothing to read right now; try again next cycle.
    /// * `Err(_)` - The stream is broken and will not recover.
    fn poll_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Scripted input: bytes are handed out front to back, then the source stays empty.
impl ByteSource for VecDeque<u8> {
    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

/// Host file descriptor in raw, non-blocking mode.
pub struct HostInput {
    fd: RawFd,
    saved_flags: libc::c_int,
    saved_termios: Option<libc::termios>,
    eof_seen: bool,
}

impl HostInput {
    /// Takes over the process's standard input.
    pub fn stdin() -> io::Result<Self> {
        Self::from_fd(libc::STDIN_FILENO)
    }

    /// Switches `fd` to raw, non-blocking mode.
    ///
    /// Terminal attributes are only touched when `fd` is a terminal; pipes and
    /// files just become non-blocking.
    ///
    /// # Arguments
    ///
    /// * `fd` - An open descriptor that outlives the returned value.
    pub fn from_fd(fd: RawFd) -> io::Result<Self> {
        // SAFETY: F_GETFL only queries the status flags of `fd`.
        let saved_flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if saved_flags < 0 {
            return Err(io::Error::last_os_error());
        }

        let saved_termios = enter_raw_mode(fd)?;

        // SAFETY: F_SETFL with the flags just read plus O_NONBLOCK.
        if unsafe { libc::fcntl(fd, libc::F_SETFL, saved_flags | libc::O_NONBLOCK) } < 0 {
            let err = io::Error::last_os_error();
            if let Some(termios) = saved_termios {
                restore_termios(fd, &termios);
            }
            return Err(err);
        }

        debug!(fd, raw = saved_termios.is_some(), "host input acquired");
        Ok(Self {
            fd,
            saved_flags,
            saved_termios,
            eof_seen: false,
        })
    }

    /// Returns `true` if the descriptor is a terminal that was put in raw mode.
    pub const fn is_raw(&self) -> bool {
        self.saved_termios.is_some()
    }
}

/// Clears canonical mode, echo, and CR/NL input translation on a terminal.
///
/// Returns the previous attributes, or `None` when `fd` is not a terminal.
fn enter_raw_mode(fd: RawFd) -> io::Result<Option<libc::termios>> {
    // SAFETY: isatty only inspects the descriptor.
    if unsafe { libc::isatty(fd) } != 1 {
        return Ok(None);
    }

    let mut termios = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: tcgetattr writes a complete termios into the buffer on success.
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: tcgetattr returned 0, so the struct is initialized.
    let saved = unsafe { termios.assume_init() };

    let mut raw = saved;
    raw.c_lflag &= !(libc::ICANON | libc::ECHO);
    raw.c_iflag &= !(libc::ICRNL | libc::INLCR);

    // SAFETY: `raw` is a valid termios derived from the current attributes.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(Some(saved))
}

fn restore_termios(fd: RawFd, termios: &libc::termios) {
    // SAFETY: `termios` was produced by tcgetattr on this descriptor.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) } != 0 {
        debug!(fd, error = %io::Error::last_os_error(), "failed to restore terminal mode");
    }
}

impl ByteSource for HostInput {
    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        // SAFETY: `byte` is a live one-byte buffer for the duration of the call.
        let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast(), 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => {
                if !self.eof_seen {
                    debug!(fd = self.fd, "host input reached end of file");
                    self.eof_seen = true;
                }
                Ok(None)
            }
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

impl Drop for HostInput {
    /// Restores the terminal attributes and descriptor flags saved at construction.
    // TODO: also restore on SIGINT/SIGTERM, which terminate without unwinding.
    fn drop(&mut self) {
        if let Some(termios) = self.saved_termios {
            restore_termios(self.fd, &termios);
        }
        // SAFETY: F_SETFL with the flags captured by from_fd.
        if unsafe { libc::fcntl(self.fd, libc::F_SETFL, self.saved_flags) } < 0 {
            debug!(fd = self.fd, error = %io::Error::last_os_error(), "failed to restore descriptor flags");
        }
        debug!(fd = self.fd, "host input released");
    }
}

impl fmt::Debug for HostInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostInput")
            .field("fd", &self.fd)
            .field("raw", &self.is_raw())
            .field("eof_seen", &self.eof_seen)
            .finish_non_exhaustive()
    }
}
