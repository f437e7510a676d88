//! # Host Input Tests
//!
//! Exercised on sockets and files, which are never terminals, so raw mode
//! stays off and only the non-blocking behavior is visible.

use std::io::{Seek, Write};
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;

use pretty_assertions::assert_eq;
use tbsim_core::soc::host::{ByteSource, HostInput};
use tempfile::tempfile;

#[test]
fn empty_socket_polls_as_none() {
    let (ours, _theirs) = UnixStream::pair().unwrap();
    let mut input = HostInput::from_fd(ours.as_raw_fd()).unwrap();
    assert!(!input.is_raw());
    for _ in 0..3 {
        assert_eq!(input.poll_byte().unwrap(), None);
    }
}

#[test]
fn bytes_arrive_one_per_poll() {
    let (ours, mut theirs) = UnixStream::pair().unwrap();
    let mut input = HostInput::from_fd(ours.as_raw_fd()).unwrap();
    theirs.write_all(b"ok").unwrap();

    assert_eq!(input.poll_byte().unwrap(), Some(b'o'));
    assert_eq!(input.poll_byte().unwrap(), Some(b'k'));
    assert_eq!(input.poll_byte().unwrap(), None);
}

#[test]
fn end_of_file_is_not_an_error() {
    let mut file = tempfile().unwrap();
    file.write_all(b"z").unwrap();
    file.rewind().unwrap();

    let mut input = HostInput::from_fd(file.as_raw_fd()).unwrap();
    assert_eq!(input.poll_byte().unwrap(), Some(b'z'));
    assert_eq!(input.poll_byte().unwrap(), None);
    assert_eq!(input.poll_byte().unwrap(), None);
}

#[test]
fn scripted_queue_drains_in_order() {
    let mut queue: std::collections::VecDeque<u8> = b"ab".iter().copied().collect();
    assert_eq!(queue.poll_byte().unwrap(), Some(b'a'));
    assert_eq!(queue.poll_byte().unwrap(), Some(b'b'));
    assert_eq!(queue.poll_byte().unwrap(), None);
}

#[test]
fn invalid_descriptor_is_rejected() {
    assert!(HostInput::from_fd(-1).is_err());
}
