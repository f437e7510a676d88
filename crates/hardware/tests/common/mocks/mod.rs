//! `mockall` doubles for the host streams the serial models talk to.

use std::io::{self, Write};

use mockall::mock;
use tbsim_core::soc::host::ByteSource;

mock! {
    /// Byte source with scripted poll results.
    pub Source {}

    impl ByteSource for Source {
        fn poll_byte(&mut self) -> io::Result<Option<u8>>;
    }
}

mock! {
    /// Byte sink with scripted write results.
    pub Sink {}

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}
