use std::io::{self, StderrLock, StdoutLock, Write};

use fleetprobe_core::network::transport::Endpoint;
use fleetprobe_core::probe::{ProbeError, ReportSink};

/// Writes `<host>:<port> : <value>` for every answered endpoint to `out` and
/// `<host>:<port> : <error>` for every failed one to `err`.
pub struct ConsoleSink<O: Write, E: Write> {
    out: O,
    err: E,
}

impl ConsoleSink<StdoutLock<'static>, StderrLock<'static>> {
    /// Holds both standard stream locks for the lifetime of the sink.
    pub fn stdio() -> Self {
        Self::new(io::stdout().lock(), io::stderr().lock())
    }
}

impl<O: Write, E: Write> ConsoleSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }
}

impl<O: Write, E: Write> ReportSink for ConsoleSink<O, E> {
    fn success(&mut self, endpoint: &Endpoint, value: &str) -> io::Result<()> {
        writeln!(self.out, "{endpoint} : {value}")
    }

    fn failure(&mut self, endpoint: &Endpoint, error: &ProbeError) -> io::Result<()> {
        writeln!(self.err, "{endpoint} : {error}")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    /// A stream whose reader has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    fn missing_clients() -> ProbeError {
        ProbeError::MissingField {
            section: "Clients".to_string(),
            key: "connected_clients".to_string(),
        }
    }

    #[test]
    fn success_and_failure_go_to_separate_streams() {
        let mut sink = ConsoleSink::new(Vec::new(), Vec::new());
        let endpoint = Endpoint::new("10.0.0.1", 11379);

        sink.success(&endpoint, "5").unwrap();
        sink.failure(&endpoint, &missing_clients()).unwrap();
        sink.finish().unwrap();

        assert_eq!(String::from_utf8(sink.out).unwrap(), "10.0.0.1:11379 : 5\n");
        assert_eq!(
            String::from_utf8(sink.err).unwrap(),
            "10.0.0.1:11379 : field Clients.connected_clients not found in reply\n"
        );
    }

    #[test]
    fn write_errors_are_returned() {
        let endpoint = Endpoint::new("10.0.0.1", 11379);

        let mut closed_out = ConsoleSink::new(ClosedPipe, Vec::new());
        let err = closed_out.success(&endpoint, "5").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(closed_out.finish().is_err());

        let mut closed_err = ConsoleSink::new(Vec::new(), ClosedPipe);
        assert!(closed_err.failure(&endpoint, &missing_clients()).is_err());
    }
}
