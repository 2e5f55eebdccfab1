use std::time::Duration;

use async_trait::async_trait;
use fleetprobe_common::info::model::Reply;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

use crate::network::transport::{Endpoint, Transport, TransportError};

const INFO_COMMAND: &[u8] = b"INFO\r\n";

/// Longest accepted reply header line (`$<len>\r\n`, `-ERR ...\r\n`).
const MAX_HEADER_BYTES: u64 = 1024;

/// Largest accepted `INFO` payload.
pub const MAX_REPLY_BYTES: usize = 4 * 1024 * 1024;

/// Speaks just enough of the key-value wire protocol to send `INFO` and read
/// its reply over plain TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoTransport;

#[async_trait]
impl Transport for InfoTransport {
    async fn fetch(&self, endpoint: &Endpoint, limit: Duration) -> Result<Reply, TransportError> {
        match timeout(limit, exchange(endpoint)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportError::Timeout(limit)),
        }
    }
}

async fn exchange(endpoint: &Endpoint) -> Result<Reply, TransportError> {
    let mut stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(TransportError::Connect)?;
    trace!(%endpoint, "connected");

    stream.write_all(INFO_COMMAND).await?;

    let mut reader = BufReader::new(stream);
    read_reply(&mut reader).await
}

/// Reads one reply off the wire.
///
/// Bulk strings become [`Reply::Text`], error lines [`Reply::Error`]; any other
/// well-formed reply is [`Reply::Unexpected`].
pub async fn read_reply<R>(reader: &mut R) -> Result<Reply, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let header = read_header(reader).await?;
    let Some(kind) = header.chars().next() else {
        return Err(TransportError::Protocol("empty reply header".to_string()));
    };
    let rest = &header[kind.len_utf8()..];

    match kind {
        '$' => read_bulk(reader, rest).await,
        '-' => Ok(Reply::Error(rest.to_string())),
        '+' => Ok(Reply::Unexpected(format!("status reply '{rest}'"))),
        ':' => Ok(Reply::Unexpected(format!("integer reply {rest}"))),
        '*' => Ok(Reply::Unexpected("array reply".to_string())),
        _ => Err(TransportError::Protocol(format!(
            "unknown reply type '{kind}'"
        ))),
    }
}

async fn read_header<R>(reader: &mut R) -> Result<String, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line: Vec<u8> = Vec::new();
    let read = (&mut *reader)
        .take(MAX_HEADER_BYTES)
        .read_until(b'\n', &mut line)
        .await?;

    if read == 0 {
        return Err(TransportError::Protocol(
            "connection closed before reply".to_string(),
        ));
    }

    let Some(line) = line.strip_suffix(b"\r\n") else {
        return Err(TransportError::Protocol(
            "reply header truncated or too long".to_string(),
        ));
    };

    Ok(String::from_utf8_lossy(line).into_owned())
}

async fn read_bulk<R>(reader: &mut R, len_str: &str) -> Result<Reply, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let len: i64 = len_str
        .parse()
        .map_err(|_| TransportError::Protocol(format!("invalid bulk length '{len_str}'")))?;

    if len < 0 {
        return Ok(Reply::Unexpected("nil reply".to_string()));
    }

    let len = usize::try_from(len)
        .ok()
        .filter(|len| *len <= MAX_REPLY_BYTES)
        .ok_or_else(|| {
            TransportError::Protocol(format!(
                "reply of {len} bytes exceeds limit of {MAX_REPLY_BYTES}"
            ))
        })?;

    let mut payload = vec![0u8; len + 2];
    reader.read_exact(&mut payload).await?;

    if !payload.ends_with(b"\r\n") {
        return Err(TransportError::Protocol(
            "bulk reply not terminated".to_string(),
        ));
    }
    payload.truncate(len);

    Ok(Reply::Text(String::from_utf8_lossy(&payload).into_owned()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
