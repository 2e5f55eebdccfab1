use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What a fake server sends back after reading the `INFO` request.
#[derive(Clone)]
pub enum Script {
    /// A bulk reply wrapping this text.
    Info(String),
    /// Raw bytes written as they are.
    Raw(Vec<u8>),
    /// Accept the connection and never answer.
    Silent,
}

/// A single connection key-value server bound to an ephemeral local port.
pub struct FakeServer {
    pub port: u16,
    handle: JoinHandle<()>,
}

impl FakeServer {
    pub async fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let port = listener.local_addr().expect("local addr").port();

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let script = script.clone();
                tokio::spawn(async move {
                    let mut request = [0u8; 6];
                    if socket.read_exact(&mut request).await.is_err() {
                        return;
                    }
                    let bytes = match script {
                        Script::Info(body) => format!("${}\r\n{}\r\n", body.len(), body).into_bytes(),
                        Script::Raw(bytes) => bytes,
                        Script::Silent => {
                            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                            return;
                        }
                    };
                    let _ = socket.write_all(&bytes).await;
                });
            }
        });

        Self { port, handle }
    }

    pub async fn info(body: &str) -> Self {
        Self::start(Script::Info(body.to_string())).await
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns a local port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe port");
    listener.local_addr().expect("local addr").port()
}

pub fn clients_reply(n: u32) -> String {
    format!(
        "# Server\r\nredis_version:7.2.4\r\ntcp_port:6379\r\n\r\n# Clients\r\nconnected_clients:{n}\r\nblocked_clients:0\r\n\r\n# Keyspace\r\ndb0:keys=12,expires=0,avg_ttl=0\r\n"
    )
}
