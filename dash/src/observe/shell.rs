//! Interactive shell of a replica over WebSocket

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::header::{HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::errors::DashError;

/// An open shell session; dropping it closes the socket
pub struct ShellSession {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ShellSession {
    /// Connect to a shell URL such as the one from `HttpClient::replica_shell_url`
    pub async fn connect(url: &str, token: Option<&SecretString>) -> Result<Self, DashError> {
        let mut request = url.into_client_request()?;
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| DashError::ConfigError(format!("Invalid token: {}", e)))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        info!("Connecting to shell: {}", url);
        let (socket, _) = connect_async(request).await?;
        Ok(Self { socket })
    }

    /// Send keystrokes
    pub async fn send_input(&mut self, data: &[u8]) -> Result<(), DashError> {
        self.socket
            .send(Message::Binary(Bytes::copy_from_slice(data)))
            .await?;
        Ok(())
    }

    /// Next chunk of terminal output; `None` once the server closed the shell
    pub async fn next_output(&mut self) -> Option<Result<Bytes, DashError>> {
        loop {
            match self.socket.next().await? {
                Ok(Message::Binary(data)) => return Some(Ok(data)),
                Ok(Message::Text(text)) => return Some(Ok(Bytes::copy_from_slice(text.as_str().as_bytes()))),
                Ok(Message::Close(frame)) => {
                    debug!("Shell closed by server: {:?}", frame);
                    return None;
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    pub async fn close(mut self) {
        if let Err(e) = self.socket.close(None).await {
            warn!("Failed to close shell cleanly: {}", e);
        }
    }
}
