//! Client session duplexer
//!
//! One connection, two concurrently active flows:
//!
//! - the receiver reads from the socket and writes whatever arrives to
//!   local output verbatim, with no framing interpretation;
//! - the sender reads local input one line at a time and writes each
//!   line, trailing delimiter included, to the socket.
//!
//! When the receiver observes end-of-stream or an error, the session is
//! over: the `select!` below resolves and the sender flow is dropped at
//! that point. Disconnection deliberately ends the whole session, not
//! just the receive flow. Local input ending is the quieter event: the
//! sender half-closes the socket and the receiver keeps the session
//! alive until the server side goes away.

use bytes::BytesMut;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::client::config::ClientConfig;
use crate::error::{Error, Result};

/// Receive buffer capacity; chunks may arrive in any size regardless
const RECV_BUFFER_SIZE: usize = 1024;

/// A connected client session
///
/// # Example
/// ```no_run
/// use relay_rs::{ClientConfig, ClientSession};
///
/// # async fn example() -> relay_rs::Result<()> {
/// let session = ClientSession::connect(ClientConfig::default()).await?;
/// let input = tokio::io::BufReader::new(tokio::io::stdin());
/// session.run(input, tokio::io::stdout()).await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientSession {
    stream: TcpStream,
}

impl ClientSession {
    /// Connect to the relay server
    ///
    /// A connect failure is fatal to the client and carries the address
    /// that was tried.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let stream = TcpStream::connect(config.addr)
            .await
            .map_err(|source| Error::Connect {
                addr: config.addr,
                source,
            })?;

        if config.tcp_nodelay {
            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
            }
        }

        tracing::info!(addr = %config.addr, "Connected to relay server");
        Ok(Self { stream })
    }

    /// Run the duplexer until disconnection
    ///
    /// Returns when the server side of the connection ends (the normal
    /// way a session finishes) or when either flow hits an I/O error on
    /// the local streams.
    pub async fn run<I, O>(self, input: I, output: O) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let (socket_rx, socket_tx) = self.stream.into_split();
        drive(socket_rx, socket_tx, input, output).await
    }
}

/// Duplexer core, generic over the transport so tests can run it against
/// in-memory streams
async fn drive<R, W, I, O>(socket_rx: R, socket_tx: W, input: I, output: O) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let recv = receive_flow(socket_rx, output);
    let send = send_flow(input, socket_tx);
    tokio::pin!(recv);

    let sent = tokio::select! {
        // Disconnection ends the session; the sender future is dropped here
        received = &mut recv => return received,
        sent = send => sent,
    };
    sent?;

    // Local input is exhausted; broadcasts keep arriving until the server
    // side closes
    recv.await
}

/// Socket → local output, verbatim
async fn receive_flow<R, O>(mut socket_rx: R, mut output: O) -> Result<()>
where
    R: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut buf = BytesMut::with_capacity(RECV_BUFFER_SIZE);

    loop {
        let n = socket_rx.read_buf(&mut buf).await?;
        if n == 0 {
            tracing::info!("Server closed the connection");
            return Ok(());
        }

        let chunk = buf.split();
        output.write_all(&chunk).await?;
        output.flush().await?;
    }
}

/// Local input → socket, one line at a time with its delimiter
async fn send_flow<I, W>(mut input: I, mut socket_tx: W) -> Result<()>
where
    I: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let n = input.read_line(&mut line).await?;
        if n == 0 {
            // Local EOF: half-close our direction so the server sees a
            // clean end of our contribution
            if let Err(e) = socket_tx.shutdown().await {
                tracing::debug!(error = %e, "Socket shutdown failed");
            }
            tracing::debug!("Local input ended");
            return Ok(());
        }

        socket_tx.write_all(line.as_bytes()).await?;
    }
}
