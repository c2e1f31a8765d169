//! Connection establishment: accept exactly one peer, or dial one.
//!
//! Both operations are one-shot.  There is no retry or backoff; the first
//! failure is returned to the caller, which treats it as fatal.

use std::io;
use std::net::SocketAddr;

use chat_core::Notice;
use thiserror::Error;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::application::{ChatDisplay, SessionTransport};
use crate::infrastructure::network::wire::{LineReader, LineWriter};

/// Error type for the establishment phase.
#[derive(Debug, Error)]
pub enum EstablishError {
    /// The listen address could not be bound (malformed, in use, or denied).
    #[error("failed to start listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    /// Accepting the single inbound connection failed.
    #[error("failed to accept on {address}: {source}")]
    Accept {
        address: String,
        #[source]
        source: io::Error,
    },
    /// Dialing the remote address failed.
    #[error("failed to connect to {address}: {source}")]
    Dial {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// An established TCP connection to the single chat peer.
#[derive(Debug)]
pub struct PeerConnection {
    stream: TcpStream,
    peer_addr: SocketAddr,
}

impl PeerConnection {
    /// The peer's remote endpoint.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Our local endpoint of the connection.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }
}

impl SessionTransport for PeerConnection {
    type Reader = LineReader<OwnedReadHalf>;
    type Writer = LineWriter<OwnedWriteHalf>;

    fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    fn into_halves(self) -> (Self::Reader, Self::Writer) {
        let (read_half, write_half) = self.stream.into_split();
        (LineReader::new(read_half), LineWriter::new(write_half))
    }
}

/// A bound listener that accepts at most one peer.
#[derive(Debug)]
pub struct PeerListener {
    listener: TcpListener,
    address: String,
}

impl PeerListener {
    /// Binds and starts listening on `address` (`host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`EstablishError::Bind`] if the address does not resolve or
    /// cannot be bound.  Nothing stays open in that case.
    pub async fn bind(address: &str) -> Result<Self, EstablishError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| EstablishError::Bind {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            address: address.to_string(),
        })
    }

    /// The address actually bound (useful when the requested port was `0`).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for one inbound connection, then stops listening.
    ///
    /// The listening socket is closed before this returns, whether or not the
    /// accept succeeded, so later connection attempts are refused.
    ///
    /// # Errors
    ///
    /// Returns [`EstablishError::Accept`] if accepting fails.
    pub async fn accept_one(self) -> Result<PeerConnection, EstablishError> {
        let accepted = self.listener.accept().await;
        drop(self.listener);

        let (stream, peer_addr) = accepted.map_err(|source| EstablishError::Accept {
            address: self.address.clone(),
            source,
        })?;
        debug!("accepted {peer_addr}; listener on {} closed", self.address);

        Ok(PeerConnection { stream, peer_addr })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Listens on `address`, accepts exactly one peer, and returns the connection.
///
/// Shows `Listening` once bound and `PeerConnected` after the accept.
///
/// # Errors
///
/// [`EstablishError::Bind`] or [`EstablishError::Accept`].
pub async fn passive_listen(
    address: &str,
    display: &dyn ChatDisplay,
) -> Result<PeerConnection, EstablishError> {
    let listener = PeerListener::bind(address).await?;

    let bound = match listener.local_addr() {
        Ok(addr) => addr.to_string(),
        Err(e) => {
            warn!("could not read bound address for {address}: {e}");
            address.to_string()
        }
    };
    info!("listening for a peer on {bound}");
    display.show(&Notice::Listening(bound));

    let conn = listener.accept_one().await?;
    info!("peer connected from {}", conn.peer_addr());
    display.show(&Notice::PeerConnected(conn.peer_addr().to_string()));

    Ok(conn)
}

/// Dials `address` once and returns the connection.
///
/// Shows `Connecting` before the attempt and `Connected` after success.
///
/// # Errors
///
/// Returns [`EstablishError::Dial`] on a malformed address, refusal, timeout,
/// or unreachable host.
pub async fn active_dial(
    address: &str,
    display: &dyn ChatDisplay,
) -> Result<PeerConnection, EstablishError> {
    display.show(&Notice::Connecting(address.to_string()));

    let dial_error = |source| EstablishError::Dial {
        address: address.to_string(),
        source,
    };
    let stream = TcpStream::connect(address).await.map_err(dial_error)?;
    let peer_addr = stream.peer_addr().map_err(dial_error)?;

    info!("connected to peer at {peer_addr}");
    display.show(&Notice::Connected(peer_addr.to_string()));

    Ok(PeerConnection { stream, peer_addr })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
