//! Fluent forward protocol client.
//!
//! Each post is one Message mode event, `[tag, time, record]`, encoded as
//! MessagePack and written to a TCP connection to a Fluentd / Fluent Bit
//! `forward` input.

use super::config::FluentConfig;
use super::stats::{TransportStats, TransportStatsSnapshot};
use super::Transport;
use crate::domain::{Record, TransportError};
use parking_lot::Mutex;
use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Connection {
    stream: Option<TcpStream>,
    closed: bool,
}

#[derive(Debug)]
pub struct FluentTransport {
    config: FluentConfig,
    addrs: Vec<SocketAddr>,
    conn: Mutex<Connection>,
    stats: Arc<TransportStats>,
}

/// Encodes `[tag, time, record]` as a MessagePack array.
pub fn encode_message(tag: &str, time: i64, record: &Record) -> Result<Vec<u8>, TransportError> {
    Ok(rmp_serde::to_vec(&(tag, time, record))?)
}

impl FluentTransport {
    /// Resolves the collector address. The connection itself is opened on
    /// the first post.
    pub fn new(config: FluentConfig) -> Result<Self, TransportError> {
        config
            .validate()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        let address = config.address();
        let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| TransportError::InvalidAddress(format!("{address}: {e}")))?
            .collect();

        if addrs.is_empty() {
            return Err(TransportError::InvalidAddress(format!(
                "{address}: no addresses resolved"
            )));
        }

        Ok(Self {
            config,
            addrs,
            conn: Mutex::new(Connection::default()),
            stats: Arc::new(TransportStats::new()),
        })
    }

    pub fn config(&self) -> &FluentConfig {
        &self.config
    }

    pub fn stats(&self) -> TransportStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_connected(&self) -> bool {
        self.conn.lock().stream.is_some()
    }

    fn connect(&self) -> Result<(TcpStream, SocketAddr), TransportError> {
        let mut last_err = None;
        for addr in &self.addrs {
            match TcpStream::connect_timeout(addr, self.config.timeout()) {
                Ok(stream) => {
                    stream.set_write_timeout(self.config.write_timeout())?;
                    stream.set_nodelay(true)?;
                    self.stats.record_connect();
                    return Ok((stream, *addr));
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(TransportError::Connect(last_err.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no address to connect to")
        })))
    }

    /// Writes `payload`, returning the peer address when a new connection
    /// had to be opened for it.
    fn write_payload(
        &self,
        conn: &mut Connection,
        payload: &[u8],
    ) -> Result<Option<SocketAddr>, TransportError> {
        // A stream that failed a write is dropped here and reopened next time.
        let (mut stream, connected) = match conn.stream.take() {
            Some(stream) => (stream, None),
            None => {
                let (stream, addr) = self.connect()?;
                (stream, Some(addr))
            }
        };
        stream.write_all(payload)?;
        stream.flush()?;
        conn.stream = Some(stream);
        Ok(connected)
    }
}

impl Transport for FluentTransport {
    fn post(&self, tag: &str, record: &Record) -> Result<(), TransportError> {
        let payload = encode_message(tag, chrono::Utc::now().timestamp(), record)?;

        let mut conn = self.conn.lock();
        if conn.closed {
            return Err(TransportError::Closed);
        }
        let result = self.write_payload(&mut conn, &payload);
        // Nothing may log while the connection is locked.
        drop(conn);

        match result {
            Ok(connected) => {
                if let Some(addr) = connected {
                    tracing::debug!(target: "fluent_writer", %addr, "connected to fluent collector");
                }
                self.stats.record_post(true, payload.len());
                Ok(())
            }
            Err(e) => {
                self.stats.record_post(false, payload.len());
                Err(e)
            }
        }
    }

    fn close(&self) -> Result<(), TransportError> {
        let mut conn = self.conn.lock();
        if conn.closed {
            return Ok(());
        }
        conn.closed = true;

        if let Some(mut stream) = conn.stream.take() {
            stream.flush()?;
            stream.shutdown(Shutdown::Both)?;
        }
        Ok(())
    }
}
