// ============================================================================
// TcpTransport - Length-prefixed frames over tokio TCP (requires "network")
// ============================================================================

#[cfg(feature = "network")]
mod tcp {
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::domain::TransportError;
    use crate::ports::{Acceptor, Connection, Transport};

    /// Default upper bound on a single frame.
    pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

    /// TCP transport.
    ///
    /// # Wire Format
    ///
    /// Each message is `[length:u32 BE][payload]`. A length above
    /// `max_frame_size` is rejected before any payload is read.
    #[derive(Debug, Clone, Copy)]
    pub struct TcpTransport {
        max_frame_size: usize,
    }

    impl TcpTransport {
        /// Transport with the default frame limit.
        pub fn new() -> Self {
            Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
        }

        /// Transport with a custom frame limit.
        pub fn with_max_frame_size(max_frame_size: usize) -> Self {
            Self { max_frame_size }
        }
    }

    impl Default for TcpTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Transport for TcpTransport {
        async fn connect(&self, addr: SocketAddr) -> Result<Box<dyn Connection>, TransportError> {
            let stream = TcpStream::connect(addr)
                .await
                .map_err(|e| TransportError::Connect {
                    addr,
                    message: e.to_string(),
                })?;
            Ok(Box::new(TcpConnection::new(stream, self.max_frame_size)?))
        }

        async fn listen(&self, addr: SocketAddr) -> Result<Box<dyn Acceptor>, TransportError> {
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|e| TransportError::Bind {
                    addr,
                    message: e.to_string(),
                })?;
            let local_addr = listener.local_addr().map_err(|e| TransportError::Bind {
                addr,
                message: e.to_string(),
            })?;
            Ok(Box::new(TcpAcceptor {
                listener,
                local_addr,
                max_frame_size: self.max_frame_size,
            }))
        }
    }

    /// Bound TCP listener.
    pub struct TcpAcceptor {
        listener: TcpListener,
        local_addr: SocketAddr,
        max_frame_size: usize,
    }

    #[async_trait]
    impl Acceptor for TcpAcceptor {
        fn local_addr(&self) -> SocketAddr {
            self.local_addr
        }

        async fn accept(&mut self) -> Result<Box<dyn Connection>, TransportError> {
            let (stream, _) = self
                .listener
                .accept()
                .await
                .map_err(|e| TransportError::Io(e.to_string()))?;
            Ok(Box::new(TcpConnection::new(stream, self.max_frame_size)?))
        }
    }

    /// Established TCP connection with frame I/O.
    pub struct TcpConnection {
        stream: TcpStream,
        peer_addr: SocketAddr,
        local_addr: SocketAddr,
        max_frame_size: usize,
    }

    impl TcpConnection {
        fn new(stream: TcpStream, max_frame_size: usize) -> Result<Self, TransportError> {
            let peer_addr = stream
                .peer_addr()
                .map_err(|e| TransportError::Io(e.to_string()))?;
            let local_addr = stream
                .local_addr()
                .map_err(|e| TransportError::Io(e.to_string()))?;
            Ok(Self {
                stream,
                peer_addr,
                local_addr,
                max_frame_size,
            })
        }
    }

    fn read_error(e: std::io::Error) -> TransportError {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            TransportError::Closed
        } else {
            TransportError::Io(e.to_string())
        }
    }

    #[async_trait]
    impl Connection for TcpConnection {
        fn peer_addr(&self) -> SocketAddr {
            self.peer_addr
        }

        fn local_addr(&self) -> SocketAddr {
            self.local_addr
        }

        async fn send_frame(&mut self, payload: &[u8]) -> Result<(), TransportError> {
            if payload.len() > self.max_frame_size {
                return Err(TransportError::FrameTooLarge {
                    size: payload.len(),
                    max: self.max_frame_size,
                });
            }
            let len = u32::try_from(payload.len()).map_err(|_| TransportError::FrameTooLarge {
                size: payload.len(),
                max: self.max_frame_size,
            })?;

            let mut frame = Vec::with_capacity(payload.len() + 4);
            frame.extend_from_slice(&len.to_be_bytes());
            frame.extend_from_slice(payload);
            self.stream
                .write_all(&frame)
                .await
                .map_err(|e| TransportError::Io(e.to_string()))?;
            self.stream
                .flush()
                .await
                .map_err(|e| TransportError::Io(e.to_string()))
        }

        async fn recv_frame(&mut self) -> Result<Vec<u8>, TransportError> {
            let len = self.stream.read_u32().await.map_err(read_error)? as usize;
            if len > self.max_frame_size {
                return Err(TransportError::FrameTooLarge {
                    size: len,
                    max: self.max_frame_size,
                });
            }
            let mut payload = vec![0u8; len];
            self.stream
                .read_exact(&mut payload)
                .await
                .map_err(read_error)?;
            Ok(payload)
        }
    }
}

#[cfg(feature = "network")]
pub use tcp::{TcpAcceptor, TcpConnection, TcpTransport, DEFAULT_MAX_FRAME_SIZE};
