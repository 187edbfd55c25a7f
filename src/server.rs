//! TCP server for handling password generation requests.
//!
//! Accepts one connection at a time and drains its request loop to
//! completion before the next accept; there is no concurrency. Each
//! received frame is validated and answered with a generated password, with
//! two exceptions: a quit frame ends the session without a response, and an
//! invalid frame (bad length or unknown tag) is logged and dropped without
//! a response while the session stays open.

use crate::config::ServerConfig;
use crate::generator::Generator;
use crate::protocol::{Command, Frame, FRAME_LEN, LISTEN_BACKLOG};
use bytes::BytesMut;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use tracing::{debug, error, info, trace, warn};

/// Server instance
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    generator: Generator,
}

impl Server {
    /// Bind the listening socket described by `config`.
    ///
    /// Goes through `socket2` so the listen backlog is the protocol's
    /// fixed 5 rather than the platform default.
    pub fn bind(config: &ServerConfig) -> io::Result<Self> {
        let addr: SocketAddr = config
            .listen
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let socket = socket2::Socket::new(
            socket2::Domain::IPV4,
            socket2::Type::STREAM,
            Some(socket2::Protocol::TCP),
        )?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(LISTEN_BACKLOG)?;

        let generator = match config.seed {
            Some(seed) => Generator::with_seed(seed),
            None => Generator::new(),
        };

        Ok(Server {
            listener: socket.into(),
            generator,
        })
    }

    /// The address the server is actually bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop. Never returns under normal operation.
    pub fn run(mut self) -> io::Result<()> {
        info!(address = %self.local_addr()?, "Server listening");

        loop {
            match self.listener.accept() {
                Ok((mut stream, peer)) => {
                    info!(peer = %peer, "New connection");

                    if let Err(e) = self.serve_client(&mut stream) {
                        debug!(peer = %peer, error = %e, "Connection error");
                    }
                    // Dropping the stream closes the connection on every
                    // exit path.
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    /// Request loop for one accepted connection.
    ///
    /// Returns `Ok(())` when the peer disconnects or quits; any I/O error
    /// ends the session and is reported by the caller.
    fn serve_client(&mut self, stream: &mut TcpStream) -> io::Result<()> {
        let mut raw = [0u8; FRAME_LEN];

        loop {
            match stream.read_exact(&mut raw) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    trace!("Connection closed by client");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }

            let frame = Frame::from_bytes(&raw);
            match frame.command() {
                Ok(Command::Quit) => {
                    info!("Client disconnected");
                    return Ok(());
                }
                Ok(Command::Generate { kind, length }) => {
                    let password = self.generator.generate(kind, length as usize);
                    trace!(kind = ?kind, length, "Generated password");

                    let mut reply = frame;
                    reply.set_password(&password);

                    let mut out = BytesMut::with_capacity(FRAME_LEN);
                    reply.encode(&mut out);
                    stream.write_all(&out)?;
                }
                // Invalid requests get no response; the session stays open
                // and waits for the next frame.
                Err(e) => {
                    warn!(error = %e, "Ignoring invalid request");
                }
            }
        }
    }
}
