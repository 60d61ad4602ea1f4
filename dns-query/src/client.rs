use crate::{
    DnsError, DnsMessage, DnsMessageHeader, DnsQuestion, DnsReader, MAX_UDP_MESSAGE_LEN,
};
use fixed_buffer::FixedBuf;
use log::debug;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SERVER: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_QUERY_TYPE: &str = "A";

/// Where to send queries and how long to wait for each reply.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DnsClient {
    pub server: IpAddr,
    pub port: u16,
    pub timeout: Duration,
}
impl Default for DnsClient {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER, DEFAULT_PORT)
    }
}
impl DnsClient {
    pub fn new(server: IpAddr, port: u16) -> Self {
        Self {
            server,
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_server(mut self, server: IpAddr) -> Self {
        self.server = server;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server, self.port)
    }

    /// # Errors
    /// See [`query`](crate::query).
    pub fn query(&self, question: &DnsQuestion) -> Result<DnsMessage, DnsError> {
        query(question, self.server, self.port, self.timeout)
    }

    /// Parses `name` and the record type mnemonic `typ`, then sends an `IN` query.
    ///
    /// # Errors
    /// Returns an encoding error when `name` or `typ` is invalid.
    /// Otherwise see [`query`](crate::query).
    pub fn lookup(&self, name: &str, typ: &str) -> Result<DnsMessage, DnsError> {
        let question = DnsQuestion::parse(name, typ)?;
        self.query(&question)
    }
}

/// Sends one query with a random id to `server`:`port` over UDP and waits for the reply.
///
/// Discards datagrams with a different id, datagrams that are not responses, and responses to
/// a different question, then keeps waiting.  Does not retry.
///
/// # Errors
/// Returns `DnsError::Timeout` when no matching reply arrives within `timeout`.
/// Returns a malformed-message error when a datagram with the query's id does not decode.
/// Returns `DnsError::Transport` when a socket operation fails.
pub fn query(
    question: &DnsQuestion,
    server: IpAddr,
    port: u16,
    timeout: Duration,
) -> Result<DnsMessage, DnsError> {
    query_with_id(
        rand::random::<u16>(),
        question,
        SocketAddr::new(server, port),
        timeout,
    )
}

fn query_with_id(
    id: u16,
    question: &DnsQuestion,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<DnsMessage, DnsError> {
    let request = DnsMessage::query(id, question.clone());
    let mut out: FixedBuf<MAX_UDP_MESSAGE_LEN> = FixedBuf::new();
    request.write(&mut out)?;
    let bind_addr = match addr {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    };
    let sock = UdpSocket::bind(bind_addr)
        .map_err(|e| DnsError::Transport(format!("error binding UDP socket: {}", e)))?;
    sock.connect(addr)
        .map_err(|e| DnsError::Transport(format!("error connecting to {}: {}", addr, e)))?;
    let deadline = Instant::now() + timeout;
    let sent_len = sock
        .send(out.readable())
        .map_err(|e| DnsError::Transport(format!("error sending query to {}: {}", addr, e)))?;
    if sent_len != out.len() {
        return Err(DnsError::Transport(format!(
            "sent only {} bytes of {} byte query to {}",
            sent_len,
            out.len(),
            addr
        )));
    }
    debug!("sent query id={} {} to {}", id, question, addr);
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(DnsError::Timeout(timeout));
        }
        sock.set_read_timeout(Some(remaining))
            .map_err(|e| DnsError::Transport(format!("error setting socket read timeout: {}", e)))?;
        let mut buf: FixedBuf<MAX_UDP_MESSAGE_LEN> = FixedBuf::new();
        match sock.recv(buf.writable()) {
            Ok(len) => buf.wrote(len),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                continue
            }
            Err(e) => {
                return Err(DnsError::Transport(format!(
                    "error receiving reply from {}: {}",
                    addr, e
                )))
            }
        }
        if let Some(response) = accept_reply(&request, buf.readable())? {
            debug!(
                "received reply id={} rcode={} answers={}",
                id,
                response.header.response_code,
                response.answers.len()
            );
            return Ok(response);
        }
    }
}

/// Returns `Ok(None)` for datagrams that do not answer `request`.
///
/// # Errors
/// Returns an error when a datagram carries the request's id but does not decode.
pub(crate) fn accept_reply(
    request: &DnsMessage,
    bytes: &[u8],
) -> Result<Option<DnsMessage>, DnsError> {
    let header = match DnsMessageHeader::read(&mut DnsReader::new(bytes)) {
        Ok(header) => header,
        Err(_) => {
            debug!("discarding {} byte datagram", bytes.len());
            return Ok(None);
        }
    };
    if header.id != request.header.id {
        debug!(
            "discarding reply with id={}, expected id={}",
            header.id, request.header.id
        );
        return Ok(None);
    }
    let response = DnsMessage::parse(bytes)?;
    if !response.answers_query(request) {
        debug!("discarding message id={} that does not answer the query", header.id);
        return Ok(None);
    }
    Ok(Some(response))
}
