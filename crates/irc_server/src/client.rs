//! Per-connection client state.

use mio::Token;
use mio::net::TcpStream;

use crate::constants::UNNAMED_TARGET;
use crate::identifier::safe_truncate;
use crate::message::InboundBuffer;

pub const MAX_USERNAME: usize = 32;
pub const MAX_REALNAME: usize = 192;
pub const MAX_HOSTNAME: usize = 64;

/// `Accepted` is implicit (a client only exists in the registry once
/// accepted); the remaining states are tracked explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unregistered,
    Registered,
    Zombie,
}

#[derive(Debug)]
pub struct Client {
    pub token: Token,
    pub stream: TcpStream,
    /// Numeric rendering of the peer address; there is no DNS PTR lookup
    /// (see DESIGN.md).
    pub host: String,
    pub nick: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
    pub state: ClientState,
    /// At most one channel at a time, per the source's single-channel
    /// simplification.
    pub channel: Option<String>,
    pub inbound: InboundBuffer,
}

impl Client {
    /// `host` is truncated to [`MAX_HOSTNAME`] bytes: a numeric peer address
    /// never approaches the bound, but nothing upstream guarantees that.
    pub fn new(token: Token, stream: TcpStream, host: String) -> Self {
        let host = safe_truncate(&host, MAX_HOSTNAME).to_string();
        Self {
            token,
            stream,
            host,
            nick: None,
            user: None,
            realname: None,
            state: ClientState::Unregistered,
            channel: None,
            inbound: InboundBuffer::new(),
        }
    }

    /// The recipient target for numeric replies: the current nickname, or
    /// `*` if still unnamed.
    pub fn display_nick(&self) -> &str {
        self.nick.as_deref().unwrap_or(UNNAMED_TARGET)
    }

    pub fn is_registered(&self) -> bool {
        self.state == ClientState::Registered
    }

    pub fn is_zombie(&self) -> bool {
        self.state == ClientState::Zombie
    }

    /// Transitions to `Registered` if both nick and user are now set and the
    /// client hasn't registered already. Returns true iff the transition
    /// happened (the caller uses this to decide whether to send the MOTD).
    pub fn maybe_register(&mut self) -> bool {
        if self.state == ClientState::Unregistered && self.nick.is_some() && self.user.is_some() {
            self.state = ClientState::Registered;
            true
        } else {
            false
        }
    }
}
