//! Error classes per the error handling design: protocol errors and
//! connection errors are `thiserror` enums consumed entirely inside the
//! dispatcher and event loop; fatal startup errors surface from `main` as
//! `anyhow::Error` and are not modeled here.

use thiserror::Error;

/// A client-caused protocol violation. Never disconnects the client; the
/// dispatcher converts each variant into the matching numeric reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("no nickname given")]
    NoNicknameGiven,
    #[error("erroneous nickname '{0}'")]
    ErroneousNickname(String),
    #[error("nickname '{0}' already in use")]
    NicknameInUse(String),
    #[error("not enough parameters for '{0}'")]
    NeedMoreParams(String),
    #[error("no command given")]
    NoCommandGiven,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("you have not registered")]
    NotRegistered,
    #[error("you may not reregister")]
    AlreadyRegistered,
    #[error("no such channel '{0}'")]
    NoSuchChannel(String),
    #[error("you're not on channel '{0}'")]
    NotOnChannel(String),
    #[error("no recipient given")]
    NoRecipient,
    #[error("no text to send")]
    NoTextToSend,
    #[error("no such nick/channel '{0}'")]
    NoSuchNick(String),
}

/// A connection-level failure. The client is marked zombie and reaped at
/// end of dispatch; this error never propagates past the event loop.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("peer closed the connection")]
    Eof,
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),
}
