//! The event loop proper: owns the `mio::Poll` readiness primitive and the
//! listening socket, and drives accept → read → dispatch → reap for every
//! connection (§5). Bare `select`/`poll` mechanics are an external
//! collaborator (§1); `mio` supplies exactly the readiness notification and
//! nothing else, matching the single-threaded cooperative model.

use std::io::{ErrorKind, Read};
use std::net::{Shutdown, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};

use crate::client::Client;
use crate::cli::{Args, debug_mask};
use crate::constants::SERVER_HOST;
use crate::errors::ConnectionError;
use crate::handlers;
use crate::message::parse_message;
use crate::registry::Registry;

const SERVER_TOKEN: Token = Token(0);
/// Short tick timeout for periodic maintenance (§5). This server has no
/// periodic work beyond per-dispatch reaping, so the tick only bounds how
/// promptly `poll` returns control to check for process-level signals; it
/// fires no application logic of its own.
const TICK: Duration = Duration::from_millis(250);
const READ_BUF_SIZE: usize = 4096;

/// Binds `port` on `INADDR_ANY` and runs the event loop until a fatal error
/// on the listener itself. Never returns `Ok` in normal operation: there is
/// no graceful shutdown signal (out of scope, §1).
pub fn run(port: u16, args: &Args) -> anyhow::Result<()> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let mut listener =
        TcpListener::bind(addr).with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;

    let mut poll = Poll::new().context("failed to create the readiness primitive")?;
    poll.registry()
        .register(&mut listener, SERVER_TOKEN, Interest::READABLE)
        .context("failed to register the listening socket")?;

    let mut events = Events::with_capacity(1024);
    let mut state = Registry::new(SERVER_HOST);
    let mut next_index: usize = 1;

    if args.debug_enabled(debug_mask::INIT) {
        log::debug!("listening on 0.0.0.0:{port}");
    }

    loop {
        if let Err(e) = poll.poll(&mut events, Some(TICK)) {
            if e.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(e).context("poll failed");
        }

        for event in events.iter() {
            if event.token() == SERVER_TOKEN {
                accept_all(&listener, poll.registry(), &mut state, &mut next_index, args);
            } else {
                service_client(poll.registry(), &mut state, event.token(), args);
            }
        }
    }
}

/// Drains every connection the listener has queued, registering each with
/// `mio` and inserting it into the registry as `Unregistered`. Stops at the
/// first `WouldBlock`, the standard edge-triggered accept pattern.
fn accept_all(
    listener: &TcpListener,
    mio_registry: &mio::Registry,
    state: &mut Registry,
    next_index: &mut usize,
    args: &Args,
) {
    loop {
        let (mut stream, peer) = match listener.accept() {
            Ok(pair) => pair,
            Err(e) if e.kind() == ErrorKind::WouldBlock => return,
            Err(e) => {
                log::warn!("accept failed: {e}");
                return;
            }
        };

        if state.is_full() {
            if args.debug_enabled(debug_mask::SOCKETS) {
                log::debug!("rejecting {peer}: server is at capacity");
            }
            let _ = stream.shutdown(Shutdown::Both);
            continue;
        }

        let token = Token(*next_index);
        *next_index += 1;

        if let Err(e) = mio_registry.register(&mut stream, token, Interest::READABLE) {
            log::warn!("failed to register {peer}: {e}");
            continue;
        }

        if args.debug_enabled(debug_mask::SOCKETS) {
            log::debug!("accepted {peer} as {token:?}");
        }

        // No DNS PTR lookup: the observed peer hostname is the numeric
        // address (see DESIGN.md).
        let host = peer.ip().to_string();
        state.insert_client(Client::new(token, stream, host));
    }
}

/// Reads everything currently available from `token`'s socket, frames it
/// into complete lines, and dispatches each in arrival order. A read EOF or
/// error synthesizes a QUIT (§7 class 2) before reaping.
fn service_client(mio_registry: &mio::Registry, state: &mut Registry, token: Token, args: &Args) {
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut lines = Vec::new();
    let mut connection_lost: Option<ConnectionError> = None;

    loop {
        let read_result = match state.client_mut(token) {
            Some(c) => c.stream.read(&mut buf),
            None => return,
        };
        match read_result {
            Ok(0) => {
                connection_lost = Some(ConnectionError::Eof);
                break;
            }
            Ok(n) => {
                if let Some(c) = state.client_mut(token) {
                    lines.extend(c.inbound.extend_and_split(&buf[..n]));
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => break,
            Err(e) => {
                connection_lost = Some(ConnectionError::Read(e));
                break;
            }
        }
    }

    for line in lines {
        if args.debug_enabled(debug_mask::INPUT) {
            log::debug!("{token:?} -> {line}");
        }
        let msg = parse_message(&line);
        let reaped = crate::dispatch::dispatch(state, token, &msg);
        reap(mio_registry, reaped, args);
        // The handler may have reaped this very client (e.g. QUIT); stop
        // feeding it further lines from this read.
        if state.client(token).is_none() {
            return;
        }
    }

    if let Some(err) = connection_lost {
        if args.debug_enabled(debug_mask::SOCKETS) {
            log::debug!("{token:?} lost: {err}");
        }
        if state.client(token).is_some_and(|c| !c.is_zombie()) {
            handlers::quit_core(state, token, "Connection closed");
        }
        let reaped = state.reap_zombies();
        reap(mio_registry, reaped, args);
    }
}

/// Deregisters and closes every reaped client's socket exactly once (§5
/// file descriptor discipline).
fn reap(mio_registry: &mio::Registry, reaped: Vec<Client>, args: &Args) {
    for mut client in reaped {
        if args.debug_enabled(debug_mask::CLIENTS) {
            log::debug!("reaping {:?}", client.token);
        }
        let _ = mio_registry.deregister(&mut client.stream);
        let _ = client.stream.shutdown(Shutdown::Both);
    }
}
