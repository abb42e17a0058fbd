//! The server-wide state graph: every connected client and every channel.
//!
//! This is the single process-wide owner the design notes call for — no
//! hidden singletons, one `Registry` passed into every handler.

use std::collections::HashMap;
use std::io::Write as _;

use mio::Token;

use crate::channel::Channel;
use crate::client::{Client, ClientState};
use crate::constants::UNNAMED_TARGET;
use crate::errors::ConnectionError;
use crate::identifier::nicknames_collide;
use crate::replies::{Reply, echo_full};

/// Maximum simultaneous clients this server accepts.
pub const MAX_CLIENTS: usize = 512;

#[derive(Debug)]
pub struct Registry {
    pub server_host: String,
    clients: HashMap<Token, Client>,
    channels: HashMap<String, Channel>,
    pending_reap: Vec<Token>,
}

impl Registry {
    pub fn new(server_host: impl Into<String>) -> Self {
        Self {
            server_host: server_host.into(),
            clients: HashMap::new(),
            channels: HashMap::new(),
            pending_reap: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= MAX_CLIENTS
    }

    pub fn insert_client(&mut self, client: Client) {
        self.clients.insert(client.token, client);
    }

    pub fn client(&self, token: Token) -> Option<&Client> {
        self.clients.get(&token)
    }

    pub fn client_mut(&mut self, token: Token) -> Option<&mut Client> {
        self.clients.get_mut(&token)
    }

    /// A snapshot of every client's token, taken before a scan that may
    /// mutate the table (§4.4).
    pub fn client_tokens(&self) -> Vec<Token> {
        self.clients.keys().copied().collect()
    }

    /// Finds the client, if any, whose nickname collides with `nick` under
    /// folded equality. Unregistered clients with a non-empty nick count,
    /// matching the NICK handler's collision rule.
    pub fn find_by_nick(&self, nick: &str) -> Option<Token> {
        self.clients
            .iter()
            .find(|(_, c)| c.nick.as_deref().is_some_and(|n| nicknames_collide(n, nick)))
            .map(|(t, _)| *t)
    }

    /// Finds the client, if any, whose nickname is byte-exactly `nick`. Used
    /// by PRIVMSG target resolution (§4.6), which is exact-match, unlike
    /// NICK's own folded collision check.
    pub fn find_by_nick_exact(&self, nick: &str) -> Option<Token> {
        self.clients.iter().find(|(_, c)| c.nick.as_deref() == Some(nick)).map(|(t, _)| *t)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// A snapshot of every channel name, in no particular order, taken for
    /// LIST.
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    /// Adds `member` to the channel `name`, creating it (with `member` as
    /// sole member) if it doesn't exist. Returns true iff the channel was
    /// just created.
    pub fn join_channel(&mut self, name: &str, member: Token) -> bool {
        match self.channels.get_mut(name) {
            Some(chan) => {
                chan.add_member(member);
                false
            }
            None => {
                self.channels.insert(name.to_string(), Channel::new(name, member));
                true
            }
        }
    }

    /// Removes `member` from channel `name`, deleting the channel if it is
    /// now empty. No-op if the channel doesn't exist.
    pub fn leave_channel(&mut self, name: &str, member: Token) {
        let Some(chan) = self.channels.get_mut(name) else { return };
        chan.remove_member(member);
        if chan.is_empty() {
            self.channels.remove(name);
        }
    }

    /// Flags `token` zombie (idempotent) and queues it for end-of-dispatch
    /// reaping. Does not touch channel membership; callers remove the
    /// client from its channel first so the QUIT echo can still see it.
    pub fn mark_zombie(&mut self, token: Token) {
        if let Some(c) = self.clients.get_mut(&token) {
            if c.state != ClientState::Zombie {
                c.state = ClientState::Zombie;
                self.pending_reap.push(token);
            }
        }
    }

    /// Drains the zombie queue, removing each client from the registry and
    /// returning them for socket cleanup (shutdown/deregister). Called once
    /// at the end of every top-level dispatch (§4.5 step 7).
    pub fn reap_zombies(&mut self) -> Vec<Client> {
        let pending = std::mem::take(&mut self.pending_reap);
        pending.into_iter().filter_map(|t| self.clients.remove(&t)).collect()
    }

    /// The single write helper every reply and echo funnels through (§4.3).
    /// On failure this is a §7 class-2 connection error: the client is
    /// disconnected the same way a user-issued QUIT is (channel departure
    /// echoed, membership cleaned up, then marked zombie), so callers never
    /// have to re-check the client after a send and no dead token is ever
    /// left behind in a `Channel::members`.
    pub fn send_line(&mut self, token: Token, line: &str) {
        let write_result = match self.clients.get_mut(&token) {
            Some(client) if !client.is_zombie() => {
                let mut framed = String::with_capacity(line.len() + 2);
                framed.push_str(line);
                framed.push_str("\r\n");
                client.stream.write_all(framed.as_bytes())
            }
            _ => return,
        };
        if let Err(e) = write_result {
            log::debug!("{token:?} lost: {}", ConnectionError::Write(e));
            self.quit_client(token, "Connection closed");
        }
    }

    /// Synthesizes a QUIT for `token`: echoes it to the remaining members of
    /// its channel (excluding the leaver, matching plain QUIT's echo target
    /// set), removes it from that channel, and marks it zombie. Shared by
    /// the user-issued QUIT command, every read-side connection error, and
    /// `send_line`'s own write-failure path above — so a client can never be
    /// reaped without first being taken out of `Channel::members`.
    pub fn quit_client(&mut self, token: Token, reason: &str) {
        let Some(client) = self.clients.get(&token) else { return };
        let nick = client.display_nick().to_string();
        let user = client.user.clone().unwrap_or_else(|| "unknown".to_string());
        let host = client.host.clone();

        let channel_name = self.clients.get_mut(&token).and_then(|c| c.channel.take());
        if let Some(chan_name) = &channel_name {
            let members = self.channel(chan_name).map(|c| c.member_snapshot()).unwrap_or_default();
            let line = echo_full(&nick, &user, &host, "QUIT", &format!(":{reason}"));
            for member in members {
                if member != token {
                    self.send_line(member, &line);
                }
            }
            self.leave_channel(chan_name, token);
        }
        self.mark_zombie(token);
    }

    /// Renders and sends a numeric reply addressed to `token`'s current
    /// nickname (or `*`).
    pub fn send_reply(&mut self, token: Token, reply: &Reply) {
        let target = self
            .client(token)
            .map(|c| c.display_nick().to_string())
            .unwrap_or_else(|| UNNAMED_TARGET.to_string());
        let host = self.server_host.clone();
        let line = reply.format(&host, &target);
        self.send_line(token, &line);
    }
}
