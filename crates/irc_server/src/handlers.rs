//! The eight command handlers. Each takes the registry, the acting
//! client's token, and the parsed message, and returns `Ok(())` on success
//! or a `ProtocolError` the dispatcher renders as a numeric reply.
//!
//! Handlers never write error replies themselves for the error conditions
//! covered by `ProtocolError` — the dispatcher (§4.5) owns that translation
//! so the reply text lives in one place (`replies.rs`). A handler does,
//! however, send its own success replies and echoes directly through the
//! registry's write helper, since those vary per command.

use mio::Token;

use crate::client::{MAX_REALNAME, MAX_USERNAME};
use crate::errors::ProtocolError;
use crate::identifier::{is_valid_channel, is_valid_nickname, safe_truncate};
use crate::message::Message;
use crate::registry::Registry;
use crate::replies::{Reply, echo_full, privmsg_echo};

const UNKNOWN_USER: &str = "unknown";
const UNKNOWN_HOST: &str = "unknown";

fn origin(reg: &Registry, token: Token) -> (String, String, String) {
    let Some(c) = reg.client(token) else {
        return (UNKNOWN_USER.into(), UNKNOWN_USER.into(), UNKNOWN_HOST.into());
    };
    (
        c.display_nick().to_string(),
        c.user.clone().unwrap_or_else(|| UNKNOWN_USER.to_string()),
        c.host.clone(),
    )
}

fn send_motd_if_just_registered(reg: &mut Registry, token: Token, just_registered: bool) {
    if !just_registered {
        return;
    }
    reg.send_reply(token, &Reply::MotdStart);
    reg.send_reply(token, &Reply::Motd);
    reg.send_reply(token, &Reply::EndOfMotd);
}

/// NICK `<newnick>`.
pub fn nick(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    let Some(requested) = msg.param(0) else {
        return Err(ProtocolError::NoNicknameGiven);
    };
    if !is_valid_nickname(requested) {
        return Err(ProtocolError::ErroneousNickname(
            safe_truncate(requested, 9).to_string(),
        ));
    }
    if let Some(other) = reg.find_by_nick(requested) {
        if other != token {
            return Err(ProtocolError::NicknameInUse(requested.to_string()));
        }
    }

    let (old_nick, user, host) = origin(reg, token);
    let new_nick = requested.to_string();

    let channel_name = reg.client(token).and_then(|c| c.channel.clone());
    if let Some(chan_name) = &channel_name {
        if let Some(c) = reg.client_mut(token) {
            c.nick = Some(new_nick.clone());
        }
        let members = reg.channel(chan_name).map(|c| c.member_snapshot()).unwrap_or_default();
        let line = echo_full(&old_nick, &user, &host, "NICK", &new_nick);
        for member in members {
            if member != token {
                reg.send_line(member, &line);
            }
        }
        return Ok(());
    }

    let just_registered = {
        let Some(c) = reg.client_mut(token) else { return Ok(()) };
        c.nick = Some(new_nick);
        c.maybe_register()
    };
    send_motd_if_just_registered(reg, token, just_registered);
    Ok(())
}

/// USER `<user> <mode> <servername> :<realname>`.
pub fn user(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    // Still records the new fields even if already registered: a deliberate
    // permissive choice, not a hard error.
    let already_registered = reg.client(token).map(|c| c.is_registered()).unwrap_or(false);

    let user_field = safe_truncate(msg.param(0).unwrap_or_default(), MAX_USERNAME).to_string();
    let realname = safe_truncate(msg.param(3).unwrap_or_default(), MAX_REALNAME).to_string();
    let just_registered = {
        let Some(c) = reg.client_mut(token) else { return Ok(()) };
        c.user = Some(user_field);
        c.realname = Some(realname);
        c.maybe_register()
    };

    if already_registered {
        reg.send_reply(token, &Reply::ErrAlreadyRegistered);
    }
    send_motd_if_just_registered(reg, token, just_registered);
    Ok(())
}

/// Core QUIT logic, shared by the user-issued `QUIT` command and by
/// connection errors that synthesize a QUIT (read EOF, read error, write
/// failure). Idempotent: calling it on an already-zombie client that has
/// already left its channel is a no-op beyond the registry flag. The
/// channel-departure echo and membership cleanup live on `Registry` itself
/// (`quit_client`) since `Registry::send_line`'s own write-failure path
/// needs the identical cleanup and cannot call back up into this module.
pub fn quit_core(reg: &mut Registry, token: Token, reason: &str) {
    reg.quit_client(token, reason);
}

/// QUIT `[<msg>]`.
pub fn quit(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    let reason = msg.param(0).unwrap_or("Connection closed").to_string();
    quit_core(reg, token, &reason);
    Ok(())
}

fn first_csv_item(s: &str) -> &str {
    s.split(',').next().unwrap_or(s)
}

/// JOIN `<channel>`.
pub fn join(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    let target = msg.param(0).ok_or_else(|| ProtocolError::NeedMoreParams("JOIN".to_string()))?;
    let chan_name = first_csv_item(target).to_string();
    if !is_valid_channel(&chan_name) {
        return Err(ProtocolError::NoSuchChannel(safe_truncate(&chan_name, 50).to_string()));
    }

    let (nick, user, host) = origin(reg, token);
    let previous = reg.client(token).and_then(|c| c.channel.clone());
    if let Some(prev) = &previous {
        if prev == &chan_name {
            return Ok(());
        }
        let members = reg.channel(prev).map(|c| c.member_snapshot()).unwrap_or_default();
        let line = echo_full(&nick, &user, &host, "QUIT", ":Client left channel");
        for member in members {
            reg.send_line(member, &line);
        }
        reg.leave_channel(prev, token);
        if let Some(c) = reg.client_mut(token) {
            c.channel = None;
        }
    }

    reg.join_channel(&chan_name, token);
    if let Some(c) = reg.client_mut(token) {
        c.channel = Some(chan_name.clone());
    }

    let members = reg.channel(&chan_name).map(|c| c.member_snapshot()).unwrap_or_default();
    let join_line = echo_full(&nick, &user, &host, "JOIN", &chan_name);
    for &member in &members {
        reg.send_line(member, &join_line);
    }

    for &member in &members {
        let member_nick = reg.client(member).map(|c| c.display_nick().to_string()).unwrap_or_default();
        reg.send_reply(token, &Reply::NamReply { channel: chan_name.clone(), member: member_nick });
    }
    reg.send_reply(token, &Reply::EndOfNames { channel: chan_name });
    Ok(())
}

/// PART `<channel>`.
pub fn part(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    let target = msg.param(0).ok_or_else(|| ProtocolError::NeedMoreParams("PART".to_string()))?;
    let chan_name = first_csv_item(target).to_string();

    let Some(chan) = reg.channel(&chan_name) else {
        return Err(ProtocolError::NoSuchChannel(safe_truncate(&chan_name, 50).to_string()));
    };
    if !chan.has_member(token) {
        return Err(ProtocolError::NotOnChannel(chan_name));
    }

    let (nick, user, host) = origin(reg, token);
    let members = reg.channel(&chan_name).map(|c| c.member_snapshot()).unwrap_or_default();
    // Mirrors the source exactly: PART echoes in QUIT form with an empty reason.
    let line = echo_full(&nick, &user, &host, "QUIT", ":");
    for member in members {
        reg.send_line(member, &line);
    }
    reg.leave_channel(&chan_name, token);
    if let Some(c) = reg.client_mut(token) {
        c.channel = None;
    }
    Ok(())
}

/// LIST.
pub fn list(reg: &mut Registry, token: Token, _msg: &Message) -> Result<(), ProtocolError> {
    reg.send_reply(token, &Reply::ListStart);
    for name in reg.channel_names() {
        let count = reg.channel(&name).map(|c| c.members.len()).unwrap_or(0);
        reg.send_reply(token, &Reply::List { channel: name, count });
    }
    reg.send_reply(token, &Reply::ListEnd);
    Ok(())
}

/// PRIVMSG `<targets> <text>`.
pub fn privmsg(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    let targets = match msg.param(0) {
        None => return Err(ProtocolError::NoRecipient),
        Some(t) => t,
    };
    let text = match msg.param(1) {
        None => return Err(ProtocolError::NoTextToSend),
        Some(t) => t,
    };

    let sender_nick = reg.client(token).map(|c| c.display_nick().to_string()).unwrap_or_default();

    for target in targets.split(',') {
        if target == sender_nick {
            continue;
        }
        if let Some(dest) = reg.find_by_nick_exact(target) {
            let line = privmsg_echo(&sender_nick, target, text);
            reg.send_line(dest, &line);
            continue;
        }
        if reg.channel(target).is_some() {
            let members = reg.channel(target).map(|c| c.member_snapshot()).unwrap_or_default();
            let line = privmsg_echo(&sender_nick, target, text);
            for member in members {
                if member != token {
                    reg.send_line(member, &line);
                }
            }
            continue;
        }
        reg.send_reply(token, &Reply::ErrNoSuchNick { target: target.to_string() });
    }
    Ok(())
}

/// WHO `[<mask>]`.
pub fn who(reg: &mut Registry, token: Token, msg: &Message) -> Result<(), ProtocolError> {
    match msg.param(0) {
        None => {
            let requester_channel = reg.client(token).and_then(|c| c.channel.clone());
            for other_token in reg.client_tokens() {
                if other_token == token {
                    continue;
                }
                let Some(other) = reg.client(other_token) else { continue };
                let visible = match (&requester_channel, &other.channel) {
                    (Some(mine), Some(theirs)) => mine != theirs,
                    _ => true,
                };
                if !visible {
                    continue;
                }
                // A visible client with no channel has nothing to put in the
                // WHO line's mandatory <channel> field; it is counted as
                // visible by the rule above but produces no line.
                let Some(channel) = other.channel.clone() else { continue };
                let reply = Reply::WhoReply {
                    channel,
                    user: other.user.clone().unwrap_or_default(),
                    host: other.host.clone(),
                    nick: other.display_nick().to_string(),
                    realname: other.realname.clone().unwrap_or_default(),
                };
                reg.send_reply(token, &reply);
            }
            reg.send_reply(token, &Reply::EndOfWho { mask: "*".to_string() });
        }
        Some(mask) => {
            for item in mask.split(',') {
                if let Some(chan) = reg.channel(item) {
                    let members = chan.member_snapshot();
                    for member in members {
                        let Some(other) = reg.client(member) else { continue };
                        let reply = Reply::WhoReply {
                            channel: item.to_string(),
                            user: other.user.clone().unwrap_or_default(),
                            host: other.host.clone(),
                            nick: other.display_nick().to_string(),
                            realname: other.realname.clone().unwrap_or_default(),
                        };
                        reg.send_reply(token, &reply);
                    }
                }
                reg.send_reply(token, &Reply::EndOfWho { mask: item.to_string() });
            }
        }
    }
    Ok(())
}
