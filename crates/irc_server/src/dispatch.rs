//! The command table and the dispatch algorithm (§4.5) that drives every
//! inbound line from `Message` to a handler call (or a rejection reply).

use mio::Token;

use crate::errors::ProtocolError;
use crate::handlers;
use crate::message::Message;
use crate::registry::Registry;
use crate::replies::Reply;

type Handler = fn(&mut Registry, Token, &Message) -> Result<(), ProtocolError>;

struct Command {
    name: &'static str,
    needs_registration: bool,
    min_params: usize,
    handler: Handler,
}

/// The eight supported commands, in the teacher's table-driven dispatch
/// shape: name, registration precondition, minimum parameter count,
/// handler function pointer.
const COMMANDS: &[Command] = &[
    Command { name: "NICK", needs_registration: false, min_params: 0, handler: handlers::nick },
    Command { name: "USER", needs_registration: false, min_params: 4, handler: handlers::user },
    Command { name: "QUIT", needs_registration: true, min_params: 0, handler: handlers::quit },
    Command { name: "JOIN", needs_registration: true, min_params: 1, handler: handlers::join },
    Command { name: "PART", needs_registration: true, min_params: 1, handler: handlers::part },
    Command { name: "LIST", needs_registration: true, min_params: 0, handler: handlers::list },
    Command { name: "PRIVMSG", needs_registration: true, min_params: 0, handler: handlers::privmsg },
    Command { name: "WHO", needs_registration: true, min_params: 0, handler: handlers::who },
];

fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

fn protocol_error_reply(err: &ProtocolError) -> Reply {
    match err {
        ProtocolError::NoNicknameGiven => Reply::ErrNoNicknameGiven,
        ProtocolError::ErroneousNickname(nick) => Reply::ErrErroneousNickname { nick: nick.clone() },
        ProtocolError::NicknameInUse(nick) => Reply::ErrNicknameInUse { nick: nick.clone() },
        ProtocolError::NeedMoreParams(cmd) => Reply::ErrNeedMoreParams { command: Some(cmd.clone()) },
        ProtocolError::NoCommandGiven => Reply::ErrNeedMoreParams { command: None },
        ProtocolError::UnknownCommand(cmd) => Reply::ErrUnknownCommand { command: cmd.clone() },
        ProtocolError::NotRegistered => Reply::ErrNotRegistered,
        ProtocolError::AlreadyRegistered => Reply::ErrAlreadyRegistered,
        ProtocolError::NoSuchChannel(chan) => Reply::ErrNoSuchChannel { channel: chan.clone() },
        ProtocolError::NotOnChannel(chan) => Reply::ErrNotOnChannel { channel: chan.clone() },
        ProtocolError::NoRecipient => Reply::ErrNoRecipient,
        ProtocolError::NoTextToSend => Reply::ErrNoTextToSend,
        ProtocolError::NoSuchNick(target) => Reply::ErrNoSuchNick { target: target.clone() },
    }
}

/// Runs the full dispatch algorithm for one already-parsed line from
/// `token`, then reaps whatever zombies the handler produced. Returns the
/// reaped clients so the event loop can deregister and close their
/// sockets.
pub fn dispatch(reg: &mut Registry, token: Token, msg: &Message) -> Vec<crate::client::Client> {
    if msg.command.is_empty() {
        reg.send_reply(token, &protocol_error_reply(&ProtocolError::NoCommandGiven));
        return reg.reap_zombies();
    }

    let Some(cmd) = find_command(&msg.command) else {
        reg.send_reply(token, &protocol_error_reply(&ProtocolError::UnknownCommand(msg.command.clone())));
        return reg.reap_zombies();
    };

    if let Some(prefix) = &msg.prefix {
        let nick = reg.client(token).and_then(|c| c.nick.clone());
        if let Some(nick) = nick {
            if prefix != &nick {
                // Prefix present, client named, and it doesn't match: drop silently.
                return reg.reap_zombies();
            }
        }
    }

    if cmd.needs_registration {
        let registered = reg.client(token).map(|c| c.is_registered()).unwrap_or(false);
        if !registered {
            reg.send_reply(token, &protocol_error_reply(&ProtocolError::NotRegistered));
            return reg.reap_zombies();
        }
    }

    if msg.nparams() < cmd.min_params {
        reg.send_reply(
            token,
            &protocol_error_reply(&ProtocolError::NeedMoreParams(cmd.name.to_string())),
        );
        return reg.reap_zombies();
    }

    if let Err(err) = (cmd.handler)(reg, token, msg) {
        reg.send_reply(token, &protocol_error_reply(&err));
    }

    reg.reap_zombies()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_table_matches_spec_shape() {
        assert_eq!(COMMANDS.len(), 8);
        let nick = find_command("nick").expect("case-insensitive lookup");
        assert!(!nick.needs_registration);
        assert_eq!(nick.min_params, 0);
        let join = find_command("JOIN").expect("exact lookup");
        assert!(join.needs_registration);
        assert_eq!(join.min_params, 1);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(find_command("FROB").is_none());
    }
}
