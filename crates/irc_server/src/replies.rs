//! Renders numeric replies and event echoes in RFC wire form.
//!
//! A numeric reply has the shape `:<host> <code> <target> [params] [:trailing]`.
//! An event echo has the shape `:<nick>!<user>@<host> <CMD> [params] [:trailing]`.
//! Neither form includes the terminating CRLF; the connection layer appends it.

use crate::constants::*;

/// One server-to-client line, not yet rendered to text. Grouping these as an
/// enum (rather than building strings ad hoc at each call site) keeps every
/// numeric code's parameter shape in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Reply {
    MotdStart,
    Motd,
    EndOfMotd,
    NamReply { channel: String, member: String },
    EndOfNames { channel: String },
    ListStart,
    List { channel: String, count: usize },
    ListEnd,
    WhoReply { channel: String, user: String, host: String, nick: String, realname: String },
    EndOfWho { mask: String },
    ErrNoSuchNick { target: String },
    ErrNoSuchChannel { channel: String },
    ErrNoRecipient,
    ErrNoTextToSend,
    ErrUnknownCommand { command: String },
    ErrNoNicknameGiven,
    ErrErroneousNickname { nick: String },
    ErrNicknameInUse { nick: String },
    ErrNotOnChannel { channel: String },
    ErrNotRegistered,
    ErrNeedMoreParams { command: Option<String> },
    ErrAlreadyRegistered,
}

impl Reply {
    /// Renders this reply addressed to `target` (the recipient's current
    /// nickname, or `*` if still unnamed), from `server_host`.
    pub fn format(&self, server_host: &str, target: &str) -> String {
        match self {
            Reply::MotdStart => format!(
                ":{server_host} {RPL_MOTDSTART_NB:03} {target} :- {server_host} Message of the day - "
            ),
            Reply::Motd => format!(":{server_host} {RPL_MOTD_NB:03} {target} :- {MOTD_TEXT}"),
            Reply::EndOfMotd => {
                format!(":{server_host} {RPL_ENDOFMOTD_NB:03} {target} :End of /MOTD command")
            }
            Reply::NamReply { channel, member } => format!(
                ":{server_host} {RPL_NAMREPLY_NB:03} {target} = {channel} :{member}"
            ),
            Reply::EndOfNames { channel } => format!(
                ":{server_host} {RPL_ENDOFNAMES_NB:03} {target} {channel} :End of /NAMES list"
            ),
            Reply::ListStart => {
                format!(":{server_host} {RPL_LISTSTART_NB:03} {target} Channel :Users Name")
            }
            Reply::List { channel, count } => {
                format!(":{server_host} {RPL_LIST_NB:03} {target} {channel} {count} :")
            }
            Reply::ListEnd => format!(":{server_host} {RPL_LISTEND_NB:03} {target} :End of /LIST"),
            Reply::WhoReply { channel, user, host, nick, realname } => format!(
                ":{server_host} {RPL_WHOREPLY_NB:03} {target} {channel} {user} {host} {server_host} {nick} H :0 {realname}"
            ),
            Reply::EndOfWho { mask } => format!(
                ":{server_host} {RPL_ENDOFWHO_NB:03} {target} {mask} :End of /WHO list"
            ),
            Reply::ErrNoSuchNick { target: who } => format!(
                ":{server_host} {ERR_NOSUCHNICK_NB:03} {target} {who} :No such nick/channel"
            ),
            Reply::ErrNoSuchChannel { channel } => format!(
                ":{server_host} {ERR_NOSUCHCHANNEL_NB:03} {target} {channel} :No such channel"
            ),
            Reply::ErrNoRecipient => format!(
                ":{server_host} {ERR_NORECIPIENT_NB:03} {target} :No recipient given (PRIVMSG)"
            ),
            Reply::ErrNoTextToSend => {
                format!(":{server_host} {ERR_NOTEXTTOSEND_NB:03} {target} :No text to send")
            }
            Reply::ErrUnknownCommand { command } => format!(
                ":{server_host} {ERR_UNKNOWNCOMMAND_NB:03} {target} {command} :Unknown command"
            ),
            Reply::ErrNoNicknameGiven => {
                format!(":{server_host} {ERR_NONICKNAMEGIVEN_NB:03} {target} :No nickname given")
            }
            Reply::ErrErroneousNickname { nick } => format!(
                ":{server_host} {ERR_ERRONEOUSNICKNAME_NB:03} {target} {nick} :Erroneous nickname"
            ),
            Reply::ErrNicknameInUse { nick } => format!(
                ":{server_host} {ERR_NICKNAMEINUSE_NB:03} {target} {nick} :Nickname is already in use"
            ),
            Reply::ErrNotOnChannel { channel } => format!(
                ":{server_host} {ERR_NOTONCHANNEL_NB:03} {target} {channel} :You're not on that channel"
            ),
            Reply::ErrNotRegistered => format!(
                ":{server_host} {ERR_NOTREGISTERED_NB:03} {target} :You have not registered"
            ),
            Reply::ErrNeedMoreParams { command: Some(command) } => format!(
                ":{server_host} {ERR_NEEDMOREPARAMS_NB:03} {target} {command} :Not enough parameters"
            ),
            // No command token at all (blank line, or a lone prefix): the
            // source's `handleLine` renders this as a literal `*` parameter
            // with "Unknown command", not the usual NEEDMOREPARAMS text.
            Reply::ErrNeedMoreParams { command: None } => format!(
                ":{server_host} {ERR_NEEDMOREPARAMS_NB:03} {target} * :Unknown command"
            ),
            Reply::ErrAlreadyRegistered => format!(
                ":{server_host} {ERR_ALREADYREGISTERED_NB:03} {target} :You may not reregister"
            ),
        }
    }
}

/// Renders an event echo (JOIN/PART/QUIT/NICK/PRIVMSG) with the full
/// `nick!user@host` origin form.
pub fn echo_full(nick: &str, user: &str, host: &str, command: &str, rest: &str) -> String {
    if rest.is_empty() {
        format!(":{nick}!{user}@{host} {command}")
    } else {
        format!(":{nick}!{user}@{host} {command} {rest}")
    }
}

/// Renders a PRIVMSG echo, which (per the source this protocol is grounded
/// on) carries only the bare sender nick as origin, not the full
/// `nick!user@host` triple.
pub fn privmsg_echo(sender_nick: &str, target: &str, text: &str) -> String {
    format!(":{sender_nick} PRIVMSG {target} :{text}")
}
