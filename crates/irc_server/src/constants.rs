//! Numeric reply codes actually produced by this server (subset of RFC 1459).
//!
//! Registration success is signaled only by the MOTD triplet below; this
//! server never sends `RPL_WELCOME`/`RPL_YOURHOST`/`RPL_CREATED`/`RPL_MYINFO`
//! (not in the spec's reply set).

pub const RPL_MOTDSTART_NB: u16 = 375;
pub const RPL_MOTD_NB: u16 = 372;
pub const RPL_ENDOFMOTD_NB: u16 = 376;

pub const RPL_NAMREPLY_NB: u16 = 353;
pub const RPL_ENDOFNAMES_NB: u16 = 366;

pub const RPL_LISTSTART_NB: u16 = 321;
pub const RPL_LIST_NB: u16 = 322;
pub const RPL_LISTEND_NB: u16 = 323;

pub const RPL_WHOREPLY_NB: u16 = 352;
pub const RPL_ENDOFWHO_NB: u16 = 315;

pub const ERR_NOSUCHNICK_NB: u16 = 401;
pub const ERR_NOSUCHCHANNEL_NB: u16 = 403;
pub const ERR_NORECIPIENT_NB: u16 = 411;
pub const ERR_NOTEXTTOSEND_NB: u16 = 412;
pub const ERR_UNKNOWNCOMMAND_NB: u16 = 421;
pub const ERR_NONICKNAMEGIVEN_NB: u16 = 431;
pub const ERR_ERRONEOUSNICKNAME_NB: u16 = 432;
pub const ERR_NICKNAMEINUSE_NB: u16 = 433;
pub const ERR_NOTONCHANNEL_NB: u16 = 442;
pub const ERR_NOTREGISTERED_NB: u16 = 451;
pub const ERR_NEEDMOREPARAMS_NB: u16 = 461;
pub const ERR_ALREADYREGISTERED_NB: u16 = 462;

/// Banner text for `RPL_MOTD`. No persisted MOTD file: a single fixed line,
/// as this server has no configuration store (see DESIGN.md).
pub const MOTD_TEXT: &str = "Welcome to the server";

/// This server's advertised hostname, used as the origin of every numeric
/// reply. Fixed rather than read from a config file, for the same reason
/// as `MOTD_TEXT` (see DESIGN.md).
pub const SERVER_HOST: &str = "irc.local";

/// Target placeholder for a client that has not yet set a nickname.
pub const UNNAMED_TARGET: &str = "*";
