//! Line splitting and per-line tokenization.
//!
//! message    = [ ":" prefix SPACE ] command (SPACE middle)* [ SPACE ":" trailing ] CRLF
//! middle     = <run of non-space bytes>
//! trailing   = <rest of line, verbatim, leading ':' stripped>
//!
//! Splitting a byte stream into lines is plain buffer bookkeeping and is
//! hand-rolled; tokenizing one line into prefix/command/params is built with
//! `nom` combinators, in keeping with how this codebase parses wire tokens
//! elsewhere (see `identifier.rs`).

use nom::{Parser, bytes::complete::take_while, character::complete::space0};

/// RFC line length cap, including the terminator.
pub const MAX_LINE: usize = 512;
/// Maximum number of parameters (middles + trailing) a message may carry.
pub const MAX_TOKENS: usize = 10;

/// A single parsed IRC message. `command` is empty when the line carried no
/// command token at all (blank line, or a prefix with nothing following).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl Message {
    /// Number of positional parameters as the dispatcher counts them: middle
    /// params plus, if present, the trailing param.
    pub fn nparams(&self) -> usize {
        self.params.len() + self.trailing.is_some() as usize
    }

    /// Parameter at `index` across the combined middle+trailing sequence.
    pub fn param(&self, index: usize) -> Option<&str> {
        if index < self.params.len() {
            Some(self.params[index].as_str())
        } else if index == self.params.len() {
            self.trailing.as_deref()
        } else {
            None
        }
    }
}

fn token(input: &str) -> nom::IResult<&str, &str> {
    take_while(|c: char| c != ' ').parse(input)
}

/// Parses one already-extracted line (no CR/LF) into a [`Message`].
/// Never fails: malformed input degrades to an empty command, which the
/// dispatcher turns into `ERR_NEEDMOREPARAMS`.
pub fn parse_message(line: &str) -> Message {
    let mut input = line;

    let mut prefix = None;
    if let Some(rest) = input.strip_prefix(':') {
        let (rem, tok) = token(rest).expect("take_while never fails");
        prefix = Some(tok.to_string());
        input = rem;
    }

    let (rem, _) = space0::<_, nom::error::Error<&str>>(input).expect("space0 never fails");
    input = rem;
    let (rem, command_tok) = token(input).expect("take_while never fails");
    input = rem;
    let command = command_tok.to_string();

    let mut params = Vec::new();
    let mut trailing = None;
    loop {
        let (rem, _) = space0::<_, nom::error::Error<&str>>(input).expect("space0 never fails");
        input = rem;
        if input.is_empty() {
            break;
        }
        if params.len() + trailing.is_some() as usize >= MAX_TOKENS {
            break;
        }
        if let Some(rest) = input.strip_prefix(':') {
            trailing = Some(rest.to_string());
            break;
        }
        let (rem, tok) = token(input).expect("take_while never fails");
        params.push(tok.to_string());
        input = rem;
    }

    Message { prefix, command, params, trailing }
}

/// Re-serializes a [`Message`] in canonical wire form, without the
/// terminating CRLF. Used by the reply formatter and by round-trip tests.
pub fn format_message(msg: &Message) -> String {
    let mut out = String::new();
    if let Some(p) = &msg.prefix {
        out.push(':');
        out.push_str(p);
        out.push(' ');
    }
    out.push_str(&msg.command);
    for p in &msg.params {
        out.push(' ');
        out.push_str(p);
    }
    if let Some(t) = &msg.trailing {
        out.push_str(" :");
        out.push_str(t);
    }
    out
}

/// Accumulates bytes from a single connection and splits them into complete
/// CR/LF-terminated lines. Bounded at [`MAX_LINE`] bytes: an unterminated
/// partial line that would grow past the bound is dropped, and the stream
/// resynchronizes at the next terminator.
#[derive(Debug, Default)]
pub struct InboundBuffer {
    buf: Vec<u8>,
}

impl InboundBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends `bytes` and returns every complete (possibly empty, already
    /// dropped) line extracted so far, in arrival order. Invalid UTF-8 lines
    /// are silently dropped, matching the treatment of any other malformed
    /// input.
    pub fn extend_and_split(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(rel) = self.buf[start..].iter().position(|&b| b == b'\r' || b == b'\n') {
            let end = start + rel;
            if end > start {
                if let Ok(s) = std::str::from_utf8(&self.buf[start..end]) {
                    lines.push(s.to_string());
                }
            }
            start = end + 1;
        }
        self.buf.drain(0..start);
        if self.buf.len() > MAX_LINE {
            self.buf.clear();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_command_no_params() {
        let m = parse_message("QUIT");
        assert_eq!(m.command, "QUIT");
        assert_eq!(m.nparams(), 0);
    }

    #[test]
    fn middles_and_trailing() {
        let m = parse_message("PRIVMSG #general,dave :hello there");
        assert_eq!(m.command, "PRIVMSG");
        assert_eq!(m.params, vec!["#general,dave".to_string()]);
        assert_eq!(m.trailing.as_deref(), Some("hello there"));
        assert_eq!(m.nparams(), 2);
    }

    #[test]
    fn prefix_is_parsed() {
        let m = parse_message(":alice!alice@h NICK bob");
        assert_eq!(m.prefix.as_deref(), Some("alice!alice@h"));
        assert_eq!(m.command, "NICK");
        assert_eq!(m.param(0), Some("bob"));
    }

    #[test]
    fn trailing_as_first_param() {
        let m = parse_message("USER a 0 * :Alice A");
        assert_eq!(m.params, vec!["a", "0", "*"]);
        assert_eq!(m.trailing.as_deref(), Some("Alice A"));
    }

    #[test]
    fn blank_line_has_no_command() {
        let m = parse_message("");
        assert_eq!(m.command, "");
        assert_eq!(m.nparams(), 0);
    }

    #[test]
    fn prefix_only_has_no_command() {
        let m = parse_message(":onlyprefix");
        assert_eq!(m.command, "");
    }

    #[test]
    fn max_tokens_are_capped() {
        let line = "CMD a b c d e f g h i j k l";
        let m = parse_message(line);
        assert_eq!(m.nparams(), MAX_TOKENS);
    }

    #[test]
    fn framer_round_trip_crlf() {
        let mut f = InboundBuffer::new();
        let lines = f.extend_and_split(b"NICK alice\r\nUSER alice 0 * :Alice A\r\n");
        assert_eq!(lines, vec!["NICK alice", "USER alice 0 * :Alice A"]);
    }

    #[test]
    fn framer_splits_across_reads() {
        let mut f = InboundBuffer::new();
        assert!(f.extend_and_split(b"NICK al").is_empty());
        let lines = f.extend_and_split(b"ice\r\n");
        assert_eq!(lines, vec!["NICK alice"]);
    }

    #[test]
    fn framer_drops_consecutive_terminators() {
        let mut f = InboundBuffer::new();
        let lines = f.extend_and_split(b"NICK alice\r\n\r\n\nPART #x\r\n");
        assert_eq!(lines, vec!["NICK alice", "PART #x"]);
    }

    #[test]
    fn framer_accepts_bare_cr_or_lf() {
        let mut f = InboundBuffer::new();
        let lines = f.extend_and_split(b"NICK a\rNICK b\n");
        assert_eq!(lines, vec!["NICK a", "NICK b"]);
    }

    #[test]
    fn framer_discards_oversize_partial() {
        let mut f = InboundBuffer::new();
        let oversize = vec![b'a'; MAX_LINE + 10];
        assert!(f.extend_and_split(&oversize).is_empty());
        // stream resynchronizes at the next terminator
        let lines = f.extend_and_split(b"more junk\r\nNICK alice\r\n");
        assert_eq!(lines, vec!["NICK alice"]);
    }

    #[test]
    fn format_then_reparse_round_trips() {
        let m = parse_message("PRIVMSG #general :hello world");
        let rendered = format_message(&m);
        let reparsed = parse_message(&rendered);
        assert_eq!(m, reparsed);
    }
}
