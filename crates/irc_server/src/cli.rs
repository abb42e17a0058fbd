//! Command-line surface: the listening port and the `-D` debug bitmask.

use clap::Parser;

/// Debug category bits for the `-D` flag, matching the categories the
/// original server's `debug.h` defined. Independent of the crate-wide log
/// level filter (`RUST_LOG`) — this mask only gates which `log::debug!`
/// call sites in this crate are allowed to fire, via [`Args::debug_enabled`].
pub mod debug_mask {
    pub const ERRS: u32 = 0x01;
    pub const INIT: u32 = 0x02;
    pub const SOCKETS: u32 = 0x04;
    pub const SPLIT: u32 = 0x08;
    pub const INPUT: u32 = 0x10;
    pub const CLIENTS: u32 = 0x20;
    pub const CHANNELS: u32 = 0x40;
    pub const REPLIES: u32 = 0x80;
    pub const ALL: u32 = 0xffff_ffff;
}

const MIN_PORT: u16 = 1024;

#[derive(Parser, Debug)]
#[command(name = "irc_server", about = "A single-threaded RFC 1459 subset IRC server")]
pub struct Args {
    /// TCP port to listen on (1024-65535).
    #[arg(value_parser = parse_port)]
    pub port: u16,

    /// Diagnostic category bitmask (hex or decimal), e.g. `-D 0x32` for
    /// sockets+clients+init.
    #[arg(short = 'D', long = "debug", value_parser = parse_mask, default_value = "0")]
    pub debug: u32,
}

impl Args {
    pub fn debug_enabled(&self, category: u32) -> bool {
        self.debug & category != 0
    }
}

fn parse_port(s: &str) -> Result<u16, String> {
    let port: u32 = s.parse().map_err(|_| format!("'{s}' is not a valid port number"))?;
    if port < MIN_PORT as u32 || port > u16::MAX as u32 {
        return Err(format!("port must be in {MIN_PORT}..=65535, got {port}"));
    }
    Ok(port as u16)
}

fn parse_mask(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse::<u32>().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_port() {
        assert!(parse_port("80").is_err());
    }

    #[test]
    fn accepts_boundary_port() {
        assert_eq!(parse_port("1024").unwrap(), 1024);
        assert_eq!(parse_port("65535").unwrap(), 65535);
    }

    #[test]
    fn mask_accepts_hex_and_decimal() {
        assert_eq!(parse_mask("0x20").unwrap(), debug_mask::CLIENTS);
        assert_eq!(parse_mask("32").unwrap(), debug_mask::CLIENTS);
    }
}
