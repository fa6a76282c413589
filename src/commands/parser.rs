//! Command parser for framed text lines
//!
//! Turns one complete line into a [`Command`]. Parsing is permissive:
//! numeric fields never fail (see [`lenient_int`]) and unknown lines are
//! rejected without any reply.

use crate::commands::types::{Command, Rejection};
use crate::config::protocol::{
    LINE_CAPACITY, NAV_TEXT_BYTES, ZONE_MAX_EXCLUSIVE, ZONE_MIN_EXCLUSIVE,
};
use crate::protocol::lenient::lenient_int;
use crate::telemetry::wrap::NavText;
use heapless::String;

const SPEED_PREFIX: &str = "SPD:";
const ZONE_PREFIX: &str = "Z:";
const NAV_PREFIX: &str = "NAV:";
const PING: &str = "PING";

/// Separates speed from navigation text in a combined line
const NAV_SEPARATOR: char = '|';

/// What a literal `|` inside navigation text is displayed as
const NAV_SEPARATOR_DISPLAY: &str = " | ";

/// Parser for line protocol commands
pub struct LineParser;

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self
    }

    /// Parse one line (terminator already stripped) into a command
    pub fn parse(&self, line: &[u8]) -> Result<Command, Rejection> {
        let text = to_text(line);
        let line = text.trim();

        if line.is_empty() {
            return Err(Rejection::Empty);
        }

        // Combined form takes priority over every other prefix
        if let Some(rest) = line.strip_prefix(SPEED_PREFIX) {
            if let Some((speed, nav)) = rest.split_once(NAV_SEPARATOR) {
                return Ok(Command::SpeedAndNav {
                    speed: lenient_int(speed),
                    nav: NavText::wrap(&expand_separators(nav)),
                });
            }
        }

        if let Some(rest) = line.strip_prefix(ZONE_PREFIX) {
            let zone = lenient_int(rest);
            if zone > ZONE_MIN_EXCLUSIVE && zone < ZONE_MAX_EXCLUSIVE {
                // Range check above guarantees the value fits
                return Ok(Command::Zone(zone as u8));
            }
            return Err(Rejection::ZoneOutOfRange(zone));
        }

        if let Some(rest) = line.strip_prefix(SPEED_PREFIX) {
            return Ok(Command::Speed(lenient_int(rest)));
        }

        if let Some(rest) = line.strip_prefix(NAV_PREFIX) {
            return Ok(Command::Nav(NavText::wrap(rest)));
        }

        if line == PING {
            return Ok(Command::Ping);
        }

        Err(Rejection::Unrecognized)
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode line bytes as UTF-8, dropping invalid sequences.
fn to_text(line: &[u8]) -> String<LINE_CAPACITY> {
    let mut text = String::new();
    for chunk in line.utf8_chunks() {
        // Valid parts never exceed the input length
        let _ = text.push_str(chunk.valid());
    }
    text
}

/// Pad every separator inside navigation text with spaces.
fn expand_separators(nav: &str) -> String<NAV_TEXT_BYTES> {
    let mut out = String::new();
    for c in nav.chars() {
        let pushed = if c == NAV_SEPARATOR {
            out.push_str(NAV_SEPARATOR_DISPLAY)
        } else {
            out.push(c)
        };
        if pushed.is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, Rejection> {
        LineParser::new().parse(line.as_bytes())
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!(parse("Z:45"), Ok(Command::Zone(45)));
        assert_eq!(parse("Z:1"), Ok(Command::Zone(1)));
        assert_eq!(parse("Z:199"), Ok(Command::Zone(199)));
    }

    #[test]
    fn test_zone_bounds_exclusive() {
        assert_eq!(parse("Z:0"), Err(Rejection::ZoneOutOfRange(0)));
        assert_eq!(parse("Z:200"), Err(Rejection::ZoneOutOfRange(200)));
        assert_eq!(parse("Z:250"), Err(Rejection::ZoneOutOfRange(250)));
        assert_eq!(parse("Z:-30"), Err(Rejection::ZoneOutOfRange(-30)));
        // Non-numeric reads as 0, which is out of range
        assert_eq!(parse("Z:abc"), Err(Rejection::ZoneOutOfRange(0)));
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse("SPD:63"), Ok(Command::Speed(63)));
        assert_eq!(parse("SPD:fast"), Ok(Command::Speed(0)));
        assert_eq!(parse("SPD:"), Ok(Command::Speed(0)));
        assert_eq!(parse("SPD:-3"), Ok(Command::Speed(-3)));
    }

    #[test]
    fn test_parse_speed_and_nav() {
        match parse("SPD:63|Turn left in 200m") {
            Ok(Command::SpeedAndNav { speed, nav }) => {
                assert_eq!(speed, 63);
                assert_eq!(nav.line1.as_str(), "Turn left in 200m");
                assert_eq!(nav.line2.as_str(), "");
            }
            other => panic!("Expected SpeedAndNav, got {:?}", other),
        }
    }

    #[test]
    fn test_speed_and_nav_expands_extra_separators() {
        match parse("SPD:50|A1|A7") {
            Ok(Command::SpeedAndNav { speed, nav }) => {
                assert_eq!(speed, 50);
                assert_eq!(nav.line1.as_str(), "A1 | A7");
            }
            other => panic!("Expected SpeedAndNav, got {:?}", other),
        }
    }

    #[test]
    fn test_speed_and_nav_lenient_speed() {
        match parse("SPD:|Exit") {
            Ok(Command::SpeedAndNav { speed, nav }) => {
                assert_eq!(speed, 0);
                assert_eq!(nav.line1.as_str(), "Exit");
            }
            other => panic!("Expected SpeedAndNav, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nav() {
        match parse("NAV:Turn left in 200 meters then continue straight") {
            Ok(Command::Nav(nav)) => {
                assert_eq!(nav.line1.as_str(), "Turn left in 200");
                assert_eq!(nav.line2.as_str(), "meters then continu…");
            }
            other => panic!("Expected Nav, got {:?}", other),
        }
    }

    #[test]
    fn test_nav_keeps_pipes_verbatim() {
        // Only the combined SPD form expands separators
        match parse("NAV:A|B") {
            Ok(Command::Nav(nav)) => assert_eq!(nav.line1.as_str(), "A|B"),
            other => panic!("Expected Nav, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ping() {
        assert_eq!(parse("PING"), Ok(Command::Ping));
        assert_eq!(parse("  PING\t"), Ok(Command::Ping));
        assert_eq!(parse("PING!"), Err(Rejection::Unrecognized));
        assert_eq!(parse("ping"), Err(Rejection::Unrecognized));
    }

    #[test]
    fn test_prefixes_are_case_sensitive() {
        assert_eq!(parse("z:45"), Err(Rejection::Unrecognized));
        assert_eq!(parse("spd:10"), Err(Rejection::Unrecognized));
        assert_eq!(parse("Nav:x"), Err(Rejection::Unrecognized));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(parse(""), Err(Rejection::Empty));
        assert_eq!(parse("   "), Err(Rejection::Empty));
        assert_eq!(parse("HELLO"), Err(Rejection::Unrecognized));
    }

    #[test]
    fn test_invalid_utf8_dropped() {
        let parser = LineParser::new();
        assert_eq!(parser.parse(b"Z:\xff45"), Ok(Command::Zone(45)));
        assert_eq!(parser.parse(b"\xfe\xffPING"), Ok(Command::Ping));
    }
}
