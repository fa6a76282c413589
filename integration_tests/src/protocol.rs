//! Line protocol helpers for talking to the HUD.

#![allow(dead_code)]

/// Reply to PING on the SPP link
pub const SPP_PONG: &[u8] = b"PONG\r\n";

/// Reply to PING on the BLE link
pub const BLE_PONG: &[u8] = b"PONG\n";

/// Terminate a command with a newline.
pub fn line(command: &str) -> Vec<u8> {
    let mut out = command.as_bytes().to_vec();
    out.push(b'\n');
    out
}

pub fn ping() -> Vec<u8> {
    line("PING")
}

pub fn zone(limit: i32) -> Vec<u8> {
    line(&format!("Z:{}", limit))
}

pub fn speed(kmh: i32) -> Vec<u8> {
    line(&format!("SPD:{}", kmh))
}

pub fn nav(text: &str) -> Vec<u8> {
    line(&format!("NAV:{}", text))
}

pub fn speed_and_nav(kmh: i32, text: &str) -> Vec<u8> {
    line(&format!("SPD:{}|{}", kmh, text))
}

/// Split a received byte stream into lines, dropping empty ones.
pub fn split_lines(data: &[u8]) -> Vec<String> {
    data.split(|&b| b == b'\n' || b == b'\r')
        .filter(|l| !l.is_empty())
        .map(|l| String::from_utf8_lossy(l).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        assert_eq!(zone(50), b"Z:50\n");
        assert_eq!(speed_and_nav(61, "Exit 4"), b"SPD:61|Exit 4\n");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b"PONG\r\nOK\r\n\n"), vec!["PONG", "OK"]);
        assert!(split_lines(b"\r\n").is_empty());
    }
}
