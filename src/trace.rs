use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::SimError;

/// Parse one trace token as a 32-bit hex address. The trace convention is
/// bare hex; a leading 0x is tolerated. Values past 32 bits fail the same
/// way garbage does.
pub fn parse_address(token: &str, line: usize) -> Result<u32, SimError> {
    let trimmed = token.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).map_err(|_| SimError::MalformedAddress {
        line,
        token: trimmed.to_string(),
    })
}

/// Streams a trace file line by line, one hex address per line.
pub struct Trace {
    lines: Lines<BufReader<File>>,
}

impl Trace {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Trace> {
        let file = File::open(path)?;
        Ok(Trace {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl Iterator for Trace {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_bare_hex() {
        assert_eq!(parse_address("1a2b3c4d", 1).unwrap(), 0x1a2b3c4d);
        assert_eq!(parse_address("0", 1).unwrap(), 0);
        assert_eq!(parse_address("ffffffff", 1).unwrap(), u32::MAX);
    }

    #[test]
    fn parses_prefixed_hex_and_whitespace() {
        assert_eq!(parse_address("  0xdeadbeef\t", 7).unwrap(), 0xdeadbeef);
    }

    #[test]
    fn rejects_non_hex_token() {
        let err = parse_address("zzzz", 3).unwrap_err();
        match err {
            SimError::MalformedAddress { line, token } => {
                assert_eq!(line, 3);
                assert_eq!(token, "zzzz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_values_past_32_bits() {
        assert!(matches!(
            parse_address("100000000", 1),
            Err(SimError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn rejects_empty_line() {
        assert!(matches!(
            parse_address("", 5),
            Err(SimError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn streams_file_in_order() {
        let dir = std::env::temp_dir();
        let path = dir.join("cache_sim_trace_order_test.txt");
        {
            let mut f = File::create(&path).unwrap();
            writeln!(f, "1000").unwrap();
            writeln!(f, "2000").unwrap();
            writeln!(f, "3000").unwrap();
        }
        let lines: Vec<String> = Trace::open(&path).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["1000", "2000", "3000"]);
        std::fs::remove_file(&path).ok();
    }
}
