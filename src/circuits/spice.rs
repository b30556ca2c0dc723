//! Minimal SPICE netlist importer for resistor networks.
//!
//! Only `R` cards are interpreted. Other element cards are skipped with a
//! warning, dot-directives are ignored and `.end` stops parsing.

use tracing::{debug, warn};

use crate::errors::{NetworkError, NetworkResult};
use crate::math::{is_valid_resistance, Scalar};

use super::component::Resistor;
use super::network::ResistorNetwork;

/// Resistors read from a netlist, in card order.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    /// Parsed resistor cards.
    pub resistors: Vec<Resistor>,
    /// Element cards that were not resistors.
    pub skipped: usize,
}

impl Netlist {
    /// Parses netlist text.
    pub fn parse(text: &str) -> NetworkResult<Self> {
        let mut netlist = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let l = raw.trim();
            if l.is_empty() || l.starts_with('*') || l.starts_with(';') {
                continue;
            }
            let toks: Vec<&str> = l.split_whitespace().collect();
            let head = toks[0];
            if head.starts_with('.') {
                if head.eq_ignore_ascii_case(".end") {
                    break;
                }
                debug!(line, directive = head, "ignoring directive");
                continue;
            }
            match head.chars().next().map(|c| c.to_ascii_uppercase()) {
                Some('R') => {
                    if toks.len() < 4 {
                        return Err(NetworkError::Netlist {
                            line,
                            message: format!("resistor card `{head}` needs two nodes and a value"),
                        });
                    }
                    let value = parse_scalar(toks[3]).map_err(|message| NetworkError::Netlist {
                        line,
                        message,
                    })?;
                    if !is_valid_resistance(value) {
                        return Err(NetworkError::invalid_resistance(toks[1], toks[2], value));
                    }
                    netlist
                        .resistors
                        .push(Resistor::new(head, toks[1], toks[2], value));
                }
                _ => {
                    warn!(line, card = head, "skipping non-resistive element");
                    netlist.skipped += 1;
                }
            }
        }
        Ok(netlist)
    }

    /// Builds the resistor network described by the netlist.
    pub fn to_network(&self) -> NetworkResult<ResistorNetwork> {
        ResistorNetwork::from_resistors(self.resistors.iter().cloned())
    }
}

/// Parses netlist text straight into a network.
pub fn parse_netlist(text: &str) -> NetworkResult<ResistorNetwork> {
    Netlist::parse(text)?.to_network()
}

/// Parses a SPICE number with an optional scale suffix (`f p n u m k meg g t`).
///
/// Suffixes are case-insensitive and trailing unit letters are ignored, so
/// `4k7` is rejected but `4.7kOhm` reads as 4700.
pub fn parse_scalar(tok: &str) -> Result<Scalar, String> {
    let s = tok.trim();
    let split = numeric_prefix_len(s);
    if split == 0 {
        return Err(format!("invalid number `{tok}`"));
    }
    let (number, suffix) = s.split_at(split);
    let base: Scalar = number
        .parse()
        .map_err(|_| format!("invalid number `{tok}`"))?;
    let suffix = suffix.to_ascii_lowercase();
    let mult = if suffix.starts_with("meg") {
        1e6
    } else {
        match suffix.chars().next() {
            None => 1.0,
            Some('t') => 1e12,
            Some('g') => 1e9,
            Some('k') => 1e3,
            Some('m') => 1e-3,
            Some('u') => 1e-6,
            Some('n') => 1e-9,
            Some('p') => 1e-12,
            Some('f') => 1e-15,
            Some(c) if c.is_ascii_alphabetic() => 1.0,
            Some(_) => return Err(format!("invalid number `{tok}`")),
        }
    };
    if suffix.chars().any(|c| !c.is_ascii_alphabetic()) {
        return Err(format!("invalid number `{tok}`"));
    }
    Ok(base * mult)
}

/// Length of the leading `[+-]digits[.digits][e[+-]digits]` run.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i == digits_start {
        return 0;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn suffixes_scale_values() {
        assert_relative_eq!(parse_scalar("100").unwrap(), 100.0);
        assert_relative_eq!(parse_scalar("4.7k").unwrap(), 4700.0);
        assert_relative_eq!(parse_scalar("4.7kOhm").unwrap(), 4700.0);
        assert_relative_eq!(parse_scalar("2MEG").unwrap(), 2.0e6);
        assert_relative_eq!(parse_scalar("2m").unwrap(), 2.0e-3);
        assert_relative_eq!(parse_scalar("1e3").unwrap(), 1000.0);
        assert_relative_eq!(parse_scalar("1.5e-2u").unwrap(), 1.5e-8);
        assert!(parse_scalar("k10").is_err());
        assert!(parse_scalar("4k7").is_err());
    }

    #[test]
    fn parses_resistor_cards_and_skips_the_rest() {
        let text = "\
* wheatstone bridge
R1 a c 100
R2 c b 100
R3 a d 200
R4 d b 200
R5 c d 300
V1 a 0 DC 5
.op
.end
R6 a b 1
";
        let netlist = Netlist::parse(text).unwrap();
        assert_eq!(netlist.resistors.len(), 5);
        assert_eq!(netlist.skipped, 1);
        assert_eq!(netlist.resistors[4].name(), "R5");
        let net = netlist.to_network().unwrap();
        assert_relative_eq!(
            net.equivalent_resistance("a", "b").unwrap(),
            400.0 / 3.0,
            max_relative = 1.0e-9
        );
    }

    #[test]
    fn malformed_cards_report_line_numbers() {
        let err = parse_netlist("R1 a b 10\nR2 a\n").unwrap_err();
        assert!(matches!(err, NetworkError::Netlist { line: 2, .. }));
        let err = parse_netlist("R1 a b ten\n").unwrap_err();
        assert!(matches!(err, NetworkError::Netlist { line: 1, .. }));
    }

    #[test]
    fn non_positive_values_are_invalid_resistances() {
        let err = parse_netlist("R1 a b 0\n").unwrap_err();
        assert!(matches!(err, NetworkError::InvalidResistance { .. }));
    }
}
