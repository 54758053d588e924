use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Smallest number that can be drawn.
pub const MIN_NUMBER: u8 = 1;
/// Largest number that can be drawn.
pub const MAX_NUMBER: u8 = 80;
/// Fewest numbers a single ticket may carry.
pub const MIN_TICKET_NUMBERS: usize = 10;
/// Most numbers a single ticket may carry.
pub const MAX_TICKET_NUMBERS: usize = 15;

/// A lottery number in `MIN_NUMBER..=MAX_NUMBER`.
///
/// The service sends draw numbers either as integers or as zero-padded
/// strings (`"05"`), so deserialization accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawNumber", into = "u8")]
pub struct DrawNumber(u8);

impl DrawNumber {
    pub fn new(value: i64) -> Result<Self, ProtocolError> {
        if (i64::from(MIN_NUMBER)..=i64::from(MAX_NUMBER)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ProtocolError::NumberOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<DrawNumber> for u8 {
    fn from(value: DrawNumber) -> Self {
        value.0
    }
}

impl fmt::Display for DrawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Text(String),
}

impl TryFrom<RawNumber> for DrawNumber {
    type Error = ProtocolError;

    fn try_from(value: RawNumber) -> Result<Self, Self::Error> {
        match value {
            RawNumber::Int(value) => Self::new(value),
            RawNumber::Text(text) => {
                let parsed = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ProtocolError::NotNumeric(text.clone()))?;
                Self::new(parsed)
            }
        }
    }
}

/// Sequential contest identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrawId(pub u32);

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-side suggestion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    #[serde(rename = "equilibrada")]
    Balanced,
    #[serde(rename = "agressiva")]
    Aggressive,
    #[serde(rename = "conservadora")]
    Conservative,
    #[serde(rename = "mista")]
    Mixed,
    #[serde(rename = "atrasados")]
    Overdue,
    #[serde(rename = "por_faixa")]
    ByRange,
    #[serde(rename = "por_posicao")]
    ByPosition,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::Balanced,
        Strategy::Aggressive,
        Strategy::Conservative,
        Strategy::Mixed,
        Strategy::Overdue,
        Strategy::ByRange,
        Strategy::ByPosition,
    ];

    /// Wire name, as the service expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Balanced => "equilibrada",
            Strategy::Aggressive => "agressiva",
            Strategy::Conservative => "conservadora",
            Strategy::Mixed => "mista",
            Strategy::Overdue => "atrasados",
            Strategy::ByRange => "por_faixa",
            Strategy::ByPosition => "por_posicao",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProtocolError::UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_number_accepts_padded_strings_and_integers() {
        let parsed: Vec<DrawNumber> = serde_json::from_str(r#"["05", 17, " 80 "]"#).expect("parse");
        assert_eq!(
            parsed.iter().map(|n| n.get()).collect::<Vec<_>>(),
            vec![5, 17, 80]
        );
    }

    #[test]
    fn draw_number_rejects_out_of_range_values() {
        assert!(serde_json::from_str::<DrawNumber>("0").is_err());
        assert!(serde_json::from_str::<DrawNumber>("\"81\"").is_err());
        assert!(serde_json::from_str::<DrawNumber>("\"xx\"").is_err());
    }

    #[test]
    fn draw_number_serializes_as_plain_integer() {
        let number = DrawNumber::new(7).expect("in range");
        assert_eq!(serde_json::to_string(&number).expect("json"), "7");
    }

    #[test]
    fn strategy_parses_wire_names_case_insensitively() {
        assert_eq!("AGRESSIVA".parse::<Strategy>(), Ok(Strategy::Aggressive));
        assert_eq!("por_posicao".parse::<Strategy>(), Ok(Strategy::ByPosition));
        assert_eq!(
            "lucky".parse::<Strategy>(),
            Err(ProtocolError::UnknownStrategy("lucky".into()))
        );
        assert_eq!(
            serde_json::to_string(&Strategy::Overdue).expect("json"),
            "\"atrasados\""
        );
    }
}
