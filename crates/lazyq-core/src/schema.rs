//! Runtime value categories. Pure data; `of_type` filters compare against these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    #[serde(rename = "string")]
    Str,
    List,
    Map,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(ValueKind::Null),
            "bool" | "boolean" => Ok(ValueKind::Bool),
            "int" | "integer" => Ok(ValueKind::Int),
            "float" | "double" => Ok(ValueKind::Float),
            "string" | "str" => Ok(ValueKind::Str),
            "list" | "array" => Ok(ValueKind::List),
            "map" | "object" => Ok(ValueKind::Map),
            other => Err(Error::InvalidArgument(format!("unknown type name '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("integer".parse::<ValueKind>().unwrap(), ValueKind::Int);
        assert_eq!("Double".parse::<ValueKind>().unwrap(), ValueKind::Float);
        assert_eq!("array".parse::<ValueKind>().unwrap(), ValueKind::List);
        assert!("resource".parse::<ValueKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in [ValueKind::Null, ValueKind::Str, ValueKind::Map] {
            assert_eq!(kind.to_string().parse::<ValueKind>().unwrap(), kind);
        }
    }
}
