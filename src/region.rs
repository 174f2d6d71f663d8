//! Region codes the planner reports on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Flag shown for codes outside the known set.
pub const UNKNOWN_REGION_FLAG: &str = "🏳️";

/// A duty-free sales region.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    #[default]
    #[value(name = "KR")]
    Kr,
    #[value(name = "JP")]
    Jp,
    #[value(name = "CN")]
    Cn,
    #[value(name = "SEA")]
    Sea,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Kr, Region::Jp, Region::Cn, Region::Sea];

    /// Code used by producer records (`"KR"`, `"SEA"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Kr => "KR",
            Region::Jp => "JP",
            Region::Cn => "CN",
            Region::Sea => "SEA",
        }
    }

    #[must_use]
    pub fn flag(self) -> &'static str {
        flag_for(self.as_str())
    }
}

/// Display flag for any region code.
#[must_use]
pub fn flag_for(code: &str) -> &'static str {
    match code {
        "KR" => "🎎",
        "CN" => "🐉",
        "JP" => "🎌",
        "SEA" => "🌴",
        _ => UNKNOWN_REGION_FLAG,
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == code)
            .ok_or_else(|| format!("unknown region '{s}' (expected KR, JP, CN or SEA)"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_region_flags() {
        assert_eq!(Region::Kr.flag(), "🎎");
        assert_eq!(Region::Jp.flag(), "🎌");
        assert_eq!(Region::Cn.flag(), "🐉");
        assert_eq!(Region::Sea.flag(), "🌴");
        assert_eq!(flag_for("US"), UNKNOWN_REGION_FLAG);
    }

    #[test]
    fn test_region_from_str_is_case_insensitive() {
        assert_eq!("sea".parse::<Region>().unwrap(), Region::Sea);
        assert_eq!(" KR ".parse::<Region>().unwrap(), Region::Kr);
        assert!("EU".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Region::Sea).unwrap(), "\"SEA\"");
        assert_eq!(Region::Cn.to_string(), "CN");
    }
}
