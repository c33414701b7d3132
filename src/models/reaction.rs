use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Reaction badges a user can attach to any entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Superposition,
    Entangled,
    Collapsed,
    Wave,
}

impl Reaction {
    pub const ALL: [Reaction; 4] =
        [Reaction::Superposition, Reaction::Entangled, Reaction::Collapsed, Reaction::Wave];

    pub fn emoji(self) -> &'static str {
        match self {
            Reaction::Superposition => "⚛",
            Reaction::Entangled => "🔗",
            Reaction::Collapsed => "📊",
            Reaction::Wave => "🌊",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reaction::Superposition => "superposition",
            Reaction::Entangled => "entangled",
            Reaction::Collapsed => "collapsed",
            Reaction::Wave => "wave",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.name())
    }
}

impl FromStr for Reaction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match Reaction::ALL.iter().find(|r| r.name() == lower) {
            Some(reaction) => Ok(*reaction),
            None => bail!("Unknown reaction: {}", s),
        }
    }
}
