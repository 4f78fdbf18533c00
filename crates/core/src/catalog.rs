use serde::{Deserialize, Serialize};

/// A printable play symbol. Ids are positive and unique within a project;
/// a symbol is never edited once a panel references it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One prize tier of the job. `value` is in minor currency units; the
/// single tier with `value == 0` is the loser tier. Two tiers may share a
/// value (online/offline variants), so tier identity for win matching is
/// the `(value, is_online)` pair, not the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrizeTier {
    pub id: u32,
    pub value: i64,
    pub display: String,
    pub text_code: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub is_online: bool,
    /// Winners of this tier per common pack. Derived for the loser tier.
    #[serde(default)]
    pub lvw_count: u32,
    /// Discrete high-value winners across the whole run.
    #[serde(default)]
    pub hvw_count: u32,
}

impl PrizeTier {
    pub fn is_loser(&self) -> bool {
        self.value == 0
    }

    pub fn is_winner(&self) -> bool {
        self.value > 0
    }

    /// Tier identity used everywhere the validator compares prizes.
    pub fn matches(&self, other: &PrizeTier) -> bool {
        self.value == other.value && self.is_online == other.is_online
    }
}
