use cardpress_core::{GameKind, PrintConfig, PrizeTier, Symbol};
use serde::Deserialize;

/// On-disk form of a job file. Game numbers are not authored; the loader
/// assigns them from layout order. The loser tier's per-pack count is
/// likewise derived, never authored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    #[serde(default)]
    pub ticket_price: i64,
    pub print: PrintConfig,
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub number_symbols: Vec<Symbol>,
    pub prize_tiers: Vec<PrizeTier>,
    pub modules: Vec<ModuleSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub kind: GameKind,
}
