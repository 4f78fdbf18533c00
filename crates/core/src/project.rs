use crate::{GameKind, GameModule, PoolKind, PrizeTier, Symbol};
use serde::{Deserialize, Serialize};

/// Geometry of the print run. The live packs are the ones sold; the print
/// run adds extra packs for setup, spares and samples.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintConfig {
    pub cards_per_pack: usize,
    /// Number of distinct common-pack templates generated.
    pub common_packs: usize,
    pub live_packs: usize,
    pub print_packs: usize,
}

impl PrintConfig {
    pub fn live_tickets(&self) -> usize {
        self.live_packs * self.cards_per_pack
    }

    pub fn print_tickets(&self) -> usize {
        self.print_packs * self.cards_per_pack
    }
}

/// A fully-authored job: catalog, prize structure, ordered game layout and
/// run geometry. The loader validates structural sanity (loser tier present,
/// contiguous game numbers, counts that fit the pack) before the engine
/// sees it; the engine does not re-check project shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Sale price of one ticket, minor currency units.
    pub ticket_price: i64,
    pub symbols: Vec<Symbol>,
    pub number_symbols: Vec<Symbol>,
    pub prize_tiers: Vec<PrizeTier>,
    pub modules: Vec<GameModule>,
    pub print: PrintConfig,
}

impl Project {
    pub fn symbol(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.id == id)
    }

    pub fn number_symbol(&self, id: u32) -> Option<&Symbol> {
        self.number_symbols.iter().find(|symbol| symbol.id == id)
    }

    pub fn loser_tier_index(&self) -> Option<usize> {
        self.prize_tiers.iter().position(|tier| tier.is_loser())
    }

    /// The at-most-one online bonus module on the layout.
    pub fn online_module_index(&self) -> Option<usize> {
        self.modules.iter().position(|module| module.is_online_bonus())
    }

    pub fn generic_module_indices(&self) -> Vec<usize> {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, module)| module.is_generic())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Offline winner tier linked to a symbol name via its text code.
    pub fn linked_tier_index(&self, symbol_name: &str) -> Option<usize> {
        self.prize_tiers
            .iter()
            .position(|tier| !tier.is_online && tier.is_winner() && tier.text_code == symbol_name)
    }

    /// Symbol mapped to the single highest-value non-online tier. Its id is
    /// barred from near-miss decoys on total-loser tickets.
    pub fn jackpot_symbol_id(&self) -> Option<u32> {
        let top = self
            .prize_tiers
            .iter()
            .filter(|tier| !tier.is_online && tier.is_winner())
            .max_by_key(|tier| tier.value)?;
        self.symbols
            .iter()
            .find(|symbol| symbol.name == top.text_code)
            .map(|symbol| symbol.id)
    }

    /// Draw pool for a grid/row slot kind. For `Prizes` the ids are indices
    /// into `prize_tiers`, restricted to offline winner tiers.
    pub fn pool_ids(&self, pool: PoolKind) -> Vec<u32> {
        match pool {
            PoolKind::Symbols => self.symbols.iter().map(|symbol| symbol.id).collect(),
            PoolKind::Numbers => self.number_symbols.iter().map(|symbol| symbol.id).collect(),
            PoolKind::Prizes => self
                .prize_tiers
                .iter()
                .enumerate()
                .filter(|(_, tier)| !tier.is_online && tier.is_winner())
                .map(|(idx, _)| idx as u32)
                .collect(),
        }
    }

    /// Winning-symbol ids configured on every symbol-prize module except the
    /// one at `except`. Those ids must never appear as decoys in another
    /// instance of that mechanic.
    pub fn symbol_prize_winner_ids(&self, except: usize) -> Vec<u32> {
        self.modules
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != except)
            .filter_map(|(_, module)| match &module.kind {
                GameKind::SymbolPrize {
                    winning_symbol_id, ..
                } => Some(*winning_symbol_id),
                _ => None,
            })
            .collect()
    }

    /// Reassign game numbers 1..N in layout order. Called after any reorder.
    pub fn renumber_modules(&mut self) {
        for (idx, module) in self.modules.iter_mut().enumerate() {
            module.game_number = idx as u32 + 1;
        }
    }
}
