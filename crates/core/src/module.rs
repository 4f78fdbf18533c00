use crate::{GamePlayData, Project};
use serde::{Deserialize, Serialize};

/// Fixed layout of the themed tree game: one slot on the top row widening
/// to five at the base.
pub const TREE_ROW_SIZES: [usize; 5] = [1, 2, 3, 4, 5];

/// Cap on high-value winners placed into any single physical pack.
pub const MAX_HVW_PER_PACK: usize = 2;

/// What a grid/row slot holds: a play-symbol id, a number-symbol id, or an
/// index into the project's prize-tier list (offline, value > 0 tiers only).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PoolKind {
    Symbols,
    Numbers,
    Prizes,
}

/// Game mechanic of one module. A closed set: every panel generator and the
/// validator dispatch over this enum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameKind {
    /// Match `match_count` equal ids anywhere in an R x C grid.
    MatchGrid {
        pool: PoolKind,
        rows: u8,
        cols: u8,
        match_count: u8,
    },
    /// Independent rows of `row_len`; match `match_count` within one row.
    MatchRows {
        pool: PoolKind,
        rows: u8,
        row_len: u8,
        match_count: u8,
    },
    /// Win when the configured symbol appears anywhere on the panel.
    FindSymbol { slots: u8, winning_symbol_id: u32 },
    /// Like `FindSymbol`, but the prize is the tier whose text code matches
    /// the winning symbol's name, overriding the ticket's assigned prize.
    SymbolPrize { slots: u8, winning_symbol_id: u32 },
    /// Themed find game over the fixed tree layout.
    TreeFind { winning_symbol_id: u32 },
    /// QR marker for online prizes; generates no symbols.
    OnlineBonus { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameModule {
    /// 1-based and contiguous in layout order; reassigned on reorder.
    pub game_number: u32,
    pub name: String,
    pub kind: GameKind,
}

impl GameModule {
    pub fn slot_count(&self) -> usize {
        match &self.kind {
            GameKind::MatchGrid { rows, cols, .. } => *rows as usize * *cols as usize,
            GameKind::MatchRows { rows, row_len, .. } => *rows as usize * *row_len as usize,
            GameKind::FindSymbol { slots, .. } | GameKind::SymbolPrize { slots, .. } => {
                *slots as usize
            }
            GameKind::TreeFind { .. } => TREE_ROW_SIZES.iter().sum(),
            GameKind::OnlineBonus { .. } => 0,
        }
    }

    pub fn is_online_bonus(&self) -> bool {
        matches!(self.kind, GameKind::OnlineBonus { .. })
    }

    pub fn is_symbol_prize(&self) -> bool {
        matches!(self.kind, GameKind::SymbolPrize { .. })
    }

    /// Generic modules are eligible for uniform winner selection: anything
    /// that is not an online marker and does not carry its own fixed prize.
    pub fn is_generic(&self) -> bool {
        !self.is_online_bonus() && !self.is_symbol_prize()
    }

    /// Cells for one production CSV row: the printable text of every slot,
    /// in generated order. The writers themselves live outside the core.
    pub fn csv_cells(&self, data: &GamePlayData, project: &Project) -> Vec<String> {
        match &self.kind {
            GameKind::MatchGrid {
                pool: PoolKind::Prizes,
                ..
            }
            | GameKind::MatchRows {
                pool: PoolKind::Prizes,
                ..
            } => data
                .generated
                .iter()
                .map(|idx| {
                    project
                        .prize_tiers
                        .get(*idx as usize)
                        .map(|tier| tier.text_code.clone())
                        .unwrap_or_default()
                })
                .collect(),
            GameKind::MatchGrid {
                pool: PoolKind::Numbers,
                ..
            }
            | GameKind::MatchRows {
                pool: PoolKind::Numbers,
                ..
            } => data
                .generated
                .iter()
                .map(|id| {
                    project
                        .number_symbol(*id)
                        .map(|symbol| symbol.name.clone())
                        .unwrap_or_default()
                })
                .collect(),
            GameKind::OnlineBonus { url } => vec![url.clone()],
            _ => data
                .generated
                .iter()
                .map(|id| {
                    project
                        .symbol(*id)
                        .map(|symbol| symbol.name.clone())
                        .unwrap_or_default()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrintConfig, PrizeTier, Symbol};

    fn project() -> Project {
        Project {
            name: "csv fixture".to_string(),
            ticket_price: 200,
            symbols: vec![
                Symbol {
                    id: 1,
                    name: "BELL".to_string(),
                    image: None,
                },
                Symbol {
                    id: 2,
                    name: "STAR".to_string(),
                    image: None,
                },
            ],
            number_symbols: Vec::new(),
            prize_tiers: vec![
                PrizeTier {
                    id: 1,
                    value: 0,
                    display: "NO WIN".to_string(),
                    text_code: String::new(),
                    barcode: String::new(),
                    is_online: false,
                    lvw_count: 0,
                    hvw_count: 0,
                },
                PrizeTier {
                    id: 2,
                    value: 500,
                    display: "$5".to_string(),
                    text_code: "FIVE".to_string(),
                    barcode: String::new(),
                    is_online: false,
                    lvw_count: 0,
                    hvw_count: 0,
                },
            ],
            modules: Vec::new(),
            print: PrintConfig {
                cards_per_pack: 1,
                common_packs: 1,
                live_packs: 1,
                print_packs: 1,
            },
        }
    }

    fn data(generated: Vec<u32>) -> GamePlayData {
        GamePlayData {
            game_number: 1,
            generated,
            win_tier_index: None,
        }
    }

    #[test]
    fn symbol_cells_print_symbol_names() {
        let module = GameModule {
            game_number: 1,
            name: "find".to_string(),
            kind: GameKind::FindSymbol {
                slots: 2,
                winning_symbol_id: 2,
            },
        };
        let cells = module.csv_cells(&data(vec![2, 1]), &project());
        assert_eq!(cells, vec!["STAR".to_string(), "BELL".to_string()]);
    }

    #[test]
    fn prize_cells_print_tier_text_codes() {
        let module = GameModule {
            game_number: 1,
            name: "prize grid".to_string(),
            kind: GameKind::MatchGrid {
                pool: PoolKind::Prizes,
                rows: 1,
                cols: 2,
                match_count: 2,
            },
        };
        let cells = module.csv_cells(&data(vec![1, 1]), &project());
        assert_eq!(cells, vec!["FIVE".to_string(), "FIVE".to_string()]);
    }

    #[test]
    fn tree_layout_is_fifteen_slots() {
        let module = GameModule {
            game_number: 1,
            name: "tree".to_string(),
            kind: GameKind::TreeFind {
                winning_symbol_id: 1,
            },
        };
        assert_eq!(module.slot_count(), 15);
    }
}
