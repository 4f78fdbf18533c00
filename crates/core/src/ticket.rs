use serde::{Deserialize, Serialize};

/// Raw outcome of one game module on one ticket. `generated` holds symbol
/// ids, number ids or prize-tier indices depending on the module's pool;
/// `win_tier_index` is the prize the module was built to award, or `None`
/// when the module did not win. Immutable once the ticket passes self-test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamePlayData {
    pub game_number: u32,
    pub generated: Vec<u32>,
    #[serde(default)]
    pub win_tier_index: Option<usize>,
}

/// One scratch card: its overall prize plus one play-data entry per module,
/// in layout order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    /// Index into the project's prize tiers; the loser tier for non-winners.
    pub win_tier_index: usize,
    pub game_data: Vec<GamePlayData>,
}

impl Ticket {
    /// Derived identity of the playable surface: every module's number and
    /// generated-id sequence, in order. Two tickets printing the same
    /// symbols everywhere share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        for data in &self.game_data {
            out.push('g');
            out.push_str(&data.game_number.to_string());
            out.push(':');
            for (idx, id) in data.generated.iter().enumerate() {
                if idx > 0 {
                    out.push('-');
                }
                out.push_str(&id.to_string());
            }
            out.push(';');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(game_number: u32, generated: Vec<u32>) -> GamePlayData {
        GamePlayData {
            game_number,
            generated,
            win_tier_index: None,
        }
    }

    #[test]
    fn fingerprint_covers_every_module_in_order() {
        let ticket = Ticket {
            win_tier_index: 0,
            game_data: vec![data(1, vec![3, 1, 4]), data(2, vec![])],
        };
        assert_eq!(ticket.fingerprint(), "g1:3-1-4;g2:;");
    }

    #[test]
    fn fingerprint_distinguishes_slot_order() {
        let a = Ticket {
            win_tier_index: 0,
            game_data: vec![data(1, vec![1, 2])],
        };
        let b = Ticket {
            win_tier_index: 0,
            game_data: vec![data(1, vec![2, 1])],
        };
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_ignores_declared_prize() {
        let mut a = Ticket {
            win_tier_index: 0,
            game_data: vec![data(1, vec![5, 5, 5])],
        };
        let b = Ticket {
            win_tier_index: 2,
            game_data: a.game_data.clone(),
        };
        a.game_data[0].win_tier_index = Some(2);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
