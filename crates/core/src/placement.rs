use crate::{Event, EventBus, GeneratedRun, Project, RngState, Ticket, MAX_HVW_PER_PACK};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("print run needs {needed} common-pack tickets but {available} were generated")]
    ShortLvwSupply { needed: usize, available: usize },
    #[error(
        "no open slot for high-value winner {ordinal} under the {cap}-per-pack cap; \
         too many high-value winners for the live run"
    )]
    NoSlotForHvw { ordinal: usize, cap: usize },
}

/// Final print order: position -> index into the concatenation of the LVW
/// tickets followed by the HVW tickets.
#[derive(Debug, Clone)]
pub struct PlacedRun {
    pub order: Vec<usize>,
    pub lvw_len: usize,
}

impl PlacedRun {
    pub fn is_hvw_source(&self, source: usize) -> bool {
        source >= self.lvw_len
    }

    /// The ordered ticket sequence handed to the report writers.
    pub fn materialize(&self, run: &GeneratedRun) -> Vec<Ticket> {
        self.order
            .iter()
            .map(|source| {
                if *source < self.lvw_len {
                    run.lvw[*source].clone()
                } else {
                    run.hvw[*source - self.lvw_len].clone()
                }
            })
            .collect()
    }
}

/// Shuffle the generated tickets into print order.
///
/// Common-pack templates are tiled across the print packs, each pack under
/// its own position permutation; high-value winners then land on shuffled
/// losing positions inside the live range, at most [`MAX_HVW_PER_PACK`] per
/// pack. Exhausting the slot supply is fatal: a winner is never dropped.
pub fn place_run(
    project: &Project,
    run: &GeneratedRun,
    rng: &mut RngState,
    events: &mut EventBus,
) -> Result<PlacedRun, PlacementError> {
    let cards = project.print.cards_per_pack;
    let lvw_len = run.lvw.len();
    let needed = project.print.common_packs * cards;
    if lvw_len < needed {
        return Err(PlacementError::ShortLvwSupply {
            needed,
            available: lvw_len,
        });
    }

    let print_tickets = project.print.print_tickets();
    let mut order = vec![0usize; print_tickets];
    let mut occupied = vec![false; print_tickets];
    for pack in 0..project.print.print_packs {
        let template = pack % project.print.common_packs;
        let mut perm: Vec<usize> = (0..cards).collect();
        rng.shuffle(&mut perm);
        for (slot, pick) in perm.into_iter().enumerate() {
            let position = pack * cards + slot;
            let source = template * cards + pick;
            order[position] = source;
            occupied[position] =
                project.prize_tiers[run.lvw[source].win_tier_index].is_winner();
        }
    }

    // Winners may only displace losing positions inside the live range.
    let mut available: Vec<usize> = (0..project.print.live_tickets())
        .filter(|position| !occupied[*position])
        .collect();
    rng.shuffle(&mut available);

    let mut hvw_in_pack = vec![0usize; project.print.print_packs];
    for hvw_index in 0..run.hvw.len() {
        let found = available
            .iter()
            .position(|position| hvw_in_pack[position / cards] < MAX_HVW_PER_PACK);
        let Some(found) = found else {
            return Err(PlacementError::NoSlotForHvw {
                ordinal: hvw_index,
                cap: MAX_HVW_PER_PACK,
            });
        };
        let position = available.remove(found);
        hvw_in_pack[position / cards] += 1;
        order[position] = lvw_len + hvw_index;
    }

    events.push(Event::PlacementFinished {
        print_tickets,
        hvw_placed: run.hvw.len(),
    });
    Ok(PlacedRun { order, lvw_len })
}
