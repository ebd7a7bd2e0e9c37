/// Inventory ledger: how many of each light source the player may
/// still place.
///
/// Counters never go negative — `take` refuses at zero instead of
/// saturating. The `initial_*` baselines record the counts at the start
/// of the current level; the level-transition reward is computed from
/// how far below the baseline the player finished.

use super::light::SourceKind;

#[derive(Clone, Debug)]
pub struct Inventory {
    pub bulbs: u32,
    pub flashlights: u32,
    pub initial_bulbs: u32,
    pub initial_flashlights: u32,
}

impl Inventory {
    pub fn new(bulbs: u32, flashlights: u32) -> Self {
        Inventory {
            bulbs,
            flashlights,
            initial_bulbs: bulbs,
            initial_flashlights: flashlights,
        }
    }

    /// Debit one item. Returns false (and mutates nothing) at zero.
    pub fn take(&mut self, kind: SourceKind) -> bool {
        let counter = match kind {
            SourceKind::Bulb => &mut self.bulbs,
            SourceKind::Flashlight => &mut self.flashlights,
        };
        if *counter == 0 {
            return false;
        }
        *counter -= 1;
        true
    }

    /// Credit one item back (source removed from the board).
    pub fn give(&mut self, kind: SourceKind) {
        self.add(kind, 1);
    }

    pub fn add(&mut self, kind: SourceKind, amount: u32) {
        match kind {
            SourceKind::Bulb => self.bulbs += amount,
            SourceKind::Flashlight => self.flashlights += amount,
        }
    }

    /// Items spent since the level started (baseline minus current).
    pub fn used(&self, kind: SourceKind) -> u32 {
        match kind {
            SourceKind::Bulb => self.initial_bulbs.saturating_sub(self.bulbs),
            SourceKind::Flashlight => self.initial_flashlights.saturating_sub(self.flashlights),
        }
    }

    /// Level-clear reward for one kind: half the spent items rounded
    /// up, plus a flat bonus.
    pub fn level_reward(&self, kind: SourceKind, bonus: u32) -> u32 {
        self.used(kind).div_ceil(2) + bonus
    }

    /// Reset the baselines to the current counts (start of a new level).
    pub fn rebaseline(&mut self) {
        self.initial_bulbs = self.bulbs;
        self.initial_flashlights = self.flashlights;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_decrements() {
        let mut inv = Inventory::new(2, 1);
        assert!(inv.take(SourceKind::Bulb));
        assert_eq!(inv.bulbs, 1);
        assert!(inv.take(SourceKind::Flashlight));
        assert_eq!(inv.flashlights, 0);
    }

    #[test]
    fn take_at_zero_is_refused_and_unchanged() {
        let mut inv = Inventory::new(0, 0);
        assert!(!inv.take(SourceKind::Bulb));
        assert!(!inv.take(SourceKind::Flashlight));
        assert_eq!(inv.bulbs, 0);
        assert_eq!(inv.flashlights, 0);
    }

    #[test]
    fn give_credits_back() {
        let mut inv = Inventory::new(1, 0);
        inv.take(SourceKind::Bulb);
        inv.give(SourceKind::Bulb);
        assert_eq!(inv.bulbs, 1);
        inv.give(SourceKind::Flashlight);
        assert_eq!(inv.flashlights, 1);
    }

    #[test]
    fn reward_rounds_up_and_adds_bonus() {
        let mut inv = Inventory::new(10, 5);
        for _ in 0..3 {
            inv.take(SourceKind::Bulb);
        }
        inv.take(SourceKind::Flashlight);
        // used: 3 bulbs → ceil(3/2)=2, 1 flashlight → ceil(1/2)=1
        assert_eq!(inv.level_reward(SourceKind::Bulb, 6), 8);
        assert_eq!(inv.level_reward(SourceKind::Flashlight, 3), 4);
    }

    #[test]
    fn reward_with_nothing_used_is_just_the_bonus() {
        let inv = Inventory::new(10, 5);
        assert_eq!(inv.level_reward(SourceKind::Bulb, 6), 6);
        assert_eq!(inv.level_reward(SourceKind::Flashlight, 3), 3);
    }

    #[test]
    fn rebaseline_tracks_post_reward_counts() {
        let mut inv = Inventory::new(10, 5);
        inv.take(SourceKind::Bulb);
        inv.add(SourceKind::Bulb, 7);
        inv.rebaseline();
        assert_eq!(inv.initial_bulbs, 16);
        assert_eq!(inv.used(SourceKind::Bulb), 0);
    }
}
