//! Seeded random player used for headless autoplay.

use std::collections::BTreeMap;

use frostlake_logic::grid::Direction;
use frostlake_logic::item::EquipmentKind;
use frostlake_logic::session::{InLakeChoice, Prompter, SessionEvent, TurnView};
use frostlake_logic::LakeError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const MENU: [InLakeChoice; 3] = [
    InLakeChoice::Move,
    InLakeChoice::UseInstrument,
    InLakeChoice::Exit,
];

/// Plays random but well-formed inputs and tallies what happened.
pub struct RandomPrompter {
    rng: StdRng,
    /// Chance of heading out once the bag holds something.
    head_out_chance: f64,
    pub events: usize,
    pub rejections: BTreeMap<String, usize>,
}

impl RandomPrompter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            head_out_chance: 0.4,
            events: 0,
            rejections: BTreeMap::new(),
        }
    }
}

impl Prompter for RandomPrompter {
    fn equipment_code(&mut self, view: &TurnView<'_>) -> Option<EquipmentKind> {
        if !view.researcher.bag().is_empty() && self.rng.gen_bool(self.head_out_chance) {
            return None;
        }
        // Prefer instruments for goals that are still open.
        let wanted: Vec<EquipmentKind> = view
            .goals
            .outstanding()
            .map(EquipmentKind::Instrument)
            .filter(|k| view.store.pool_count(*k) > 0)
            .collect();
        if !wanted.is_empty() && self.rng.gen_bool(0.5) {
            return wanted.choose(&mut self.rng).copied();
        }
        EquipmentKind::ALL.choose(&mut self.rng).copied()
    }

    fn direction(&mut self, _view: &TurnView<'_>) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }

    fn menu_choice(&mut self, _view: &TurnView<'_>) -> InLakeChoice {
        MENU[self.rng.gen_range(0..MENU.len())]
    }

    fn instrument_code(&mut self, view: &TurnView<'_>) -> EquipmentKind {
        let held: Vec<EquipmentKind> = view.researcher.bag().iter().map(|e| e.kind).collect();
        match held.choose(&mut self.rng) {
            Some(kind) => *kind,
            None => EquipmentKind::ALL[self.rng.gen_range(0..EquipmentKind::ALL.len())],
        }
    }

    fn notify(&mut self, event: &SessionEvent) {
        self.events += 1;
        log::trace!("{event:?}");
    }

    fn rejected(&mut self, error: &LakeError) {
        *self.rejections.entry(error.to_string()).or_insert(0) += 1;
    }
}
