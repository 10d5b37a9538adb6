//! Turn controller for one expedition.
//!
//! A [`Session`] owns the lake, the equipment arena, the researchers and the
//! goal set. It advances only through [`Session::apply`], a transition from
//! the current [`Phase`] and an [`Action`] to a list of [`SessionEvent`]s:
//!
//! ```text
//! BeforeLake --BeginTurn--> Entrance --Take(None)--> InLake --Exit--> BeforeLake (next researcher)
//!      |                      |  ^                      |
//!      |                      Take(Some)                Move / UseInstrument
//!      +------------------------+-----------------------+--> Finished(Outcome)
//! ```
//!
//! Rejected actions return a recoverable [`LakeError`] and change nothing.
//! [`Session::run`] drives the machine through a [`Prompter`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, LakeConfig};
use crate::error::LakeError;
use crate::generation::generate_map;
use crate::goals::Goals;
use crate::grid::{Direction, Grid, Position};
use crate::instrument::{self, InstrumentUse, Readings, RngReadings};
use crate::item::{EquipmentId, EquipmentKind, EquipmentStore, InstrumentKind};
use crate::movement::{self, SlideReport};
use crate::researcher::{Researcher, ResearcherId};
use crate::snapshot::SessionSnapshot;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    ResearcherInjured,
    GoalsAccomplished,
    /// The pool no longer holds an instrument for some outstanding goal.
    EquipmentExhausted,
    /// Every researcher had a turn and goals remain.
    ExperimentsIncomplete,
}

impl Outcome {
    /// Stable numeric code for the surrounding program.
    pub fn code(self) -> u8 {
        match self {
            Outcome::ResearcherInjured => 0,
            Outcome::GoalsAccomplished => 1,
            Outcome::EquipmentExhausted => 2,
            Outcome::ExperimentsIncomplete => 3,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::ResearcherInjured => {
                "The researcher was injured and that's why the game is over!"
            }
            Outcome::GoalsAccomplished => "Research goal(s) have been accomplished.",
            Outcome::EquipmentExhausted => {
                "There is no equipment left to finish the game, the game is over!"
            }
            Outcome::ExperimentsIncomplete => {
                "The given experiments weren't finished, the game is over!"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The current researcher waits before choosing equipment.
    BeforeLake,
    /// Choosing equipment from the pool.
    Entrance,
    InLake,
    Finished(Outcome),
}

/// Player input, already validated by the prompt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    BeginTurn,
    /// Take one piece of this kind, or `None` to head out to the lake.
    Take(Option<EquipmentKind>),
    Move(Direction),
    /// Use a held instrument, named by its equipment code.
    UseInstrument(EquipmentKind),
    /// Leave the lake at the entry cell, or yield anywhere else.
    Exit,
}

/// In-lake menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InLakeChoice {
    Move,
    UseInstrument,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    TurnBegan(ResearcherId),
    Took {
        researcher: ResearcherId,
        kind: EquipmentKind,
        equipment: EquipmentId,
    },
    HeadedOut(ResearcherId),
    Slid(SlideReport),
    InstrumentUsed {
        researcher: ResearcherId,
        result: InstrumentUse,
        goal_finished: bool,
    },
    /// Left through the entrance; equipment went back to the pool.
    Exited {
        researcher: ResearcherId,
        returned: Vec<EquipmentId>,
    },
    /// Stayed on the ice and handed over to the next researcher.
    Yielded {
        researcher: ResearcherId,
        at: Position,
    },
    Finished(Outcome),
}

/// Read-only state handed to a [`Prompter`].
pub struct TurnView<'a> {
    pub researcher: &'a Researcher,
    pub position: Option<Position>,
    pub at_entry: bool,
    pub grid: &'a Grid,
    pub store: &'a EquipmentStore,
    pub goals: &'a Goals,
}

/// Source of validated player input.
pub trait Prompter {
    /// Equipment to take, or `None` for the "no" sentinel.
    fn equipment_code(&mut self, view: &TurnView<'_>) -> Option<EquipmentKind>;
    fn direction(&mut self, view: &TurnView<'_>) -> Direction;
    fn menu_choice(&mut self, view: &TurnView<'_>) -> InLakeChoice;
    /// Equipment code of the instrument to use.
    fn instrument_code(&mut self, view: &TurnView<'_>) -> EquipmentKind;

    fn notify(&mut self, _event: &SessionEvent) {}
    fn rejected(&mut self, _error: &LakeError) {}
}

pub struct Session<R: Rng = StdRng> {
    config: LakeConfig,
    grid: Grid,
    store: EquipmentStore,
    researchers: Vec<Researcher>,
    current: usize,
    goals: Goals,
    phase: Phase,
    must_move: bool,
    rng: R,
    readings: Option<Box<dyn Readings>>,
}

impl Session<StdRng> {
    pub fn with_seed(config: LakeConfig, seed: u64) -> Result<Self, LakeError> {
        Session::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    /// Generate a lake, draw researchers and goals, and place the first
    /// researcher at the entry cell.
    pub fn new(config: LakeConfig, mut rng: R) -> Result<Self, LakeError> {
        let config = config.validated()?;
        let grid = generate_map(&config, &mut rng)?;
        let count = *config
            .researcher_counts
            .choose(&mut rng)
            .ok_or(LakeError::InvalidConfig(vec![ConfigError::NoResearcherCounts]))?;
        let goal_count = if rng.gen_bool(0.5) { count } else { count - 1 };
        let goal_count = (goal_count as usize).clamp(1, InstrumentKind::ALL.len());
        let goals: Vec<InstrumentKind> = InstrumentKind::ALL
            .choose_multiple(&mut rng, goal_count)
            .copied()
            .collect();
        Self::from_parts(config, grid, count, goals, rng)
    }

    /// Build a session around an existing lake and goal set.
    pub fn from_parts(
        config: LakeConfig,
        grid: Grid,
        researcher_count: u32,
        goals: impl IntoIterator<Item = InstrumentKind>,
        rng: R,
    ) -> Result<Self, LakeError> {
        let researchers = (1..=researcher_count.max(1))
            .map(|id| Researcher::new(id, config.bag_capacity))
            .collect::<Result<Vec<_>, _>>()?;
        let mut session = Self {
            store: EquipmentStore::with_pool(config.pool_copies_per_kind),
            grid,
            researchers,
            current: 0,
            goals: Goals::new(goals),
            phase: Phase::BeforeLake,
            must_move: false,
            rng,
            readings: None,
            config,
        };
        let first = session.researchers[0].id();
        session.grid.place_occupant(session.grid.entry_cell(), first)?;
        log::info!(
            "session ready: {} researchers, goals {:?}",
            session.researchers.len(),
            session.goals.outstanding().collect::<Vec<_>>()
        );
        Ok(session)
    }

    /// Replace the random measurement source.
    pub fn set_readings(&mut self, readings: Box<dyn Readings>) {
        self.readings = Some(readings);
    }

    pub fn config(&self) -> &LakeConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn store(&self) -> &EquipmentStore {
        &self.store
    }

    pub fn researchers(&self) -> &[Researcher] {
        &self.researchers
    }

    pub fn current_researcher(&self) -> &Researcher {
        &self.researchers[self.current]
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Whether the next in-lake action must be a move. A researcher boxed
    /// in on all four sides is let off and may exit instead.
    pub fn must_move(&self) -> bool {
        self.must_move && !self.boxed_in()
    }

    /// Whether every direction is blocked on the first step.
    pub fn boxed_in(&self) -> bool {
        let Some(at) = self.grid.find_occupant(self.current_researcher().id()) else {
            return false;
        };
        Direction::ALL
            .iter()
            .all(|&dir| movement::plan_slide(&self.grid, at, dir).is_err())
    }

    pub fn view(&self) -> TurnView<'_> {
        let researcher = self.current_researcher();
        let position = self.grid.find_occupant(researcher.id());
        TurnView {
            researcher,
            position,
            at_entry: position == Some(self.grid.entry_cell()),
            grid: &self.grid,
            store: &self.store,
            goals: &self.goals,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    /// Whether the pool still holds an instrument for every outstanding goal.
    pub fn goals_reachable(&self) -> bool {
        self.goals
            .outstanding()
            .all(|kind| self.store.pool_count(EquipmentKind::Instrument(kind)) > 0)
    }

    /// Apply one action. On error nothing has changed.
    pub fn apply(&mut self, action: Action) -> Result<Vec<SessionEvent>, LakeError> {
        let mut events = match (self.phase, action) {
            (Phase::BeforeLake, Action::BeginTurn) => self.begin_turn(),
            (Phase::Entrance, Action::Take(Some(kind))) => self.take(kind)?,
            (Phase::Entrance, Action::Take(None)) => self.head_out()?,
            (Phase::InLake, Action::Move(dir)) => self.slide(dir)?,
            (Phase::InLake, Action::UseInstrument(kind)) => self.use_instrument(kind)?,
            (Phase::InLake, Action::Exit) => self.exit()?,
            (phase, _) => return Err(LakeError::WrongPhase(phase)),
        };
        if let Some(outcome) = self.terminal_check() {
            events.push(self.finish(outcome));
        }
        Ok(events)
    }

    /// Drive the session to its end, re-prompting after recoverable errors.
    pub fn run(
        &mut self,
        prompter: &mut dyn Prompter,
        max_actions: usize,
    ) -> Result<Outcome, LakeError> {
        let mut steps = 0;
        loop {
            if let Phase::Finished(outcome) = self.phase {
                return Ok(outcome);
            }
            if steps >= max_actions {
                return Err(LakeError::ActionBudgetExhausted(max_actions));
            }
            steps += 1;

            let result = self
                .next_action(prompter)
                .and_then(|action| self.apply(action));
            match result {
                Ok(events) => {
                    for event in &events {
                        prompter.notify(event);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    log::debug!("{}: {}", self.current_researcher().id(), e);
                    prompter.rejected(&e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn next_action(&self, prompter: &mut dyn Prompter) -> Result<Action, LakeError> {
        let view = self.view();
        let action = match self.phase {
            Phase::BeforeLake => Action::BeginTurn,
            Phase::Entrance => Action::Take(prompter.equipment_code(&view)),
            Phase::InLake if self.must_move() => Action::Move(prompter.direction(&view)),
            Phase::InLake => match prompter.menu_choice(&view) {
                InLakeChoice::Move => Action::Move(prompter.direction(&view)),
                InLakeChoice::UseInstrument => {
                    if !view.researcher.bag().has_instrument() {
                        return Err(LakeError::NoResearchInstrument);
                    }
                    Action::UseInstrument(prompter.instrument_code(&view))
                }
                InLakeChoice::Exit => Action::Exit,
            },
            Phase::Finished(_) => return Err(LakeError::WrongPhase(self.phase)),
        };
        Ok(action)
    }

    // ── Transitions ─────────────────────────────────────────────────────

    fn begin_turn(&mut self) -> Vec<SessionEvent> {
        let id = self.current_researcher().id();
        if !self.goals_reachable() {
            return vec![self.finish(Outcome::EquipmentExhausted)];
        }
        self.phase = Phase::Entrance;
        log::info!("{id} waits at the entrance");
        vec![SessionEvent::TurnBegan(id)]
    }

    fn take(&mut self, kind: EquipmentKind) -> Result<Vec<SessionEvent>, LakeError> {
        let equipment = self
            .store
            .find_in_pool(kind)
            .ok_or(LakeError::PoolExhausted(kind))?;
        let researcher = &mut self.researchers[self.current];
        researcher.take_from_pool(&mut self.store, equipment)?;
        log::debug!("{} took {}", researcher.id(), kind.code());
        Ok(vec![SessionEvent::Took {
            researcher: researcher.id(),
            kind,
            equipment,
        }])
    }

    fn head_out(&mut self) -> Result<Vec<SessionEvent>, LakeError> {
        let researcher = self.current_researcher();
        if researcher.bag().is_empty() {
            return Err(LakeError::EmptyBag);
        }
        let id = researcher.id();
        self.phase = Phase::InLake;
        self.must_move = true;
        log::info!("{id} heads out to the lake");
        Ok(vec![SessionEvent::HeadedOut(id)])
    }

    fn slide(&mut self, dir: Direction) -> Result<Vec<SessionEvent>, LakeError> {
        let researcher = &mut self.researchers[self.current];
        let report = researcher.slide(dir, &mut self.grid, &mut self.store)?;
        self.must_move = false;
        Ok(vec![SessionEvent::Slid(report)])
    }

    fn use_instrument(&mut self, kind: EquipmentKind) -> Result<Vec<SessionEvent>, LakeError> {
        if self.must_move {
            return Err(LakeError::MustMoveFirst);
        }
        let researcher = &mut self.researchers[self.current];
        if !researcher.bag().has_instrument() {
            return Err(LakeError::NoResearchInstrument);
        }
        let instrument = kind.as_instrument().ok_or(LakeError::NotHeld(kind))?;
        let odds = self.config.camera_odds;
        let result = match self.readings.as_mut() {
            Some(readings) => instrument::use_instrument(
                researcher,
                instrument,
                &mut self.grid,
                &mut self.store,
                &mut **readings,
                odds,
            )?,
            None => instrument::use_instrument(
                researcher,
                instrument,
                &mut self.grid,
                &mut self.store,
                &mut RngReadings(&mut self.rng),
                odds,
            )?,
        };
        let goal_finished = self.goals.finish(instrument, result.message.clone());
        if goal_finished {
            log::info!("goal finished: {}", result.message);
        }
        Ok(vec![SessionEvent::InstrumentUsed {
            researcher: researcher.id(),
            result,
            goal_finished,
        }])
    }

    fn exit(&mut self) -> Result<Vec<SessionEvent>, LakeError> {
        if self.must_move() {
            return Err(LakeError::MustMoveFirst);
        }
        let entry = self.grid.entry_cell();
        let researcher = &mut self.researchers[self.current];
        let id = researcher.id();
        let at = self.grid.find_occupant(id).ok_or(LakeError::Grid {
            at: entry,
            reason: "researcher is not on the grid",
        })?;

        let mut events = Vec::new();
        if at == entry {
            self.grid.clear_occupant(at);
            let returned = researcher.return_to_pool(&mut self.store);
            log::info!("{id} left the lake, returned {} items", returned.len());
            events.push(SessionEvent::Exited {
                researcher: id,
                returned,
            });
        } else {
            log::info!("{id} sits down at {at}");
            events.push(SessionEvent::Yielded { researcher: id, at });
        }
        events.extend(self.advance()?);
        Ok(events)
    }

    /// Hand over to the next researcher in the queue.
    fn advance(&mut self) -> Result<Vec<SessionEvent>, LakeError> {
        if self.current + 1 >= self.researchers.len() {
            return Ok(vec![self.finish(Outcome::ExperimentsIncomplete)]);
        }
        self.current += 1;
        self.must_move = false;
        let id = self.researchers[self.current].id();
        self.grid.place_occupant(self.grid.entry_cell(), id)?;

        if !self.goals_reachable() {
            return Ok(vec![self.finish(Outcome::EquipmentExhausted)]);
        }
        self.phase = Phase::BeforeLake;
        Ok(Vec::new())
    }

    fn terminal_check(&self) -> Option<Outcome> {
        if matches!(self.phase, Phase::Finished(_)) {
            return None;
        }
        if !self.current_researcher().is_alive() {
            Some(Outcome::ResearcherInjured)
        } else if self.goals.is_complete() {
            Some(Outcome::GoalsAccomplished)
        } else {
            None
        }
    }

    fn finish(&mut self, outcome: Outcome) -> SessionEvent {
        self.phase = Phase::Finished(outcome);
        log::info!("session finished: {:?} (code {})", outcome, outcome.code());
        SessionEvent::Finished(outcome)
    }
}
