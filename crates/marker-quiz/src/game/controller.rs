use crate::api::config::{QuizConfig, QuizSetup};
use crate::api::error::QuizResult;
use crate::api::types::{QuizEvent, RoundOutcome, Slot, TimerBand};
use crate::assets::catalog::{ElementCatalog, ElementDefinition};
use crate::assets::layout::LayoutTable;
use crate::core::scheduler::{Generation, Scheduler, Transition};
use crate::core::time::TickClock;
use crate::game::round::RoundState;
use crate::game::session::SessionState;
use crate::input::queue::TrackingEvent;
use crate::scene::builder::build_scene;
use crate::view::traits::QuizView;

/// Owns one quiz session: the round being played, the score, the countdown
/// clock and pending delayed transitions.
///
/// The controller is driven by tracking events and by `advance(dt)`, and
/// reports everything the player should see as `QuizEvent`s in its outbox.
pub struct RoundController {
    config: QuizConfig,
    catalog: ElementCatalog,
    layout: LayoutTable,
    round: RoundState,
    session: SessionState,
    clock: TickClock,
    scheduler: Scheduler,
    generation: Generation,
    scene_loaded: bool,
    events: Vec<QuizEvent>,
}

impl RoundController {
    /// Build a controller. The catalog is assumed valid; use `from_setup` for untrusted data.
    pub fn new(config: QuizConfig, catalog: ElementCatalog, layout: LayoutTable) -> Self {
        let clock = TickClock::new(config.tick_seconds);
        Self {
            config,
            catalog,
            layout,
            round: RoundState::default(),
            session: SessionState::new(),
            clock,
            scheduler: Scheduler::new(),
            generation: Generation::default(),
            scene_loaded: false,
            events: Vec::with_capacity(16),
        }
    }

    /// Validate setup data and build a controller from it.
    pub fn from_setup(setup: QuizSetup) -> QuizResult<Self> {
        setup.config.validate()?;
        setup.catalog.validate()?;
        let missing = setup
            .layout
            .missing_keys(setup.catalog.iter().flat_map(|e| e.parts.iter().map(|p| p.atom.as_str())));
        if !missing.is_empty() {
            log::warn!("Atoms without layout entries: {}", missing.join(", "));
        }
        Ok(Self::new(setup.config, setup.catalog, setup.layout))
    }

    // ---- Session lifecycle ----

    /// Reset score and progress and start the first element.
    pub fn start_session(&mut self) {
        self.scheduler.clear();
        self.clock.stop();
        self.session = SessionState::new();
        self.push(QuizEvent::ScoreChanged {
            score: 0,
            total: self.catalog.len() as u32,
        });
        log::info!("Session started with {} elements", self.catalog.len());
        self.start_round(0);
    }

    /// Abandon the current session and start over.
    pub fn restart(&mut self) {
        log::info!(
            "Restart requested (score {}/{})",
            self.session.total_score,
            self.catalog.len()
        );
        self.start_session();
    }

    /// Start the round for the element at `index`. Unknown indices are ignored.
    pub fn start_round(&mut self, index: usize) -> bool {
        let Some(element) = self.catalog.get(index).cloned() else {
            log::debug!("start_round: no element at index {}", index);
            return false;
        };

        // Invalidate the previous round's clock and pending transitions.
        self.clock.stop();
        self.generation = self.generation.next();
        self.scheduler.cancel_stale(self.generation);

        self.session.current_element_index = index;
        self.round = RoundState::begin(self.config.round_seconds, element.marker_count());

        if self.scene_loaded {
            self.push(QuizEvent::SceneUnloaded);
        }
        self.push(QuizEvent::RoundStarted {
            element: element.name.clone(),
            formula: element.formula(),
            required: element.marker_count(),
            round: index,
            total_rounds: self.catalog.len(),
        });
        let scene = build_scene(&element.parts, &self.layout, &self.config);
        self.push(QuizEvent::SceneLoaded(scene));
        self.scene_loaded = true;
        self.push_time();
        self.push_visible();

        self.clock.start();
        log::info!(
            "Round {} started: {} ({} markers, {}s)",
            index + 1,
            element.name,
            element.marker_count(),
            self.config.round_seconds
        );
        true
    }

    /// Start the round for the named element. Unknown names are ignored.
    pub fn select_element(&mut self, name: &str) -> bool {
        match self.catalog.position(name) {
            Some(index) => self.start_round(index),
            None => {
                log::debug!("select_element: unknown element '{}'", name);
                false
            }
        }
    }

    // ---- Round events ----

    /// One countdown step.
    pub fn on_tick(&mut self) {
        if !self.round.is_active() {
            return;
        }
        let expired = self.round.tick();
        self.push_time();
        if expired {
            self.end_round(false);
        }
    }

    /// The marker bound to `slot` became visible.
    pub fn on_marker_found(&mut self, slot: Slot) {
        if !self.round.is_active() {
            log::debug!("Ignoring found({}) outside an active round", slot);
            return;
        }
        self.round.visible_markers.insert(slot);
        self.push_visible();
        if self.round.is_complete() {
            self.end_round(true);
        }
    }

    /// The marker bound to `slot` is no longer visible.
    pub fn on_marker_lost(&mut self, slot: Slot) {
        if !self.round.is_active() {
            log::debug!("Ignoring lost({}) outside an active round", slot);
            return;
        }
        self.round.visible_markers.remove(&slot);
        self.push_visible();
    }

    /// Finish the current round. Calling it again has no further effect.
    pub fn end_round(&mut self, won: bool) {
        let outcome = RoundOutcome::from_won(won);
        if !self.round.finish(outcome) {
            return;
        }
        self.clock.stop();
        self.session.record(outcome);

        self.push(QuizEvent::RoundEnded { outcome });
        self.push(QuizEvent::ScoreChanged {
            score: self.session.total_score,
            total: self.catalog.len() as u32,
        });
        self.scheduler
            .schedule(self.config.advance_delay, Transition::Advance, self.generation);
        log::info!(
            "Round {} ended: {:?} (score {})",
            self.session.current_element_index + 1,
            outcome,
            self.session.total_score
        );
    }

    /// Dispatch one tracking event.
    pub fn handle(&mut self, event: TrackingEvent) {
        match event {
            TrackingEvent::TargetFound { slot } => self.on_marker_found(slot),
            TrackingEvent::TargetLost { slot } => self.on_marker_lost(slot),
            TrackingEvent::Restart => self.restart(),
        }
    }

    /// Advance time by `dt` seconds: due transitions first, then countdown ticks.
    /// A round started by a transition begins counting on the next frame.
    pub fn advance(&mut self, dt: f32) {
        let generation = self.generation;
        for transition in self.scheduler.tick(dt, generation) {
            if self.generation != generation {
                break;
            }
            self.fire(transition);
        }
        if self.generation != generation {
            return;
        }

        let ticks = self.clock.accumulate(dt);
        for _ in 0..ticks {
            self.on_tick();
            if !self.clock.is_running() {
                break;
            }
        }
    }

    fn fire(&mut self, transition: Transition) {
        match transition {
            Transition::Advance => match self.session.advance(self.catalog.len()) {
                Some(next) => {
                    self.start_round(next);
                }
                None => self.finish_session(),
            },
            Transition::OfferRestart => self.push(QuizEvent::RestartOffered),
        }
    }

    fn finish_session(&mut self) {
        self.clock.stop();
        let summary = self.session.final_score(self.catalog.len());
        log::info!(
            "Session finished: {}/{} ({}%)",
            summary.score,
            summary.total,
            summary.percentage
        );
        self.push(QuizEvent::SessionFinished(summary));
        self.scheduler
            .schedule(self.config.restart_delay, Transition::OfferRestart, self.generation);
    }

    // ---- Outbox ----

    fn push(&mut self, event: QuizEvent) {
        self.events.push(event);
    }

    fn push_time(&mut self) {
        let seconds = self.round.seconds_remaining;
        let band = TimerBand::classify(
            seconds,
            self.config.warning_seconds,
            self.config.critical_seconds,
        );
        self.push(QuizEvent::TimeChanged { seconds, band });
    }

    fn push_visible(&mut self) {
        self.push(QuizEvent::VisibleChanged {
            visible: self.round.visible_count(),
            required: self.round.required_marker_count,
        });
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand all pending events to a view, in emission order.
    pub fn flush_into<V: QuizView + ?Sized>(&mut self, view: &mut V) {
        for event in self.drain_events() {
            view.apply(&event);
        }
    }

    // ---- Accessors ----

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn current_element(&self) -> Option<&ElementDefinition> {
        self.catalog.get(self.session.current_element_index)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn pending_transitions(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_finished(&self) -> bool {
        self.session.finished
    }
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new(
            QuizConfig::default(),
            ElementCatalog::default(),
            LayoutTable::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Grade;
    use crate::game::round::RoundPhase;

    fn started() -> RoundController {
        let mut c = RoundController::default();
        c.start_session();
        c.drain_events();
        c
    }

    fn seconds(c: &mut RoundController, n: u32) {
        for _ in 0..n {
            c.advance(1.0);
        }
    }

    fn element_name(c: &RoundController) -> &str {
        &c.current_element().unwrap().name
    }

    #[test]
    fn start_session_emits_round_setup() {
        let mut c = RoundController::default();
        c.start_session();
        let events = c.drain_events();

        assert_eq!(events[0], QuizEvent::ScoreChanged { score: 0, total: 3 });
        assert!(matches!(
            &events[1],
            QuizEvent::RoundStarted { element, required: 2, round: 0, total_rounds: 3, .. }
                if element == "Agua"
        ));
        assert!(matches!(&events[2], QuizEvent::SceneLoaded(scene) if scene.anchors.len() == 2));
        assert_eq!(
            events[3],
            QuizEvent::TimeChanged { seconds: 30, band: TimerBand::Normal }
        );
        assert_eq!(events[4], QuizEvent::VisibleChanged { visible: 0, required: 2 });

        assert_eq!(c.round().phase, RoundPhase::Active);
        assert_eq!(c.round().seconds_remaining, 30);
    }

    #[test]
    fn water_won_with_two_markers() {
        let mut c = started();
        c.on_marker_found(1);
        assert!(c.round().is_active());
        c.on_marker_found(2);

        assert!(c.round().is_ended());
        assert_eq!(c.round().outcome, Some(RoundOutcome::Won));
        assert_eq!(c.session().total_score, 1);

        let events = c.drain_events();
        assert!(events.contains(&QuizEvent::RoundEnded { outcome: RoundOutcome::Won }));
        assert!(events.contains(&QuizEvent::ScoreChanged { score: 1, total: 3 }));

        // Next element loads after the advance delay.
        c.advance(1.0);
        assert_eq!(element_name(&c), "Agua");
        c.advance(1.0);
        assert_eq!(element_name(&c), "Metano");
        assert!(c.round().is_active());
        let events = c.drain_events();
        assert_eq!(events[0], QuizEvent::SceneUnloaded);
    }

    #[test]
    fn timeout_after_thirty_ticks() {
        let mut c = started();
        seconds(&mut c, 29);
        assert!(c.round().is_active());
        assert_eq!(c.round().seconds_remaining, 1);
        c.advance(1.0);
        assert_eq!(c.round().outcome, Some(RoundOutcome::TimedOut));
        assert_eq!(c.round().seconds_remaining, 0);
        assert_eq!(c.session().total_score, 0);
    }

    #[test]
    fn seconds_decrease_by_one_per_tick_and_clamp() {
        let mut c = started();
        let mut last = c.round().seconds_remaining;
        for _ in 0..40 {
            c.on_tick();
            let now = c.round().seconds_remaining;
            if c.round().is_active() {
                assert_eq!(now, last - 1);
            }
            assert!(now <= last);
            last = now;
        }
        assert_eq!(c.round().seconds_remaining, 0);
    }

    #[test]
    fn lost_and_refound_still_wins() {
        let mut c = started();
        c.on_marker_found(1);
        c.on_marker_lost(1);
        assert_eq!(c.round().visible_count(), 0);
        c.on_marker_found(1);
        assert!(c.round().is_active());
        c.on_marker_found(2);
        assert_eq!(c.round().outcome, Some(RoundOutcome::Won));
    }

    #[test]
    fn duplicate_found_is_idempotent() {
        let mut c = started();
        c.on_marker_found(0);
        c.on_marker_found(0);
        c.on_marker_found(0);
        assert_eq!(c.round().visible_count(), 1);
        assert!(c.round().is_active());
    }

    #[test]
    fn any_distinct_indices_count_toward_the_win() {
        let mut c = started();
        c.on_marker_found(7);
        assert_eq!(c.round().visible_count(), 1);
        assert!(c.round().is_active());
        c.on_marker_found(0);
        assert_eq!(c.round().outcome, Some(RoundOutcome::Won));
        assert_eq!(c.round().visible_count(), 2);
    }

    #[test]
    fn end_round_is_idempotent() {
        let mut once = started();
        once.end_round(true);
        let once_events = once.drain_events();

        let mut twice = started();
        twice.end_round(true);
        twice.end_round(true);
        twice.end_round(false);
        let twice_events = twice.drain_events();

        assert_eq!(once_events, twice_events);
        assert_eq!(twice.session().total_score, 1);
        assert_eq!(twice.pending_transitions(), 1);
    }

    #[test]
    fn events_while_ended_are_ignored() {
        let mut c = started();
        c.on_marker_found(0);
        c.on_marker_found(1);
        c.drain_events();

        c.on_marker_lost(0);
        c.on_marker_found(0);
        c.on_tick();
        assert!(c.drain_events().is_empty());
        assert_eq!(c.round().visible_count(), 2);
        assert_eq!(c.session().total_score, 1);
    }

    #[test]
    fn clock_stops_when_round_ends() {
        let mut c = started();
        c.on_marker_found(0);
        c.on_marker_found(1);
        c.drain_events();
        c.advance(1.0);
        assert!(!c
            .drain_events()
            .iter()
            .any(|e| matches!(e, QuizEvent::TimeChanged { .. })));
    }

    #[test]
    fn score_equals_rounds_won() {
        let mut c = started();
        // Round 1: win.
        c.on_marker_found(0);
        c.on_marker_found(1);
        seconds(&mut c, 2);
        // Round 2: time out.
        seconds(&mut c, 30);
        seconds(&mut c, 2);
        // Round 3: win.
        assert_eq!(element_name(&c), "Dióxido de Carbono");
        c.on_marker_found(1);
        c.on_marker_found(0);

        assert_eq!(c.session().rounds_played, 3);
        assert_eq!(c.session().total_score, 2);
    }

    #[test]
    fn last_round_leads_to_final_score_and_restart_offer() {
        let mut c = started();
        for _ in 0..3 {
            c.on_marker_found(0);
            c.on_marker_found(1);
            seconds(&mut c, 2);
        }
        assert!(c.is_finished());
        let events = c.drain_events();
        let summary = events.iter().find_map(|e| match e {
            QuizEvent::SessionFinished(s) => Some(*s),
            _ => None,
        });
        let summary = summary.expect("final score should be emitted");
        assert_eq!(summary.score, 3);
        assert_eq!(summary.percentage, 100);
        assert_eq!(summary.grade, Grade::Perfect);
        assert!(!events.contains(&QuizEvent::RestartOffered));

        seconds(&mut c, 2);
        assert_eq!(c.drain_events(), vec![QuizEvent::RestartOffered]);
    }

    #[test]
    fn restart_invalidates_pending_transition() {
        let mut c = started();
        c.on_marker_found(0);
        c.on_marker_found(1);
        assert_eq!(c.pending_transitions(), 1);

        c.restart();
        assert_eq!(c.pending_transitions(), 0);
        assert_eq!(c.session().total_score, 0);
        assert_eq!(element_name(&c), "Agua");

        // The old advance must not skip the restarted round.
        seconds(&mut c, 3);
        assert_eq!(element_name(&c), "Agua");
        assert!(c.round().is_active());
        assert_eq!(c.round().seconds_remaining, 27);
    }

    #[test]
    fn restart_after_finish_starts_over() {
        let mut c = started();
        for _ in 0..3 {
            seconds(&mut c, 30);
            seconds(&mut c, 2);
        }
        assert!(c.is_finished());
        c.handle(TrackingEvent::Restart);
        assert!(!c.is_finished());
        assert!(c.round().is_active());
        assert_eq!(c.session().current_element_index, 0);
    }

    #[test]
    fn starting_a_round_resets_the_countdown() {
        let mut c = started();
        c.advance(0.5);
        seconds(&mut c, 5);
        c.start_round(1);
        assert_eq!(c.round().seconds_remaining, 30);
        c.advance(0.75);
        assert_eq!(c.round().seconds_remaining, 30);
        c.advance(0.25);
        assert_eq!(c.round().seconds_remaining, 29);
    }

    #[test]
    fn unknown_element_is_a_noop() {
        let mut c = started();
        let generation = c.generation();
        assert!(!c.select_element("Oro"));
        assert!(!c.start_round(99));
        assert_eq!(c.generation(), generation);
        assert!(c.drain_events().is_empty());
        assert!(c.select_element("Metano"));
        assert_eq!(c.round().required_marker_count, 2);
    }

    #[test]
    fn handle_dispatches_tracking_events() {
        let mut c = started();
        c.handle(TrackingEvent::TargetFound { slot: 0 });
        c.handle(TrackingEvent::TargetLost { slot: 0 });
        c.handle(TrackingEvent::TargetFound { slot: 1 });
        assert_eq!(c.round().visible_markers.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn timer_band_follows_countdown() {
        let mut c = started();
        seconds(&mut c, 10);
        let events = c.drain_events();
        assert_eq!(
            events.last(),
            Some(&QuizEvent::TimeChanged { seconds: 20, band: TimerBand::Warning })
        );
        seconds(&mut c, 10);
        assert_eq!(
            c.drain_events().last(),
            Some(&QuizEvent::TimeChanged { seconds: 10, band: TimerBand::Critical })
        );
    }

    #[test]
    fn flush_into_view_preserves_order() {
        let mut c = RoundController::default();
        c.start_session();
        let mut seen: Vec<QuizEvent> = Vec::new();
        c.flush_into(&mut seen);
        assert_eq!(seen.len(), 5);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn from_setup_rejects_invalid_catalog() {
        let setup = QuizSetup {
            catalog: ElementCatalog { elements: vec![] },
            ..QuizSetup::default()
        };
        assert!(RoundController::from_setup(setup).is_err());
    }
}
