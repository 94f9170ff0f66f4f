use marker_quiz::{QuizEvent, QuizResult, QuizSetup, RoundController, TrackingEvent, TrackingQueue};

/// Wires the round controller to the browser frame loop.
///
/// DOM callbacks only push into the tracking queue; `tick` drains it, advances
/// time and hands back the events the view has to render. Nothing here touches
/// web-sys, so the runner is exercised on the host in tests.
pub struct QuizRunner {
    controller: RoundController,
    queue: TrackingQueue,
    initialized: bool,
}

impl QuizRunner {
    pub fn new(controller: RoundController) -> Self {
        Self {
            controller,
            queue: TrackingQueue::new(),
            initialized: false,
        }
    }

    pub fn from_setup(setup: QuizSetup) -> QuizResult<Self> {
        Ok(Self::new(RoundController::from_setup(setup)?))
    }

    /// Start the first round. Call once after construction.
    pub fn init(&mut self) -> Vec<QuizEvent> {
        self.controller.start_session();
        self.initialized = true;
        self.controller.drain_events()
    }

    /// Queue a tracking event for the next tick.
    pub fn push(&mut self, event: TrackingEvent) {
        self.queue.push(event);
    }

    /// Run one frame: dispatch queued events, then advance time by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Vec<QuizEvent> {
        if !self.initialized {
            return Vec::new();
        }
        for event in self.queue.drain() {
            self.controller.handle(event);
        }
        self.controller.advance(dt);
        self.controller.drain_events()
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn score(&self) -> u32 {
        self.controller.session().total_score
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.controller.round().seconds_remaining
    }

    pub fn current_element(&self) -> String {
        self.controller
            .current_element()
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }
}
