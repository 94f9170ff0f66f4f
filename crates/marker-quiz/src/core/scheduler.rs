// core/scheduler.rs
//
// Delayed transitions tagged with a generation.
// A restart or a new round bumps the generation; anything scheduled under an
// older generation is discarded instead of fired.
//
// Usage:
//   let mut sched = Scheduler::new();
//   sched.schedule(2.0, Transition::Advance, generation);
//   for t in sched.tick(dt, generation) { ... }

/// What to do when a delayed task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move on to the next element or to the final score.
    Advance,
    /// Show the restart button on the final score screen.
    OfferRestart,
}

/// Monotonic counter identifying the round/session a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u32);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone)]
struct Task {
    remaining: f32,
    transition: Transition,
    generation: Generation,
}

/// One-shot delayed transitions, fired in due order.
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: Vec::with_capacity(4),
        }
    }

    /// Schedule `transition` to fire after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, transition: Transition, generation: Generation) {
        self.tasks.push(Task {
            remaining: delay.max(0.0),
            transition,
            generation,
        });
    }

    /// Drop every task not belonging to `current`.
    pub fn cancel_stale(&mut self, current: Generation) {
        self.tasks.retain(|t| t.generation == current);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Advance time. Returns due transitions of the `current` generation,
    /// earliest first. Due tasks of other generations are dropped silently.
    pub fn tick(&mut self, dt: f32, current: Generation) -> Vec<Transition> {
        let mut due: Vec<Task> = Vec::new();
        self.tasks.retain_mut(|task| {
            task.remaining -= dt;
            if task.remaining <= 0.0 {
                due.push(task.clone());
                false
            } else {
                true
            }
        });

        // Most overdue first; stable sort keeps scheduling order on ties.
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));

        due.into_iter()
            .filter(|task| {
                let fresh = task.generation == current;
                if !fresh {
                    log::debug!(
                        "Discarding stale {:?} from generation {}",
                        task.transition,
                        task.generation.0
                    );
                }
                fresh
            })
            .map(|task| task.transition)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
