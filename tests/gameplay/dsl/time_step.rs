//! Steps of a [`SessionDriver`] and their builder.

use riff_hero::{
    input::InputKey,
    play::session::{Feedback, Session},
    rng::RngMock,
};

use super::driver::SessionDriver;

/// The session type every driver runs.
pub type TestSession = Session<RngMock<1>>;

type StateAssertion = Box<dyn Fn(&TestSession)>;
type FeedbackAssertion = Box<dyn Fn(&[Feedback])>;
type ControlAction = Box<dyn FnOnce(&mut TestSession, f64)>;

/// One tick at a song time, with what happens around it.
pub struct Step {
    /// Song time of the tick in seconds.
    pub time: f64,
    /// Run before the tick, with the step's time.
    pub control_actions: Vec<ControlAction>,
    /// Run after the tick.
    pub state_assertions: Vec<StateAssertion>,
    /// Run after the tick on the feedback queued during the step.
    pub feedback_assertions: Vec<FeedbackAssertion>,
}

impl Step {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            control_actions: Vec::new(),
            state_assertions: Vec::new(),
            feedback_assertions: Vec::new(),
        }
    }
}

/// Fluent builder over the last step of a driver.
pub struct StepBuilder<'a> {
    driver: &'a mut SessionDriver,
}

impl<'a> StepBuilder<'a> {
    pub(super) const fn new(driver: &'a mut SessionDriver) -> Self {
        Self { driver }
    }

    fn step(&mut self) -> &mut Step {
        self.driver
            .steps
            .last_mut()
            .expect("a builder always has a step")
    }

    /// Presses `key` at the step's time, before the tick.
    #[must_use]
    pub fn press(mut self, key: InputKey) -> Self {
        self.step()
            .control_actions
            .push(Box::new(move |session, time| session.press(key, time)));
        self
    }

    /// Releases `key` before the tick.
    #[must_use]
    pub fn release(mut self, key: InputKey) -> Self {
        self.step()
            .control_actions
            .push(Box::new(move |session, _| session.release(key)));
        self
    }

    /// Checks the session after the tick.
    #[must_use]
    pub fn view<F>(mut self, assertion: F) -> Self
    where
        F: Fn(&TestSession) + 'static,
    {
        self.step().state_assertions.push(Box::new(assertion));
        self
    }

    /// Checks the feedback queued during this step.
    #[must_use]
    pub fn feedback<F>(mut self, assertion: F) -> Self
    where
        F: Fn(&[Feedback]) + 'static,
    {
        self.step().feedback_assertions.push(Box::new(assertion));
        self
    }

    /// Asserts that nothing was queued during this step.
    #[must_use]
    pub fn quiet(self) -> Self {
        self.feedback(|feedback| assert!(feedback.is_empty(), "unexpected {feedback:?}"))
    }

    /// Chain: the next step at song time `time`.
    #[must_use]
    pub fn at(self, time: f64) -> Self {
        self.driver.at(time)
    }

    /// Chain: the next step `secs` after this one.
    #[must_use]
    pub fn past(self, secs: f64) -> Self {
        self.driver.past(secs)
    }

    /// Chain: steps every `interval` seconds up to and including `until`.
    #[must_use]
    pub fn sweep(self, until: f64, interval: f64) -> Self {
        self.driver.sweep(until, interval)
    }

    /// Completes the builder and returns the driver.
    #[must_use]
    pub const fn then(self) -> &'a mut SessionDriver {
        self.driver
    }

    /// Runs every step.
    pub fn run(self) {
        self.driver.run_mut();
    }
}
