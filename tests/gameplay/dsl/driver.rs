//! The session driver.

use gametime::TimeSpan;
use riff_hero::{config::GameConfig, play::session::Session, rng::RngMock, timeline::Timeline};

use super::time_step::{Step, StepBuilder, TestSession};

/// Runs a session through scripted song-time steps.
pub struct SessionDriver {
    session: Option<TestSession>,
    step_span: TimeSpan,
    pub(super) steps: Vec<Step>,
}

impl SessionDriver {
    /// Starts a session of `timeline` with `config`.
    pub fn new(config: GameConfig, timeline: &Timeline) -> Self {
        let step_span = config.timing.update_interval;
        let mut session = Session::new(config, RngMock([0]));
        session.start(timeline);
        Self {
            session: Some(session),
            step_span,
            steps: Vec::new(),
        }
    }

    fn cursor(&self) -> f64 {
        self.steps.last().map_or(0.0, |step| step.time)
    }

    /// A step at song time `time`.
    pub fn at(&mut self, time: f64) -> StepBuilder<'_> {
        self.steps.push(Step::new(time));
        StepBuilder::new(self)
    }

    /// A step `secs` after the previous one.
    pub fn past(&mut self, secs: f64) -> StepBuilder<'_> {
        let time = self.cursor() + secs;
        self.at(time)
    }

    /// Steps every `interval` seconds after the previous one, up to and including `until`.
    ///
    /// The builder points at the last of them.
    pub fn sweep(&mut self, until: f64, interval: f64) -> StepBuilder<'_> {
        let start = self.cursor();
        let mut index = 1.0;
        while start + index * interval <= until {
            self.steps.push(Step::new(start + index * interval));
            index += 1.0;
        }
        StepBuilder::new(self)
    }

    /// Runs every step.
    ///
    /// # Panics
    ///
    /// Panics if any assertion fails or the driver already ran.
    pub fn run(mut self) {
        self.run_mut();
    }

    pub(super) fn run_mut(&mut self) {
        let mut session = self.session.take().expect("session already consumed");
        for step in &mut self.steps {
            for action in std::mem::take(&mut step.control_actions) {
                action(&mut session, step.time);
            }
            session.tick(step.time, self.step_span);
            let feedback = session.drain_feedback();
            for assertion in &step.state_assertions {
                assertion(&session);
            }
            for assertion in &step.feedback_assertions {
                assertion(&feedback);
            }
        }
    }
}
