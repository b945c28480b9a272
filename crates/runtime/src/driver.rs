//! Session driver - the async event loop around a [`Session`].
//!
//! The driver owns every timer the session needs:
//!
//! - gravity and the one-second game clock, armed only while the session
//!   reports [`Session::timers_armed`] and restarted from zero on re-arm
//! - the 30 second answer countdown, with tick and urgent cues near the end
//!   and an automatic empty submission when it runs out
//! - the explanation dwell between submitting and resuming play
//!
//! Question fetches run on the blocking pool and report back with their
//! ticket, so a restart in the meantime simply makes the result stale.
//! Every state change is published on a `watch` channel as a [`DriverView`].

use std::future;
use std::io;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::{
    HighScoreEntry, Question, QuestionTicket, QuizError, Session, SessionConfig, SessionSnapshot,
};
use crate::types::{
    InputCommand, Phase, SoundCue, ANSWER_OPTIONS, CLOCK_TICK_MS, DROP_INTERVAL_MS,
    EXPLANATION_DWELL_MS, LEADERBOARD_SIZE, QUESTION_TIME_LIMIT_SECS,
};

/// Countdown cues start below these many seconds
const TICK_CUE_SECS: u32 = 10;
const URGENT_CUE_SECS: u32 = 5;

/// Timer periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTiming {
    pub drop_interval: Duration,
    pub clock_tick: Duration,
    /// Answer window; counted down in whole seconds
    pub time_limit: Duration,
    pub dwell: Duration,
}

impl Default for DriverTiming {
    fn default() -> Self {
        Self {
            drop_interval: Duration::from_millis(u64::from(DROP_INTERVAL_MS)),
            clock_tick: Duration::from_millis(u64::from(CLOCK_TICK_MS)),
            time_limit: Duration::from_secs(u64::from(QUESTION_TIME_LIMIT_SECS)),
            dwell: Duration::from_millis(u64::from(EXPLANATION_DWELL_MS)),
        }
    }
}

impl DriverTiming {
    /// Default timing with the session's gravity interval
    pub fn for_session(config: &SessionConfig) -> Self {
        Self {
            drop_interval: Duration::from_millis(u64::from(config.drop_interval_ms)),
            ..Self::default()
        }
    }
}

/// Quiz overlay state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizView {
    pub selected: Option<usize>,
    pub remaining_secs: u32,
    /// Set once submitted; the explanation is showing
    pub verdict: Option<bool>,
}

/// What a front end needs to draw a frame
#[derive(Debug, Clone, PartialEq)]
pub struct DriverView {
    pub session: SessionSnapshot,
    pub quiz: Option<QuizView>,
    pub score_recorded: bool,
    /// Leaderboard rows, refreshed when a score is recorded
    pub top_scores: Vec<HighScoreEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    Input(InputCommand),
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
struct Verdict {
    correct: bool,
    elapsed_secs: f64,
    resume_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct QuizRound {
    ticket: QuestionTicket,
    started: Instant,
    selected: Option<usize>,
    remaining_secs: u32,
    verdict: Option<Verdict>,
}

type Fetched = (QuestionTicket, Result<Question, QuizError>);

pub struct SessionDriver {
    session: Session,
    timing: DriverTiming,
    player_name: String,
    quiz: Option<QuizRound>,
    top_scores: Vec<HighScoreEntry>,
    view_tx: watch::Sender<DriverView>,
}

impl SessionDriver {
    pub fn new(
        session: Session,
        timing: DriverTiming,
        player_name: impl Into<String>,
    ) -> (Self, watch::Receiver<DriverView>) {
        let top_scores = session.top_scores(LEADERBOARD_SIZE);
        let initial = DriverView {
            session: session.snapshot(),
            quiz: None,
            score_recorded: session.score_recorded(),
            top_scores: top_scores.clone(),
        };
        let (view_tx, view_rx) = watch::channel(initial);
        let driver = Self {
            session,
            timing,
            player_name: player_name.into(),
            quiz: None,
            top_scores,
            view_tx,
        };
        (driver, view_rx)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until `Quit`, `Shutdown`, or the event channel closes.
    ///
    /// Hands the session back so callers can inspect the final state.
    pub async fn run(mut self, mut events: mpsc::Receiver<DriverEvent>) -> Result<Session> {
        let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<Fetched>();

        let now = Instant::now();
        let mut gravity = time::interval_at(now + self.timing.drop_interval, self.timing.drop_interval);
        gravity.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut clock = time::interval_at(now + self.timing.clock_tick, self.timing.clock_tick);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let second = Duration::from_secs(1);
        let mut countdown = time::interval_at(now + second, second);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut was_armed = false;
        info!("session driver started");

        loop {
            self.dispatch_fetch(&fetch_tx);

            let armed = self.session.timers_armed();
            if armed && !was_armed {
                gravity.reset();
                clock.reset();
            }
            was_armed = armed;
            self.publish();

            let counting = self.quiz.is_some_and(|round| round.verdict.is_none());
            let resume_at = self
                .quiz
                .and_then(|round| round.verdict)
                .map(|verdict| verdict.resume_at);

            tokio::select! {
                event = events.recv() => match event {
                    Some(DriverEvent::Input(InputCommand::Quit))
                    | Some(DriverEvent::Shutdown)
                    | None => break,
                    Some(DriverEvent::Input(command)) => self.handle_input(command),
                },
                _ = gravity.tick(), if armed => {
                    self.session.gravity_tick();
                }
                _ = clock.tick(), if armed => self.session.clock_tick(),
                Some((ticket, result)) = fetch_rx.recv() => {
                    if self.on_question(ticket, result) {
                        countdown.reset();
                    }
                }
                _ = countdown.tick(), if counting => self.on_countdown(),
                _ = sleep_until(resume_at), if resume_at.is_some() => self.finish_round(),
            }
        }

        info!(
            phase = self.session.phase().as_str(),
            score = self.session.game().score(),
            "session driver stopped"
        );
        Ok(self.session)
    }

    fn handle_input(&mut self, command: InputCommand) {
        match command {
            InputCommand::Action(action) => {
                self.session.apply_action(action);
            }
            InputCommand::SelectAnswer(index) => {
                if index >= ANSWER_OPTIONS {
                    return;
                }
                if let Some(round) = self.quiz.as_mut() {
                    if round.verdict.is_none() {
                        round.selected = Some(index);
                        self.session.cue(SoundCue::Click);
                    }
                }
            }
            InputCommand::Confirm => match self.session.phase() {
                Phase::Menu => {
                    self.session.start();
                }
                Phase::Question => {
                    if let Some(selected) = self.quiz.and_then(|round| round.selected) {
                        self.submit(Some(selected));
                    }
                }
                Phase::Playing => {}
                Phase::GameOver | Phase::GameComplete => {
                    self.quiz = None;
                    self.session.play_again();
                }
            },
            InputCommand::TogglePause => {
                self.session.toggle_pause();
            }
            InputCommand::Restart => {
                self.quiz = None;
                self.session.restart();
            }
            InputCommand::RecordScore => {
                if self.session.record_score(&self.player_name).is_some() {
                    self.top_scores = self.session.top_scores(LEADERBOARD_SIZE);
                }
            }
            InputCommand::Quit => {}
        }
    }

    /// Send the session's outstanding question request to the blocking pool
    fn dispatch_fetch(&mut self, fetch_tx: &mpsc::UnboundedSender<Fetched>) {
        let Some(request) = self.session.take_question_request() else {
            return;
        };
        let provider = self.session.question_provider();
        let tx = fetch_tx.clone();
        let ticket = request.ticket;
        let exclude = request.exclude;
        debug!(?ticket, excluded = exclude.len(), "fetching question");

        tokio::spawn(async move {
            let fetched =
                tokio::task::spawn_blocking(move || provider.fetch_random_question(&exclude)).await;
            let result = match fetched {
                Ok(result) => result,
                Err(err) => Err(QuizError::Io(io::Error::other(err))),
            };
            let _ = tx.send((ticket, result));
        });
    }

    fn on_question(&mut self, ticket: QuestionTicket, result: Result<Question, QuizError>) -> bool {
        if !self.session.deliver_question(ticket, result) {
            return false;
        }
        self.quiz = Some(QuizRound {
            ticket,
            started: Instant::now(),
            selected: None,
            remaining_secs: self.timing.time_limit.as_secs() as u32,
            verdict: None,
        });
        true
    }

    fn on_countdown(&mut self) {
        let Some(round) = self.quiz.as_mut() else {
            return;
        };
        round.remaining_secs = round.remaining_secs.saturating_sub(1);
        let remaining = round.remaining_secs;

        if remaining == 0 {
            debug!("answer window expired");
            self.submit(None);
        } else if remaining <= URGENT_CUE_SECS {
            self.session.cue(SoundCue::UrgentBeep);
        } else if remaining <= TICK_CUE_SECS {
            self.session.cue(SoundCue::TimerTick);
        }
    }

    fn submit(&mut self, selected: Option<usize>) {
        let Some(round) = self.quiz.as_mut() else {
            return;
        };
        if round.verdict.is_some() {
            return;
        }
        let Some(correct) = self.session.judge_answer(selected) else {
            return;
        };
        let now = Instant::now();
        round.verdict = Some(Verdict {
            correct,
            // Whole seconds, floored
            elapsed_secs: now.duration_since(round.started).as_secs() as f64,
            resume_at: now + self.timing.dwell,
        });
    }

    fn finish_round(&mut self) {
        let Some(round) = self.quiz.take() else {
            return;
        };
        let Some(verdict) = round.verdict else {
            self.quiz = Some(round);
            return;
        };
        self.session
            .complete_question(round.ticket, verdict.correct, verdict.elapsed_secs);
    }

    fn view(&self) -> DriverView {
        DriverView {
            session: self.session.snapshot(),
            quiz: self.quiz.map(|round| QuizView {
                selected: round.selected,
                remaining_secs: round.remaining_secs,
                verdict: round.verdict.map(|verdict| verdict.correct),
            }),
            score_recorded: self.session.score_recorded(),
            top_scores: self.top_scores.clone(),
        }
    }

    fn publish(&self) {
        let view = self.view();
        self.view_tx.send_if_modified(move |current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::{Leaderboard, MemoryStore, QuestionBank, RecordingSink};
    use crate::quiz::builtin::builtin_questions;
    use crate::types::GameAction;

    struct Harness {
        tx: mpsc::Sender<DriverEvent>,
        views: watch::Receiver<DriverView>,
        sink: Arc<RecordingSink>,
        handle: tokio::task::JoinHandle<Result<Session>>,
    }

    fn spawn_driver() -> Harness {
        spawn_driver_with(SessionConfig {
            seed: 21,
            ..SessionConfig::default()
        })
    }

    fn spawn_driver_with(config: SessionConfig) -> Harness {
        let sink = Arc::new(RecordingSink::new());
        let bank = QuestionBank::with_seed(builtin_questions(), 5).unwrap();
        let session = Session::new(
            config,
            Arc::new(bank),
            Box::new(Leaderboard::new(MemoryStore::new())),
            sink.clone(),
        );
        let (driver, views) = SessionDriver::new(session, DriverTiming::default(), "tester");
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(driver.run(rx));
        Harness {
            tx,
            views,
            sink,
            handle,
        }
    }

    impl Harness {
        async fn send(&self, command: InputCommand) {
            self.tx.send(DriverEvent::Input(command)).await.unwrap();
        }

        async fn wait_for(&mut self, pred: impl FnMut(&DriverView) -> bool) -> DriverView {
            let view = self.views.wait_for(pred).await.expect("driver stopped");
            view.clone()
        }

        async fn start_and_wait_for_question(&mut self) -> DriverView {
            self.send(InputCommand::Confirm).await;
            self.wait_for(|v| v.session.question.is_some() && v.quiz.is_some())
                .await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_resumes_play() {
        let mut h = spawn_driver();
        let view = h.start_and_wait_for_question().await;
        assert_eq!(view.session.phase, Phase::Question);
        let correct = view.session.question.as_ref().unwrap().correct_index;

        h.send(InputCommand::SelectAnswer(correct)).await;
        h.send(InputCommand::Confirm).await;

        let verdict = h.wait_for(|v| v.quiz.is_some_and(|q| q.verdict.is_some())).await;
        assert_eq!(verdict.quiz.unwrap().verdict, Some(true));
        assert_eq!(verdict.session.phase, Phase::Question);

        let view = h.wait_for(|v| v.session.phase == Phase::Playing).await;
        assert_eq!(view.session.score, 300);
        assert_eq!(view.session.questions_answered, 1);
        assert!(view.session.active.is_some());
        assert!(view.quiz.is_none());
        assert!(h.sink.cues().contains(&SoundCue::Correct));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_submits_wrong_answer() {
        let mut h = spawn_driver();
        h.start_and_wait_for_question().await;

        let view = h.wait_for(|v| v.session.phase == Phase::Playing).await;
        assert_eq!(view.session.score, 0);
        assert_eq!(view.session.questions_answered, 1);

        let cues = h.sink.cues();
        assert!(cues.contains(&SoundCue::Wrong));
        assert!(cues.contains(&SoundCue::TimerTick));
        assert!(cues.contains(&SoundCue::UrgentBeep));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gravity_runs_while_playing() {
        let mut h = spawn_driver();
        h.start_and_wait_for_question().await;
        let view = h.wait_for(|v| v.session.phase == Phase::Playing).await;
        let start_y = view.session.active.unwrap().y;

        let view = h
            .wait_for(|v| v.session.active.is_some_and(|a| a.y > start_y))
            .await;
        assert_eq!(view.session.phase, Phase::Playing);
        assert!(view.session.game_time_secs <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_gravity() {
        let mut h = spawn_driver();
        h.start_and_wait_for_question().await;
        h.wait_for(|v| v.session.phase == Phase::Playing).await;

        h.send(InputCommand::TogglePause).await;
        let paused = h.wait_for(|v| !v.session.is_playing).await;
        let y = paused.session.active.unwrap().y;

        time::sleep(Duration::from_secs(10)).await;
        let view = h.views.borrow().clone();
        assert_eq!(view.session.active.unwrap().y, y);
        assert!(h.sink.cues().contains(&SoundCue::Pause));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_dwell_discards_answer() {
        let mut h = spawn_driver();
        let view = h.start_and_wait_for_question().await;
        let correct = view.session.question.as_ref().unwrap().correct_index;
        h.send(InputCommand::SelectAnswer(correct)).await;
        h.send(InputCommand::Confirm).await;
        h.send(InputCommand::Restart).await;

        let view = h.wait_for(|v| v.session.phase == Phase::Menu).await;
        assert!(view.quiz.is_none());

        time::sleep(Duration::from_secs(5)).await;
        let view = h.views.borrow().clone();
        assert_eq!(view.session.phase, Phase::Menu);
        assert_eq!(view.session.score, 0);
        assert_eq!(view.session.questions_answered, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_actions_are_ignored_during_question() {
        let mut h = spawn_driver();
        h.start_and_wait_for_question().await;
        h.send(InputCommand::Action(GameAction::HardDrop)).await;
        h.send(InputCommand::SelectAnswer(9)).await;

        let view = h.views.borrow().clone();
        assert_eq!(view.session.phase, Phase::Question);
        assert_eq!(view.session.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_returns_session() {
        let h = spawn_driver();
        h.send(InputCommand::Quit).await;
        let session = h.handle.await.unwrap().unwrap();
        assert_eq!(session.phase(), Phase::Menu);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_score_refreshes_leaderboard() {
        let mut h = spawn_driver_with(SessionConfig {
            seed: 3,
            total_questions: 1,
            ..SessionConfig::default()
        });
        assert!(h.views.borrow().top_scores.is_empty());

        let view = h.start_and_wait_for_question().await;
        let correct = view.session.question.as_ref().unwrap().correct_index;
        h.send(InputCommand::SelectAnswer(correct)).await;
        h.send(InputCommand::Confirm).await;
        h.wait_for(|v| v.session.phase == Phase::GameComplete).await;

        h.send(InputCommand::RecordScore).await;
        let view = h.wait_for(|v| v.score_recorded).await;
        assert_eq!(view.top_scores.len(), 1);
        assert_eq!(view.top_scores[0].player_name, "tester");
        assert_eq!(view.top_scores[0].score, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_time_is_floored_to_whole_seconds() {
        let mut h = spawn_driver();
        let view = h.start_and_wait_for_question().await;
        let correct = view.session.question.as_ref().unwrap().correct_index;

        // 5.5 s counts as 5 s, still inside the full bonus band.
        time::sleep(Duration::from_millis(5500)).await;
        h.send(InputCommand::SelectAnswer(correct)).await;
        h.send(InputCommand::Confirm).await;

        let view = h.wait_for(|v| v.session.phase == Phase::Playing).await;
        assert_eq!(view.session.score, 300);
    }

    #[test]
    fn test_timing_follows_session_drop_interval() {
        let config = SessionConfig {
            drop_interval_ms: 250,
            ..SessionConfig::default()
        };
        let timing = DriverTiming::for_session(&config);
        assert_eq!(timing.drop_interval, Duration::from_millis(250));
        assert_eq!(timing.dwell, DriverTiming::default().dwell);
        assert_eq!(
            DriverTiming::for_session(&SessionConfig::default()),
            DriverTiming::default()
        );
    }
}
