//! Session module - the phase machine around a game
//!
//! A session alternates falling-block play with quiz rounds:
//!
//! ```text
//! menu --start--> question --answered, count < total--> playing
//!                     ^                                   |
//!                     +-------- lines cleared ------------+
//! playing --top-out--> game over
//! question --answered, count == total--> game complete
//! any phase --restart--> menu
//! ```
//!
//! Question fetches are asynchronous from the session's point of view. Each
//! request carries a [`QuestionTicket`]; a delivery or completion holding a
//! ticket that is no longer current (the run was restarted, or another
//! question superseded it) is dropped.
//!
//! Timers live outside the session. The owner drives gravity and the clock
//! through [`Session::gravity_tick`] and [`Session::clock_tick`] and should
//! only run them while [`Session::timers_armed`] is true.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::game_state::{ActionOutcome, GameState, LockEvent};
use crate::scoring::answer_points;
use crate::snapshot::SessionSnapshot;
use crate::sound::SoundSink;
use crate::types::{
    GameAction, Phase, SoundCue, BOARD_HEIGHT, BOARD_WIDTH, DROP_INTERVAL_MS, TOTAL_QUESTIONS,
};
use crate::{
    HighScoreEntry, Question, QuestionBank, QuestionProvider, QuizError, RecordOutcome,
    ScorePersistence,
};

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seed for the piece generator
    pub seed: u32,
    /// Answered questions that complete a run
    pub total_questions: u32,
    pub drop_interval_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            total_questions: TOTAL_QUESTIONS,
            drop_interval_ms: DROP_INTERVAL_MS,
        }
    }
}

/// Freshness token for one question round.
///
/// The epoch changes on restart, the sequence on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionTicket {
    epoch: u32,
    seq: u32,
}

/// A question the session wants fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub ticket: QuestionTicket,
    /// Ids already asked this run
    pub exclude: HashSet<String>,
}

pub struct Session {
    config: SessionConfig,
    game: GameState,
    phase: Phase,
    questions_answered: u32,
    used_question_ids: HashSet<String>,
    current_question: Option<Question>,
    ticket: Option<QuestionTicket>,
    outbox: Option<QuestionRequest>,
    epoch: u32,
    seq: u32,
    game_time_secs: u32,
    score_recorded: bool,
    questions: Arc<dyn QuestionProvider>,
    fallback: QuestionBank,
    scores: Box<dyn ScorePersistence>,
    sound: Arc<dyn SoundSink>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        questions: Arc<dyn QuestionProvider>,
        scores: Box<dyn ScorePersistence>,
        sound: Arc<dyn SoundSink>,
    ) -> Self {
        Self {
            config,
            game: GameState::new(config.seed),
            phase: Phase::Menu,
            questions_answered: 0,
            used_question_ids: HashSet::new(),
            current_question: None,
            ticket: None,
            outbox: None,
            epoch: 0,
            seq: 0,
            game_time_secs: 0,
            score_recorded: false,
            questions,
            fallback: QuestionBank::builtin(),
            scores,
            sound,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable access to the game, e.g. to set up a scenario
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    pub fn total_questions(&self) -> u32 {
        self.config.total_questions
    }

    pub fn used_question_ids(&self) -> &HashSet<String> {
        &self.used_question_ids
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// Ticket of the current question round, if one is open
    pub fn question_ticket(&self) -> Option<QuestionTicket> {
        self.ticket
    }

    pub fn game_time_secs(&self) -> u32 {
        self.game_time_secs
    }

    pub fn question_provider(&self) -> Arc<dyn QuestionProvider> {
        Arc::clone(&self.questions)
    }

    /// Play a cue on the session's sink
    pub fn cue(&self, cue: SoundCue) {
        self.sound.play(cue);
    }

    /// Gravity and the session clock run only while this holds
    pub fn timers_armed(&self) -> bool {
        self.phase == Phase::Playing && self.game.is_playing() && !self.game.game_over()
    }

    /// Leave the menu and ask for the first question.
    ///
    /// Returns false outside the menu.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Menu {
            return false;
        }
        info!(seed = self.config.seed, "session started");
        self.questions_answered = 0;
        self.used_question_ids.clear();
        self.score_recorded = false;
        self.enter_question();
        true
    }

    /// Take the outstanding fetch request, if any
    pub fn take_question_request(&mut self) -> Option<QuestionRequest> {
        self.outbox.take()
    }

    /// Fetch the outstanding request inline through the provider.
    ///
    /// Returns true when a question was delivered.
    pub fn fetch_pending_question(&mut self) -> bool {
        let Some(request) = self.take_question_request() else {
            return false;
        };
        let result = self.questions.fetch_random_question(&request.exclude);
        self.deliver_question(request.ticket, result)
    }

    /// Hand over a fetched question.
    ///
    /// Stale tickets are ignored. A failed fetch is replaced by a question
    /// from the built-in set.
    pub fn deliver_question(
        &mut self,
        ticket: QuestionTicket,
        result: Result<Question, QuizError>,
    ) -> bool {
        if self.phase != Phase::Question
            || self.ticket != Some(ticket)
            || self.current_question.is_some()
        {
            debug!(?ticket, "dropping stale question delivery");
            return false;
        }

        let question = match result {
            Ok(question) => question,
            Err(err) => {
                warn!(error = %err, "question fetch failed, using built-in question");
                match self.fallback.fetch_random_question(&self.used_question_ids) {
                    Ok(question) => question,
                    Err(err) => {
                        warn!(error = %err, "built-in question set unavailable");
                        return false;
                    }
                }
            }
        };

        debug!(id = %question.id, "question delivered");
        self.used_question_ids.insert(question.id.clone());
        self.current_question = Some(question);
        true
    }

    /// Judge a selection against the current question and play its cue.
    ///
    /// `None` (no selection, e.g. on timeout) is always wrong. Returns `None`
    /// when no question is on screen.
    pub fn judge_answer(&self, selected: Option<usize>) -> Option<bool> {
        if self.phase != Phase::Question {
            return None;
        }
        let question = self.current_question.as_ref()?;
        let correct = question.is_correct(selected);
        self.sound.play(if correct {
            SoundCue::Correct
        } else {
            SoundCue::Wrong
        });
        Some(correct)
    }

    /// Score the answered question and move on.
    ///
    /// Applies the answer points (the score never drops below zero), counts
    /// the answer, then either completes the run or resumes play with a new
    /// piece. Returns the points applied, or `None` for a stale ticket.
    pub fn complete_question(
        &mut self,
        ticket: QuestionTicket,
        is_correct: bool,
        elapsed_secs: f64,
    ) -> Option<i32> {
        if self.phase != Phase::Question || self.ticket != Some(ticket) {
            debug!(?ticket, "dropping stale question completion");
            return None;
        }
        self.current_question.as_ref()?;

        let points = answer_points(is_correct, elapsed_secs);
        self.game.add_points(points);
        self.questions_answered += 1;
        self.current_question = None;
        self.ticket = None;
        info!(
            correct = is_correct,
            points,
            answered = self.questions_answered,
            score = self.game.score(),
            "question answered"
        );

        if self.questions_answered >= self.config.total_questions {
            self.phase = Phase::GameComplete;
            self.game.set_playing(false);
            self.sound.play(SoundCue::GameComplete);
            info!(score = self.game.score(), "run complete");
            return Some(points);
        }

        self.phase = Phase::Playing;
        self.game.set_playing(true);
        self.sound.play(SoundCue::Resume);
        if !self.game.spawn_piece() {
            self.enter_game_over();
        }
        Some(points)
    }

    /// Judge and complete in one step
    pub fn answer_question(&mut self, selected: Option<usize>, elapsed_secs: f64) -> Option<i32> {
        let ticket = self.ticket?;
        let correct = self.judge_answer(selected)?;
        self.complete_question(ticket, correct, elapsed_secs)
    }

    /// Apply a piece command while playing
    pub fn apply_action(&mut self, action: GameAction) -> ActionOutcome {
        if !self.timers_armed() {
            return ActionOutcome::Ignored;
        }

        let outcome = self.game.apply_action(action);
        match outcome {
            ActionOutcome::Moved => match action {
                GameAction::MoveLeft | GameAction::MoveRight => self.sound.play(SoundCue::Move),
                GameAction::Rotate => self.sound.play(SoundCue::Rotate),
                GameAction::SoftDrop | GameAction::HardDrop => {}
            },
            ActionOutcome::Locked(event) => self.after_lock(&event),
            ActionOutcome::Ignored | ActionOutcome::Blocked => {}
        }
        outcome
    }

    fn after_lock(&mut self, event: &LockEvent) {
        if event.hard_drop {
            self.sound.play(SoundCue::HardDrop);
        } else {
            self.sound.play(SoundCue::Land);
        }

        match event.lines_cleared {
            0 if event.hard_drop => self.sound.play(SoundCue::Land),
            0 => {}
            1..=3 => self
                .sound
                .play(SoundCue::LineClear(event.lines_cleared as u8)),
            _ => self.sound.play(SoundCue::Tetris),
        }

        if event.lines_cleared > 0 {
            self.enter_question();
        } else if event.topped_out {
            self.enter_game_over();
        }
    }

    /// One gravity step: a soft drop while timers are armed
    pub fn gravity_tick(&mut self) -> ActionOutcome {
        self.apply_action(GameAction::SoftDrop)
    }

    /// Advance the session clock by one second while timers are armed
    pub fn clock_tick(&mut self) {
        if self.timers_armed() {
            self.game_time_secs += 1;
        }
    }

    /// Pause or resume play. Only meaningful in the playing phase.
    ///
    /// Returns the new `is_playing` value, or `None` when not applicable.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        if self.phase != Phase::Playing || self.game.game_over() {
            return None;
        }
        let playing = !self.game.is_playing();
        self.game.set_playing(playing);
        self.sound.play(if playing {
            SoundCue::Resume
        } else {
            SoundCue::Pause
        });
        debug!(playing, "pause toggled");
        Some(playing)
    }

    /// Back to the menu with a fresh game. Works from any phase.
    ///
    /// Outstanding fetches and dwell timers become stale.
    pub fn restart(&mut self) {
        self.sound.play(SoundCue::Click);
        self.game.reset();
        self.phase = Phase::Menu;
        self.questions_answered = 0;
        self.used_question_ids.clear();
        self.current_question = None;
        self.ticket = None;
        self.outbox = None;
        self.epoch = self.epoch.wrapping_add(1);
        self.game_time_secs = 0;
        self.score_recorded = false;
        info!(epoch = self.epoch, "session restarted");
    }

    /// Restart and immediately start a new run
    pub fn play_again(&mut self) -> bool {
        self.restart();
        self.start()
    }

    /// Whether the current score would earn a leaderboard place
    pub fn qualifies_for_leaderboard(&self) -> bool {
        match self.scores.is_qualifying(self.game.score()) {
            Ok(qualifies) => qualifies,
            Err(err) => {
                warn!(error = %err, "leaderboard unavailable");
                false
            }
        }
    }

    /// Save the finished run under `name`.
    ///
    /// Only once per run, and only after game over or completion. Failures
    /// are logged and the session carries on.
    pub fn record_score(&mut self, name: &str) -> Option<RecordOutcome> {
        if !self.phase.is_terminal() || self.score_recorded {
            return None;
        }
        let result = self.scores.record_score(
            name,
            self.game.score(),
            self.game.level(),
            self.game.lines(),
        );
        match result {
            Ok(outcome) => {
                self.score_recorded = true;
                if outcome.is_new_record {
                    self.sound.play(SoundCue::HighScore);
                }
                info!(rank = outcome.rank, score = outcome.entry.score, "score recorded");
                Some(outcome)
            }
            Err(err) => {
                warn!(error = %err, "failed to record score");
                None
            }
        }
    }

    pub fn score_recorded(&self) -> bool {
        self.score_recorded
    }

    /// Best `limit` leaderboard entries; empty when the store fails
    pub fn top_scores(&self, limit: usize) -> Vec<HighScoreEntry> {
        self.scores.list_top_scores(limit).unwrap_or_else(|err| {
            warn!(error = %err, "failed to read leaderboard");
            Vec::new()
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut board = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.game.board().write_u8_grid(&mut board);
        SessionSnapshot {
            board,
            active: self.game.active().map(Into::into),
            ghost_y: self.game.ghost_y(),
            next: self.game.next_piece(),
            score: self.game.score(),
            level: self.game.level(),
            lines: self.game.lines(),
            lines_in_level: self.game.lines_in_level(),
            phase: self.phase,
            is_playing: self.game.is_playing(),
            game_over: self.game.game_over(),
            questions_answered: self.questions_answered,
            total_questions: self.config.total_questions,
            game_time_secs: self.game_time_secs,
            question: self.current_question.clone(),
        }
    }

    fn enter_question(&mut self) {
        self.phase = Phase::Question;
        self.game.set_playing(false);
        self.current_question = None;
        self.seq = self.seq.wrapping_add(1);
        let ticket = QuestionTicket {
            epoch: self.epoch,
            seq: self.seq,
        };
        self.ticket = Some(ticket);
        self.outbox = Some(QuestionRequest {
            ticket,
            exclude: self.used_question_ids.clone(),
        });
        debug!(?ticket, "question requested");
    }

    fn enter_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.game.set_playing(false);
        self.sound.play(SoundCue::GameOver);
        info!(score = self.game.score(), lines = self.game.lines(), "game over");
    }
}
