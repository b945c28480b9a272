//! Terminal front end: lays out a [`DriverView`] as styled text lines and
//! flushes them with crossterm.
//!
//! Layout is a pure function of the view so it can be tested without a TTY.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use tetris_training::core::pieces::occupancy;
use tetris_training::core::SessionSnapshot;
use tetris_training::leaderboard::{format_rank, format_score};
use tetris_training::runtime::{DriverView, QuizView};
use tetris_training::types::{Phase, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

const WRAP_WIDTH: usize = 64;
const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: Option<Color>,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

pub type Line = Vec<Span>;

fn line(text: impl Into<String>) -> Line {
    vec![Span::plain(text)]
}

pub fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::L => Color::DarkYellow,
        PieceKind::J => Color::Blue,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
    }
}

fn code_color(code: u8) -> Option<Color> {
    code.checked_sub(1)
        .and_then(|i| PieceKind::from_index(i as usize))
        .map(piece_color)
}

/// Build every line of a frame.
pub fn compose(view: &DriverView) -> Vec<Line> {
    let snapshot = &view.session;
    match snapshot.phase {
        Phase::Menu => compose_menu(view),
        Phase::Playing | Phase::Question => {
            let mut lines = compose_board(snapshot);
            lines.push(Vec::new());
            if snapshot.phase == Phase::Question {
                lines.extend(compose_question(snapshot, view.quiz));
            } else if !snapshot.is_playing {
                lines.push(vec![Span::colored("PAUSED", Color::Yellow)]);
                lines.push(line("p: resume  r: menu  q: quit"));
            } else {
                lines.push(line(
                    "arrows/hjkl: move  up: rotate  space: drop  p: pause  q: quit",
                ));
            }
            lines
        }
        Phase::GameOver | Phase::GameComplete => compose_summary(view),
    }
}

fn compose_menu(view: &DriverView) -> Vec<Line> {
    let mut lines = vec![
        vec![Span::colored("TETRIS TRAINING", Color::Cyan)],
        Vec::new(),
        line("Clear lines to unlock questions. Answer five to finish a run."),
        line("Fast correct answers earn up to 300 points; wrong ones cost 50."),
        Vec::new(),
        line("Enter: start  q: quit"),
        Vec::new(),
    ];
    lines.extend(compose_leaderboard(view));
    lines
}

fn compose_board(snapshot: &SessionSnapshot) -> Vec<Line> {
    let grid = snapshot.composited_board();
    let ghost = ghost_cells(snapshot);
    let panel = compose_panel(snapshot);

    let mut lines = Vec::with_capacity(BOARD_HEIGHT as usize + 1);
    for (y, row) in grid.iter().enumerate() {
        let mut out = vec![Span::plain("|")];
        for (x, &code) in row.iter().enumerate() {
            let span = match code_color(code) {
                Some(color) => Span::colored("[]", color),
                None if ghost.contains(&(x as i8, y as i8)) => {
                    Span::colored("::", Color::DarkGrey)
                }
                None => Span::plain(" ."),
            };
            out.push(span);
        }
        out.push(Span::plain("|"));
        if let Some(extra) = panel.get(y) {
            out.push(Span::plain("  "));
            out.extend(extra.iter().cloned());
        }
        lines.push(out);
    }
    lines.push(line(format!("+{}+", "-".repeat(BOARD_WIDTH as usize * 2))));
    lines
}

fn ghost_cells(snapshot: &SessionSnapshot) -> Vec<(i8, i8)> {
    match (snapshot.active, snapshot.ghost_y) {
        (Some(active), Some(ghost_y)) if ghost_y != active.y => {
            let dy = ghost_y - active.y;
            active.cells().iter().map(|&(x, y)| (x, y + dy)).collect()
        }
        _ => Vec::new(),
    }
}

fn compose_panel(snapshot: &SessionSnapshot) -> Vec<Line> {
    let mut panel = vec![
        line(format!("Score     {}", format_score(snapshot.score))),
        line(format!("Level     {}", snapshot.level)),
        line(format!("Lines     {}", snapshot.lines)),
        line(format!(
            "Questions {}/{}",
            snapshot.questions_answered, snapshot.total_questions
        )),
        line(format!("Time      {}", format_clock(snapshot.game_time_secs))),
        Vec::new(),
        line("Next"),
    ];
    let color = piece_color(snapshot.next);
    for row in occupancy(snapshot.next, Rotation::North) {
        let text: String = row
            .iter()
            .map(|filled| if *filled { "[]" } else { "  " })
            .collect();
        panel.push(vec![Span::colored(text, color)]);
    }
    panel
}

fn compose_question(snapshot: &SessionSnapshot, quiz: Option<QuizView>) -> Vec<Line> {
    let Some(question) = &snapshot.question else {
        return vec![line("Loading question...")];
    };
    let mut lines = Vec::new();

    match quiz {
        Some(quiz) if quiz.verdict.is_none() => {
            let color = if quiz.remaining_secs <= 5 {
                Color::Red
            } else if quiz.remaining_secs <= 10 {
                Color::Yellow
            } else {
                Color::Green
            };
            lines.push(vec![
                Span::plain(format!("[{}] ", question.category)),
                Span::colored(format!("{}s left", quiz.remaining_secs), color),
            ]);
        }
        _ => lines.push(line(format!("[{}]", question.category))),
    }

    if let Some(scenario) = &question.scenario {
        lines.extend(wrap(scenario, WRAP_WIDTH).into_iter().map(line));
    }
    lines.extend(wrap(&question.prompt, WRAP_WIDTH).into_iter().map(line));
    lines.push(Vec::new());

    let selected = quiz.and_then(|quiz| quiz.selected);
    let verdict = quiz.and_then(|quiz| quiz.verdict);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { '>' } else { ' ' };
        let text = format!("{marker} {}) {option}", OPTION_LABELS[i]);
        let span = match verdict {
            Some(_) if i == question.correct_index => Span::colored(text, Color::Green),
            Some(_) if selected == Some(i) => Span::colored(text, Color::Red),
            _ if selected == Some(i) => Span::colored(text, Color::Cyan),
            _ => Span::plain(text),
        };
        lines.push(vec![span]);
    }
    lines.push(Vec::new());

    match verdict {
        Some(correct) => {
            lines.push(if correct {
                vec![Span::colored("Correct!", Color::Green)]
            } else {
                vec![Span::colored("Incorrect.", Color::Red)]
            });
            if let Some(explanation) = &question.explanation {
                lines.extend(wrap(explanation, WRAP_WIDTH).into_iter().map(line));
            }
        }
        None => lines.push(line("1-4: choose  Enter: submit")),
    }
    lines
}

fn compose_summary(view: &DriverView) -> Vec<Line> {
    let snapshot = &view.session;
    let title = if snapshot.phase == Phase::GameComplete {
        Span::colored("TRAINING COMPLETE", Color::Green)
    } else {
        Span::colored("GAME OVER", Color::Red)
    };
    let mut lines = vec![
        vec![title],
        Vec::new(),
        line(format!("Final score  {}", format_score(snapshot.score))),
        line(format!("Lines        {}", snapshot.lines)),
        line(format!(
            "Questions    {}/{}",
            snapshot.questions_answered, snapshot.total_questions
        )),
        line(format!("Time         {}", format_clock(snapshot.game_time_secs))),
        Vec::new(),
    ];
    if view.score_recorded {
        lines.push(line("Score saved.  Enter: play again  r: menu  q: quit"));
    } else {
        lines.push(line("n: save score  Enter: play again  r: menu  q: quit"));
    }
    lines.push(Vec::new());
    lines.extend(compose_leaderboard(view));
    lines
}

fn compose_leaderboard(view: &DriverView) -> Vec<Line> {
    if view.top_scores.is_empty() {
        return vec![line("No high scores yet.")];
    }
    let mut lines = vec![line("High scores")];
    for (i, entry) in view.top_scores.iter().enumerate() {
        lines.push(line(format!(
            "{:>5}  {:<16} {:>9}  {}",
            format_rank(i + 1),
            entry.player_name,
            format_score(entry.score),
            entry.date
        )));
    }
    lines
}

fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Full redraw of one frame.
    pub fn draw(&mut self, view: &DriverView) -> Result<()> {
        self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        for (row, spans) in compose(view).iter().enumerate() {
            self.stdout.queue(cursor::MoveTo(0, row as u16))?;
            for span in spans {
                match span.color {
                    Some(color) => {
                        self.stdout.queue(SetForegroundColor(color))?;
                        self.stdout.queue(Print(&span.text))?;
                        self.stdout.queue(ResetColor)?;
                    }
                    None => {
                        self.stdout.queue(Print(&span.text))?;
                    }
                }
            }
        }
        self.stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tetris_training::core::{
        Leaderboard, MemoryStore, QuestionBank, Session, SessionConfig, Silent,
    };
    use tetris_training::leaderboard::HighScoreEntry;

    fn session() -> Session {
        Session::new(
            SessionConfig::default(),
            Arc::new(QuestionBank::builtin()),
            Box::new(Leaderboard::new(MemoryStore::new())),
            Arc::new(Silent),
        )
    }

    fn view_of(session: &Session, quiz: Option<QuizView>) -> DriverView {
        DriverView {
            session: session.snapshot(),
            quiz,
            score_recorded: session.score_recorded(),
            top_scores: Vec::new(),
        }
    }

    fn line_text(line: &Line) -> String {
        line.iter().map(|span| span.text.as_str()).collect()
    }

    fn texts(view: &DriverView) -> Vec<String> {
        compose(view).iter().map(line_text).collect()
    }

    #[test]
    fn test_menu_shows_start_hint_and_empty_leaderboard() {
        let lines = texts(&view_of(&session(), None));
        assert_eq!(lines[0], "TETRIS TRAINING");
        assert!(lines.iter().any(|l| l.contains("Enter: start")));
        assert!(lines.iter().any(|l| l == "No high scores yet."));
    }

    #[test]
    fn test_playing_frame_has_board_rows_and_panel() {
        let mut session = session();
        session.start();
        session.fetch_pending_question();
        let correct = session.current_question().map(|q| q.correct_index);
        session.answer_question(correct, 1.0);

        let lines = texts(&view_of(&session, None));
        // 20 rows, a floor, a blank and the key hint
        assert_eq!(lines.len(), BOARD_HEIGHT as usize + 3);
        assert!(lines[0].starts_with('|'));
        assert!(lines[0].contains("Score     "));
        assert!(lines[3].contains("Questions 1/5"));
        assert!(lines.iter().any(|l| l.contains("[]")));
    }

    #[test]
    fn test_question_frame_shows_countdown_and_options() {
        let mut session = session();
        session.start();
        session.fetch_pending_question();
        let quiz = QuizView {
            selected: Some(1),
            remaining_secs: 4,
            verdict: None,
        };
        let frame = compose(&view_of(&session, Some(quiz)));
        let lines: Vec<String> = frame.iter().map(line_text).collect();

        assert!(lines.iter().any(|l| l.contains("4s left")));
        assert!(lines.iter().any(|l| l.starts_with("> B) ")));
        assert!(lines.iter().any(|l| l.starts_with("  A) ")));
        assert!(lines.iter().any(|l| l == "1-4: choose  Enter: submit"));

        let countdown = frame
            .iter()
            .flatten()
            .find(|span| span.text == "4s left")
            .and_then(|span| span.color);
        assert_eq!(countdown, Some(Color::Red));
    }

    #[test]
    fn test_question_frame_shows_verdict_after_submit() {
        let mut session = session();
        session.start();
        session.fetch_pending_question();
        let quiz = QuizView {
            selected: Some(0),
            remaining_secs: 20,
            verdict: Some(false),
        };
        let lines = texts(&view_of(&session, Some(quiz)));
        assert!(lines.iter().any(|l| l == "Incorrect."));
        assert!(!lines.iter().any(|l| l.contains("s left")));
    }

    #[test]
    fn test_awaiting_question_shows_loading() {
        let mut session = session();
        session.start();
        let lines = texts(&view_of(&session, None));
        assert!(lines.iter().any(|l| l == "Loading question..."));
    }

    #[test]
    fn test_summary_lists_high_scores() {
        let mut view = view_of(&session(), None);
        view.session.phase = Phase::GameComplete;
        view.session.score = 12_500;
        view.top_scores = vec![HighScoreEntry {
            id: "1".to_string(),
            player_name: "ada".to_string(),
            score: 12_500,
            level: 1,
            lines: 4,
            date: "10/19/2026".to_string(),
            timestamp: 0,
        }];
        let lines = texts(&view);
        assert_eq!(lines[0], "TRAINING COMPLETE");
        assert!(lines.iter().any(|l| l.contains("Final score  12,500")));
        assert!(lines.iter().any(|l| l.contains("1st") && l.contains("ada")));
        assert!(lines.iter().any(|l| l.starts_with("n: save score")));
    }

    #[test]
    fn test_wrap_breaks_on_word_boundaries() {
        assert_eq!(
            wrap("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert!(wrap("   ", 10).is_empty());
        assert_eq!(format_clock(125), "02:05");
    }
}
