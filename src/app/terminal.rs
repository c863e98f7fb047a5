//! Line-oriented front end for taking an exam in a terminal.
//!
//! Every line of input is either a list of option numbers (`2`, `1 3`, `1,3`)
//! or one of the navigation commands listed in [`HELP`].

use crate::app::report::ResultReport;
use crate::core::engine::{AttemptPlan, ExamEngine};
use crate::core::session::{ExamSession, FinishOutcome, Navigation};
use crate::domain::model::{Exam, ExamResult, QuestionType};
use crate::domain::ports::{ResultSink, Storage};
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

pub const HELP: &str = "\
Commands:
  <numbers>  choose options, e.g. `2` or `1 3` (replaces the current answer)
  n          next question (the current one must be answered)
  s          skip to the next question
  b          back to the previous question
  f          finish the exam
  q          abort the attempt
  ?          show this help";

const PROGRESS_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(ExamResult),
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Zero-based option indices.
    Select(Vec<usize>),
    Next,
    Skip,
    Back,
    Finish,
    Quit,
    Help,
}

pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let command = match line.to_ascii_lowercase().as_str() {
        "n" | "next" => Some(Command::Next),
        "s" | "skip" => Some(Command::Skip),
        "b" | "back" => Some(Command::Back),
        "f" | "finish" => Some(Command::Finish),
        "q" | "quit" => Some(Command::Quit),
        "?" | "h" | "help" => Some(Command::Help),
        _ => None,
    };
    if let Some(command) = command {
        return Ok(command);
    }
    if line.is_empty() {
        return Err("Type option numbers or a command, `?` shows help".to_string());
    }

    let mut choices = Vec::new();
    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.parse::<usize>() {
            Ok(number) if number >= 1 => choices.push(number - 1),
            _ => return Err(format!("'{}' is not an option number or a command", token)),
        }
    }
    Ok(Command::Select(choices))
}

fn format_remaining(left: Duration) -> String {
    let secs = left.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub struct TerminalRunner<R: BufRead, W: Write> {
    input: R,
    output: W,
    clock: Box<dyn Fn() -> Instant>,
}

impl<R: BufRead, W: Write> TerminalRunner<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            clock: Box::new(Instant::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> Instant + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "⚠️ {}", message)?;
        Ok(())
    }

    fn render_question(&mut self, session: &ExamSession<'_>) -> Result<()> {
        let current = session.current();
        let filled = (session.progress() * PROGRESS_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH.saturating_sub(filled))
        );

        writeln!(self.output)?;
        write!(
            self.output,
            "{} Question {} of {}",
            bar,
            current.number(),
            current.total
        )?;
        if let Some(left) = session.time_remaining((self.clock)()) {
            write!(self.output, "  ⏱ {} left", format_remaining(left))?;
        }
        writeln!(self.output)?;
        writeln!(self.output)?;
        writeln!(self.output, "Question {}", current.number())?;
        writeln!(self.output, "{}", current.question.text)?;
        writeln!(self.output, "{}", current.question.kind.hint())?;

        for (i, option) in current.question.options.iter().enumerate() {
            let chosen = current.answer.contains(&i);
            let marker = match (current.question.kind, chosen) {
                (QuestionType::Single, true) => "(•)",
                (QuestionType::Single, false) => "( )",
                (QuestionType::Multiple, true) => "[x]",
                (QuestionType::Multiple, false) => "[ ]",
            };
            writeln!(self.output, "  {}. {} {}", i + 1, marker, option)?;
        }

        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }

    /// Drives one attempt until it is finished, aborted or out of time.
    pub fn run(&mut self, session: &mut ExamSession<'_>) -> Result<RunOutcome> {
        writeln!(self.output, "🧪 {}", session.exam().name)?;
        writeln!(self.output, "Type `?` for help.")?;

        loop {
            let now = (self.clock)();
            if session.is_time_up(now) {
                return self.time_up(session, now);
            }

            self.render_question(session)?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                writeln!(self.output, "Attempt aborted")?;
                return Ok(RunOutcome::Aborted);
            };

            // A line typed after the deadline is dropped.
            let now = (self.clock)();
            if session.is_time_up(now) {
                writeln!(self.output)?;
                return self.time_up(session, now);
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    self.warn(&message)?;
                    continue;
                }
            };

            let finish = match command {
                Command::Select(choices) => {
                    if let Err(e) = session.select(&choices) {
                        self.warn(&e.user_friendly_message())?;
                    }
                    false
                }
                Command::Next => match session.next() {
                    Navigation::NeedsAnswer => {
                        self.warn("Please choose an answer before moving on")?;
                        false
                    }
                    Navigation::AtEnd => true,
                    Navigation::Moved { .. } | Navigation::AtStart => false,
                },
                Command::Skip => {
                    if session.skip() == Navigation::AtEnd {
                        self.warn("This is the last question, use `f` to finish")?;
                    }
                    false
                }
                Command::Back => {
                    if session.back() == Navigation::AtStart {
                        self.warn("This is the first question")?;
                    }
                    false
                }
                Command::Finish => true,
                Command::Quit => {
                    writeln!(self.output, "Attempt aborted")?;
                    return Ok(RunOutcome::Aborted);
                }
                Command::Help => {
                    writeln!(self.output, "{}", HELP)?;
                    false
                }
            };

            if finish {
                match session.finish_at((self.clock)()) {
                    FinishOutcome::Completed(result) => return Ok(RunOutcome::Completed(result)),
                    FinishOutcome::Unanswered(positions) => {
                        let list = positions
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", ");
                        self.warn(&format!("Unanswered questions: {}", list))?;
                    }
                }
            }
        }
    }

    fn time_up(&mut self, session: &ExamSession<'_>, now: Instant) -> Result<RunOutcome> {
        writeln!(self.output, "⏰ Time is up, the exam is finished")?;
        let mut result = session.score_at(now);
        result.timed_out = true;
        Ok(RunOutcome::Completed(result))
    }

    pub fn show_result(&mut self, result: &ExamResult, exam: &Exam) -> Result<()> {
        writeln!(self.output)?;
        write!(self.output, "{}", ResultReport { result, exam })?;
        Ok(())
    }

    /// Returns true when the user wants to take the same exam again.
    pub fn prompt_retry(&mut self) -> Result<bool> {
        writeln!(self.output)?;
        write!(self.output, "[r] take the exam again, [Enter] return > ")?;
        self.output.flush()?;
        Ok(self
            .read_line()?
            .is_some_and(|line| line.trim().eq_ignore_ascii_case("r")))
    }
}

/// Runs attempts at `name` until the user declines a retry, recording each
/// completed one. Every retry starts a fresh session from the same plan.
pub async fn take_exam<S, K, R, W>(
    engine: &ExamEngine<S, K>,
    runner: &mut TerminalRunner<R, W>,
    name: &str,
    plan: AttemptPlan,
) -> Result<Vec<ExamResult>>
where
    S: Storage,
    K: ResultSink,
    R: BufRead,
    W: Write,
{
    let mut results = Vec::new();
    loop {
        let mut session = engine.start(name, plan)?;
        match runner.run(&mut session)? {
            RunOutcome::Completed(result) => {
                runner.show_result(&result, session.exam())?;
                engine.record(&result).await?;
                results.push(result);
                if !runner.prompt_retry()? {
                    break;
                }
            }
            RunOutcome::Aborted => break,
        }
    }
    Ok(results)
}
