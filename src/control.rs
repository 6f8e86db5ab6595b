// ABOUTME: Presenter control module for the code-walk application
// ABOUTME: Maps presenter input to navigation commands and applies them to a stepper

use crate::errors::{Result, WalkError};
use crate::stepper::RangeStepper;
use log::debug;
use std::str::FromStr;

/// One presenter action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    First,
    Last,
    /// One-based step number, as presenters count them
    Jump(i64),
    Show,
    Help,
    Quit,
}

/// What happened after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    /// Navigation hit a boundary; nothing changed
    Unchanged,
    Redraw,
    Help,
    Quit,
}

pub const HELP: &str = "  n, j, down, <enter>   next step
  p, k, up              previous step
  g, first              first step
  G, last               last step
  <number>, goto <n>    jump to step n
  s, show               redraw the current step
  ?, help               this help
  q, quit               leave the walkthrough";

impl Command {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let command = match input {
            "" | "n" | "next" | "j" | "down" => Command::Next,
            "p" | "prev" | "previous" | "k" | "up" => Command::Previous,
            "g" | "first" => Command::First,
            "G" | "last" => Command::Last,
            "s" | "show" => Command::Show,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => {
                let number = other
                    .strip_prefix("goto")
                    .map(str::trim)
                    .unwrap_or(other);
                let step = number.parse::<i64>().map_err(|_| {
                    WalkError::ValidationError(format!("Unknown command: {:?} (try `help`)", other))
                })?;
                Command::Jump(step)
            }
        };
        Ok(command)
    }
}

impl FromStr for Command {
    type Err = WalkError;

    fn from_str(s: &str) -> Result<Self> {
        Command::parse(s)
    }
}

/// Apply a command to the stepper. A failed jump leaves the position untouched.
pub fn apply(stepper: &mut RangeStepper, command: Command) -> Result<Outcome> {
    let before = stepper.current_index();
    debug!("Applying {:?} at step {:?}", command, before);

    match command {
        Command::Next => {
            stepper.next();
        }
        Command::Previous => {
            stepper.previous();
        }
        Command::First => {
            if !stepper.is_empty() {
                stepper.jump_to(0)?;
            }
        }
        Command::Last => {
            if let Some(last) = stepper.len().checked_sub(1) {
                stepper.jump_to(last)?;
            }
        }
        Command::Jump(step) => {
            let index = step.saturating_sub(1);
            if index < 0 {
                return Err(WalkError::IndexOutOfRange {
                    index,
                    len: stepper.len(),
                });
            }
            let index = usize::try_from(index).map_err(|_| WalkError::IndexOutOfRange {
                index,
                len: stepper.len(),
            })?;
            stepper.jump_to(index)?;
        }
        Command::Show => return Ok(Outcome::Redraw),
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
    }

    if stepper.current_index() == before {
        Ok(Outcome::Unchanged)
    } else {
        Ok(Outcome::Moved)
    }
}
