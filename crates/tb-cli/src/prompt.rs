//! Interactive yes/no confirmation.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Returns true only on an explicit yes.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Line-based prompt over any reader and writer.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<StdinLock<'static>, Stdout> {
    /// Prompt on the terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        if write!(self.output, "{question} ")
            .and_then(|()| self.output.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => {
                // Keep the shell prompt off the question line.
                let _ = writeln!(self.output);
                false
            }
            Ok(_) => is_yes(&answer),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
