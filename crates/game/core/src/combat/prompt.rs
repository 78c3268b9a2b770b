//! Synchronous confirmation prompts.

/// Answers yes/no questions raised before a player attack.
///
/// Prompting blocks the round; a `false` answer aborts it cleanly.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Accepts every prompt. Used for creature rounds and headless tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Prompter for AlwaysConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysDecline;

impl Prompter for AlwaysDecline {
    fn confirm(&mut self, _question: &str) -> bool {
        false
    }
}
