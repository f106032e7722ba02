use std::io::{BufRead, Write};

use crate::deployment::Confirm;

/// Confirmation read from the terminal
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn ask_yes_no(&self, message: &str) -> bool {
        print!("{} [y/N]: ", message);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
