//! Dispatch on the first command word.
//!
//! `help` and `edit` are handled locally; every other word is relayed to the
//! daemon as-is.

pub mod edit;
pub mod help;
pub mod relay;

use pypr_ipc::{ClientError, Environment, ExitCode};

pub fn run(words: Vec<String>, env: &Environment) -> Result<ExitCode, ClientError> {
    match words.first().map(String::as_str) {
        None => Err(ClientError::NoCommand),
        Some("help" | "--help" | "-h") => help::run(),
        Some("edit") => edit::run(env),
        Some(_) => relay::run(&normalize(words), env),
    }
}

/// Daemon command names use underscores; accept dashes on the command line.
fn normalize(mut words: Vec<String>) -> Vec<String> {
    if let Some(first) = words.first_mut() {
        *first = first.replace('-', "_");
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn only_the_command_word_is_normalized() {
        assert_eq!(
            normalize(words(&["toggle-special", "my-name"])),
            words(&["toggle_special", "my-name"])
        );
    }

    #[test]
    fn empty_words_are_a_usage_error() {
        let err = run(Vec::new(), &Environment::default()).unwrap_err();
        assert!(matches!(err, ClientError::NoCommand));
    }

    #[test]
    fn help_never_needs_the_environment() {
        let code = run(words(&["help"]), &Environment::default()).expect("help");
        assert_eq!(code, ExitCode::Success);
    }
}
