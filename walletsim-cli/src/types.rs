//! CLI Types

use std::str::FromStr;
use walletsim::prelude::{parse_recipients, Amount, WalletsimError};

/// One line of shell input
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Connect,
    Send {
        recipients: Vec<String>,
        amount: Amount,
    },
    Status,
    Disconnect,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: send <to[,to...]> <amount>")]
    SendUsage,
    #[error(transparent)]
    Amount(#[from] WalletsimError),
}

impl FromStr for ShellCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        match head.to_ascii_lowercase().as_str() {
            "connect" => Ok(ShellCommand::Connect),
            "send" => {
                let (Some(to), Some(amount), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(CommandError::SendUsage);
                };
                let recipients = parse_recipients(to);
                if recipients.is_empty() {
                    return Err(CommandError::SendUsage);
                }
                Ok(ShellCommand::Send {
                    recipients,
                    amount: parse_amount(amount)?,
                })
            }
            "status" | "balance" => Ok(ShellCommand::Status),
            "disconnect" => Ok(ShellCommand::Disconnect),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Parses a user-entered amount. Non-positive input becomes zero so the
/// store reports it like any other rejected send.
pub fn parse_amount(text: &str) -> Result<Amount, WalletsimError> {
    match text.parse::<Amount>() {
        Err(WalletsimError::InvalidAmount) => Ok(Amount::ZERO),
        other => other,
    }
}
