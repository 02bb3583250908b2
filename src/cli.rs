//! Interactive command shell over a [`Blockchain`]
//!
//! Input is read as whitespace-separated tokens, so `mine 25` on one line
//! and `mine` followed by `25` on the next are the same thing. The chain is
//! printed before every prompt.

use crate::block::Block;
use crate::blockchain::Blockchain;
use crate::config::Config;
use crate::error::{ChainError, Result};
use colored::Colorize;
use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mine,
    Append,
    Remove,
    Check,
    Report,
    Dump,
    Help,
    Quit,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Mine,
        Command::Append,
        Command::Remove,
        Command::Check,
        Command::Report,
        Command::Dump,
        Command::Help,
        Command::Quit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Mine => "mine",
            Command::Append => "append",
            Command::Remove => "remove",
            Command::Check => "check",
            Command::Report => "report",
            Command::Dump => "dump",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Mine => "discovers the nonce for a given transaction",
            Command::Append => "appends a new block onto the end of the chain",
            Command::Remove => "removes the last block from the end of the chain",
            Command::Check => "checks that the block chain is valid",
            Command::Report => "reports the balances of both parties",
            Command::Dump => "prints the chain as JSON",
            Command::Help => "prints this list of commands",
            Command::Quit => "quits the program",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ChainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ChainError::InvalidInput(format!("unknown command '{}'", s)))
    }
}

/// Reads commands from `input` and writes responses to `output`.
pub struct Shell<R, W> {
    chain: Blockchain,
    config: Config,
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(chain: Blockchain, config: Config, input: R, output: W) -> Self {
        Self {
            chain,
            config,
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    pub fn chain(&self) -> &Blockchain {
        &self.chain
    }

    pub fn into_chain(self) -> Blockchain {
        self.chain
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", self.chain)?;
            write!(self.output, "Command? ")?;
            self.output.flush()?;

            let Some(token) = self.next_token()? else {
                writeln!(self.output)?;
                break;
            };

            match token.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(_) => writeln!(
                    self.output,
                    "Invalid command. Enter \"help\" to view valid commands."
                )?,
            }
            writeln!(self.output)?;
        }
        Ok(())
    }

    /// Executes one command. Chain rejections are reported to the user, not
    /// returned; only I/O failures are errors here.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Mine => self.mine(),
            Command::Append => self.append(),
            Command::Remove => {
                if !self.chain.remove_last() {
                    writeln!(self.output, "Only the genesis block is left; nothing removed.")?;
                }
                Ok(())
            }
            Command::Check => {
                match self.chain.validate() {
                    Ok(()) => writeln!(self.output, "{}", "Chain is valid!".green())?,
                    Err(e) => {
                        writeln!(self.output, "{}", "Chain is not valid!".red())?;
                        writeln!(self.output, "  {}", e)?;
                    }
                }
                Ok(())
            }
            Command::Report => {
                let report = self.chain.balances().report(&self.config.parties);
                writeln!(self.output, "{}", report)?;
                Ok(())
            }
            Command::Dump => {
                let blocks: Vec<&Block> = self.chain.iter().collect();
                writeln!(self.output, "{}", serde_json::to_string_pretty(&blocks)?)?;
                Ok(())
            }
            Command::Help => {
                writeln!(self.output, "Valid commands:")?;
                for command in Command::ALL {
                    writeln!(self.output, "    {}: {}", command, command.description())?;
                }
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    fn mine(&mut self) -> Result<()> {
        let Some(amount) = self.prompt::<i32>("Amount transferred? ")? else {
            return Ok(());
        };

        let start = Instant::now();
        match self.chain.mine_next(amount) {
            Ok(block) => {
                let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
                writeln!(self.output, "amount = {}, nonce = {}", amount, block.nonce())?;
                writeln!(
                    self.output,
                    "(mined in {})",
                    humantime::format_duration(elapsed)
                )?;
            }
            Err(e) => {
                warn!("Mining failed: {}", e);
                writeln!(self.output, "Error creating valid nonce ({}). Please try again.", e)?;
            }
        }
        Ok(())
    }

    fn append(&mut self) -> Result<()> {
        let Some(amount) = self.prompt::<i32>("Amount transferred? ")? else {
            return Ok(());
        };
        let Some(nonce) = self.prompt::<i64>("Nonce? ")? else {
            return Ok(());
        };

        let block = Block::from_nonce(
            self.chain.next_number(),
            amount,
            Some(self.chain.tail_hash().clone()),
            nonce,
        );
        if let Err(e) = self.chain.append(block) {
            writeln!(self.output, "Invalid block ({}). Please try again.", e)?;
        }
        Ok(())
    }

    /// Prompts for and parses one token. `None` means the answer was not a
    /// number (already reported) or the input ended.
    fn prompt<T: FromStr>(&mut self, question: &str) -> Result<Option<T>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let Some(token) = self.next_token()? else {
            return Ok(None);
        };
        match token.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.output, "'{}' is not a valid number.", token)?;
                Ok(None)
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Hash;
    use std::io::Cursor;

    /// A chain whose genesis was never mined; fine for everything but
    /// proof-of-work checks.
    fn unmined_chain() -> Blockchain {
        let genesis = Block::from_parts(0, 300, None, 0, Hash::new(&[0, 0, 0, 0xaa]));
        Blockchain::from_blocks(vec![genesis]).unwrap()
    }

    fn run_session(chain: Blockchain, script: &str) -> (String, Blockchain) {
        let mut output = Vec::new();
        let mut shell = Shell::new(chain, Config::default(), Cursor::new(script), &mut output);
        shell.run().unwrap();
        let chain = shell.into_chain();
        (String::from_utf8(output).unwrap(), chain)
    }

    #[test]
    fn test_command_parsing() {
        for command in Command::ALL {
            assert_eq!(command.name().parse::<Command>(), Ok(command));
        }
        assert!("MINE".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_help_lists_every_command() {
        let (output, _) = run_session(unmined_chain(), "help\nquit\n");
        assert!(output.contains("Valid commands:"));
        for command in Command::ALL {
            assert!(output.contains(&format!("    {}: ", command.name())));
        }
    }

    #[test]
    fn test_unknown_command() {
        let (output, _) = run_session(unmined_chain(), "dance\nquit\n");
        assert!(output.contains("Invalid command. Enter \"help\" to view valid commands."));
    }

    #[test]
    fn test_chain_is_printed_before_prompt() {
        let (output, _) = run_session(unmined_chain(), "quit\n");
        assert!(output.starts_with("Block 0 (Amount: 300, Nonce: 0, prevHash: none, hash: 000000aa)\n"));
        assert!(output.contains("Command? "));
    }

    #[test]
    fn test_report_uses_party_names() {
        let (output, _) = run_session(unmined_chain(), "report\nquit\n");
        assert!(output.contains("Alexis: 300, Blake: 0"));
    }

    #[test]
    fn test_remove_on_genesis_only_chain() {
        let (output, chain) = run_session(unmined_chain(), "remove\nquit\n");
        assert!(output.contains("nothing removed"));
        assert_eq!(chain.size(), 1);
    }

    #[test]
    fn test_check_reports_invalid_chain() {
        let (output, _) = run_session(unmined_chain(), "check\nquit\n");
        assert!(output.contains("Chain is not valid!"));
        assert!(output.contains("Hash mismatch"));
    }

    #[test]
    fn test_append_with_wrong_nonce_is_rejected() {
        let (output, chain) = run_session(unmined_chain(), "append -10 7\nquit\n");
        assert!(output.contains("Amount transferred? "));
        assert!(output.contains("Nonce? "));
        assert!(output.contains("Invalid block (Invalid proof of work"));
        assert_eq!(chain.size(), 1);
    }

    #[test]
    fn test_non_numeric_amount_returns_to_prompt() {
        let (output, chain) = run_session(unmined_chain(), "append\nlots\nquit\n");
        assert!(output.contains("'lots' is not a valid number."));
        assert!(!output.contains("Nonce? "));
        assert_eq!(chain.size(), 1);
    }

    #[test]
    fn test_dump_prints_json() {
        let (output, _) = run_session(unmined_chain(), "dump\nquit\n");
        assert!(output.contains("\"amount\": 300"));
        assert!(output.contains("\"hash\": \"000000aa\""));
    }

    #[test]
    fn test_end_of_input_stops_the_shell() {
        let (output, chain) = run_session(unmined_chain(), "report\n");
        assert!(output.contains("Alexis: 300, Blake: 0"));
        assert_eq!(chain.size(), 1);
    }
}
