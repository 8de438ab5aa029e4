//! Interactive ledger session: command parsing, input checks and rendering

use crate::blockchain::{Block, Ledger};
use crate::error::{ChainError, Result};
use crate::record::Record;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub const HELP: &str = "\
Commands:
  add <sender> <receiver> <amount>   mine and append a transfer record
  show                               list every block
  inspect <index>                    show one block in detail
  difficulty [n]                     show or set the mining difficulty
  validate                           check prev-hash linkage
  audit                              check each block's proof of work
  tamper <index> <prev_hash>         overwrite a stored prev-hash
  export                             print the chain as JSON
  help                               show this text
  quit                               leave the session
Names containing spaces can be wrapped in double quotes.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        sender: String,
        receiver: String,
        amount: f64,
    },
    Show,
    Inspect(usize),
    Difficulty(Option<u32>),
    Validate,
    Audit,
    Tamper {
        index: usize,
        prev_hash: String,
    },
    Export,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a command line on whitespace, keeping double-quoted runs together.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(ChainError::InvalidCommand("unterminated quote".to_string()));
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse a transfer amount. Rejects text that is not a finite, non-negative number.
pub fn parse_amount(text: &str) -> Result<f64> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| ChainError::InvalidAmount(format!("'{}' is not a number", text)))?;
    if !amount.is_finite() {
        return Err(ChainError::InvalidAmount(format!("'{}' is not finite", text)));
    }
    if amount < 0.0 {
        return Err(ChainError::InvalidAmount(format!("'{}' is negative", text)));
    }
    Ok(amount)
}

fn parse_index(text: &str) -> Result<usize> {
    text.parse()
        .map_err(|_| ChainError::InvalidCommand(format!("'{}' is not a block index", text)))
}

fn usage(text: &str) -> ChainError {
    ChainError::InvalidCommand(format!("usage: {}", text))
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("add", [sender, receiver, amount]) => {
            if sender.is_empty() || receiver.is_empty() {
                return Err(ChainError::InvalidCommand(
                    "sender and receiver must not be empty".to_string(),
                ));
            }
            Command::Add {
                sender: sender.clone(),
                receiver: receiver.clone(),
                amount: parse_amount(amount)?,
            }
        }
        ("add", _) => return Err(usage("add <sender> <receiver> <amount>")),
        ("show", []) => Command::Show,
        ("inspect", [index]) => Command::Inspect(parse_index(index)?),
        ("inspect", _) => return Err(usage("inspect <index>")),
        ("difficulty", []) => Command::Difficulty(None),
        ("difficulty", [value]) => Command::Difficulty(Some(value.parse().map_err(|_| {
            ChainError::InvalidCommand(format!("'{}' is not a non-negative integer", value))
        })?)),
        ("difficulty", _) => return Err(usage("difficulty [n]")),
        ("validate", []) => Command::Validate,
        ("audit", []) => Command::Audit,
        ("tamper", [index, prev_hash]) => Command::Tamper {
            index: parse_index(index)?,
            prev_hash: prev_hash.clone(),
        },
        ("tamper", _) => return Err(usage("tamper <index> <prev_hash>")),
        ("export", []) => Command::Export,
        ("help", _) | ("?", _) => Command::Help,
        ("quit", _) | ("exit", _) => Command::Quit,
        (other, _) => {
            return Err(ChainError::InvalidCommand(format!(
                "unknown command '{}', try 'help'",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn short_hash(hash: &str) -> String {
    // Tampered prev-hashes are arbitrary user text, so cut on chars.
    if hash.chars().count() > 16 {
        format!("{}…", hash.chars().take(16).collect::<String>())
    } else {
        hash.to_string()
    }
}

/// Render the whole chain as a table.
pub fn render_chain(ledger: &Ledger) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["#", "Sender", "Receiver", "Amount", "Creator", "Timestamp", "Nonce", "Prev Hash", "Hash"]
                .into_iter()
                .map(|title| {
                    Cell::new(title)
                        .fg(TableColor::Cyan)
                        .add_attribute(Attribute::Bold)
                }),
        );

    for (index, block) in ledger.chain().iter().enumerate() {
        let record = block.record();
        table.add_row(vec![
            Cell::new(format!("#{}", index)).fg(TableColor::White),
            Cell::new(record.sender()),
            Cell::new(record.receiver()),
            Cell::new(format!("{:.2}", record.amount())).fg(TableColor::Green),
            Cell::new(block.creator_id()),
            Cell::new(block.timestamp().format("%Y-%m-%d %H:%M:%S")).fg(TableColor::Grey),
            Cell::new(block.nonce()),
            Cell::new(short_hash(block.prev_hash())).fg(TableColor::Grey),
            Cell::new(short_hash(&block.hash())).fg(TableColor::Yellow),
        ]);
    }
    table
}

/// Multi-line description of a single block.
pub fn describe_block(index: usize, block: &Block) -> String {
    let record = block.record();
    let mined = block
        .mined_difficulty()
        .map_or_else(|| "not mined".to_string(), |d| d.to_string());
    format!(
        "Block #{index}\n  Hash:              {}\n  Previous hash:     {}\n  Sender:            {}\n  Receiver:          {}\n  Amount:            {}\n  Creator id:        {}\n  Timestamp:         {}\n  Nonce:             {}\n  Mined difficulty:  {}",
        block.hash(),
        block.prev_hash(),
        record.sender(),
        record.receiver(),
        record.amount(),
        block.creator_id(),
        block.timestamp_text(),
        block.nonce(),
        mined,
    )
}

/// A single-writer session owning one ledger.
pub struct Session {
    ledger: Ledger,
    creator_id: u64,
}

impl Session {
    pub fn new(ledger: Ledger, creator_id: u64) -> Self {
        Session { ledger, creator_id }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn creator_id(&self) -> u64 {
        self.creator_id
    }

    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        debug!(?command, "executing command");
        match command {
            Command::Add {
                sender,
                receiver,
                amount,
            } => {
                let candidate = Block::new(
                    Record::new(sender, receiver, amount),
                    self.creator_id,
                    self.ledger.tail_hash(),
                );
                let report = self.ledger.add_block_with_report(candidate);
                let index = self.ledger.len() - 1;
                let tail = self.ledger.tail();
                writeln!(
                    out,
                    "{} {}",
                    format!("Block #{} mined", index).green().bold(),
                    tail.hash()
                )?;
                writeln!(
                    out,
                    "  nonce {} after {} attempts in {:.3}s (difficulty {})",
                    tail.nonce(),
                    report.attempts,
                    report.elapsed.as_secs_f64(),
                    self.ledger.difficulty()
                )?;
            }
            Command::Show => {
                writeln!(out, "{}", render_chain(&self.ledger))?;
            }
            Command::Inspect(index) => {
                let block = self
                    .ledger
                    .get(index)
                    .ok_or(ChainError::BlockNotFound(index))?;
                writeln!(out, "{}", describe_block(index, block))?;
            }
            Command::Difficulty(None) => {
                writeln!(out, "Difficulty: {}", self.ledger.difficulty())?;
            }
            Command::Difficulty(Some(difficulty)) => {
                self.ledger.set_difficulty(difficulty)?;
                writeln!(out, "Difficulty set to {}", difficulty)?;
            }
            Command::Validate => match self.ledger.first_broken_link() {
                None => writeln!(out, "{}", "Chain is valid".green().bold())?,
                Some(index) => writeln!(
                    out,
                    "{}",
                    format!("Chain is invalid: linkage broken at block #{}", index)
                        .red()
                        .bold()
                )?,
            },
            Command::Audit => match self.ledger.verify_work() {
                Ok(()) => writeln!(out, "{}", "Every block carries valid proof of work".green())?,
                Err(e) => writeln!(out, "{}", e.to_string().red())?,
            },
            Command::Tamper { index, prev_hash } => {
                let block = self
                    .ledger
                    .block_mut(index)
                    .ok_or(ChainError::BlockNotFound(index))?;
                warn!(index, %prev_hash, "overwriting stored prev-hash");
                block.set_prev_hash(prev_hash);
                writeln!(out, "{}", format!("Block #{} prev-hash overwritten", index).yellow())?;
            }
            Command::Export => {
                writeln!(out, "{}", serde_json::to_string_pretty(&self.ledger)?)?;
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands line by line until `quit` or end of input.
    ///
    /// Command errors are reported to `out` and the session carries on;
    /// only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        write!(out, "{}", "bankchain> ".bright_cyan())?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            let outcome = parse_command(&line).and_then(|command| match command {
                Some(command) => self.execute(command, out),
                None => Ok(Flow::Continue),
            });

            match outcome {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(ChainError::Io(e)) => return Err(ChainError::Io(e)),
                Err(e) => writeln!(out, "{}", format!("error: {}", e).red())?,
            }

            write!(out, "{}", "bankchain> ".bright_cyan())?;
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(difficulty: u32) -> Session {
        Session::new(Ledger::new(difficulty).unwrap(), 42)
    }

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"add "Bank of America" "Capital One" 5003.23"#).unwrap(),
            vec!["add", "Bank of America", "Capital One", "5003.23"]
        );
        assert_eq!(tokenize("  show  ").unwrap(), vec!["show"]);
        assert_eq!(tokenize(r#"add "" B 1"#).unwrap(), vec!["add", "", "B", "1"]);
        assert!(tokenize(r#"add "Alice Bob 1"#).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10.5").unwrap(), 10.5);
        assert_eq!(parse_amount(" 0 ").unwrap(), 0.0);
        assert!(matches!(parse_amount("ten"), Err(ChainError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(ChainError::InvalidAmount(_))));
        assert!(matches!(parse_amount("inf"), Err(ChainError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-1"), Err(ChainError::InvalidAmount(_))));
    }

    #[test]
    fn test_negative_zero_amount_hashes_like_zero() {
        let amount = parse_amount("-0").unwrap();
        let parsed = Record::new("A", "B", amount);
        let plain = Record::new("A", "B", 0.0);
        assert_eq!(parsed, plain);
        assert_eq!(parsed.to_string(), plain.to_string());

        let timestamp = chrono::Utc::now();
        assert_eq!(
            Block::with_timestamp(parsed, 1, "0", timestamp).hash(),
            Block::with_timestamp(plain, 1, "0", timestamp).hash()
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(
            parse_command("add Alice Bob 100").unwrap(),
            Some(Command::Add {
                sender: "Alice".to_string(),
                receiver: "Bob".to_string(),
                amount: 100.0
            })
        );
        assert_eq!(parse_command("SHOW").unwrap(), Some(Command::Show));
        assert_eq!(parse_command("inspect 3").unwrap(), Some(Command::Inspect(3)));
        assert_eq!(parse_command("difficulty").unwrap(), Some(Command::Difficulty(None)));
        assert_eq!(parse_command("difficulty 5").unwrap(), Some(Command::Difficulty(Some(5))));
        assert_eq!(
            parse_command("tamper 1 deadbeef").unwrap(),
            Some(Command::Tamper {
                index: 1,
                prev_hash: "deadbeef".to_string()
            })
        );
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_command("add Alice Bob"), Err(ChainError::InvalidCommand(_))));
        assert!(matches!(parse_command("add Alice Bob lots"), Err(ChainError::InvalidAmount(_))));
        assert!(matches!(parse_command(r#"add "" Bob 1"#), Err(ChainError::InvalidCommand(_))));
        assert!(matches!(parse_command("difficulty -1"), Err(ChainError::InvalidCommand(_))));
        assert!(matches!(parse_command("inspect x"), Err(ChainError::InvalidCommand(_))));
        assert!(matches!(parse_command("mine"), Err(ChainError::InvalidCommand(_))));
    }

    #[test]
    fn test_add_uses_tail_hash_and_creator() {
        let mut session = session(1);
        let genesis_hash = session.ledger().tail_hash();
        let mut out = Vec::new();
        let flow = session
            .execute(
                Command::Add {
                    sender: "Alice".to_string(),
                    receiver: "Bob".to_string(),
                    amount: 100.0,
                },
                &mut out,
            )
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        let tail = session.ledger().tail();
        assert_eq!(tail.prev_hash(), genesis_hash);
        assert_eq!(tail.creator_id(), 42);
        assert!(tail.hash().starts_with('0'));
        assert!(String::from_utf8(out).unwrap().contains("Block #1 mined"));
    }

    #[test]
    fn test_script_validate_and_tamper() {
        let mut session = session(0);
        let output = run_script(
            &mut session,
            "add Alice Bob 10\nadd Bob Carol 5\nvalidate\ntamper 2 deadbeef\nvalidate\nquit\nshow\n",
        );
        assert!(output.contains("Chain is valid"));
        assert!(output.contains("linkage broken at block #2"));
        assert_eq!(session.ledger().len(), 3);
        assert!(!session.ledger().is_valid());
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let mut session = session(0);
        let output = run_script(&mut session, "add Alice Bob ten\ninspect 9\ndifficulty 99\nadd A B 1\n");
        assert!(output.contains("Invalid amount"));
        assert!(output.contains("Block not found: 9"));
        assert!(output.contains("Invalid difficulty 99"));
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().difficulty(), 0);
    }

    #[test]
    fn test_show_inspect_and_export() {
        let mut session = session(0);
        let output = run_script(&mut session, "add \"Bank of America\" Bob 5003.23\nshow\ninspect 1\nexport\n");
        assert!(output.contains("Bank of America"));
        assert!(output.contains("5003.23"));
        assert!(output.contains(&session.ledger().tail_hash()));
        assert!(output.contains("\"difficulty\": 0"));
    }

    #[test]
    fn test_audit_passes_for_mined_blocks() {
        let mut session = session(0);
        run_script(&mut session, "add A B 1\n");
        let mut out = Vec::new();
        session.execute(Command::Audit, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Every block carries valid proof of work"));
    }
}
