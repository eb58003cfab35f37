//! # Command Console
//!
//! Line-oriented driver for the lifecycle calls.
//!
//! ```text
//! [@CHAIN] echo MESSAGE
//! [@CHAIN] info
//! [@CHAIN] set_option KEY VALUE
//! [@CHAIN] init_chain
//! [@CHAIN] check_tx TX
//! [@CHAIN] deliver_tx TX
//! [@CHAIN] commit
//! [@CHAIN] query DATA [PATH] [prove]
//! ```
//!
//! Byte arguments are `0x`-prefixed hex, a double-quoted string or a bare
//! word. Without `@CHAIN` the request carries an empty chain id and the
//! dispatcher's default applies. Blank lines and lines starting with `#`
//! are skipped.

use anyhow::Result;
use shared_types::{
    AppError, Application, RequestCheckTx, RequestCommit, RequestDeliverTx, RequestEcho,
    RequestInfo, RequestInitChain, RequestQuery, RequestSetOption, ResponseCode,
};
use std::io::{BufRead, Write};
use thiserror::Error;

/// Malformed console input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{command}: missing argument {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument {argument:?}")]
    UnexpectedArgument { command: String, argument: String },

    #[error("invalid hex argument {0:?}")]
    InvalidHex(String),

    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error("empty chain override")]
    EmptyChainOverride,
}

/// A lifecycle call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Echo(String),
    Info,
    SetOption { key: String, value: String },
    InitChain,
    CheckTx(Vec<u8>),
    DeliverTx(Vec<u8>),
    Commit,
    Query {
        data: Vec<u8>,
        path: String,
        prove: bool,
    },
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Empty unless the line started with `@CHAIN`.
    pub chain_id: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(ch) => text.push(ch),
                    None => return Err(ParseError::UnterminatedQuote),
                }
            }
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                text.push(ch);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }
    Ok(tokens)
}

/// Decode a byte argument.
fn decode_bytes(token: &Token) -> Result<Vec<u8>, ParseError> {
    if !token.quoted {
        if let Some(hex_str) = token
            .text
            .strip_prefix("0x")
            .or_else(|| token.text.strip_prefix("0X"))
        {
            return hex::decode(hex_str).map_err(|_| ParseError::InvalidHex(token.text.clone()));
        }
    }
    Ok(token.text.clone().into_bytes())
}

/// Parse one input line. Returns `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = tokenize(trimmed)?.into_iter();
    let Some(mut head) = tokens.next() else {
        return Ok(None);
    };

    let mut chain_id = String::new();
    if !head.quoted {
        if let Some(id) = head.text.strip_prefix('@') {
            if id.is_empty() {
                return Err(ParseError::EmptyChainOverride);
            }
            chain_id = id.to_string();
            head = match tokens.next() {
                Some(token) => token,
                None => return Ok(None),
            };
        }
    }

    let args: Vec<Token> = tokens.collect();
    let action = parse_action(&head.text, &args)?;
    Ok(Some(Command { chain_id, action }))
}

fn expect_args(
    command: &'static str,
    args: &[Token],
    max: usize,
) -> Result<(), ParseError> {
    match args.get(max) {
        Some(extra) => Err(ParseError::UnexpectedArgument {
            command: command.to_string(),
            argument: extra.text.clone(),
        }),
        None => Ok(()),
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    args: &'a [Token],
    index: usize,
) -> Result<&'a Token, ParseError> {
    args.get(index)
        .ok_or(ParseError::MissingArgument { command, argument })
}

fn parse_action(name: &str, args: &[Token]) -> Result<Action, ParseError> {
    let action = match name {
        "echo" => {
            let message = args
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Action::Echo(message)
        }
        "info" => {
            expect_args("info", args, 0)?;
            Action::Info
        }
        "set_option" => {
            expect_args("set_option", args, 2)?;
            let key = required("set_option", "KEY", args, 0)?.text.clone();
            let value = required("set_option", "VALUE", args, 1)?.text.clone();
            Action::SetOption { key, value }
        }
        "init_chain" => {
            expect_args("init_chain", args, 0)?;
            Action::InitChain
        }
        "check_tx" => {
            expect_args("check_tx", args, 1)?;
            Action::CheckTx(decode_bytes(required("check_tx", "TX", args, 0)?)?)
        }
        "deliver_tx" => {
            expect_args("deliver_tx", args, 1)?;
            Action::DeliverTx(decode_bytes(required("deliver_tx", "TX", args, 0)?)?)
        }
        "commit" => {
            expect_args("commit", args, 0)?;
            Action::Commit
        }
        "query" => {
            expect_args("query", args, 3)?;
            let data = decode_bytes(required("query", "DATA", args, 0)?)?;
            let (path, prove) = match &args[1..] {
                [] => (String::new(), false),
                [flag] if !flag.quoted && flag.text == "prove" => (String::new(), true),
                [path] => (path.text.clone(), false),
                [path, flag] if !flag.quoted && flag.text == "prove" => (path.text.clone(), true),
                [_, other, ..] => {
                    return Err(ParseError::UnexpectedArgument {
                        command: "query".to_string(),
                        argument: other.text.clone(),
                    })
                }
            };
            Action::Query { data, path, prove }
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(action)
}

fn code_name(code: u32) -> String {
    ResponseCode::from_u32(code)
        .map(|c| c.to_string())
        .unwrap_or_else(|| code.to_string())
}

fn push_bytes(out: &mut Vec<String>, label: &str, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        if !text.chars().any(char::is_control) {
            out.push(format!("-> {}: {}", label, text));
        }
    }
    out.push(format!("-> {}.hex: 0x{}", label, hex::encode_upper(bytes)));
}

fn push_text(out: &mut Vec<String>, label: &str, text: &str) {
    if !text.is_empty() {
        out.push(format!("-> {}: {}", label, text));
    }
}

/// Run one command against `app` and render the response.
pub fn execute(app: &mut dyn Application, command: Command) -> Result<Vec<String>, AppError> {
    let chain_id = command.chain_id;
    let mut out = Vec::new();

    match command.action {
        Action::Echo(message) => {
            let res = app.echo(RequestEcho { message });
            out.push(format!("-> data: {}", res.message));
        }
        Action::Info => {
            let res = app.info(RequestInfo {
                chain_id,
                version: String::new(),
            })?;
            out.push(format!("-> data: {}", res.data));
            push_text(&mut out, "version", &res.version);
            if res.app_version != 0 {
                out.push(format!("-> app_version: {}", res.app_version));
            }
            if res.last_block_height != 0 {
                out.push(format!("-> last_block_height: {}", res.last_block_height));
            }
            push_bytes(&mut out, "last_block_app_hash", &res.last_block_app_hash);
        }
        Action::SetOption { key, value } => {
            let res = app.set_option(RequestSetOption {
                chain_id,
                key,
                value,
            })?;
            out.push(format!("-> code: {}", code_name(res.code)));
            push_text(&mut out, "log", &res.log);
        }
        Action::InitChain => {
            app.init_chain(RequestInitChain {
                chain_id,
                ..Default::default()
            })?;
            out.push(format!("-> code: {}", ResponseCode::Ok));
        }
        Action::CheckTx(tx) => {
            let res = app.check_tx(RequestCheckTx {
                chain_id,
                tx,
                ..Default::default()
            })?;
            out.push(format!("-> code: {}", code_name(res.code)));
            push_text(&mut out, "log", &res.log);
            push_bytes(&mut out, "data", &res.data);
        }
        Action::DeliverTx(tx) => {
            let res = app.deliver_tx(RequestDeliverTx { chain_id, tx })?;
            out.push(format!("-> code: {}", code_name(res.code)));
            push_text(&mut out, "log", &res.log);
            push_bytes(&mut out, "data", &res.data);
        }
        Action::Commit => {
            let res = app.commit(RequestCommit { chain_id })?;
            out.push(format!("-> code: {}", ResponseCode::Ok));
            push_bytes(&mut out, "data", &res.data);
        }
        Action::Query { data, path, prove } => {
            let res = app.query(RequestQuery {
                chain_id,
                data,
                path,
                height: 0,
                prove,
            })?;
            out.push(format!("-> code: {}", code_name(res.code)));
            push_text(&mut out, "log", &res.log);
            out.push(format!("-> height: {}", res.height));
            push_bytes(&mut out, "key", &res.key);
            push_bytes(&mut out, "value", &res.value);
        }
    }
    Ok(out)
}

/// Read commands from `input` until EOF, writing responses to `output`.
///
/// Parse errors and chain id faults are reported and skipped; any other
/// application fault stops the console.
pub fn run<R: BufRead, W: Write>(app: &mut dyn Application, input: R, mut output: W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(output, "-> error: {}", err)?;
                continue;
            }
        };

        match execute(app, command) {
            Ok(lines) => {
                for l in lines {
                    writeln!(output, "{}", l)?;
                }
            }
            Err(err) if err.is_precondition() => {
                writeln!(output, "-> error: {}", err)?;
            }
            Err(err) => {
                tracing::error!(error = %err, "application fault");
                return Err(err.into());
            }
        }
        output.flush()?;
    }
    app.flush()?;
    Ok(())
}
