//! Interactive session against a live in-memory vault.
//!
//! One command per line on stdin, one reply per line on stdout:
//!
//! ```text
//! put <name> <ttl-secs> <value...>   -> ok
//! get <name>                         -> <value>
//! del <name>                         -> deleted | absent
//! count                              -> <n>
//! quit
//! ```
//!
//! Failures reply `error: <message>` using the external message for the
//! error's class, so expired and missing secrets look the same.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::core::auth::{Authorizer, TokenWhitelist};
use crate::core::cipher::Cipher;
use crate::core::config::Config;
use crate::core::store::Backend;
use crate::core::vault::Vault;
use crate::error::Result;

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Put {
        name: String,
        ttl_secs: i64,
        value: String,
    },
    Get {
        name: String,
    },
    Del {
        name: String,
    },
    Count,
    Quit,
}

impl Request {
    /// Parse a line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let request = match verb {
            "put" => {
                let (name, rest) = split_word(rest);
                let (ttl, value) = split_word(rest);
                if name.is_empty() || ttl.is_empty() {
                    return Err("usage: put <name> <ttl-secs> <value>".to_string());
                }
                let ttl_secs = ttl
                    .parse::<i64>()
                    .map_err(|_| format!("invalid ttl: {}", ttl))?;
                Self::Put {
                    name: name.to_string(),
                    ttl_secs,
                    value: value.to_string(),
                }
            }
            "get" | "del" => {
                let (name, extra) = split_word(rest);
                if name.is_empty() || !extra.is_empty() {
                    return Err(format!("usage: {} <name>", verb));
                }
                let name = name.to_string();
                if verb == "get" {
                    Self::Get { name }
                } else {
                    Self::Del { name }
                }
            }
            "count" => Self::Count,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };
        Ok(Some(request))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

/// Authorize, open the vault, and serve stdin until EOF or `quit`.
pub fn execute(config_path: &Path, token: Option<&str>) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    TokenWhitelist::new(&config.auth.tokens).authorize(token)?;

    let mut vault = Vault::open(&config)?;
    info!("session started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = serve(&vault, stdin.lock(), stdout.lock());

    vault.shutdown();
    info!("session ended");
    result
}

/// Serve requests from `input`, writing one reply per line to `out`.
pub fn serve<C, B, R, W>(vault: &Vault<C, B>, input: R, mut out: W) -> Result<()>
where
    C: Cipher,
    B: Backend,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let request = match Request::parse(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(usage) => {
                writeln!(out, "error: {}", usage)?;
                continue;
            }
        };

        match request {
            Request::Put {
                name,
                ttl_secs,
                value,
            } => match vault.put(&name, value.as_bytes(), ttl_secs) {
                Ok(()) => writeln!(out, "ok")?,
                Err(e) => reply_error(&mut out, &e)?,
            },
            Request::Get { name } => match vault.get(&name) {
                Ok(plaintext) => {
                    out.write_all(&plaintext)?;
                    out.write_all(b"\n")?;
                }
                Err(e) => reply_error(&mut out, &e)?,
            },
            Request::Del { name } => match vault.delete(&name) {
                Ok(true) => writeln!(out, "deleted")?,
                Ok(false) => writeln!(out, "absent")?,
                Err(e) => reply_error(&mut out, &e)?,
            },
            Request::Count => writeln!(out, "{}", vault.len())?,
            Request::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}

fn reply_error<W: Write>(out: &mut W, err: &crate::error::Error) -> io::Result<()> {
    debug!(error = %err, "request failed");
    writeln!(out, "error: {}", err.public_message())
}
