//! Line-based command language used by `nio run` and `nio shell`.
//!
//! One command per line; blank lines and lines starting with `#` are
//! skipped. Open files are referred to by an id chosen in `open`.
//!
//! ```text
//! open f test_file
//! write f 0 0a0b0c
//! write f 3 "hello"
//! setlength f 5
//! read f 0 5
//! close f
//! rename test_file new_name
//! list
//! ```

use anyhow::{Context, anyhow, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open { id: String, name: String },
    Close { id: String },
    Read { id: String, offset: u64, len: usize },
    Write { id: String, offset: u64, bytes: Vec<u8> },
    SetLength { id: String, len: u64 },
    GetLength { id: String },
    Rename { old_name: String, new_name: String },
    Delete { name: String },
    List,
}

/// Parses one line. Returns `None` for blank lines and comments.
pub fn parse_line(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);
    let command = match verb.to_ascii_lowercase().as_str() {
        "open" => {
            let [id, name] = words::<2>(rest, verb)?;
            Command::Open { id, name }
        }
        "close" => {
            let [id] = words::<1>(rest, verb)?;
            Command::Close { id }
        }
        "read" => {
            let [id, offset, len] = words::<3>(rest, verb)?;
            Command::Read {
                id,
                offset: parse_number(&offset, "offset")?,
                len: parse_number(&len, "length")?,
            }
        }
        "write" => {
            let (id, rest) = split_word(rest);
            let (offset, payload) = split_word(rest);
            if id.is_empty() || offset.is_empty() || payload.is_empty() {
                bail!("usage: write <id> <offset> <hex|\"text\">");
            }
            Command::Write {
                id: id.to_owned(),
                offset: parse_number(offset, "offset")?,
                bytes: parse_payload(payload)?,
            }
        }
        "setlength" => {
            let [id, len] = words::<2>(rest, verb)?;
            Command::SetLength {
                id,
                len: parse_number(&len, "length")?,
            }
        }
        "getlength" => {
            let [id] = words::<1>(rest, verb)?;
            Command::GetLength { id }
        }
        "rename" => {
            let [old_name, new_name] = words::<2>(rest, verb)?;
            Command::Rename { old_name, new_name }
        }
        "delete" => {
            let [name] = words::<1>(rest, verb)?;
            Command::Delete { name }
        }
        "list" => {
            words::<0>(rest, verb)?;
            Command::List
        }
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn words<const N: usize>(rest: &str, verb: &str) -> anyhow::Result<[String; N]> {
    let words: Vec<String> = rest.split_whitespace().map(str::to_owned).collect();
    let found = words.len();
    words
        .try_into()
        .map_err(|_| anyhow!("'{}' takes {} argument(s), got {}", verb, N, found))
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse().with_context(|| format!("invalid {} '{}'", what, s))
}

/// `"text"` is taken literally; anything else is hex.
fn parse_payload(payload: &str) -> anyhow::Result<Vec<u8>> {
    if let Some(text) = payload
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    {
        return Ok(text.as_bytes().to_vec());
    }
    hex::decode(payload).with_context(|| format!("invalid hex payload '{}'", payload))
}
