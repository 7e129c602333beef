use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::DELIMITER;

/// Argument separator in the command dialect.
pub const SEPARATOR: char = '\t';

/// Additive checksum over `joined` plus one trailing tab.
///
/// Sums the code point of every character, separators included. No modulus
/// is applied; the device's own formula is reproduced as observed.
pub fn checksum(joined: &str) -> u64 {
    joined
        .chars()
        .chain(std::iter::once(SEPARATOR))
        .map(|c| u64::from(u32::from(c)))
        .sum()
}

/// Encode a command into the outgoing wire form.
///
/// Wire format:
/// ```text
/// ┌──────────────────────────┬─────┬─────────────────┬─────┐
/// │ args joined by \t        │ \t  │ decimal checksum │ \r  │
/// └──────────────────────────┴─────┴─────────────────┴─────┘
/// ```
///
/// Arguments must not contain `\t` or `\r`; nothing is escaped.
pub fn encode_command<S: AsRef<str>>(args: &[S], dst: &mut BytesMut) {
    let joined = join(args);
    let sum = checksum(&joined).to_string();

    dst.reserve(joined.len() + sum.len() + 2);
    dst.put_slice(joined.as_bytes());
    dst.put_u8(SEPARATOR as u8);
    dst.put_slice(sum.as_bytes());
    dst.put_u8(DELIMITER);
}

fn join<S: AsRef<str>>(args: &[S]) -> String {
    let mut joined = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            joined.push(SEPARATOR);
        }
        joined.push_str(arg.as_ref());
    }
    joined
}

/// An outgoing command: ordered arguments, checksummed on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    /// Start a command with its leading keyword, e.g. `"GSI"` or `"KEY"`.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            args: vec![keyword.into()],
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn as_args(&self) -> &[String] {
        &self.args
    }

    pub fn checksum(&self) -> u64 {
        checksum(&join(&self.args))
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        encode_command(&self.args, dst);
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

impl<S: Into<String>> FromIterator<S> for Command {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().map(Into::into).collect(),
        }
    }
}
