//! Wire protocol: the fixed-size request/response frame.
//!
//! Both directions use the same 38-byte frame, transmitted at full fixed
//! size regardless of the generated password's actual length:
//!
//! | offset | size | field                                        |
//! |--------|------|----------------------------------------------|
//! | 0      | 1    | request tag (`n`, `a`, `m`, `s`, or `q`)     |
//! | 1      | 4    | requested length, little-endian `i32`        |
//! | 5      | 33   | password, NUL-terminated, zero-padded        |
//!
//! The password field is meaningful only in responses; requests carry it
//! zeroed. Decoding a frame never fails — validation of the tag and length
//! is a separate step (`Frame::command`) so the server can decide what to do
//! with malformed requests.

use bytes::BytesMut;
use std::str;

/// Minimum accepted password length.
pub const MIN_LENGTH: i32 = 6;

/// Maximum accepted password length.
pub const MAX_LENGTH: i32 = 32;

/// Size of the password field: `MAX_LENGTH` characters plus the NUL.
pub const PASSWORD_FIELD: usize = MAX_LENGTH as usize + 1;

/// Total frame size on the wire, both directions.
pub const FRAME_LEN: usize = 1 + 4 + PASSWORD_FIELD;

/// Tag byte requesting session termination.
pub const TAG_QUIT: u8 = b'q';

/// Default server endpoint.
pub const DEFAULT_ADDR: &str = "127.0.0.1:60000";

/// Listen backlog for the server socket.
pub const LISTEN_BACKLOG: i32 = 5;

/// Password generation policy selected by a request tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateKind {
    /// `n`: digits only.
    Numeric,
    /// `a`: lowercase letters only (no digits, despite the name).
    Alpha,
    /// `m`: per position, a 50/50 pick between a lowercase letter and a digit.
    Mixed,
    /// `s`: uppercase, lowercase, digits, and symbols.
    Secure,
}

impl GenerateKind {
    /// Map a wire tag to a generation policy.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'n' => Some(GenerateKind::Numeric),
            b'a' => Some(GenerateKind::Alpha),
            b'm' => Some(GenerateKind::Mixed),
            b's' => Some(GenerateKind::Secure),
            _ => None,
        }
    }

    /// The wire tag for this policy.
    pub fn tag(self) -> u8 {
        match self {
            GenerateKind::Numeric => b'n',
            GenerateKind::Alpha => b'a',
            GenerateKind::Mixed => b'm',
            GenerateKind::Secure => b's',
        }
    }
}

/// Validated view of a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Generate a password of `length` characters under `kind`'s policy.
    Generate { kind: GenerateKind, length: i32 },
    /// Close the session.
    Quit,
}

/// Frame validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Requested length outside `[MIN_LENGTH, MAX_LENGTH]`.
    LengthOutOfRange(i32),
    /// Tag is not one of `n`, `a`, `m`, `s`, `q`.
    UnknownKind(u8),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::LengthOutOfRange(len) => write!(
                f,
                "password length {} not in [{}, {}]",
                len, MIN_LENGTH, MAX_LENGTH
            ),
            ProtocolError::UnknownKind(tag) => {
                write!(f, "unknown request type '{}'", char::from(*tag))
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// One request/response record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    tag: u8,
    length: i32,
    password: [u8; PASSWORD_FIELD],
}

impl Frame {
    /// Build a generation request. The password field starts zeroed.
    pub fn request(tag: u8, length: i32) -> Self {
        Frame {
            tag,
            length,
            password: [0; PASSWORD_FIELD],
        }
    }

    /// Build a quit request. The length field is ignored by the server.
    pub fn quit() -> Self {
        Frame::request(TAG_QUIT, 0)
    }

    /// Decode a frame from a raw buffer. Never fails: validation of the
    /// decoded fields is `command`'s job.
    pub fn from_bytes(raw: &[u8; FRAME_LEN]) -> Self {
        let tag = raw[0];
        let length = i32::from_le_bytes([raw[1], raw[2], raw[3], raw[4]]);
        let mut password = [0; PASSWORD_FIELD];
        password.copy_from_slice(&raw[5..FRAME_LEN]);
        Frame {
            tag,
            length,
            password,
        }
    }

    /// Append the full fixed-size encoding to `out`.
    pub fn encode(&self, out: &mut BytesMut) {
        out.extend_from_slice(&[self.tag]);
        out.extend_from_slice(&self.length.to_le_bytes());
        out.extend_from_slice(&self.password);
    }

    /// The raw request tag.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// The raw requested length.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// The password field up to its NUL terminator.
    ///
    /// Generated passwords are always ASCII, so a non-UTF-8 field can only
    /// come from a foreign peer; it reads as empty rather than failing.
    pub fn password(&self) -> &str {
        let end = self
            .password
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PASSWORD_FIELD);
        str::from_utf8(&self.password[..end]).unwrap_or("")
    }

    /// Write `password` into the field, NUL-terminated and zero-padded.
    /// Anything past `MAX_LENGTH` characters is truncated.
    pub fn set_password(&mut self, password: &str) {
        self.password = [0; PASSWORD_FIELD];
        let bytes = password.as_bytes();
        let len = bytes.len().min(MAX_LENGTH as usize);
        self.password[..len].copy_from_slice(&bytes[..len]);
    }

    /// Validate the frame into a `Command`.
    ///
    /// Quit wins outright; the length range is checked before the tag, so a
    /// frame with both problems reports the length.
    pub fn command(&self) -> Result<Command, ProtocolError> {
        if self.tag == TAG_QUIT {
            return Ok(Command::Quit);
        }
        if self.length < MIN_LENGTH || self.length > MAX_LENGTH {
            return Err(ProtocolError::LengthOutOfRange(self.length));
        }
        match GenerateKind::from_tag(self.tag) {
            Some(kind) => Ok(Command::Generate {
                kind,
                length: self.length,
            }),
            None => Err(ProtocolError::UnknownKind(self.tag)),
        }
    }
}
