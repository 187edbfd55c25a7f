//! Interactive client for the password generation server.
//!
//! Reads console lines of the shape `<type-char> <length>`, validates them
//! locally, and only contacts the server with requests it will answer. The
//! server silently drops invalid frames, so sending one would leave the
//! client blocked on a response that never comes; local validation keeps
//! that from happening.

use crate::config::ClientConfig;
use crate::protocol::{Frame, GenerateKind, FRAME_LEN, MAX_LENGTH, MIN_LENGTH};
use bytes::BytesMut;
use std::io::{self, BufRead, Read, Write};
use std::net::TcpStream;
use tracing::error;

/// Console line-buffer capacity.
const INPUT_CAPACITY: usize = 64;

const MENU: &str = "
What password do you want to generate?
 n  numeric password (digits only)
 a  alphabetic password (lowercase letters only)
 m  mixed password (digits and lowercase letters)
 s  secure password (upper/lowercase letters, digits and symbols)";

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Generate a password.
    Request { kind: GenerateKind, length: i32 },
    /// End the session.
    Quit,
}

/// Console input errors. `Display` output is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Blank line.
    Empty,
    /// First token is not one of `n`, `a`, `m`, `s`, `q`.
    UnknownKind(String),
    /// No length token after the type.
    MissingLength,
    /// Length token is not an integer.
    InvalidLength(String),
    /// Length outside `[MIN_LENGTH, MAX_LENGTH]`.
    LengthOutOfRange(i32),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Empty => write!(f, "Invalid input. Try again."),
            InputError::UnknownKind(token) => {
                write!(f, "Unknown password type '{}'. Use n, a, m, s or q.", token)
            }
            InputError::MissingLength => {
                write!(f, "Enter a length after the type, e.g. 'n 10'.")
            }
            InputError::InvalidLength(token) => write!(f, "Invalid length '{}'.", token),
            InputError::LengthOutOfRange(_) => write!(
                f,
                "Password length must be between {} and {}.",
                MIN_LENGTH, MAX_LENGTH
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// Parse one console line into an `Input`.
pub fn parse_input(line: &str) -> Result<Input, InputError> {
    let mut tokens = line.split_whitespace();
    let tag = tokens.next().ok_or(InputError::Empty)?;

    // Anything after a quit is ignored.
    if tag == "q" {
        return Ok(Input::Quit);
    }

    let kind = match tag.as_bytes() {
        [byte] => GenerateKind::from_tag(*byte),
        _ => None,
    }
    .ok_or_else(|| InputError::UnknownKind(tag.to_string()))?;

    let length_token = tokens.next().ok_or(InputError::MissingLength)?;
    let length: i32 = length_token
        .parse()
        .map_err(|_| InputError::InvalidLength(length_token.to_string()))?;

    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(InputError::LengthOutOfRange(length));
    }

    Ok(Input::Request { kind, length })
}

/// Client connection to the password server.
pub struct Client {
    stream: TcpStream,
}

impl Client {
    /// Connect to the server named by `config`.
    pub fn connect(config: &ClientConfig) -> io::Result<Self> {
        let stream = TcpStream::connect(config.connect.as_str())?;
        Ok(Client { stream })
    }

    /// Send one generation request and block for the fixed-size response.
    pub fn request(&mut self, kind: GenerateKind, length: i32) -> io::Result<String> {
        let frame = Frame::request(kind.tag(), length);
        let mut out = BytesMut::with_capacity(FRAME_LEN);
        frame.encode(&mut out);
        self.stream.write_all(&out)?;

        let mut raw = [0u8; FRAME_LEN];
        self.stream.read_exact(&mut raw)?;
        Ok(Frame::from_bytes(&raw).password().to_string())
    }

    /// Send a quit frame and close the connection. No response is expected.
    pub fn quit(mut self) -> io::Result<()> {
        self.send_quit()
    }

    fn send_quit(&mut self) -> io::Result<()> {
        let mut out = BytesMut::with_capacity(FRAME_LEN);
        Frame::quit().encode(&mut out);
        self.stream.write_all(&out)
    }

    /// Interactive prompt loop.
    ///
    /// Setup failures surface from `connect`; once the loop is running, a
    /// failed exchange ends the session but the process still exits
    /// cleanly. EOF on stdin counts as a quit.
    pub fn run(mut self) -> io::Result<()> {
        println!("---- CONNECTED TO THE SERVER ----");
        println!("------ RANDOM PASSWORD GENERATOR ------");

        let stdin = io::stdin();
        let mut line = String::with_capacity(INPUT_CAPACITY);

        loop {
            println!("{}", MENU);
            print!("Enter request (or q to quit): ");
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                let _ = self.send_quit();
                break;
            }

            match parse_input(&line) {
                Ok(Input::Quit) => {
                    println!("Exiting client...");
                    if let Err(e) = self.send_quit() {
                        error!(error = %e, "Failed to notify server");
                    }
                    break;
                }
                Ok(Input::Request { kind, length }) => match self.request(kind, length) {
                    Ok(password) => println!("generated password --> {}", password),
                    Err(e) => {
                        error!(error = %e, "Exchange with server failed");
                        break;
                    }
                },
                Err(e) => println!("{}", e),
            }
        }

        Ok(())
    }
}
