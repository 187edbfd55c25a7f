//! End-to-end session tests over a real TCP connection.
//!
//! Each test binds a server to an ephemeral port, runs it on a background
//! thread, and drives it with either the library client or a raw socket
//! (for frames the client refuses to send).

use passmint::client::Client;
use passmint::config::{ClientConfig, ServerConfig};
use passmint::protocol::{Frame, GenerateKind, FRAME_LEN, MAX_LENGTH, MIN_LENGTH};
use passmint::server::Server;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

const SECURE_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";

fn start_server(seed: u64) -> SocketAddr {
    let config = ServerConfig {
        listen: "127.0.0.1:0".to_string(),
        seed: Some(seed),
        log_level: "info".to_string(),
    };
    let server = Server::bind(&config).expect("bind");
    let addr = server.local_addr().expect("local addr");
    thread::spawn(move || {
        let _ = server.run();
    });
    addr
}

fn connect_client(addr: SocketAddr) -> Client {
    let config = ClientConfig {
        connect: addr.to_string(),
        log_level: "warn".to_string(),
    };
    Client::connect(&config).expect("connect")
}

fn send_raw(stream: &mut TcpStream, tag: u8, length: i32) {
    let mut out = bytes::BytesMut::with_capacity(FRAME_LEN);
    Frame::request(tag, length).encode(&mut out);
    stream.write_all(&out).expect("send");
}

fn read_frame(stream: &mut TcpStream) -> Frame {
    let mut raw = [0u8; FRAME_LEN];
    stream.read_exact(&mut raw).expect("response frame");
    Frame::from_bytes(&raw)
}

#[test]
fn generates_valid_passwords_for_every_kind() {
    let addr = start_server(11);
    let mut client = connect_client(addr);

    let numeric = client.request(GenerateKind::Numeric, 6).unwrap();
    assert_eq!(numeric.len(), 6);
    assert!(numeric.chars().all(|c| c.is_ascii_digit()));

    let alpha = client.request(GenerateKind::Alpha, 12).unwrap();
    assert_eq!(alpha.len(), 12);
    assert!(alpha.chars().all(|c| c.is_ascii_lowercase()));

    let mixed = client.request(GenerateKind::Mixed, 20).unwrap();
    assert_eq!(mixed.len(), 20);
    assert!(mixed
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

    let secure = client.request(GenerateKind::Secure, 32).unwrap();
    assert_eq!(secure.len(), 32);
    assert!(secure.chars().all(|c| SECURE_CHARSET.contains(c)));

    client.quit().unwrap();
}

#[test]
fn boundary_lengths_are_served() {
    let addr = start_server(12);
    let mut client = connect_client(addr);

    for length in [MIN_LENGTH, MAX_LENGTH] {
        let password = client.request(GenerateKind::Alpha, length).unwrap();
        assert_eq!(password.len(), length as usize);
    }
}

#[test]
fn invalid_length_is_dropped_and_session_survives() {
    let addr = start_server(13);
    let mut stream = TcpStream::connect(addr).unwrap();

    // Out-of-range request: the server must send nothing back.
    send_raw(&mut stream, b'n', 5);
    // Follow-up valid request on the same connection.
    send_raw(&mut stream, b's', 32);

    // The first (and only) response belongs to the valid request.
    let frame = read_frame(&mut stream);
    assert_eq!(frame.tag(), b's');
    assert_eq!(frame.password().len(), 32);
}

#[test]
fn unknown_tag_is_dropped_and_session_survives() {
    let addr = start_server(14);
    let mut stream = TcpStream::connect(addr).unwrap();

    send_raw(&mut stream, b'x', 10);
    send_raw(&mut stream, b'n', 6);

    let frame = read_frame(&mut stream);
    assert_eq!(frame.tag(), b'n');
    assert_eq!(frame.password().len(), 6);
    assert!(frame.password().chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn quit_closes_connection_without_response() {
    let addr = start_server(15);
    let mut stream = TcpStream::connect(addr).unwrap();

    send_raw(&mut stream, b'q', 0);

    // The server closes without sending anything: the next read is EOF.
    let mut buf = [0u8; FRAME_LEN];
    let n = stream.read(&mut buf).unwrap();
    assert_eq!(n, 0);
}

#[test]
fn identical_seeds_generate_identical_passwords() {
    let first_addr = start_server(99);
    let second_addr = start_server(99);

    let mut first = connect_client(first_addr);
    let mut second = connect_client(second_addr);

    assert_eq!(
        first.request(GenerateKind::Secure, 24).unwrap(),
        second.request(GenerateKind::Secure, 24).unwrap()
    );
}

#[test]
fn back_to_back_requests_differ() {
    let addr = start_server(16);
    let mut client = connect_client(addr);

    let first = client.request(GenerateKind::Mixed, 32).unwrap();
    let second = client.request(GenerateKind::Mixed, 32).unwrap();
    assert_ne!(first, second);
}

#[test]
fn second_client_waits_until_first_session_closes() {
    let addr = start_server(17);

    let mut first = TcpStream::connect(addr).unwrap();
    send_raw(&mut first, b'n', 6);
    let _ = read_frame(&mut first);

    // The second connection sits in the backlog; its request is not served
    // while the first session is open.
    let mut second = TcpStream::connect(addr).unwrap();
    send_raw(&mut second, b'a', 8);
    second
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let mut buf = [0u8; FRAME_LEN];
    let err = second.read_exact(&mut buf).unwrap_err();
    assert!(matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    ));

    // Once the first client quits, the buffered request gets its answer.
    send_raw(&mut first, b'q', 0);
    second
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let frame = read_frame(&mut second);
    assert_eq!(frame.tag(), b'a');
    assert_eq!(frame.password().len(), 8);
}
