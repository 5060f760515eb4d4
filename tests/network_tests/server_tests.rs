//! Tests for the TCP server
//!
//! These tests verify:
//! - Commands round-trip through a live server
//! - Engine errors map to response statuses
//! - Malformed frames get a BAD_REQUEST and a closed connection
//! - Shutdown stops the accept loop

use std::io::{BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use daylog::network::Server;
use daylog::protocol::{read_response, write_command, Command, Response, Status};
use daylog::{Config, Engine, PageResult};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    _temp: TempDir,
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config::builder()
            .data_dir(temp.path())
            .listen_addr("127.0.0.1:0")
            .build();
        let engine = Arc::new(Engine::open(config.clone()).unwrap());

        let mut server = Server::new(config, engine);
        let addr = server.bind().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run().unwrap());

        Self {
            _temp: temp,
            addr,
            shutdown,
            handle: Some(handle),
        }
    }

    fn client(&self) -> Client {
        Client::connect(self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        Self {
            reader: BufReader::new(stream.try_clone().unwrap()),
            writer: BufWriter::new(stream),
        }
    }

    fn send(&mut self, command: &Command) -> Response {
        write_command(&mut self.writer, command).unwrap();
        read_response(&mut self.reader).unwrap()
    }
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_ping() {
    let server = TestServer::start();
    let mut client = server.client();

    let response = client.send(&Command::Ping);

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(b"PONG".to_vec()));
}

#[test]
fn test_write_read_delete_over_one_connection() {
    let server = TestServer::start();
    let mut client = server.client();

    for i in 0..3 {
        let record = format!(r#"{{"seq":{},"level":"info"}}"#, i).into_bytes();
        let response = client.send(&Command::Write { record });
        assert_eq!(response.status, Status::Ok);
    }

    let response = client.send(&Command::Delete {
        date: String::new(),
        line: 2,
    });
    assert_eq!(response.status, Status::Ok);

    let response = client.send(&Command::Read {
        date: String::new(),
        page: 1,
        page_size: 10,
    });
    assert_eq!(response.status, Status::Ok);

    let page: PageResult = serde_json::from_slice(&response.payload.unwrap()).unwrap();
    let seqs: Vec<u64> = page
        .records
        .iter()
        .map(|r| r.get("seq").unwrap().as_u64().unwrap())
        .collect();
    assert_eq!(seqs, vec![0, 2]);
}

#[test]
fn test_multiple_clients() {
    let server = TestServer::start();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let addr = server.addr;
            thread::spawn(move || {
                let mut client = Client::connect(addr);
                for i in 0..10 {
                    let record = format!(r#"{{"client":{},"i":{}}}"#, t, i).into_bytes();
                    assert_eq!(client.send(&Command::Write { record }).status, Status::Ok);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let response = server.client().send(&Command::Read {
        date: String::new(),
        page: 1,
        page_size: 100,
    });
    let page: PageResult = serde_json::from_slice(&response.payload.unwrap()).unwrap();
    assert_eq!(page.len(), 40);
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[test]
fn test_delete_missing_partition_is_not_found() {
    let server = TestServer::start();

    let response = server.client().send(&Command::Delete {
        date: "1999-01-01".to_string(),
        line: 1,
    });

    assert_eq!(response.status, Status::NotFound);
}

#[test]
fn test_delete_out_of_range_is_bad_request() {
    let server = TestServer::start();
    let mut client = server.client();
    client.send(&Command::Write {
        record: b"{}".to_vec(),
    });

    let response = client.send(&Command::Delete {
        date: String::new(),
        line: 5,
    });

    assert_eq!(response.status, Status::BadRequest);
}

#[test]
fn test_invalid_json_is_bad_request() {
    let server = TestServer::start();

    let response = server.client().send(&Command::Write {
        record: b"{oops".to_vec(),
    });

    assert_eq!(response.status, Status::BadRequest);
}

#[test]
fn test_bad_date_is_bad_request() {
    let server = TestServer::start();

    let response = server.client().send(&Command::Read {
        date: "yesterday".to_string(),
        page: 1,
        page_size: 10,
    });

    assert_eq!(response.status, Status::BadRequest);
}

#[test]
fn test_malformed_frame_gets_bad_request() {
    let server = TestServer::start();
    let mut client = server.client();

    client.writer.write_all(&[0x7f, 0, 0, 0, 0]).unwrap();
    client.writer.flush().unwrap();

    let response = read_response(&mut client.reader).unwrap();
    assert_eq!(response.status, Status::BadRequest);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_shutdown_stops_server() {
    let mut server = TestServer::start();
    assert_eq!(server.client().send(&Command::Ping).status, Status::Ok);

    server.shutdown.store(true, Ordering::Relaxed);
    server.handle.take().unwrap().join().unwrap();
}
