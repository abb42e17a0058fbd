//! Shared test harness: spawns a real `irc_server` event loop on a loopback
//! port and drives it with plain blocking `std::net` sockets. No extra
//! crate is needed for blocking socket I/O against a single connection at a
//! time, which is all these scenarios require.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use irc_server::cli::Args;

pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Picks a free loopback port, starts the server on it in a background
    /// thread, and waits until it accepts connections. The server thread is
    /// never joined: it lives for the remainder of the test binary's
    /// process, which is the standard way to drive a real listener in a
    /// blocking-socket integration test.
    pub fn spawn() -> Self {
        let port = {
            let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
            probe.local_addr().expect("local_addr").port()
        };

        thread::spawn(move || {
            let args = Args { port, debug: 0 };
            let _ = irc_server::server::run(port, &args);
        });

        for _ in 0..100 {
            if TcpStream::connect(("127.0.0.1", port)).is_ok() {
                return TestServer { port };
            }
            thread::sleep(Duration::from_millis(20));
        }
        panic!("server never started listening on 127.0.0.1:{port}");
    }

    pub fn connect(&self) -> TestClient {
        let stream = TcpStream::connect(("127.0.0.1", self.port)).expect("connect to test server");
        stream.set_read_timeout(Some(Duration::from_secs(2))).expect("set_read_timeout");
        let reader = BufReader::new(stream.try_clone().expect("clone stream"));
        TestClient { stream, reader }
    }
}

pub struct TestClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl TestClient {
    pub fn send(&mut self, line: &str) {
        self.stream.write_all(line.as_bytes()).expect("write");
        self.stream.write_all(b"\r\n").expect("write crlf");
        self.stream.flush().expect("flush");
    }

    /// Reads one line and strips its CR/LF terminator(s).
    pub fn recv(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("read line from server");
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        line
    }

    /// Registers with `NICK`/`USER` and drains the MOTD triplet.
    pub fn register(&mut self, nick: &str) {
        self.send(&format!("NICK {nick}"));
        self.send(&format!("USER {nick} 0 * :{nick} Test"));
        for _ in 0..3 {
            self.recv();
        }
    }
}
