// tests/common/mod.rs

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embed_composer::config::GatewayConfig;
use embed_composer::gateway::GatewayClient;
use embed_composer::{EmbedCollection, Field};

pub const API_KEY: &str = "test-key_123";

/// One request as seen by the fake gateway
#[derive(Debug)]
pub struct Recorded {
    pub request_line: String,
    pub body: String,
}

/// Serves exactly one request with the given status and body, then hangs up.
pub fn serve_once(status: &str, body: &'static str) -> (String, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    let status = status.to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let recorded = read_request(&stream);
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
        recorded
    });
    (base_url, handle)
}

fn read_request(stream: &TcpStream) -> Recorded {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap();
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).unwrap();
    Recorded {
        request_line: request_line.trim_end().to_string(),
        body: String::from_utf8(body).unwrap(),
    }
}

pub fn client(base_url: &str) -> GatewayClient {
    client_with_timeout(base_url, Duration::from_secs(5))
}

pub fn client_with_timeout(base_url: &str, timeout: Duration) -> GatewayClient {
    let config = GatewayConfig::new(base_url, API_KEY.to_string(), timeout).unwrap();
    GatewayClient::new(config).unwrap()
}

/// Two embeds, only the first of which is exportable
pub fn sample_collection() -> EmbedCollection {
    let mut collection = EmbedCollection::new();
    let _ = collection.append_blank();
    let _ = collection.append_blank();
    let embed = collection.get_mut(0).unwrap();
    embed.title = "Hi".to_string();
    embed.fields.push(Field::with("A", "B", true));
    let _ = collection.append_field(1).unwrap();
    collection
}
