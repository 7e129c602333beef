//! Poll a networked scanner bridge for status with the async codec.
//!
//! Run with:
//!   cargo run --example async-monitor --features async -- 127.0.0.1:50536
//!
//! Sends `GSI` once per second and prints each validated response.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hpwire::frame::{Command, ScannerCodec, TracingSink};
use hpwire::schema::SchemaRegistry;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:50536".to_string());
    let stream = TcpStream::connect(&addr).await?;
    eprintln!("Connected to {addr}");

    let registry = SchemaRegistry::builtin();
    let mut framed = Framed::new(stream, ScannerCodec::new());
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                framed.send(Command::new("GSI")).await?;
            }
            frame = framed.next() => {
                let Some(frame) = frame else {
                    eprintln!("Bridge closed the connection");
                    return Ok(());
                };
                let frame = frame?;
                let inspection = registry.inspect(&frame, &TracingSink);
                match (inspection.kind, inspection.is_accepted()) {
                    (Some(kind), true) => println!("{kind}: {} bytes", frame.len()),
                    (kind, _) => eprintln!("dropped {kind:?}"),
                }
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}
