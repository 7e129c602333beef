//! Inspect a recorded scanner capture and summarize what would be forwarded.
//!
//! Run with:
//!   cargo run --example inspect-capture -- path/to/capture.bin
//!
//! Without a path a short built-in capture is used.

use std::fs::File;
use std::io::{BufReader, Read};

use hpwire::frame::{FrameReader, TracingSink};
use hpwire::schema::SchemaRegistry;

const SAMPLE: &[u8] = b"GLT,<XML>,\n<GLT><SYS Index=\"1\" Name=\"County\"/><Footer No=\"1\" EOT=\"1\"/></GLT>\r\
GLT,<XML>,\n<GLT><MYSTERY Index=\"2\"/><Footer No=\"1\" EOT=\"1\"/></GLT>\r\
MSI,<XML>,\n<MSI Name=\"Top\" Index=\"0\" MenuType=\"TypeList\"/>\r\
GSI,<XML>,";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(SAMPLE),
    };

    let registry = SchemaRegistry::builtin();
    let (mut accepted, mut rejected) = (0usize, 0usize);

    for frame in FrameReader::new(source) {
        let frame = frame?;
        let inspection = registry.inspect(&frame, &TracingSink);
        let kind = inspection
            .kind
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "?".to_string());

        match inspection.validation.failure() {
            None => {
                accepted += 1;
                println!("forward {kind} ({} bytes)", frame.len());
            }
            Some(reason) => {
                rejected += 1;
                println!("drop    {kind}: {reason}");
            }
        }
    }

    eprintln!("{accepted} accepted, {rejected} rejected");
    Ok(())
}
