use std::fs;
use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serialport::SerialPort;
use sleigh_protocol::crc::{AcceptDeclared, Crc8Ccitt};
use sleigh_protocol::frame::{encode_frame, encoded_len};

mod payload;

use payload::Segment;

#[derive(Parser)]
#[command(name = "sleigh-feed")]
#[command(about = "Send pixel frames to the sleigh tx node over a serial port", long_about = None)]
struct Cli {
    /// Serial port of the tx node
    port: String,

    /// Baud rate
    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// Pixels on the strip; longer payloads are cut
    #[arg(long, default_value_t = 68)]
    pixels: usize,

    /// Pixel run as RRGGBB[:fx][:count] or a build state preset
    /// (busy, idle, queued-test, queued-build) with an optional :count;
    /// repeatable
    #[arg(long = "segment", short = 's')]
    segments: Vec<Segment>,

    /// Raw payload file (r g b fx per pixel) instead of segments
    #[arg(long, conflicts_with = "segments")]
    file: Option<String>,

    /// Fill the CRC byte with CRC-8 instead of zero
    #[arg(long)]
    crc8: bool,

    /// Resend every N seconds instead of once
    #[arg(long)]
    interval: Option<u64>,

    /// Enable debug output (hex dump every frame)
    #[arg(long)]
    debug: bool,
}

fn open_port(cli: &Cli) -> Result<Box<dyn SerialPort>> {
    serialport::new(&cli.port, cli.baud)
        .timeout(Duration::from_millis(1000))
        .open()
        .with_context(|| format!("Failed to open serial port {}", cli.port))
}

fn load_payload(cli: &Cli) -> Result<Vec<u8>> {
    let data = match &cli.file {
        Some(path) => fs::read(path).with_context(|| format!("Failed to read {}", path))?,
        None if cli.segments.is_empty() => bail!("nothing to send: give --segment or --file"),
        None => payload::build(&cli.segments),
    };
    Ok(payload::truncate(data, cli.pixels))
}

fn encode(cli: &Cli, data: &[u8]) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; encoded_len(data.len())];
    let len = if cli.crc8 {
        encode_frame(data, &Crc8Ccitt, &mut buffer)?
    } else {
        encode_frame(data, &AcceptDeclared, &mut buffer)?
    };
    buffer.truncate(len);
    Ok(buffer)
}

fn send(port: &mut dyn SerialPort, frame: &[u8]) -> Result<()> {
    port.write_all(frame).context("Failed to write frame")?;
    port.flush().context("Failed to flush serial port")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data = load_payload(&cli)?;
    let frame = encode(&cli, &data)?;
    if cli.debug {
        println!("{} pixel bytes, frame {} bytes", data.len(), frame.len());
        let hex: Vec<String> = frame.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{}", hex.join(" "));
    }

    let mut port = open_port(&cli)?;
    send(port.as_mut(), &frame)?;

    let Some(interval) = cli.interval else {
        return Ok(());
    };

    loop {
        thread::sleep(Duration::from_secs(interval));
        if let Err(e) = send(port.as_mut(), &frame) {
            // Adapter unplugged or reset: reopen and keep going
            eprintln!("Warning: {:#}, reopening port", e);
            match open_port(&cli) {
                Ok(p) => port = p,
                Err(e) => eprintln!("Warning: {:#}", e),
            }
        } else if cli.debug {
            println!("Frame sent");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_become_frame() {
        let cli = Cli::parse_from(["sleigh-feed", "/dev/null", "-s", "ff0000:fast-blink:2"]);
        let data = load_payload(&cli).unwrap();
        let frame = encode(&cli, &data).unwrap();
        assert_eq!(
            frame,
            [b'U', b'A', b'R', b'T', 8, 0, 0, 0xFF, 0, 0, 2, 0xFF, 0, 0, 2]
        );
    }

    #[test]
    fn test_payload_cut_to_strip() {
        let cli = Cli::parse_from([
            "sleigh-feed",
            "/dev/null",
            "--pixels",
            "2",
            "-s",
            "010203:solid:5",
        ]);
        assert_eq!(load_payload(&cli).unwrap().len(), 8);
    }

    #[test]
    fn test_crc8_option() {
        let cli = Cli::parse_from(["sleigh-feed", "/dev/null", "--crc8", "-s", "313233"]);
        let frame = encode(&cli, b"123456789").unwrap();
        assert_eq!(frame[6], 0xF4);
    }

    #[test]
    fn test_presets_on_command_line() {
        let cli = Cli::parse_from([
            "sleigh-feed",
            "/dev/null",
            "-s",
            "busy:2",
            "-s",
            "queued-build",
        ]);
        let data = load_payload(&cli).unwrap();
        assert_eq!(data, [0xFF, 0, 0, 2, 0xFF, 0, 0, 2, 0, 0x20, 0, 0]);
    }

    #[test]
    fn test_nothing_to_send() {
        let cli = Cli::parse_from(["sleigh-feed", "/dev/null"]);
        assert!(load_payload(&cli).is_err());
    }
}
