//! Pixel payload construction

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use sleigh_core::pixel::{LedFx, Pixel, BYTES_PER_PIXEL};

/// A run of identically colored pixels, written `RRGGBB[:fx][:count]`
/// or `preset[:count]`
///
/// `fx` is `solid`, `slow-blink`, `fast-blink`, `breathe` or a number. The
/// presets are the build-farm states shown on the tree: `busy`, `idle`,
/// `queued-test` and `queued-build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub pixel: Pixel,
    pub count: usize,
}

const RED: Pixel = Pixel::new(0xFF, 0x00, 0x00);
const YELLOW: Pixel = Pixel::new(0xFF, 0xD9, 0x00);
const PURPLE: Pixel = Pixel::new(0xC1, 0x2A, 0xB4);
const GREEN: Pixel = Pixel::new(0x00, 0x20, 0x00);

/// Pixel for a named build-farm state
fn preset(name: &str) -> Option<Pixel> {
    Some(match name {
        "busy" => RED.with_fx(LedFx::FastBlink),
        "idle" => YELLOW.with_fx(LedFx::FastBlink),
        "queued-test" => PURPLE.with_fx(LedFx::Breathe),
        "queued-build" => GREEN.with_fx(LedFx::Solid),
        _ => return None,
    })
}

fn parse_count(s: &str) -> Result<usize> {
    s.parse::<usize>().with_context(|| format!("bad count '{}'", s))
}

fn parse_fx(s: &str) -> Result<LedFx> {
    Ok(match s {
        "solid" => LedFx::Solid,
        "slow-blink" => LedFx::SlowBlink,
        "fast-blink" => LedFx::FastBlink,
        "breathe" => LedFx::Breathe,
        other => LedFx::from(
            other
                .parse::<u8>()
                .with_context(|| format!("unknown effect '{}'", other))?,
        ),
    })
}

impl FromStr for Segment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let color = parts.next().unwrap_or_default();

        if let Some(pixel) = preset(color) {
            let count = parts.next().map(parse_count).transpose()?.unwrap_or(1);
            if parts.next().is_some() {
                bail!("preset '{}' takes only a count", color);
            }
            return Ok(Segment { pixel, count });
        }

        let color = color.strip_prefix('#').unwrap_or(color);
        if color.len() != 6 {
            bail!("color must be RRGGBB, got '{}'", color);
        }
        let rgb = u32::from_str_radix(color, 16).with_context(|| format!("bad color '{}'", color))?;
        let [_, r, g, b] = rgb.to_be_bytes();

        let fx = parts.next().map(parse_fx).transpose()?.unwrap_or(LedFx::Solid);
        let count = parts.next().map(parse_count).transpose()?.unwrap_or(1);
        if parts.next().is_some() {
            return Err(anyhow!("too many fields in '{}'", s));
        }

        Ok(Segment {
            pixel: Pixel::new(r, g, b).with_fx(fx),
            count,
        })
    }
}

/// Concatenate segments into wire bytes
pub fn build(segments: &[Segment]) -> Vec<u8> {
    segments
        .iter()
        .flat_map(|s| std::iter::repeat(s.pixel.to_bytes()).take(s.count))
        .flatten()
        .collect()
}

/// Cut a payload down to what the strip can show
pub fn truncate(mut data: Vec<u8>, num_pixels: usize) -> Vec<u8> {
    data.truncate(num_pixels * BYTES_PER_PIXEL);
    data
}
