//! Telemetry readout: the text lines the display layer draws each frame.

use physics::Telemetry;

/// Extra lines shown with developer tools on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevReadout {
    pub seed: u64,
    pub chunks_loaded: usize,
    pub scroll_offset: f32,
}

/// Speeds are shown x100, truncated, with a direction marker.
fn vertical_text(vy: f32) -> String {
    let speed = (vy * 100.0) as i32;
    if speed >= 0 {
        format!("{} v", speed.abs())
    } else {
        format!("{} ^", speed.abs())
    }
}

fn horizontal_text(vx: f32) -> String {
    let speed = (vx * 100.0) as i32;
    if speed >= 0 {
        format!("{} -->", speed.abs())
    } else {
        format!("{} <--", speed.abs())
    }
}

/// Readout lines, top to bottom.
pub fn readout_lines(telemetry: &Telemetry, dev: Option<&DevReadout>) -> Vec<String> {
    let mut lines = vec![
        vertical_text(telemetry.velocity.y),
        horizontal_text(telemetry.velocity.x),
        format!("Altitude {}", telemetry.altitude as i32),
        format!("Fuel {}", telemetry.fuel),
        format!("Score {}", telemetry.score),
    ];
    if let Some(dev) = dev {
        lines.push(format!("Seed {}", dev.seed));
        lines.push(format!("Chunks Loaded {}", dev.chunks_loaded));
        // Rounded to tens so the number doesn't flicker.
        let coord = (dev.scroll_offset / 10.0).round() as i64 * 10;
        lines.push(format!("Screen X coord {}", coord));
    }
    lines
}
