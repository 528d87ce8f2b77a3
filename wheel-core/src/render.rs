use std::f64::consts::TAU;
use std::num::NonZeroUsize;

pub fn segment_color(i: usize) -> &'static str {
    // Fixed 12-color palette. Colors are stable and cycle by index%12, so the
    // same entry order always paints the same wheel.
    const PALETTE: [&str; 12] = [
        "#FF5733", // 0
        "#33FF57", // 1
        "#3357FF", // 2
        "#F333FF", // 3
        "#FF33A1", // 4
        "#33FFF6", // 5
        "#FFC300", // 6
        "#581845", // 7
        "#28B463", // 8
        "#AF7AC5", // 9
        "#F4D03F", // 10
        "#E67E22", // 11
    ];
    PALETTE[i % PALETTE.len()]
}

const LABEL_MAX_CHARS: usize = 15;
const LABEL_KEEP_CHARS: usize = 12;

/// Shorten long labels so they fit inside a wedge.
pub fn display_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let head: String = label.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}

/// Angular width of one segment.
pub fn arc_size(entry_count: NonZeroUsize) -> f64 {
    TAU / entry_count.get() as f64
}

/// One wedge of the wheel, in canvas angle convention (radians, clockwise from +x).
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
    pub label: String,
}

impl Segment {
    /// Angle the label is drawn along, through the middle of the wedge.
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Wedges for `entries` at the given rotation. Empty when there are no entries.
pub fn segments(entries: &[String], rotation: f64) -> Vec<Segment> {
    let Some(count) = NonZeroUsize::new(entries.len()) else {
        return Vec::new();
    };
    let arc = arc_size(count);
    entries
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let start = rotation + i as f64 * arc;
            Segment {
                index: i,
                start_angle: start,
                end_angle: start + arc,
                color: segment_color(i),
                label: display_label(name),
            }
        })
        .collect()
}
