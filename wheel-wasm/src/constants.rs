/// Canvas drawing constants, in canvas pixels.
/// Gap between the wheel rim and the canvas edge.
pub const WHEEL_MARGIN_PX: f64 = 10.0;
/// Radius of the white hub drawn over the wheel center.
pub const HUB_RADIUS_PX: f64 = 44.0;
pub const HUB_RING_WIDTH_PX: f64 = 6.0;
/// Labels end this far inside the rim.
pub const LABEL_INSET_PX: f64 = 30.0;
pub const LABEL_BASELINE_PX: f64 = 10.0;
pub const LABEL_FONT: &str = "bold 24px Sans-Serif";
pub const EMPTY_WHEEL_COLOR: &str = "#ddd";
/// Delay before a winner is dropped when the popup is off (ms).
pub const AUTO_REMOVE_DELAY_MS: i32 = 200;
/// Modal fade-out time before it is hidden (ms).
pub const MODAL_FADE_MS: i32 = 300;
