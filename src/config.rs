use std::time::Duration;

// Strip geometry
pub const LED_COUNT: usize = 32; // 4x8 matrix

// The WS2812 data line runs at 800kHz; each data bit is stretched to three
// SPI bits, so the bus clock is 3x that.
pub const SPI_CLOCK_HZ: u32 = 2_400_000;

// Hardware brightness ceiling the 1-10 user scale maps onto
pub const LED_MAX_BRIGHTNESS: u8 = 255;

pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

pub const LISTEN_ADDR: &str = "0.0.0.0:3000";
