use anyhow::Error;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::config::{LED_COUNT, LED_MAX_BRIGHTNESS, SPI_CLOCK_HZ};

use super::{LedStrip, Rgb};

// Reset latch between frames: the data line must idle low for >50us, which
// at the SPI clock is about 120 bit times.
const LATCH_BYTES: usize = 15;

/// WS2812 strip on the Pi's SPI bus. Each pixel bit is stretched to three
/// SPI bits (100 for 0, 110 for 1) so the bus clock carries the 800kHz
/// pixel waveform.
pub struct Ws281xStrip {
    spi: Spi,
    pixels: Vec<Rgb>,
    brightness: u8,
}

impl Ws281xStrip {
    pub fn new() -> Result<Self, Error> {
        // Set up SPI
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)?;

        Ok(Ws281xStrip {
            spi,
            pixels: vec![Rgb::OFF; LED_COUNT],
            brightness: LED_MAX_BRIGHTNESS,
        })
    }

    fn scale(&self, value: u8) -> u8 {
        (value as u16 * self.brightness as u16 / LED_MAX_BRIGHTNESS as u16) as u8
    }
}

/// Expand one pixel byte into its 24-bit SPI encoding.
fn encode_byte(byte: u8, out: &mut Vec<u8>) {
    let mut bits: u32 = 0;
    for i in 0..8 {
        bits <<= 3;
        bits |= if byte & (0x80 >> i) != 0 { 0b110 } else { 0b100 };
    }
    out.extend_from_slice(&bits.to_be_bytes()[1..]);
}

impl LedStrip for Ws281xStrip {
    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn show(&mut self) -> Result<(), Error> {
        let mut frame = Vec::with_capacity(self.pixels.len() * 9 + LATCH_BYTES);

        // WS2812 expects GRB order
        for pixel in &self.pixels {
            encode_byte(self.scale(pixel.g), &mut frame);
            encode_byte(self.scale(pixel.r), &mut frame);
            encode_byte(self.scale(pixel.b), &mut frame);
        }

        frame.resize(frame.len() + LATCH_BYTES, 0);

        self.spi.write(&frame)?;

        Ok(())
    }
}
