use anyhow::Error;

#[cfg(feature = "pi")]
pub mod ws281x;

/// A single pixel color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// The strip hardware seam. Writes are buffered; nothing reaches the pixels
/// until `show` pushes the prepared frame.
pub trait LedStrip: Send {
    /// Assign every pixel the same color.
    fn fill(&mut self, color: Rgb);

    /// Set the brightness applied to subsequent frames.
    fn set_brightness(&mut self, brightness: u8);

    /// Push the prepared frame out to the pixels.
    fn show(&mut self) -> Result<(), Error>;
}

/// Stand-in strip for builds without the `pi` feature. Keeps the frame in
/// memory so the daemon runs unchanged on a dev machine.
pub struct MemoryStrip {
    pixels: Vec<Rgb>,
    brightness: u8,
}

impl MemoryStrip {
    pub fn new(count: usize) -> Self {
        MemoryStrip {
            pixels: vec![Rgb::OFF; count],
            brightness: 0,
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

impl LedStrip for MemoryStrip {
    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn show(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Open the strip backend for this build: real pixels on the Pi, an
/// in-memory stand-in everywhere else.
#[cfg(feature = "pi")]
pub fn open() -> Result<Box<dyn LedStrip>, Error> {
    Ok(Box::new(ws281x::Ws281xStrip::new()?))
}

#[cfg(not(feature = "pi"))]
pub fn open() -> Result<Box<dyn LedStrip>, Error> {
    Ok(Box::new(MemoryStrip::new(crate::config::LED_COUNT)))
}
