//! SSD1306 128×64 panel on a Linux I2C bus.

use std::path::Path;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use linux_embedded_hal::I2cdev;
use ::ssd1306::mode::BufferedGraphicsMode;
use ::ssd1306::prelude::*;
use ::ssd1306::size::DisplaySize128x64;
use ::ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::core::errors::{OstError, Result};
use crate::display::frame::DisplayFrame;
use crate::display::sink::DisplaySink;

type Panel =
    Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Buffered-graphics SSD1306 driver behind [`DisplaySink`].
pub struct Ssd1306Sink {
    panel: Panel,
}

impl Ssd1306Sink {
    /// Open the bus, initialize the controller and blank the panel.
    pub fn open(bus: &Path) -> Result<Self> {
        let i2c = I2cdev::new(bus).map_err(|e| OstError::Display {
            operation: "open",
            details: format!("{}: {e}", bus.display()),
        })?;
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        panel.init().map_err(|e| fault("init", &e))?;
        panel.clear_buffer();
        panel.flush().map_err(|e| fault("flush", &e))?;
        Ok(Self { panel })
    }
}

impl DisplaySink for Ssd1306Sink {
    fn flush_frame(&mut self, frame: &DisplayFrame) -> Result<()> {
        self.panel.clear_buffer();
        self.panel
            .draw_iter(frame.lit_pixels().map(|p| Pixel(p, BinaryColor::On)))
            .map_err(|e| fault("draw", &e))?;
        self.panel.flush().map_err(|e| fault("flush", &e))
    }

    fn name(&self) -> &'static str {
        "ssd1306"
    }
}

fn fault(operation: &'static str, err: &impl std::fmt::Debug) -> OstError {
    OstError::Display {
        operation,
        details: format!("{err:?}"),
    }
}
