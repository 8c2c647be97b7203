//! Fixed-row text renderer over an off-screen frame.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;
use embedded_graphics::text::{Baseline, Text};

use crate::core::errors::Result;
use crate::display::frame::{DisplayFrame, FRAME_HEIGHT, FRAME_WIDTH, RenderContext, TEXT_ROWS};
use crate::display::sink::DisplaySink;

/// The display session: one frame, one optional transport.
///
/// With no sink attached every operation is a no-op, which lets the loop run
/// headless.
pub struct DisplayRenderer {
    ctx: RenderContext,
    frame: DisplayFrame,
    sink: Option<Box<dyn DisplaySink>>,
}

impl DisplayRenderer {
    /// Renderer that flushes into `sink`.
    #[must_use]
    pub fn new(ctx: RenderContext, sink: Box<dyn DisplaySink>) -> Self {
        Self {
            ctx,
            frame: DisplayFrame::new(),
            sink: Some(sink),
        }
    }

    /// Renderer with no panel attached.
    #[must_use]
    pub fn headless(ctx: RenderContext) -> Self {
        Self {
            ctx,
            frame: DisplayFrame::new(),
            sink: None,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &RenderContext {
        &self.ctx
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Transport name, or `none` when headless.
    #[must_use]
    pub fn sink_name(&self) -> &'static str {
        self.sink.as_ref().map_or("none", |s| s.name())
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        FRAME_WIDTH
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        FRAME_HEIGHT
    }

    /// The frame as it would be flushed right now.
    #[must_use]
    pub const fn frame(&self) -> &DisplayFrame {
        &self.frame
    }

    /// Set the whole frame to the background.
    pub fn clear(&mut self) {
        if self.sink.is_none() {
            return;
        }
        self.frame.reset();
    }

    /// Draw `text` on `row`, replacing whatever that row held.
    ///
    /// Rows past the last text row are ignored. Overlong text is clipped at
    /// the right edge by the glyph drawer.
    pub fn write_line(&mut self, row: usize, text: &str) {
        if self.sink.is_none() || row >= TEXT_ROWS {
            return;
        }
        self.ctx
            .row_band(row)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.frame)
            .ok();
        let style = MonoTextStyle::new(self.ctx.font, BinaryColor::On);
        Text::with_baseline(text, self.ctx.row_origin(row), style, Baseline::Top)
            .draw(&mut self.frame)
            .ok();
        self.frame.set_row_text(row, text);
    }

    /// Push the current frame to the panel.
    pub fn flush(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush_frame(&self.frame),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::sink::MemorySink;

    fn attached() -> (DisplayRenderer, MemorySink) {
        let probe = MemorySink::new();
        let renderer = DisplayRenderer::new(RenderContext::default(), Box::new(probe.clone()));
        (renderer, probe)
    }

    #[test]
    fn clear_then_flush_is_all_background() {
        let (mut renderer, probe) = attached();
        renderer.write_line(0, "IP: 10.0.0.7");
        renderer.write_line(6, "Temp: 45.0    |");
        renderer.clear();
        renderer.flush().unwrap();
        let frame = probe.last_frame().expect("one frame flushed");
        assert!(frame.is_blank());
        assert!(frame.text_rows().iter().all(Option::is_none));
    }

    #[test]
    fn write_line_lights_only_its_band() {
        let (mut renderer, _probe) = attached();
        renderer.write_line(2, "CPU load: 12%");
        let ctx = *renderer.context();
        let frame = renderer.frame();
        assert!(frame.lit_count_in_band(&ctx.row_band(2)) > 0);
        assert_eq!(frame.lit_count_in_band(&ctx.row_band(2)), frame.lit_count());
        assert_eq!(frame.row_text(2), Some("CPU load: 12%"));
    }

    #[test]
    fn rewriting_a_row_replaces_it_and_leaves_others() {
        let (mut renderer, _probe) = attached();
        renderer.write_line(3, "IOwait: 88%");
        renderer.write_line(4, "Avail memory: 40%");
        let ctx = *renderer.context();
        let row4_before = renderer.frame().lit_count_in_band(&ctx.row_band(4));

        renderer.write_line(3, "");
        assert_eq!(renderer.frame().lit_count_in_band(&ctx.row_band(3)), 0);
        assert_eq!(renderer.frame().lit_count_in_band(&ctx.row_band(4)), row4_before);
        assert_eq!(renderer.frame().row_text(4), Some("Avail memory: 40%"));
    }

    #[test]
    fn overlong_text_is_clipped_not_wrapped() {
        let (mut renderer, _probe) = attached();
        let long = "W".repeat(60);
        renderer.write_line(2, &long);
        let ctx = *renderer.context();
        assert_eq!(
            renderer.frame().lit_count(),
            renderer.frame().lit_count_in_band(&ctx.row_band(2))
        );
        assert_eq!(renderer.frame().row_text(2), Some(long.as_str()));
    }

    #[test]
    fn out_of_range_row_is_ignored() {
        let (mut renderer, _probe) = attached();
        renderer.write_line(TEXT_ROWS, "nowhere");
        assert!(renderer.frame().is_blank());
    }

    #[test]
    fn headless_operations_are_noops() {
        let mut renderer = DisplayRenderer::headless(RenderContext::default());
        renderer.clear();
        renderer.write_line(0, "IP: 10.0.0.7");
        assert!(renderer.flush().is_ok());
        assert!(renderer.frame().is_blank());
        assert!(!renderer.is_attached());
        assert_eq!(renderer.sink_name(), "none");
        assert_eq!((renderer.width(), renderer.height()), (128, 64));
    }

    #[test]
    fn flush_fault_propagates() {
        let (mut renderer, probe) = attached();
        probe.fail_on_flush(0);
        let err = renderer.flush().unwrap_err();
        assert_eq!(err.code(), "OST-3101");
    }
}
