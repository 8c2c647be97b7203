//! Display session: off-screen frame, fixed-row text renderer, transports.

pub mod frame;
pub mod renderer;
pub mod sink;
#[cfg(feature = "hardware")]
pub mod ssd1306;

pub use frame::{DisplayFrame, RenderContext, TEXT_ROWS};
pub use renderer::DisplayRenderer;
pub use sink::{DisplaySink, MemorySink};
