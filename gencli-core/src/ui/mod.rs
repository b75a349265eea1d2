//! Terminal presentation: styled lines and progress spinners.

pub mod renderer;
pub mod spinner;

pub use renderer::{CaptureRenderer, MessageStyle, Renderer, TerminalRenderer};
pub use spinner::Spinner;
