pub mod result_render;

pub use result_render::{render_execution, TIMEOUT_MESSAGE};
