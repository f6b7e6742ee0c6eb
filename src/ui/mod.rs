//! Terminal front-end: title, mode selector, goal widgets, history view.

pub mod app;
pub mod console;
pub mod mode;
pub mod render;
pub mod selector;

pub use app::App;
pub use console::Console;
pub use mode::InputMode;
