pub mod screen;
pub mod state;

pub use screen::{ProcessingScreen, ScreenState};
pub use state::ReturnSession;
