mod progress;
mod report;
mod theme;

pub use progress::ProgressLine;
pub use report::render_outcome;
pub use theme::Theme;
