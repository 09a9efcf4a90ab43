//! TUI screens

mod history;
mod home;
mod upload;

pub use history::HistoryScreen;
pub use home::HomeScreen;
pub use upload::{UploadScreen, UploadStatus};
