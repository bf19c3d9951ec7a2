pub mod app;
pub mod calendar;
pub mod completion;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod plan;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;
pub mod view;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use tracker::Tracker;
