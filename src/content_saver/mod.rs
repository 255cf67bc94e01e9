//! Page content processing and result saving

pub mod html_cleaning;
mod json_saver;
pub mod markdown;

pub use html_cleaning::{clean_html, select_css};
pub use json_saver::save_venues;
pub use markdown::html_to_markdown;
