//! Page-by-page venue collection
//!
//! Filters decide which extracted records are kept, `page` handles one
//! listing page, and `driver` walks the pages until the listing runs out.

pub mod driver;
pub mod filters;
pub mod page;

pub use driver::{CrawlSummary, crawl_venues};
pub use filters::{is_complete_venue, is_duplicate_venue};
pub use page::{PageBatch, check_no_results, fetch_and_process_page};
