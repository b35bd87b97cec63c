pub mod contact;
pub mod diagnostics;
pub mod health;
pub mod seo;

pub use contact::submit_contact;
pub use diagnostics::{metrics_endpoint, test_storage};
pub use health::health_check;
pub use seo::{robots_txt, sitemap_txt};
