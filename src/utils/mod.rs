pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    CatalogQuery, build_listing_photo_urls, listing_page_url, listing_url, raw_to_cdn_url,
};
