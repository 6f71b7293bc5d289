//! Per-page extraction from a rendered catalog page.
//!
//! Two independent signals come out of a page: the settled number of
//! rendered listing cards ([`stability`]) and the listings embedded in the
//! framework state ([`payload`]).

pub mod js_scripts;
pub mod payload;
pub mod schema;
pub mod stability;

pub use payload::{PayloadSettings, extract_payload, parse_payload, select_container};
pub use schema::{RawListing, RawListingPayload};
pub use stability::{StabilitySettings, StableCount, wait_for_stable_count};
