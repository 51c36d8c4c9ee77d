//! Extraction primitives shared by every source site
//!
//! Nothing in here performs I/O: each function is a pure transformation of
//! markup or script text.

pub mod document;
pub mod numbers;
pub mod script;
pub mod urls;

pub use document::{comma_list, value_list, DocumentQuery, FieldRole};
pub use numbers::{extract_numbers, first_number, season_in_title};
pub use script::{PlayerNode, PlayerSource, PlaylistEpisode};
pub use urls::{absolutize, detail_url, promote_scheme};
