pub mod engine;
pub mod outcome;
pub mod state;

pub use engine::{compute_visible_set, matches_keywords, rejections, should_show, Clause};
pub use outcome::{RenderView, VisibleRecord};
pub use state::{FacilityFilter, FilterState};
