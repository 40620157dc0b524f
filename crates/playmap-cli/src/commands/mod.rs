pub mod diff;
pub mod facets;
pub mod normalize;
pub mod presets;
pub mod search;
pub mod view;
