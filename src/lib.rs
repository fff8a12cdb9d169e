//! shelfmap — interactive drill-down treemap explorer for flat catalogs.
//!
//! Pipeline: records → [`tree::build`] (grouping tree) → [`nav::Navigator`]
//! (focus) → [`layout::layout`] (squarified rectangles) → app shell
//! (painting and interaction). [`engine::AtlasEngine`] ties the pieces into
//! one stateful instance; [`view`] derives tooltip, legend and breadcrumb
//! data from the same tree the layout reads.

pub mod color;
pub mod diag;
pub mod engine;
pub mod layout;
pub mod nav;
pub mod record;
pub mod tree;
pub mod view;
