pub mod manifest;
pub mod sheet;

pub use manifest::{SheetManifest, StripManifest};
pub use sheet::{slice_grid, slice_row};
