//! Output sink port trait.

use crate::domain::convert::OutputTable;
use crate::domain::error::ConvertError;
use std::path::Path;

/// Port for rendering a finished table to a file, overwriting any
/// existing content.
pub trait SinkPort {
    fn write(&self, table: &OutputTable, path: &Path) -> Result<(), ConvertError>;
}
