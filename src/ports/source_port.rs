//! Document source port trait.

use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;

/// Port for loading a raw export into the generic document tree. The core
/// never touches bytes; decoding lives entirely behind this seam.
pub trait SourcePort {
    fn load(&self) -> Result<DocNode, ConvertError>;
}
