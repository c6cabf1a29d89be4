mod anchors;
mod paths;
mod substitution;

pub use anchors::{AnchorCache, DirectiveAnchorIndex};
pub use paths::{is_within, normalize, resolve};
pub use substitution::{ReverseTable, SubstitutionTable};
