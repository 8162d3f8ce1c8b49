//! Built-in freight forwarding training pack
//!
//! Four cases: the 20-stage `tutorial` export course and the short crisis
//! cases `case_1`, `case_5` and `case_10`.

use crate::error::CatalogError;
use crate::pack::Library;

/// Raw YAML of the built-in pack
pub const BUILTIN_PACK: &str = include_str!("../content/freight.yaml");

/// Build the built-in library
///
/// # Errors
/// Only if the bundled pack is malformed, which the tests below rule out.
pub fn builtin_library() -> Result<Library, CatalogError> {
    Library::from_yaml_str(BUILTIN_PACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CaseId, StageId};

    #[test]
    fn builtin_pack_is_complete() {
        let library = builtin_library().unwrap();
        assert_eq!(library.catalog.len(), 4);
        assert!(library.audit().is_empty(), "missing: {:?}", library.audit());
    }

    #[test]
    fn builtin_case_shapes() {
        let library = builtin_library().unwrap();
        let stages = |id: &str| library.catalog.get(&CaseId::from(id)).unwrap().stage_count();

        assert_eq!(stages("tutorial"), 20);
        assert_eq!(stages("case_1"), 3);
        assert_eq!(stages("case_5"), 3);
        assert_eq!(stages("case_10"), 4);
    }

    #[test]
    fn builtin_order_starts_with_tutorial() {
        let library = builtin_library().unwrap();
        let first = library.catalog.iter().next().unwrap();
        assert_eq!(first.id.as_str(), "tutorial");
        assert_eq!(first.first_stage(), Some(&StageId::from("CLIENT_INQUIRY")));
    }
}
