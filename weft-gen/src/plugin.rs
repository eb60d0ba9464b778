//! The service generator plugin protocol.
//!
//! A plugin is a single synchronous capability: it receives the frozen
//! [`BuildTree`] snapshot after traversal completes and returns a [`FileSet`]
//! to merge with the core's own output. Any concrete implementation — the
//! in-process [`EmptyServiceGenerator`] default or an out-of-process
//! extension speaking the serialized snapshot — satisfies the same contract.

use eyre::Result;

use crate::{BuildTree, FileSet};

/// A capability that contributes extra generated files for root services.
///
/// # Errors
///
/// A failed `generate` aborts the whole run; errors propagate unchanged.
pub trait ServiceGenerator {
    /// The name of this generator (for debugging and error context).
    fn name(&self) -> &'static str;

    /// Produce files for the given build tree.
    ///
    /// The snapshot is immutable; a generator can read the full module tree
    /// for type resolution but only root services are primary targets.
    fn generate(&self, tree: &BuildTree) -> Result<FileSet>;
}

/// The identity plugin: contributes nothing.
///
/// Running with no configured plugin is equivalent to running with this one;
/// the absence of a plugin never alters core-generated output.
#[derive(Debug, Default)]
pub struct EmptyServiceGenerator;

impl ServiceGenerator for EmptyServiceGenerator {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn generate(&self, _tree: &BuildTree) -> Result<FileSet> {
        Ok(FileSet::new())
    }
}
