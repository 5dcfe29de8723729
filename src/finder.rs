//! Section lookup by name.

use crate::error::{Error, Result};
use crate::reader::BoundedRead;
use crate::session::LoadSession;

impl<R: BoundedRead> LoadSession<R> {
    /// Returns the index of the first section named `name`.
    ///
    /// Names are compared byte for byte. Sections are scanned in table order
    /// and every name is resolved from the file; a name that cannot be
    /// resolved aborts the whole search instead of being skipped; the error
    /// then carries that section's index.
    pub fn find_section(&mut self, name: &str) -> Result<usize> {
        let count = self.section_headers()?.len();
        for index in 0..count {
            let section = self.section_headers()?[index];
            let resolved = match self.resolve_name(&section) {
                Ok(resolved) => resolved,
                Err(err) => {
                    tracing::warn!(index, %err, "failed to resolve section name");
                    return Err(err.in_section(index));
                }
            };

            tracing::trace!(
                index,
                section = %String::from_utf8_lossy(resolved),
                wanted = name,
                "comparing section name"
            );
            if resolved == name.as_bytes() {
                return Ok(index);
            }
        }

        tracing::debug!(name, "section not found");
        Err(Error::NotFound {
            name: name.to_owned(),
        })
    }
}
