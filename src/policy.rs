use log::warn;

use crate::error::{Error, Result};

/// Policy for handling records that cannot be encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// Stop the whole run on the first invalid record
    #[default]
    Abort,
    /// Drop the offending record and continue with the next one
    SkipRecord,
}
impl Policy {
    /// Decide what to do with an error raised while encoding a record
    ///
    /// Returns `Ok(true)` if the record should be dropped and encoding should continue.
    /// Errors that are not caused by the record content (I/O, seeking) are always returned.
    pub fn handle(&self, err: Error) -> Result<bool> {
        match self {
            Self::SkipRecord if err.is_record_error() => {
                warn!("Skipping record: {err}");
                Ok(true)
            }
            _ => Err(err),
        }
    }
}
