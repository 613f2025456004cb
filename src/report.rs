/*!
Error printer for the command line entry point.
*/

use std::error::Error as StdError;

/// Wraps any error so that `main` prints its display message followed by
/// the chain of underlying causes.
pub struct Report(Box<dyn StdError>);

impl Report {
    pub fn causes(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> + '_ {
        std::iter::successors(self.0.source(), |&e| e.source())
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)?;

        let mut causes = self.causes().enumerate().peekable();
        if causes.peek().is_some() {
            writeln!(f, "\nCaused by:")?;
        }
        for (i, e) in causes {
            writeln!(f, "  {}: {}", i, e)?;
        }

        Ok(())
    }
}

impl<E: Into<Box<dyn StdError>>> From<E> for Report {
    fn from(e: E) -> Self {
        Report(e.into())
    }
}
