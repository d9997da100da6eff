use std::fmt;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Files whose recorded version changed during this run.
    pub updated: usize,
    /// Files actually written to the plugin directory.
    pub downloaded: usize,
    /// Files named by the catalog entries that were reached.
    pub total: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.updated, self.downloaded, self.total)
    }
}
