//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// The table needs to be rendered again
    Redraw,
    /// Write the full row collection to persistence
    PersistRows,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::PersistRows => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Check if this command writes to persistence
    pub fn persists(&self) -> bool {
        match self {
            Cmd::PersistRows => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.persists()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_flags() {
        let cmd = Cmd::batch(vec![Cmd::PersistRows, Cmd::Redraw]);
        assert!(cmd.needs_redraw());
        assert!(cmd.persists());
        assert!(!Cmd::Redraw.persists());
        assert!(!Cmd::None.needs_redraw());
    }
}
