use crate::Register;

/// Host-observable execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Stalled on `Fx0A` until a key goes down; the key index lands in the register.
    AwaitingKey(Register),
}

impl RunState {
    /// Returns the register a pending key wait will write, if any.
    #[must_use]
    pub const fn awaiting_register(self) -> Option<Register> {
        match self {
            Self::AwaitingKey(reg) => Some(reg),
            Self::Running => None,
        }
    }
}
