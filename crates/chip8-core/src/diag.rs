//! Diagnostic counters maintained alongside execution.

use crate::{FaultClass, FaultCode};

/// Core-owned diagnostic fields. Counters saturate instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagCoreFields {
    /// The last fault reported, if any.
    pub last_fault_code: Option<FaultCode>,
    /// The program counter at the time of the last fault.
    pub last_fault_pc: u16,
    /// Saturating counter for decode-class faults.
    pub fault_count_decode: u16,
    /// Saturating counter for fetch-class faults.
    pub fault_count_fetch: u16,
    /// Saturating counter for stack-class faults.
    pub fault_count_stack: u16,
    /// Saturating counter for retired instructions.
    pub instruction_count: u32,
    /// Saturating counter for steps stalled on a key wait.
    pub key_wait_stalls: u32,
}

impl DiagCoreFields {
    /// Creates a new set of diagnostic fields with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fault occurrence, updating the last fault info and incrementing
    /// the appropriate fault class counter.
    pub const fn record_fault(&mut self, code: FaultCode, pc: u16) {
        self.last_fault_code = Some(code);
        self.last_fault_pc = pc;
        let counter = match code.class() {
            FaultClass::Decode => &mut self.fault_count_decode,
            FaultClass::Fetch => &mut self.fault_count_fetch,
            FaultClass::Stack => &mut self.fault_count_stack,
        };
        *counter = counter.saturating_add(1);
    }

    /// Increments the instruction counter.
    pub const fn increment_instruction_count(&mut self) {
        self.instruction_count = self.instruction_count.saturating_add(1);
    }

    /// Records one step spent waiting for a key.
    pub const fn record_key_wait(&mut self) {
        self.key_wait_stalls = self.key_wait_stalls.saturating_add(1);
    }

    /// Total faults across all classes.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn total_faults(&self) -> u32 {
        self.fault_count_decode as u32
            + self.fault_count_fetch as u32
            + self.fault_count_stack as u32
    }

    /// Resets all diagnostic fields to their default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diag_core_fields_default() {
        let fields = DiagCoreFields::new();
        assert_eq!(fields.last_fault_code, None);
        assert_eq!(fields.last_fault_pc, 0);
        assert_eq!(fields.total_faults(), 0);
    }

    #[test]
    fn record_fault_tracks_last_fault_and_class() {
        let mut fields = DiagCoreFields::default();
        fields.record_fault(FaultCode::UnrecognizedInstruction, 0x0204);
        fields.record_fault(FaultCode::StackUnderflow, 0x0206);
        assert_eq!(fields.fault_count_decode, 1);
        assert_eq!(fields.fault_count_stack, 1);
        assert_eq!(fields.last_fault_code, Some(FaultCode::StackUnderflow));
        assert_eq!(fields.last_fault_pc, 0x0206);
    }

    #[test]
    fn record_fault_saturates_at_max() {
        let mut fields = DiagCoreFields::default();
        for _ in 0..0x20000 {
            fields.record_fault(FaultCode::FetchOutOfBounds, 0x0FFF);
        }
        assert_eq!(fields.fault_count_fetch, u16::MAX);
    }

    #[test]
    fn reset_clears_counters() {
        let mut fields = DiagCoreFields::default();
        fields.increment_instruction_count();
        fields.record_key_wait();
        fields.record_fault(FaultCode::StackOverflow, 0x200);
        fields.reset();
        assert_eq!(fields, DiagCoreFields::default());
    }
}
