use crate::FaultCode;

/// Maximum number of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

/// Return-address stack with an explicit stack pointer (`0..=16`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    sp: u8,
}

impl CallStack {
    /// Number of active frames.
    #[must_use]
    pub const fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns `true` when no call is active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// Return addresses of the active frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[u16] {
        &self.frames[..usize::from(self.sp)]
    }

    /// Pushes a return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackOverflow`] when all frames are in use; the
    /// stack is left unchanged.
    pub fn push(&mut self, addr: u16) -> Result<(), FaultCode> {
        let slot = usize::from(self.sp);
        if slot >= STACK_DEPTH {
            return Err(FaultCode::StackOverflow);
        }
        self.frames[slot] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackUnderflow`] when no call is active.
    pub fn pop(&mut self) -> Result<u16, FaultCode> {
        if self.sp == 0 {
            return Err(FaultCode::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.frames[usize::from(self.sp)])
    }
}

#[cfg(test)]
mod tests {
    use super::{CallStack, STACK_DEPTH};
    use crate::FaultCode;

    #[test]
    fn push_then_pop_is_lifo() {
        let mut stack = CallStack::default();
        stack.push(0x200).expect("room for frame");
        stack.push(0x300).expect("room for frame");
        assert_eq!(stack.frames(), &[0x200, 0x300]);
        assert_eq!(stack.pop(), Ok(0x300));
        assert_eq!(stack.pop(), Ok(0x200));
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_stack_underflows() {
        let mut stack = CallStack::default();
        assert_eq!(stack.pop(), Err(FaultCode::StackUnderflow));
        assert_eq!(stack.sp(), 0);
    }

    #[test]
    fn push_beyond_depth_overflows_without_mutation() {
        let mut stack = CallStack::default();
        for frame in 0..STACK_DEPTH {
            let addr = 0x200 + u16::try_from(frame).expect("depth fits u16") * 2;
            stack.push(addr).expect("room for frame");
        }
        let before = stack.clone();
        assert_eq!(stack.push(0xFFF), Err(FaultCode::StackOverflow));
        assert_eq!(stack, before);
        assert_eq!(usize::from(stack.sp()), STACK_DEPTH);
    }
}
