/// Number of cells on the tape; the pointer register indexes it with wraparound.
pub const TAPE_LEN: usize = 1 << 16;

/// Tape of wrapping byte cells plus a 16-bit pointer register.
///
/// A fresh machine is built for every run; nothing is shared between runs.
#[derive(Clone)]
pub struct Machine {
    tape: Box<[u8]>,
    pointer: u16,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self {
            tape: vec![0; TAPE_LEN].into_boxed_slice(),
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> u16 {
        self.pointer
    }

    pub fn cell(&self, index: u16) -> u8 {
        self.tape[usize::from(index)]
    }

    pub fn current(&self) -> u8 {
        self.cell(self.pointer)
    }

    pub fn set_current(&mut self, value: u8) {
        self.tape[usize::from(self.pointer)] = value;
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn add(&mut self, amount: u8) {
        let value = self.current().wrapping_add(amount);
        self.set_current(value);
    }

    pub fn sub(&mut self, amount: u8) {
        let value = self.current().wrapping_sub(amount);
        self.set_current(value);
    }

    pub fn move_left(&mut self, distance: u16) {
        self.pointer = self.pointer.wrapping_sub(distance);
    }

    pub fn move_right(&mut self, distance: u16) {
        self.pointer = self.pointer.wrapping_add(distance);
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("pointer", &self.pointer)
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let machine = Machine::new();
        assert_eq!(machine.tape().len(), TAPE_LEN);
        assert!(machine.tape().iter().all(|&cell| cell == 0));
        assert_eq!(machine.pointer(), 0);
    }

    #[test]
    fn cells_wrap_modulo_256() {
        let mut machine = Machine::new();
        machine.sub(1);
        assert_eq!(machine.current(), 255);
        machine.add(3);
        assert_eq!(machine.current(), 2);
    }

    #[test]
    fn pointer_wraps_around_the_tape() {
        let mut machine = Machine::new();
        machine.move_left(1);
        assert_eq!(machine.pointer(), u16::MAX);
        machine.move_right(2);
        assert_eq!(machine.pointer(), 1);
    }
}
