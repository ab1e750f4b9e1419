/// LIFO of output offsets at which unresolved loop-begin instructions start.
#[derive(Debug, Default)]
pub struct RunStack {
    offsets: Vec<usize>,
}

impl RunStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, offset: usize) {
        self.offsets.push(offset);
    }

    /// Returns `None` when there is no open loop to close.
    pub fn pop(&mut self) -> Option<usize> {
        self.offsets.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Discards every pending entry.
    pub fn clear(&mut self) {
        self.offsets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut stack = RunStack::new();
        assert!(stack.is_empty());
        stack.push(0);
        stack.push(5);
        stack.push(17);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(17));
        assert_eq!(stack.pop(), Some(5));
        assert_eq!(stack.pop(), Some(0));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn clear_drains_everything() {
        let mut stack = RunStack::new();
        stack.push(1);
        stack.push(2);
        stack.clear();
        assert!(stack.is_empty());
    }
}
