use std::io::{self, Bytes, Read};

/// The eight operations of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Increment,
    Decrement,
    MoveLeft,
    MoveRight,
    Output,
    Input,
    LoopBegin,
    LoopEnd,
}

impl Symbol {
    /// Maps a source byte to its symbol; every other byte is commentary.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let symbol = match byte {
            b'+' => Symbol::Increment,
            b'-' => Symbol::Decrement,
            b'<' => Symbol::MoveLeft,
            b'>' => Symbol::MoveRight,
            b'.' => Symbol::Output,
            b',' => Symbol::Input,
            b'[' => Symbol::LoopBegin,
            b']' => Symbol::LoopEnd,
            _ => return None,
        };
        Some(symbol)
    }
}

/// Symbol together with the byte position it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub symbol: Symbol,
    pub position: usize,
}

/// Single-pass scanner over a source byte stream with one symbol of push-back.
pub struct SymbolReader<R> {
    bytes: Bytes<R>,
    position: usize,
    pending: Option<Located>,
}

impl<R: Read> SymbolReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            bytes: source.bytes(),
            position: 0,
            pending: None,
        }
    }

    /// Next alphabet symbol, or `None` at end of input.
    pub fn next_symbol(&mut self) -> io::Result<Option<Located>> {
        if let Some(located) = self.pending.take() {
            return Ok(Some(located));
        }
        for byte in self.bytes.by_ref() {
            let byte = byte?;
            let position = self.position;
            self.position += 1;
            if let Some(symbol) = Symbol::from_byte(byte) {
                return Ok(Some(Located { symbol, position }));
            }
        }
        Ok(None)
    }

    /// Returns a symbol to the stream so the next call yields it again.
    pub fn push_back(&mut self, located: Located) {
        debug_assert!(self.pending.is_none(), "only one symbol of push-back");
        self.pending = Some(located);
    }

    /// Consumes the remaining run of `symbol` and returns its total length,
    /// counting the occurrence the caller already read.
    pub fn count_run(&mut self, symbol: Symbol) -> io::Result<usize> {
        let mut count = 1;
        while let Some(next) = self.next_symbol()? {
            if next.symbol != symbol {
                self.push_back(next);
                break;
            }
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(source: &[u8]) -> Vec<(Symbol, usize)> {
        let mut reader = SymbolReader::new(source);
        let mut out = Vec::new();
        while let Some(located) = reader.next_symbol().unwrap() {
            out.push((located.symbol, located.position));
        }
        out
    }

    #[test]
    fn skips_commentary_bytes() {
        assert_eq!(
            symbols(b"a+ b\n]x"),
            vec![(Symbol::Increment, 1), (Symbol::LoopEnd, 5)]
        );
    }

    #[test]
    fn run_spans_commentary_and_stops_at_other_symbol() {
        let mut reader = SymbolReader::new(&b"+ + x+-+"[..]);
        let first = reader.next_symbol().unwrap().unwrap();
        assert_eq!(first.symbol, Symbol::Increment);
        assert_eq!(reader.count_run(Symbol::Increment).unwrap(), 3);
        let next = reader.next_symbol().unwrap().unwrap();
        assert_eq!(next.symbol, Symbol::Decrement);
        assert_eq!(next.position, 6);
    }

    #[test]
    fn run_ends_at_end_of_input() {
        let mut reader = SymbolReader::new(&b">>>>"[..]);
        reader.next_symbol().unwrap();
        assert_eq!(reader.count_run(Symbol::MoveRight).unwrap(), 4);
        assert_eq!(reader.next_symbol().unwrap(), None);
    }
}
