// Path: crates/state/src/trie/nibble.rs

//! Nibble paths for the 16-ary trie.

/// A key expanded to one nibble per byte, high nibble first.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NibblePath(Vec<u8>);

impl NibblePath {
    pub fn new(key: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(key.len() * 2);
        for byte in key {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }
        Self(nibbles)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_nibble(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// The nibbles in `from..to`, clamped to the path.
    pub fn slice(&self, from: usize, to: usize) -> &[u8] {
        let to = to.min(self.0.len());
        self.0.get(from.min(to)..to).unwrap_or(&[])
    }

    pub fn common_prefix(&self, other: &Self) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_high_nibble_first() {
        let path = NibblePath::new(&[0xAB, 0x01]);
        assert_eq!(path.len(), 4);
        assert_eq!(path.slice(0, 4), &[0xA, 0xB, 0x0, 0x1]);
        assert_eq!(path.get_nibble(4), None);
    }

    #[test]
    fn common_prefix_stops_at_first_difference() {
        let a = NibblePath::new(&[0x12, 0x34]);
        let b = NibblePath::new(&[0x12, 0x35]);
        assert_eq!(a.common_prefix(&b), 3);
        assert_eq!(a.common_prefix(&NibblePath::new(&[0x12])), 2);
        assert_eq!(a.slice(3, 99), &[0x4]);
    }
}
