use bytes::BytesMut;

/// A packet being transformed in place.
///
/// Contexts only ever peel bytes off the end (`shrink`) or add bytes to it
/// (`append`), so any growable byte container can stand in for a packet.
pub trait PacketBuffer {
    fn data(&self) -> &[u8];

    fn data_mut(&mut self) -> &mut [u8];

    fn len(&self) -> usize {
        self.data().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the last `n` bytes, or everything if `n` exceeds the length.
    fn shrink(&mut self, n: usize);

    /// Makes room for `n` more bytes so the following appends do not
    /// reallocate.
    fn grow(&mut self, n: usize);

    fn append(&mut self, bytes: &[u8]);
}

impl PacketBuffer for Vec<u8> {
    fn data(&self) -> &[u8] {
        self
    }

    fn data_mut(&mut self) -> &mut [u8] {
        self
    }

    fn shrink(&mut self, n: usize) {
        let keep = self.len().saturating_sub(n);
        self.truncate(keep);
    }

    fn grow(&mut self, n: usize) {
        self.reserve(n);
    }

    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl PacketBuffer for BytesMut {
    fn data(&self) -> &[u8] {
        self
    }

    fn data_mut(&mut self) -> &mut [u8] {
        self
    }

    fn shrink(&mut self, n: usize) {
        let keep = self.len().saturating_sub(n);
        self.truncate(keep);
    }

    fn grow(&mut self, n: usize) {
        self.reserve(n);
    }

    fn append(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// A packet living at `offset..offset + length` inside a larger receive
/// buffer. Bytes outside the region are never touched, except that appending
/// past the end of `buffer` extends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    buffer: Vec<u8>,
    offset: usize,
    length: usize,
}

impl RawPacket {
    /// Returns `None` when the region does not fit in `buffer`.
    #[must_use]
    pub fn new(buffer: Vec<u8>, offset: usize, length: usize) -> Option<Self> {
        let end = offset.checked_add(length)?;
        (end <= buffer.len()).then_some(Self {
            buffer,
            offset,
            length,
        })
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    fn end(&self) -> usize {
        self.offset + self.length
    }
}

impl PacketBuffer for RawPacket {
    fn data(&self) -> &[u8] {
        &self.buffer[self.offset..self.end()]
    }

    fn data_mut(&mut self) -> &mut [u8] {
        let end = self.end();
        &mut self.buffer[self.offset..end]
    }

    fn shrink(&mut self, n: usize) {
        self.length = self.length.saturating_sub(n);
    }

    fn grow(&mut self, n: usize) {
        let needed = self.end() + n;
        if self.buffer.len() < needed {
            self.buffer.reserve(needed - self.buffer.len());
        }
    }

    fn append(&mut self, bytes: &[u8]) {
        let end = self.end();
        let new_end = end + bytes.len();
        if self.buffer.len() < new_end {
            self.buffer.resize(new_end, 0);
        }
        self.buffer[end..new_end].copy_from_slice(bytes);
        self.length += bytes.len();
    }
}
