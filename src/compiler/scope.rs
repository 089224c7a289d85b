use std::collections::HashMap;

/// Stack of per-block frames mapping local names to offsets from the frame
/// base. Slots are 8 bytes wide and handed out densely downwards, starting at
/// -8; leaving a block drops its names but never reuses their slots, so every
/// offset in a function stays distinct.
#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<HashMap<String, i64>>,
    next_offset: i64,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
            next_offset: 0,
        }
    }

    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }

    /// Allocate a fresh slot for `name` in the innermost frame and return its
    /// offset. Declaring a name again shadows any outer binding.
    pub fn declare(&mut self, name: &str) -> i64 {
        self.next_offset -= 8;
        let offset = self.next_offset;

        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_owned(), offset);
        }

        offset
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    /// Total slot bytes rounded up to the next multiple of 16, so the stack
    /// pointer stays aligned across calls.
    pub fn frame_size(&self) -> i64 {
        (-self.next_offset + 15) & !15
    }
}
