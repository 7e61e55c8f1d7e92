use crate::mockup::MockupSlot;

/// Pager over completed mockup slots.
///
/// Navigation is single-flight: while a fade transition is in progress every
/// navigation call is ignored until [`Carousel::complete_fade`] is called.
#[derive(Debug)]
pub struct Carousel {
    slots: Vec<MockupSlot>,
    index: usize,
    animating: bool,
}

impl Carousel {
    #[must_use]
    pub fn new(slots: Vec<MockupSlot>) -> Self {
        Self {
            slots,
            index: 0,
            animating: false,
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[MockupSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> Option<&MockupSlot> {
        self.slots.get(self.index)
    }

    /// One-based position and total, for a "2 / 5" style counter.
    #[must_use]
    pub fn counter(&self) -> (usize, usize) {
        (self.index + 1, self.slots.len())
    }

    /// Whether the previous control is interactive (disabled on the first
    /// slot).
    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    /// Whether the next control is interactive (disabled on the last slot).
    #[must_use]
    pub fn can_next(&self) -> bool {
        self.index + 1 < self.slots.len()
    }

    /// Moves to the previous slot. Returns false when ignored (at the first
    /// slot or mid-transition).
    pub fn prev(&mut self) -> bool {
        if self.animating || !self.can_prev() {
            return false;
        }
        self.index -= 1;
        self.animating = true;
        true
    }

    /// Moves to the next slot. Returns false when ignored (at the last slot
    /// or mid-transition).
    pub fn next(&mut self) -> bool {
        if self.animating || !self.can_next() {
            return false;
        }
        self.index += 1;
        self.animating = true;
        true
    }

    /// Jumps to `index`, clamped to the valid range. Returns false when
    /// ignored (empty carousel or mid-transition).
    pub fn show(&mut self, index: usize) -> bool {
        if self.animating || self.slots.is_empty() {
            return false;
        }
        self.index = index.min(self.slots.len() - 1);
        self.animating = true;
        true
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Ends the fade transition, re-enabling navigation.
    pub fn complete_fade(&mut self) {
        self.animating = false;
    }
}
