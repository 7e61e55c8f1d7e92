use crate::friendly::FriendlyError;

/// A product context a mockup is rendered onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockupItem {
    pub name: &'static str,
    pub context: &'static str,
}

/// The fixed set of product contexts, rendered in this order.
pub const MOCKUP_ITEMS: [MockupItem; 5] = [
    MockupItem {
        name: "T-shirt",
        context: "a white t-shirt",
    },
    MockupItem {
        name: "Mug",
        context: "a ceramic coffee mug",
    },
    MockupItem {
        name: "Business card",
        context: "a professional business card",
    },
    MockupItem {
        name: "Pen",
        context: "a sleek modern pen",
    },
    MockupItem {
        name: "Banner",
        context: "a large storefront banner",
    },
];

pub(crate) fn mockup_instruction(context: &str) -> String {
    format!(
        "Realistically place this logo onto {context}. The logo should be \
         clearly visible and well-integrated."
    )
}

/// Outcome of one mockup call. Failures stay isolated to their slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockupOutcome {
    /// Data URL of the rendered mockup.
    Image(String),
    Failed(FriendlyError),
}

/// One carousel slot, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockupSlot {
    pub item: MockupItem,
    pub outcome: MockupOutcome,
}

impl MockupSlot {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, MockupOutcome::Failed(_))
    }
}
