mod carousel;
mod data_url;
mod errors;
mod friendly;
mod history;
mod mockup;
mod prompt;
mod reference;
mod session;
mod settings;
mod store;
mod studio;

pub use carousel::Carousel;
pub use errors::{StudioError, ValidationError};
pub use friendly::{FriendlyError, FriendlyErrorKind};
pub use history::{HistoryEntry, HistoryStore, HISTORY_CAPACITY};
pub use mockup::{MockupItem, MockupOutcome, MockupSlot, MOCKUP_ITEMS};
pub use reference::{ReferenceImage, ReferenceSet, MAX_REFERENCE_IMAGES};
pub use session::{controls, Controls, GeneratedImage, OutputFormat, Phase, Session};
pub use settings::Settings;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use studio::{
    ClearConfirmation, Download, GenerateRequest, ImageModelFactory, Studio, StudioParams,
};
