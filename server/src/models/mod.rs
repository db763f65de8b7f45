pub mod event;
pub mod input;
pub mod view;

pub use event::{Event, Speaker, MAX_DESCRIPTION_LEN};
pub use input::{EventInput, SpeakerInput};
pub use view::{EventView, SpeakerView};
