mod bus;
mod events;

pub use bus::{EventBus, Subscription};
pub use events::{MouseEvent, MouseEventKind, Tick};
