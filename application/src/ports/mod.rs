//! Ports: what the use cases need from the outside world.

pub mod clock;
pub mod event_log;
pub mod observer;
pub mod page_driver;

pub use clock::{Clock, SystemClock};
pub use event_log::{EventLog, NoEventLog, RunEvent};
pub use observer::{FleetObserver, NoObserver};
pub use page_driver::{DriverError, ElementHandle, PageDriver, PageSession};
