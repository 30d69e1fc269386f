pub mod critical_path;
pub mod forward_pass;

pub use critical_path::CriticalPath;
pub use forward_pass::{ForwardPass, ScheduledDates};
