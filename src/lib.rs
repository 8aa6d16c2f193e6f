//! Salon Status
//!
//! Salon Status derives time-based views of salon records: the lifecycle
//! status of promotions, the urgency and effective status of appointments,
//! and the relative-date labels and category tokens shown next to them.
//!
//! Every function is synchronous and free of I/O. The current instant is
//! passed in explicitly, or read from an injected [`clock::Clock`].

pub mod appointments;
pub mod clock;
pub mod config;
pub mod dates;
pub mod evaluation;
pub mod labels;
pub mod prelude;
pub mod promotions;
