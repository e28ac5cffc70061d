pub mod attendance;
pub mod contracts;
pub mod finance;
pub mod members;
pub mod register;
pub mod sepa;
pub mod tariffs;

pub use attendance::Attendance;
pub use contracts::Contracts;
pub use finance::Finance;
pub use members::Members;
pub use register::Register;
pub use sepa::Sepa;
pub use tariffs::Tariffs;
