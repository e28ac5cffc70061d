pub mod attendance;
pub mod contract;
pub mod mandate;
pub mod member;
pub mod tariff;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use contract::{BillingCycle, Contract, LegalAcceptance, PaymentMethod};
pub use mandate::{MandateStatus, SepaMandate};
pub use member::{Address, BankDetails, Gender, Guardian, Member};
pub use tariff::{AgeGroup, Tariff};
