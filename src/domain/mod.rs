pub mod book;
pub mod commands;
pub mod loan;
pub mod member;
pub mod value_objects;

pub use book::Book;
pub use loan::{Loan, LoanStatus, ScheduledLoan};
pub use member::Member;
pub use value_objects::*;
