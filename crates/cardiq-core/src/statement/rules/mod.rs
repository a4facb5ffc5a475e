//! Rule-based helpers for statement field extraction.

pub mod amounts;
pub mod cleanup;
pub mod dates;
pub mod lexical;
pub mod patterns;

pub use amounts::parse_amount;
pub use cleanup::{clean_block, clean_line};
pub use dates::{parse_date, parse_date_range};
pub use lexical::token_similarity;
