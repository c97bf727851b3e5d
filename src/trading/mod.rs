pub mod grade_book;
pub mod grading;
pub mod trade;
