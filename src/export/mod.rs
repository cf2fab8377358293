pub mod issue_log;
pub mod product_csv;
pub mod template;
