pub mod error_banner;
pub mod table_checkbox;
