//! Master-data conventions shared by client and server.
//!
//! - `record`: schema-less flat records with insertion-ordered fields
//! - `table`: primary key and REST endpoint naming rules
//! - `hierarchy`: the fixed University → Semester chain

pub mod hierarchy;
pub mod record;
pub mod table;
