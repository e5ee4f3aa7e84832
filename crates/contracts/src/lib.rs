pub mod master;
pub mod shared;
pub mod system;
