pub mod api;
pub mod cascade;
pub mod list;
pub mod pages;
pub mod renderer;
