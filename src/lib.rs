#[macro_use]
pub mod logger;

pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod grid;
pub mod io;
pub mod project;
pub mod settings;
pub mod theme;
pub mod view;
