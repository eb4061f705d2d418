pub mod autostart;
pub mod burn_in;
pub mod course_list;
pub mod fonts;
pub mod geometry;
pub mod gui;
pub mod logging;
pub mod restart;
pub mod scheduler;
pub mod settings;
pub mod settings_editor;
pub mod topmost;
pub mod visibility;
