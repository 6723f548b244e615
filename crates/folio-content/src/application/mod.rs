//! Application services: resolution, template choice and page assembly.

pub mod page_handlers;
pub mod resolver;
pub mod template_chooser;
