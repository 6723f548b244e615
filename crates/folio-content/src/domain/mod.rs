//! Domain values for the frontend: page kinds, selections and widgets.

pub mod selection;
pub mod widget;
