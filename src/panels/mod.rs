mod central_panel;
mod pages_panel;
mod properties_panel;
mod toolbar;

pub use central_panel::central_panel;
pub use pages_panel::pages_panel;
pub use properties_panel::properties_panel;
pub use toolbar::toolbar;
