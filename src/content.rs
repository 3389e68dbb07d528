mod category;
mod post;
mod settings;

pub use category::Category;
pub use post::{Attachment, Post, Status, parse_date, slugify};
pub use settings::Settings;
