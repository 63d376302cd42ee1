//! Rich text for herald.
//!
//! A [`Text`] is a small tree: every node carries content, a [`Style`],
//! optional hover/click metadata and child nodes that inherit the parent
//! style. Messages are stored in locale files through a [`TextFormat`]; the
//! default [`Markup`] format is a tag syntax such as `<red>(value)</red>`.

mod format;
mod style;
mod text;


pub use format::{Markup, Plain, TextFormat};
pub use style::{Color, Modifier, Style};
pub use text::{ClickAction, Text};
