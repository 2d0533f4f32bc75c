pub mod theme;

pub use theme::{StyleProvider, ThemeRegistry};
