//! # TUI Components
//!
//! All UI pieces of the kiosk screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: brand, mode and status line. Renders straight to the `Frame`.
//!
//! ### Scroll Body Widgets
//!
//! Everything below the title bar lives in one `ScrollView`, which renders
//! into its own buffer, so these implement ratatui's `Widget` and expose a
//! `calculate_height` the layout pass calls first:
//!
//! - `MediaDisplay`: one recommendation card (badge, title, bullets on expand)
//! - `CameraPanel`: live preview and the hint for the current capture state
//! - `StaticCatalog`: the full menu grid
//!
//! All of them take their data as props. None of them reach into `App`.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file, plus the colour palette)
//! ├── title_bar.rs
//! ├── media_display.rs
//! ├── camera_panel.rs
//! └── static_catalog.rs
//! ```

mod camera_panel;
mod media_display;
mod static_catalog;
mod title_bar;

pub use camera_panel::CameraPanel;
pub use media_display::MediaDisplay;
pub use static_catalog::StaticCatalog;
pub use title_bar::TitleBar;

/// Brand colours shared by every component.
pub mod palette {
    use ratatui::style::Color;

    /// Page background and text on dark bands.
    pub const LIGHT_GREEN: Color = Color::Rgb(0xEA, 0xF4, 0xEC);
    /// Title bar, catalog band, badges.
    pub const DARK_GREEN: Color = Color::Rgb(0x1E, 0x39, 0x32);
    pub const ACCENT: Color = Color::Rgb(0xFF, 0x6B, 0x45);
    /// Body text.
    pub const INK: Color = Color::Rgb(0x24, 0x3B, 0x35);
    pub const HEADLINE: Color = Color::Rgb(0x0B, 0x3A, 0x34);
}
