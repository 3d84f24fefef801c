pub mod api;
pub mod appearance;
pub mod color;
pub mod config;
pub mod conversation;
pub mod error;
pub mod session;
pub mod state;
pub mod theme;

// Re-export main types for convenience
pub use api::{ChatTransport, Reply, VaultChatClient};
pub use appearance::{button_frame, ButtonFrame, ButtonMetrics, ButtonShape, ButtonType, FloatingButtonOptions, FloatingButtonPlacement};
pub use color::Color;
pub use config::{Config, ConfigBuilder, Settings};
pub use conversation::{Conversation, SendOutcome, FALLBACK_REPLY};
pub use error::{ApiError, ConfigError};
pub use session::ChatSession;
pub use state::{ChatMessage, ChatRole};
pub use theme::Theme;
