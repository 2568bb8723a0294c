//! Domain entities

pub mod channel;
pub mod contact;
pub mod conversation;
pub mod message;
pub mod notification;
pub mod training;
pub mod webhook_log;

pub use channel::{Channel, ProviderKind};
pub use contact::Contact;
pub use conversation::{Conversation, ConversationStatus, Priority};
pub use message::{ContentKind, Direction, Message, MessageStatus, SenderKind};
pub use notification::{AnalyticsEvent, Notification};
pub use training::{AiMode, AiSettings, TrainingDoc};
pub use webhook_log::WebhookLog;
