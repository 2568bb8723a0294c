//! Database models (`FromRow` structs mirroring table shapes)

pub mod channel;
pub mod contact;
pub mod conversation;
pub mod message;
pub mod training;

pub use channel::ChannelModel;
pub use contact::ContactModel;
pub use conversation::ConversationModel;
pub use message::MessageModel;
pub use training::{AiSettingsModel, TrainingDocModel};
