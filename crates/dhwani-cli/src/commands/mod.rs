pub mod ask;
pub mod chat;
pub mod intent;
pub mod say;
pub mod transcribe;
