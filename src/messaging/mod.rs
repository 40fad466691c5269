// Messaging - Lock-free channels between the caller and the engine

pub mod channels;
pub mod command;
pub mod notification;
