pub mod graph_dto;
pub mod message_dto;
