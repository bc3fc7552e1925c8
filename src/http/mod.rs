pub mod cors;
pub mod handler;
pub mod response;

pub use handler::handle;
pub use response::ApiReply;
