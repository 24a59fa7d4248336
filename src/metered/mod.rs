pub mod connection;
pub mod meter;
pub mod stream;

pub use connection::MeteredConnection;
pub use meter::{CountFn, Meter};
pub use stream::MeteredStream;
