pub mod traits;

pub use traits::{BoxStream, MuxConnection, MuxStream};
