pub mod error;
pub mod handler;
pub mod metric;
pub mod registry;
pub mod report;
pub mod tensor;
pub mod value;

pub use error::*;
pub use handler::*;
pub use metric::*;
pub use registry::*;
pub use report::*;
pub use tensor::*;
pub use value::*;
