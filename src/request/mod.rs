pub mod fields;
pub mod parser;

pub use fields::Fields;
pub use parser::{FileUpload, MultipartForm};
