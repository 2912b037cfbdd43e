pub mod designs;
pub mod image;

pub use designs::{handle_list_designs, DesignSummary, __path_handle_list_designs};
pub use image::{__path_handle_design_image, __path_handle_design_image_query};
pub use image::{handle_design_image, handle_design_image_query, ErrorResponse, FidQuery};
