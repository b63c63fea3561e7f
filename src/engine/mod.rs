pub mod color_matrix;
pub mod decode;
pub mod fit;
