//! Tool modules
//! Image generation tools and the image handling they share

pub mod image_codec;
pub mod image_source;
pub mod image_tools;
pub mod image2image;
pub mod text2image;

pub use image_codec::{decode_image, encode_data_url, DecodedImage, EncodedImage, ImageDecodeError};
pub use image_source::{ImageInput, ImageSource, ImageSourceError, ImageStream};
pub use image_tools::{
    parse_extra_body, ImageGenerationClient, PluginTool, ToolCredentials, ToolInvokeMessage,
};
pub use image2image::{Image2ImageParams, Image2ImageTool};
pub use text2image::{Text2ImageParams, Text2ImageTool};
