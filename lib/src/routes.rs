pub const SAVE_IMAGE: &str = "/saveImage";
pub const GET_LAST_IMAGES: &str = "/getLastImages";
