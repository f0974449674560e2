/// Circle geometry for the thumbnail strips.
pub mod thumbnails;
