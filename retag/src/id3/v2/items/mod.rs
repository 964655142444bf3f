mod attached_picture_frame;
mod binary_frame;
mod buffer_size_frame;
mod encrypted_meta_frame;
mod extended_text_frame;
mod extended_url_frame;
mod language_frame;
mod popularimeter;
mod private_frame;
mod sync_text;
mod text_information_frame;
mod unique_file_identifier;
mod url_link_frame;

pub use attached_picture_frame::AttachedPictureFrame;
pub use binary_frame::BinaryFrame;
pub use buffer_size_frame::RecommendedBufferSizeFrame;
pub use encrypted_meta_frame::EncryptedMetaFrame;
pub use extended_text_frame::ExtendedTextFrame;
pub use extended_url_frame::ExtendedUrlFrame;
pub use language_frame::{CommentFrame, UnsynchronizedTextFrame};
pub use popularimeter::PopularimeterFrame;
pub use private_frame::PrivateFrame;
pub use sync_text::{SyncTextContentType, SynchronizedTextFrame, TimestampFormat};
pub use text_information_frame::TextInformationFrame;
pub use unique_file_identifier::UniqueFileIdentifierFrame;
pub use url_link_frame::UrlLinkFrame;
