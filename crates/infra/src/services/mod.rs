mod push_gateway;
mod text_extractor;

pub use push_gateway::{HttpPushGateway, IPushGateway, PushNotification, StubPushGateway};
pub use text_extractor::{ITextExtractor, StubTextExtractor};
