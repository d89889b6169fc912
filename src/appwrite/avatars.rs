//! Avatars service. Every endpoint returns image bytes.

use super::{push_param, AppwriteClient, Params};
use crate::error::Result;

/// Width, height and quality shared by the icon endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSize {
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
    /// Compression quality, 0 to 100
    pub quality: Option<u32>,
}

impl ImageSize {
    fn params(self) -> Params {
        let mut params = Params::new();
        push_param(&mut params, "width", self.width);
        push_param(&mut params, "height", self.height);
        push_param(&mut params, "quality", self.quality);
        params
    }
}

/// Handle for the Avatars API.
#[derive(Clone)]
pub struct Avatars {
    client: AppwriteClient,
}

impl Avatars {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    /// Initials image for `name`.
    pub async fn get_initials(
        &self,
        name: Option<&str>,
        width: Option<u32>,
        height: Option<u32>,
        background: Option<&str>,
    ) -> Result<Vec<u8>> {
        let mut params = Params::new();
        push_param(&mut params, "name", name);
        push_param(&mut params, "width", width);
        push_param(&mut params, "height", height);
        push_param(&mut params, "background", background);
        self.client.get_bytes("/avatars/initials", &params).await
    }

    /// Fetch and resize a remote image.
    pub async fn get_image(
        &self,
        url: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Vec<u8>> {
        let mut params = vec![("url".to_string(), url.to_string())];
        push_param(&mut params, "width", width);
        push_param(&mut params, "height", height);
        self.client.get_bytes("/avatars/image", &params).await
    }

    /// Render `text` as a QR code PNG.
    pub async fn get_qr(
        &self,
        text: &str,
        size: Option<u32>,
        margin: Option<u32>,
        download: Option<bool>,
    ) -> Result<Vec<u8>> {
        let mut params = vec![("text".to_string(), text.to_string())];
        push_param(&mut params, "size", size);
        push_param(&mut params, "margin", margin);
        push_param(&mut params, "download", download);
        self.client.get_bytes("/avatars/qr", &params).await
    }

    /// Favicon of a remote website.
    pub async fn get_favicon(&self, url: &str) -> Result<Vec<u8>> {
        self.client
            .get_bytes("/avatars/favicon", &[("url".to_string(), url.to_string())])
            .await
    }

    /// Browser icon for a two-letter browser code.
    pub async fn get_browser(&self, code: &str, size: ImageSize) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("/avatars/browsers/{}", code), &size.params())
            .await
    }

    /// Credit card brand icon.
    pub async fn get_credit_card(&self, code: &str, size: ImageSize) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("/avatars/credit-cards/{}", code), &size.params())
            .await
    }

    /// Country flag for an ISO 3166-1 alpha-2 code.
    pub async fn get_flag(&self, code: &str, size: ImageSize) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("/avatars/flags/{}", code), &size.params())
            .await
    }
}
