//! Avatar tools. Images come back base64-encoded inside the JSON result.

use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};

use super::ToolDef;
use crate::appwrite::avatars::ImageSize;
use crate::clients::ClientRegistry;
use crate::convert::{image_result, parse_call};
use crate::error::{McpError, Result};
use crate::schema;

const BROWSER_CODES: &[&str] = &[
    "aa", "an", "ch", "ci", "cm", "cr", "df", "ec", "ed", "ep", "er", "ff", "fx", "ga", "go", "gr",
    "gt", "ht", "ia", "ic", "ir", "ko", "mi", "mm", "mo", "mz", "nb", "nr", "og", "op", "or", "ot",
    "ov", "ow", "ps", "pt", "qp", "qt", "qw", "qx", "sa", "sf", "sm", "sr", "te", "to", "tv", "tw",
    "uc", "vi", "wc", "we", "wh", "wm", "wo", "ya", "yo",
];

const CREDIT_CARD_CODES: &[&str] = &[
    "amex",
    "argencard",
    "cabal",
    "cencosud",
    "diners",
    "discover",
    "elo",
    "hipercard",
    "jcb",
    "mastercard",
    "naranja",
    "targeta-shopping",
    "union-china-pay",
    "visa",
    "mir",
    "maestro",
];

/// Get all avatar tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "get_avatar_initials",
            "Get user initials avatar image",
            schema!(object {
                optional: {
                    "name": string => "Full name to generate initials from",
                    "width": integer => "Image width (0-2000, default: 500)",
                    "height": integer => "Image height (0-2000, default: 500)",
                    "background": string => "Background color hex (without #)"
                }
            }),
        ),
        ToolDef::new(
            "get_avatar_image",
            "Get avatar image from URL",
            schema!(object {
                required: { "url": string => "URL of the image" },
                optional: {
                    "width": integer => "Image width (0-2000, default: 400)",
                    "height": integer => "Image height (0-2000, default: 400)"
                }
            }),
        ),
        ToolDef::new(
            "get_qr_code",
            "Generate a QR code image",
            schema!(object {
                required: { "text": string => "Text/URL to encode in QR code" },
                optional: {
                    "size": integer => "QR code size (1-1000, default: 400)",
                    "margin": integer => "Margin around QR code (0-10, default: 1)",
                    "download": boolean => "Return as downloadable file"
                }
            }),
        ),
        ToolDef::new(
            "get_favicon",
            "Get favicon from a website URL",
            schema!(object {
                required: { "url": string => "Website URL to get favicon from" }
            }),
        ),
        ToolDef::new(
            "get_browser_icon",
            "Get browser icon by code",
            icon_schema("Browser code", Some(BROWSER_CODES)),
        ),
        ToolDef::new(
            "get_credit_card_icon",
            "Get credit card icon by provider",
            icon_schema("Credit card provider code", Some(CREDIT_CARD_CODES)),
        ),
        ToolDef::new(
            "get_flag",
            "Get country flag image by country code",
            icon_schema(
                "ISO 3166-1 alpha-2 country code (e.g., 'us', 'kr', 'jp')",
                None,
            ),
        ),
    ]
}

/// Schema shared by the coded icon endpoints.
fn icon_schema(code_description: &str, codes: Option<&[&str]>) -> JsonValue {
    let mut schema = schema!(object {
        required: { "code": string },
        optional: {
            "width": integer => "Image width (0-2000, default: 100)",
            "height": integer => "Image height (0-2000, default: 100)",
            "quality": integer => "Image quality (0-100, default: 100)"
        }
    });
    schema["properties"]["code"]["description"] = json!(code_description);
    if let Some(codes) = codes {
        schema["properties"]["code"]["enum"] = json!(codes);
    }
    schema
}

#[derive(Debug, Deserialize)]
struct InitialsArgs {
    name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageArgs {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct QrArgs {
    text: String,
    size: Option<u32>,
    margin: Option<u32>,
    download: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FaviconArgs {
    url: String,
}

#[derive(Debug, Deserialize)]
struct IconArgs {
    code: String,
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u32>,
}

impl IconArgs {
    fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
            quality: self.quality,
        }
    }

    /// Reject codes outside a closed set before any request is made.
    fn check(&self, tool: &str, allowed: &[&str]) -> Result<()> {
        if allowed.contains(&self.code.as_str()) {
            Ok(())
        } else {
            Err(McpError::InvalidArg {
                name: tool.to_string(),
                reason: format!("unknown code '{}'", self.code),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum AvatarCall {
    GetAvatarInitials(InitialsArgs),
    GetAvatarImage(ImageArgs),
    GetQrCode(QrArgs),
    GetFavicon(FaviconArgs),
    GetBrowserIcon(IconArgs),
    GetCreditCardIcon(IconArgs),
    GetFlag(IconArgs),
}

/// Dispatch an avatar tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let avatars = clients.avatars()?;

    match parse_call::<AvatarCall>(name, args)? {
        AvatarCall::GetAvatarInitials(args) => {
            let bytes = avatars
                .get_initials(
                    args.name.as_deref(),
                    args.width,
                    args.height,
                    args.background.as_deref(),
                )
                .await?;
            let label = args.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("default");
            Ok(image_result(format!("Initials avatar for {}", label), &bytes))
        }
        AvatarCall::GetAvatarImage(args) => {
            let bytes = avatars.get_image(&args.url, args.width, args.height).await?;
            Ok(image_result(format!("Avatar from URL: {}", args.url), &bytes))
        }
        AvatarCall::GetQrCode(args) => {
            let bytes = avatars
                .get_qr(&args.text, args.size, args.margin, args.download)
                .await?;
            Ok(image_result(format!("QR code for: {}", args.text), &bytes))
        }
        AvatarCall::GetFavicon(args) => {
            let bytes = avatars.get_favicon(&args.url).await?;
            Ok(image_result(format!("Favicon from: {}", args.url), &bytes))
        }
        AvatarCall::GetBrowserIcon(args) => {
            args.check(name, BROWSER_CODES)?;
            let bytes = avatars.get_browser(&args.code, args.size()).await?;
            Ok(image_result(format!("Browser icon: {}", args.code), &bytes))
        }
        AvatarCall::GetCreditCardIcon(args) => {
            args.check(name, CREDIT_CARD_CODES)?;
            let bytes = avatars.get_credit_card(&args.code, args.size()).await?;
            Ok(image_result(format!("Credit card icon: {}", args.code), &bytes))
        }
        AvatarCall::GetFlag(args) => {
            let bytes = avatars.get_flag(&args.code, args.size()).await?;
            Ok(image_result(format!("Flag: {}", args.code), &bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 7);
    }

    #[test]
    fn test_icon_schema() {
        let schema = icon_schema("Browser code", Some(BROWSER_CODES));
        assert_eq!(schema["required"], json!(["code"]));
        assert_eq!(schema["properties"]["code"]["enum"][0], "aa");
        assert_eq!(schema["properties"]["code"]["description"], "Browser code");

        let flag = icon_schema("Country", None);
        assert!(flag["properties"]["code"].get("enum").is_none());
    }

    #[test]
    fn test_code_check() {
        let args = IconArgs {
            code: "visa".into(),
            width: None,
            height: None,
            quality: None,
        };
        assert!(args.check("get_credit_card_icon", CREDIT_CARD_CODES).is_ok());
        assert!(args.check("get_browser_icon", BROWSER_CODES).is_err());
    }
}
