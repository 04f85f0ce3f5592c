use base64::{Engine as _, engine::general_purpose};

/// Binary payload with its declared media type (image or audio)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaRef {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Render as a self-describing `data:` reference
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }

    /// Parse a `data:<mime>;base64,<payload>` reference
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        let data = general_purpose::STANDARD.decode(payload).ok()?;

        Some(Self::new(mime_type, data))
    }

    /// File extension matching the media type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.split(';').next().unwrap_or_default() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/mpeg" | "audio/mp3" => "mp3",
            _ => "bin",
        }
    }
}
