/// Avatar asset storage
///
/// Coordinates where uploaded profile images live. Assets are stored under a
/// path namespaced by user id plus a timestamp/nonce pair so re-uploads never
/// collide, and every backend hands back a publicly resolvable URL.
mod disk;
mod http;
mod memory;

pub use disk::DiskAvatarStore;
pub use http::HttpAvatarStore;
pub use memory::MemoryAvatarStore;

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use rand::Rng;

/// Storage backend for avatar image assets
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Store an image and return its public URL
    async fn upload(&self, user_id: &str, data: Vec<u8>, mime_type: &str) -> ClientResult<String>;

    /// Delete the asset behind a previously returned URL
    ///
    /// Removing an already-deleted asset succeeds.
    async fn remove(&self, url: &str) -> ClientResult<()>;
}

/// Map a supported image MIME type to its file extension
pub(crate) fn extension_for(mime_type: &str) -> ClientResult<&'static str> {
    match mime_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        _ => Err(ClientError::Validation(format!(
            "Unsupported image type: {}",
            mime_type
        ))),
    }
}

/// Fail closed unless the bytes look like a decodable image
pub(crate) fn validate_image(data: &[u8], mime_type: &str) -> ClientResult<()> {
    extension_for(mime_type)?;
    image::guess_format(data)
        .map(|_| ())
        .map_err(|_| ClientError::Validation("File is not a valid image".to_string()))
}

/// Build the storage-relative asset path for a fresh upload
pub(crate) fn asset_path(user_id: &str, mime_type: &str) -> ClientResult<String> {
    let ext = extension_for(mime_type)?;
    let timestamp = chrono::Utc::now().timestamp();
    let nonce: String = {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..6)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect()
    };
    Ok(format!("avatars/{}/{}-{}.{}", user_id, timestamp, nonce, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG header
    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ];

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for("image/jpeg").unwrap(), "jpg");
        assert_eq!(extension_for("image/png").unwrap(), "png");
        assert!(extension_for("application/pdf").is_err());
    }

    #[test]
    fn test_validate_rejects_non_image_bytes() {
        let err = validate_image(b"just some text", "image/png").unwrap_err();
        assert!(err.to_string().contains("not a valid image"));
    }

    #[test]
    fn test_validate_accepts_png_bytes() {
        assert!(validate_image(PNG_BYTES, "image/png").is_ok());
    }

    #[test]
    fn test_asset_paths_are_namespaced_and_unique() {
        let a = asset_path("7", "image/png").unwrap();
        let b = asset_path("7", "image/png").unwrap();
        assert!(a.starts_with("avatars/7/"));
        assert!(a.ends_with(".png"));
        // Nonce keeps same-second re-uploads apart
        assert_ne!(a, b);
    }
}
