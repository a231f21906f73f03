use ulid::Ulid;

pub const FIXED_IMAGE: &str = "tmp/protocc";
pub const FIXED_CONTAINER: &str = "protocc";

/// Image tag and container name used for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub image: String,
    pub container: String,
    /// The image belongs to this invocation alone and is removed afterwards.
    pub ephemeral_image: bool,
}

impl ArtifactNames {
    /// Shared names; concurrent invocations on one host will collide.
    pub fn fixed() -> Self {
        Self {
            image: FIXED_IMAGE.to_string(),
            container: FIXED_CONTAINER.to_string(),
            ephemeral_image: false,
        }
    }

    /// Names suffixed with a fresh ULID, safe to use concurrently.
    pub fn unique() -> Self {
        Self::with_suffix(&Ulid::new().to_string().to_lowercase())
    }

    pub fn with_suffix(suffix: &str) -> Self {
        Self {
            image: format!("{FIXED_IMAGE}:{suffix}"),
            container: format!("{FIXED_CONTAINER}-{suffix}"),
            ephemeral_image: true,
        }
    }
}
