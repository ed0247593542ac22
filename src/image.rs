// CDN image URLs.
// Rewrites Cloudinary upload URLs to request optimized renditions.

const CLOUDINARY_HOST: &str = "res.cloudinary.com";
const UPLOAD_MARKER: &str = "/upload/";

/// Rendition options. Defaults let the CDN pick quality and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub quality: String,
    pub format: String,
    pub width: Option<u32>,
    /// Force GIF output, for animated sources.
    pub force_gif: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            quality: "q_auto".to_string(),
            format: "f_auto".to_string(),
            width: None,
            force_gif: false,
        }
    }
}

impl ImageOptions {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }
}

/// Optimized form of `url`. Anything that is not a Cloudinary upload URL
/// comes back unchanged.
pub fn optimized_url(url: &str, options: &ImageOptions) -> String {
    if !url.contains(CLOUDINARY_HOST) {
        return url.to_string();
    }
    let Some(upload_index) = url.find(UPLOAD_MARKER) else {
        return url.to_string();
    };

    let split = upload_index + UPLOAD_MARKER.len();
    let (base, image_path) = url.split_at(split);

    let format = if options.force_gif {
        "f_gif"
    } else {
        options.format.as_str()
    };
    let mut params: Vec<String> = [options.quality.as_str(), format]
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(width) = options.width {
        params.push(format!("w_{width}"));
    }

    // Keep "v<version>/<public id>" and drop any earlier transformations.
    let segments: Vec<&str> = image_path.split('/').collect();
    let version_and_id = segments[segments.len().saturating_sub(2)..].join("/");
    let without_ext = match version_and_id.rfind('.') {
        Some(dot) => &version_and_id[..dot],
        None => version_and_id.as_str(),
    };

    format!("{base}{}/{without_ext}", params.join(","))
}
