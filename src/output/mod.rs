mod format;
mod json;

pub use format::{compose_atlas, save_atlas_image};
pub use json::write_manifest;

/// File name of an atlas image: `name.png` for a single atlas, `name_<i>.png` otherwise
pub fn atlas_png_filename(base_name: &str, index: usize, total: usize) -> String {
    if total == 1 {
        format!("{}.png", base_name)
    } else {
        format!("{}_{}.png", base_name, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atlas_png_filename() {
        assert_eq!(atlas_png_filename("emote", 0, 1), "emote.png");
        assert_eq!(atlas_png_filename("emote", 0, 2), "emote_0.png");
        assert_eq!(atlas_png_filename("emote", 1, 2), "emote_1.png");
    }
}
