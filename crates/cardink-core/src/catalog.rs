//! Static design catalogs and the user upload library.
//!
//! Templates and decorative assets are immutable, loaded once and never part
//! of the mutable document. Uploaded user images live in their own library so
//! they can be placed on any page.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::items::ImageRef;

/// A page template: a background image with fixed canvas dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub image: ImageRef,
    pub width: f64,
    pub height: f64,
}

/// A placeable catalog asset (icon, component or tag graphic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: String,
    pub name: String,
    pub image: ImageRef,
}

/// The static catalogs offered by the editor.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub templates: Vec<Template>,
    pub icons: Vec<AssetEntry>,
    pub components: Vec<AssetEntry>,
    pub tags: Vec<AssetEntry>,
}

impl Catalogs {
    /// The built-in catalog set.
    pub fn builtin() -> Self {
        let template = |id: &str, name: &str, width: f64, height: f64| Template {
            id: id.to_string(),
            name: name.to_string(),
            image: ImageRef::Named(id.to_string()),
            width,
            height,
        };
        let entries = |prefix: &str, names: &[&str]| -> Vec<AssetEntry> {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| AssetEntry {
                    id: format!("{prefix}{}", i + 1),
                    name: name.to_string(),
                    image: ImageRef::Named(format!("{prefix}{}", i + 1)),
                })
                .collect()
        };
        Self {
            templates: vec![
                template("template1", "Classic Landscape", 800.0, 600.0),
                template("template2", "Elegant Portrait", 600.0, 800.0),
                template("template3", "Modern Wide", 700.0, 500.0),
            ],
            icons: entries("icon", &["Heart", "Star", "Flower", "Ribbon", "Balloon"]),
            components: entries("component", &["Frame", "Divider", "Banner", "Corner"]),
            tags: entries("tag", &["Save the Date", "RSVP", "Thank You"]),
        }
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// The template new pages default to.
    pub fn default_template(&self) -> &Template {
        &self.templates[0]
    }
}

/// An image uploaded by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserImage {
    pub name: String,
    pub image: ImageRef,
}

/// User-uploaded images, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserImageLibrary {
    images: Vec<UserImage>,
}

impl UserImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw uploaded bytes as a data URL under the given name and
    /// return the reference for placing it.
    pub fn add_upload(&mut self, name: impl Into<String>, mime: &str, bytes: &[u8]) -> ImageRef {
        let image = ImageRef::DataUrl(format!("data:{mime};base64,{}", BASE64.encode(bytes)));
        self.add(name, image.clone());
        image
    }

    pub fn add(&mut self, name: impl Into<String>, image: ImageRef) {
        self.images.insert(
            0,
            UserImage {
                name: name.into(),
                image,
            },
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserImage> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates() {
        let catalogs = Catalogs::builtin();
        assert_eq!(catalogs.templates.len(), 3);
        assert_eq!(catalogs.default_template().width, 800.0);
        assert_eq!(catalogs.default_template().height, 600.0);
        assert!(catalogs.template("template2").is_some());
        assert!(catalogs.template("nope").is_none());
    }

    #[test]
    fn uploads_are_most_recent_first() {
        let mut library = UserImageLibrary::new();
        library.add_upload("first.png", "image/png", b"a");
        library.add_upload("second.png", "image/png", b"b");
        let names: Vec<&str> = library.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["second.png", "first.png"]);
    }

    #[test]
    fn upload_builds_data_url() {
        let mut library = UserImageLibrary::new();
        let image = library.add_upload("x.png", "image/png", &[1, 2, 3]);
        match image {
            ImageRef::DataUrl(url) => {
                assert!(url.starts_with("data:image/png;base64,"));
            }
            other => panic!("unexpected ref: {other:?}"),
        }
    }
}
