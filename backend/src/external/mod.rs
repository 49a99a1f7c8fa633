//! External API integrations

pub mod image_classifier;

pub use image_classifier::{HttpImageClassifier, ImageClassifier, UnavailableClassifier};
