// Section content - typed payloads, validation and multipart form processing

pub mod catalog;
pub mod processor;
pub mod types;
pub mod validator;

pub use catalog::{section_types, SectionTypeInfo};
pub use processor::FormFields;
pub use types::{
    ContactFormContent, CtaButton, FormField, FormFieldType, GalleryContent, GalleryImage,
    GalleryLayout, HeroContent, ImagePosition, ImageTextContent, SectionContent, Slide,
    SliderContent, TextAlignment, TextBlockContent,
};
