// Section type catalogue - what a page-builder UI shows when adding a section

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::SectionType;

#[derive(Debug, Clone, Serialize)]
pub struct SectionTypeInfo {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub name: &'static str,
    pub description: &'static str,
    pub example: Value,
}

pub fn section_types() -> Vec<SectionTypeInfo> {
    SectionType::ALL.into_iter().map(describe).collect()
}

pub fn describe(section_type: SectionType) -> SectionTypeInfo {
    let (name, description, example) = match section_type {
        SectionType::ImageText => (
            "Image & Text",
            "A component with an image on one side and text content on the other",
            json!({
                "type": "image-text",
                "imageUrl": "/uploads/example-image.jpg",
                "imageAlt": "Example image",
                "title": "Amazing Title",
                "text": "This is some amazing content text.",
                "imagePosition": "left",
                "ctaButton": { "text": "Learn More", "url": "/about" }
            }),
        ),
        SectionType::Hero => (
            "Hero Section",
            "A full-width hero section with background image and call-to-action",
            json!({
                "type": "hero",
                "backgroundImage": "/uploads/hero-bg.jpg",
                "backgroundImageAlt": "City skyline",
                "title": "Transform Your Business",
                "subtitle": "Join thousands of companies",
                "ctaButton": { "text": "Get Started", "url": "/signup" },
                "textAlignment": "center"
            }),
        ),
        SectionType::Slider => (
            "Image Slider",
            "An image carousel with multiple slides",
            json!({
                "type": "slider",
                "autoPlay": true,
                "duration": 5,
                "slides": [
                    {
                        "imageUrl": "/uploads/slide1.jpg",
                        "imageAlt": "Slide 1",
                        "title": "Slide Title",
                        "description": "Slide description",
                        "ctaButton": { "text": "View More", "url": "/products" }
                    },
                    {
                        "imageUrl": "/uploads/slide2.jpg",
                        "imageAlt": "Slide 2",
                        "title": "Another Slide",
                        "description": "Another description"
                    }
                ]
            }),
        ),
        SectionType::TextBlock => (
            "Text Block",
            "Simple text content with alignment options",
            json!({
                "type": "text-block",
                "title": "About Us",
                "content": "We are a company dedicated to excellence and innovation.",
                "textAlignment": "center",
                "backgroundColor": "#f8f9fa"
            }),
        ),
        SectionType::Gallery => (
            "Image Gallery",
            "A collection of images with different layout options",
            json!({
                "type": "gallery",
                "title": "Our Portfolio",
                "images": [
                    { "url": "/uploads/img1.jpg", "alt": "Project 1", "caption": "E-commerce Platform" },
                    { "url": "/uploads/img2.jpg", "alt": "Project 2", "caption": "Mobile App" },
                    { "url": "/uploads/img3.jpg", "alt": "Project 3", "caption": "Web Dashboard" }
                ],
                "layout": "grid",
                "columns": 3
            }),
        ),
        SectionType::ContactForm => (
            "Contact Form",
            "A customizable contact form with various field types",
            json!({
                "type": "contact-form",
                "title": "Contact Us",
                "description": "Get in touch with us and we will respond as soon as possible.",
                "fields": [
                    { "name": "name", "label": "Full Name", "type": "text", "required": true, "placeholder": "Your full name" },
                    { "name": "email", "label": "Email", "type": "email", "required": true, "placeholder": "your@email.com" },
                    { "name": "subject", "label": "Subject", "type": "select", "required": true, "options": ["General", "Support", "Sales"] },
                    { "name": "message", "label": "Message", "type": "textarea", "required": true, "placeholder": "Your message here..." }
                ],
                "submitButtonText": "Send Message",
                "successMessage": "Thank you for your message! We will get back to you soon."
            }),
        ),
    };

    SectionTypeInfo {
        section_type,
        name,
        description,
        example,
    }
}
